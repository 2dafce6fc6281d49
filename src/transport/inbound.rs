use serde_json::{Map, Value};

use crate::domain::MessageId;

/// Body for an inbound poll: `{"page": n}` plus the sandbox flag.
pub(crate) fn encode_responses_body(page: u32, sandbox: bool) -> Value {
    let mut body = Map::new();
    body.insert("page".to_owned(), Value::from(page));
    if sandbox {
        body.insert("sandbox".to_owned(), Value::Bool(true));
    }
    Value::Object(body)
}

/// Body for a mark-read batch: `{"ids": [...]}` plus the sandbox flag.
pub(crate) fn encode_mark_read_body(ids: &[MessageId], sandbox: bool) -> Value {
    let mut body = Map::new();
    body.insert(
        "ids".to_owned(),
        Value::Array(
            ids.iter()
                .map(|id| Value::String(id.as_str().to_owned()))
                .collect(),
        ),
    );
    if sandbox {
        body.insert("sandbox".to_owned(), Value::Bool(true));
    }
    Value::Object(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn responses_body_carries_page() {
        assert_eq!(encode_responses_body(3, false), json!({"page": 3}));
        assert_eq!(
            encode_responses_body(1, true),
            json!({"page": 1, "sandbox": true})
        );
    }

    #[test]
    fn mark_read_body_carries_ids_in_order() {
        let ids = vec![
            MessageId::new("resp-1").unwrap(),
            MessageId::new("resp-2").unwrap(),
        ];
        assert_eq!(
            encode_mark_read_body(&ids, false),
            json!({"ids": ["resp-1", "resp-2"]})
        );
    }
}
