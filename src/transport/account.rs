use serde_json::{Map, Value};

/// Body for a balance query; empty apart from the sandbox flag.
pub(crate) fn encode_balance_body(sandbox: bool) -> Value {
    let mut body = Map::new();
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
    fn balance_body_is_empty_outside_sandbox() {
        assert_eq!(encode_balance_body(false), json!({}));
        assert_eq!(encode_balance_body(true), json!({"sandbox": true}));
    }
}
