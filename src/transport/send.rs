use serde::Deserialize;
use serde_json::{Map, Value};

use crate::domain::{Envelope, MessageId, MessageReceipt, MessageText, RawPhoneNumber, SenderId};

/// Body for a one-text-to-many batch: `{"to": [...], "text": "..."}` plus
/// shared fields.
pub(crate) fn encode_to_many_body(
    recipients: &[&RawPhoneNumber],
    text: &MessageText,
    from: Option<&SenderId>,
    sandbox: bool,
) -> Value {
    let mut body = Map::new();
    body.insert(
        RawPhoneNumber::FIELD.to_owned(),
        Value::Array(
            recipients
                .iter()
                .map(|to| Value::String(to.raw().to_owned()))
                .collect(),
        ),
    );
    body.insert(
        MessageText::FIELD.to_owned(),
        Value::String(text.as_str().to_owned()),
    );
    push_shared_fields(&mut body, from, sandbox);
    Value::Object(body)
}

/// Body for a per-recipient batch: `{"messages": [{"to", "text"}, ...]}` plus
/// shared fields.
pub(crate) fn encode_per_recipient_body(
    batch: &[(&RawPhoneNumber, &MessageText)],
    from: Option<&SenderId>,
    sandbox: bool,
) -> Value {
    let messages = batch
        .iter()
        .map(|(to, text)| {
            let mut item = Map::new();
            item.insert(
                RawPhoneNumber::FIELD.to_owned(),
                Value::String(to.raw().to_owned()),
            );
            item.insert(
                MessageText::FIELD.to_owned(),
                Value::String(text.as_str().to_owned()),
            );
            Value::Object(item)
        })
        .collect();

    let mut body = Map::new();
    body.insert("messages".to_owned(), Value::Array(messages));
    push_shared_fields(&mut body, from, sandbox);
    Value::Object(body)
}

fn push_shared_fields(body: &mut Map<String, Value>, from: Option<&SenderId>, sandbox: bool) {
    if let Some(from) = from {
        body.insert(
            SenderId::FIELD.to_owned(),
            Value::String(from.as_str().to_owned()),
        );
    }
    if sandbox {
        body.insert("sandbox".to_owned(), Value::Bool(true));
    }
}

#[derive(Debug, Clone, Deserialize)]
struct ReceiptWire {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    to: Option<String>,
}

/// Build the per-message receipt for one item envelope.
///
/// The recipient comes from the envelope's `data.to` when present, otherwise
/// from the submitted item at the same position (the gateway returns item
/// envelopes in request order).
pub(crate) fn receipt_from_envelope(
    envelope: &Envelope,
    fallback_to: Option<&RawPhoneNumber>,
) -> MessageReceipt {
    let wire = envelope
        .data
        .as_ref()
        .and_then(|data| serde_json::from_value::<ReceiptWire>(data.clone()).ok());
    let (id, to) = match wire {
        Some(wire) => (wire.id, wire.to),
        None => (None, None),
    };

    MessageReceipt {
        to: to
            .and_then(|value| RawPhoneNumber::new(value).ok())
            .or_else(|| fallback_to.cloned()),
        success: envelope.is_success(),
        status_code: envelope.meta.code,
        status: envelope.meta.status.clone(),
        message_id: id.and_then(|value| MessageId::new(value).ok()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn phone(value: &str) -> RawPhoneNumber {
        RawPhoneNumber::new(value).unwrap()
    }

    #[test]
    fn to_many_body_carries_recipients_and_text() {
        let p1 = phone("+14155550100");
        let p2 = phone("+14155550101");
        let text = MessageText::new("hello").unwrap();
        let from = SenderId::new("ACME").unwrap();

        let body = encode_to_many_body(&[&p1, &p2], &text, Some(&from), true);
        assert_eq!(
            body,
            json!({
                "to": ["+14155550100", "+14155550101"],
                "text": "hello",
                "from": "ACME",
                "sandbox": true
            })
        );
    }

    #[test]
    fn to_many_body_omits_absent_shared_fields() {
        let p1 = phone("+14155550100");
        let text = MessageText::new("hello").unwrap();

        let body = encode_to_many_body(&[&p1], &text, None, false);
        assert_eq!(body, json!({"to": ["+14155550100"], "text": "hello"}));
    }

    #[test]
    fn per_recipient_body_expands_message_records() {
        let p1 = phone("+14155550100");
        let p2 = phone("+14155550101");
        let t1 = MessageText::new("hi 1").unwrap();
        let t2 = MessageText::new("hi 2").unwrap();

        let body = encode_per_recipient_body(&[(&p1, &t1), (&p2, &t2)], None, false);
        assert_eq!(
            body,
            json!({
                "messages": [
                    {"to": "+14155550100", "text": "hi 1"},
                    {"to": "+14155550101", "text": "hi 2"}
                ]
            })
        );
    }

    #[test]
    fn receipt_prefers_wire_recipient_and_id() {
        let envelope: Envelope = serde_json::from_str(
            r#"{"meta":{"code":200,"status":"SUCCESS"},"msg":"queued","data":{"id":"msg-7","to":"+14155550100"}}"#,
        )
        .unwrap();

        let fallback = phone("+19995550000");
        let receipt = receipt_from_envelope(&envelope, Some(&fallback));
        assert!(receipt.success);
        assert_eq!(receipt.status_code, 200);
        assert_eq!(receipt.to.as_ref().map(RawPhoneNumber::raw), Some("+14155550100"));
        assert_eq!(receipt.message_id.as_ref().map(MessageId::as_str), Some("msg-7"));
    }

    #[test]
    fn receipt_falls_back_to_submitted_recipient() {
        let envelope: Envelope = serde_json::from_str(
            r#"{"meta":{"code":400,"status":"FIELD_INVALID"},"msg":"bad number"}"#,
        )
        .unwrap();

        let fallback = phone("+14155550100");
        let receipt = receipt_from_envelope(&envelope, Some(&fallback));
        assert!(!receipt.success);
        assert_eq!(receipt.status, "FIELD_INVALID");
        assert_eq!(receipt.to.as_ref().map(RawPhoneNumber::raw), Some("+14155550100"));
        assert!(receipt.message_id.is_none());
    }
}
