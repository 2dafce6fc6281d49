use serde::de::Error as DeError;
use serde::ser::Error as SerError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Top-level `meta.status` value the gateway uses for successful calls.
///
/// The match is case-sensitive and exact; an HTTP 2xx status alone never
/// implies success.
pub const STATUS_SUCCESS: &str = "SUCCESS";

/// `meta.status` value signalling that the account hit a rate limit.
pub const STATUS_OVER_LIMIT: &str = "OVER_LIMIT";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// `meta` block of the gateway envelope.
pub struct Meta {
    /// Numeric status code as reported by the gateway.
    pub code: i32,
    /// Status string; [`STATUS_SUCCESS`] or an error code such as
    /// `AUTH_FAILED` or `FIELD_INVALID`.
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Standard gateway response wrapper.
///
/// Every reply carries a `meta` block, a human-readable `msg`, and an optional
/// `data` payload whose shape depends on the endpoint (object for most calls,
/// array for bulk sends, paginated list for inbound polls). The shape of
/// `data` is preserved as received. Some endpoints also report the remaining
/// account `balance` as a sibling field.
pub struct Envelope {
    pub meta: Meta,
    #[serde(default)]
    pub msg: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub balance: Option<Balance>,
}

impl Envelope {
    /// `meta.status == "SUCCESS"` is the sole success signal.
    pub fn is_success(&self) -> bool {
        self.meta.status == STATUS_SUCCESS
    }

    /// Whether the gateway reported a rate limit for this call.
    pub fn is_over_limit(&self) -> bool {
        self.meta.status == STATUS_OVER_LIMIT
    }

    /// Numeric value of the sibling balance field, if one was present.
    pub fn balance_amount(&self) -> Option<f64> {
        self.balance.as_ref().and_then(Balance::as_f64)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Account balance as reported by the gateway, either JSON string or number.
///
/// The raw JSON token is preserved to avoid formatting drift (`10.00` remains
/// `10.00` instead of becoming `10.0`).
pub struct Balance(String);

impl Balance {
    /// The balance as a number, when the token parses as one.
    pub fn as_f64(&self) -> Option<f64> {
        if self.0.starts_with('"') {
            let inner: String = serde_json::from_str(&self.0).ok()?;
            inner.trim().parse().ok()
        } else {
            self.0.parse().ok()
        }
    }

    /// The raw JSON token exactly as received.
    pub fn raw_token(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Balance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Balance {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw: Box<serde_json::value::RawValue> = Deserialize::deserialize(deserializer)?;
        let token = raw.get();

        match token.as_bytes().first().copied() {
            Some(b'"' | b'-' | b'0'..=b'9') => Ok(Self(token.to_owned())),
            _ => Err(D::Error::custom(
                "expected balance field to be JSON string or number",
            )),
        }
    }
}

impl Serialize for Balance {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match serde_json::value::RawValue::from_string(self.0.clone()) {
            Ok(raw) => raw.serialize(serializer),
            Err(err) => Err(S::Error::custom(err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_is_exact_case_sensitive_match() {
        let envelope: Envelope =
            serde_json::from_str(r#"{"meta":{"code":200,"status":"SUCCESS"},"msg":"OK"}"#).unwrap();
        assert!(envelope.is_success());

        let envelope: Envelope =
            serde_json::from_str(r#"{"meta":{"code":200,"status":"success"},"msg":"OK"}"#).unwrap();
        assert!(!envelope.is_success());
    }

    #[test]
    fn data_shape_is_preserved() {
        let envelope: Envelope = serde_json::from_str(
            r#"{"meta":{"code":200,"status":"SUCCESS"},"msg":"OK","data":{"id":"msg-1"}}"#,
        )
        .unwrap();
        assert!(envelope.data.as_ref().unwrap().is_object());

        let envelope: Envelope = serde_json::from_str(
            r#"{"meta":{"code":200,"status":"SUCCESS"},"msg":"OK","data":[1,2,3]}"#,
        )
        .unwrap();
        assert!(envelope.data.as_ref().unwrap().is_array());

        let envelope: Envelope =
            serde_json::from_str(r#"{"meta":{"code":200,"status":"SUCCESS"},"msg":"OK"}"#).unwrap();
        assert!(envelope.data.is_none());
    }

    #[test]
    fn balance_token_survives_round_trip_without_drift() {
        let envelope: Envelope = serde_json::from_str(
            r#"{"meta":{"code":200,"status":"SUCCESS"},"msg":"OK","balance":10.00}"#,
        )
        .unwrap();
        let balance = envelope.balance.as_ref().unwrap();
        assert_eq!(balance.raw_token(), "10.00");
        assert_eq!(balance.as_f64(), Some(10.0));

        let serialized = serde_json::to_string(&envelope).unwrap();
        assert!(serialized.contains(r#""balance":10.00"#));
    }

    #[test]
    fn balance_accepts_string_tokens() {
        let envelope: Envelope = serde_json::from_str(
            r#"{"meta":{"code":200,"status":"SUCCESS"},"msg":"OK","balance":"4.25"}"#,
        )
        .unwrap();
        assert_eq!(envelope.balance_amount(), Some(4.25));
    }

    #[test]
    fn balance_rejects_other_token_kinds() {
        let result = serde_json::from_str::<Envelope>(
            r#"{"meta":{"code":200,"status":"SUCCESS"},"msg":"OK","balance":{"x":1}}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn over_limit_status_is_detected() {
        let envelope: Envelope = serde_json::from_str(
            r#"{"meta":{"code":429,"status":"OVER_LIMIT"},"msg":"Too many requests"}"#,
        )
        .unwrap();
        assert!(envelope.is_over_limit());
        assert!(!envelope.is_success());
    }
}
