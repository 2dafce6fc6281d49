use crate::domain::Envelope;

#[derive(Debug, thiserror::Error)]
pub(crate) enum TransportError {
    #[error("invalid JSON response: {0}")]
    Json(#[from] serde_json::Error),

    #[error("empty response body")]
    EmptyBody,
}

/// Decode a single-envelope response body.
pub(crate) fn decode_envelope(body: &str) -> Result<Envelope, TransportError> {
    if body.trim().is_empty() {
        return Err(TransportError::EmptyBody);
    }
    Ok(serde_json::from_str(body)?)
}

#[derive(Debug, Clone)]
/// Body of a bulk-send response.
///
/// Accepted sends come back as a JSON array with one envelope per submitted
/// item; failures (auth, rate limit, invalid fields) come back as one
/// envelope for the whole batch.
pub(crate) enum SendBatchResponse {
    Single(Envelope),
    PerItem(Vec<Envelope>),
}

/// Decode a bulk-send response body, array or single envelope.
///
/// The first non-whitespace byte decides the shape; decoding goes straight
/// from the source text so raw tokens (such as the balance field) survive.
pub(crate) fn decode_send_response(body: &str) -> Result<SendBatchResponse, TransportError> {
    match body.trim_start().as_bytes().first() {
        Some(b'[') => Ok(SendBatchResponse::PerItem(serde_json::from_str(body)?)),
        Some(_) => Ok(SendBatchResponse::Single(serde_json::from_str(body)?)),
        None => Err(TransportError::EmptyBody),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_envelope_rejects_blank_bodies() {
        assert!(matches!(
            decode_envelope("   "),
            Err(TransportError::EmptyBody)
        ));
    }

    #[test]
    fn decode_envelope_rejects_malformed_json() {
        assert!(matches!(
            decode_envelope("{ not json }"),
            Err(TransportError::Json(_))
        ));
    }

    #[test]
    fn decode_send_response_detects_array_shape() {
        let body = r#"[
            {"meta":{"code":200,"status":"SUCCESS"},"msg":"queued","data":{"id":"msg-1"}},
            {"meta":{"code":400,"status":"FIELD_INVALID"},"msg":"bad number"}
        ]"#;
        match decode_send_response(body).unwrap() {
            SendBatchResponse::PerItem(envelopes) => {
                assert_eq!(envelopes.len(), 2);
                assert!(envelopes[0].is_success());
                assert!(!envelopes[1].is_success());
            }
            other => panic!("unexpected shape: {other:?}"),
        }
    }

    #[test]
    fn decode_send_response_detects_single_envelope() {
        let body = r#"{"meta":{"code":401,"status":"AUTH_FAILED"},"msg":"bad key"}"#;
        match decode_send_response(body).unwrap() {
            SendBatchResponse::Single(envelope) => {
                assert_eq!(envelope.meta.status, "AUTH_FAILED");
            }
            other => panic!("unexpected shape: {other:?}"),
        }
    }
}
