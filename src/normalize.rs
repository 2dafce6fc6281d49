//! Response normalization: one envelope in, one caller-selected shape out.

use serde_json::Value;

use crate::config::ResponseFormat;
use crate::domain::Envelope;

#[derive(Debug, Clone, PartialEq)]
/// Caller-facing shape of a gateway response, per the configured
/// [`ResponseFormat`].
///
/// This is a closed set; consumers match it exhaustively rather than
/// inspecting types at runtime.
pub enum NormalizedResult {
    /// The envelope verbatim, annotated with the success flag.
    Raw(RawResponse),
    /// The extracted, derived-field form.
    Enhanced(EnhancedResponse),
    /// Both forms, produced from a single parse.
    Both {
        raw: RawResponse,
        enhanced: EnhancedResponse,
    },
}

impl NormalizedResult {
    /// Whether the gateway reported success for this call.
    pub fn success(&self) -> bool {
        match self {
            Self::Raw(raw) => raw.success,
            Self::Enhanced(enhanced) => enhanced.success,
            Self::Both { raw, .. } => raw.success,
        }
    }

    /// The raw component, when the format includes one.
    pub fn raw(&self) -> Option<&RawResponse> {
        match self {
            Self::Raw(raw) => Some(raw),
            Self::Enhanced(_) => None,
            Self::Both { raw, .. } => Some(raw),
        }
    }

    /// The enhanced component, when the format includes one.
    pub fn enhanced(&self) -> Option<&EnhancedResponse> {
        match self {
            Self::Raw(_) => None,
            Self::Enhanced(enhanced) => Some(enhanced),
            Self::Both { enhanced, .. } => Some(enhanced),
        }
    }

    /// The `data` payload, whichever component carries it.
    pub fn data(&self) -> Option<&Value> {
        match self {
            Self::Raw(raw) => raw.envelope.data.as_ref(),
            Self::Enhanced(enhanced) => enhanced.data.as_ref(),
            Self::Both { raw, .. } => raw.envelope.data.as_ref(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
/// Raw passthrough: the parsed envelope unchanged plus the success flag.
pub struct RawResponse {
    pub success: bool,
    pub envelope: Envelope,
}

#[derive(Debug, Clone, PartialEq)]
/// Structured extraction of an envelope.
///
/// Fields absent from the envelope stay `None`; nothing is defaulted to a
/// sentinel.
pub struct EnhancedResponse {
    pub success: bool,
    pub status_code: i32,
    pub status: String,
    pub message: String,
    pub data: Option<Value>,
    /// Populated when the envelope reported a balance below the configured
    /// threshold.
    pub low_balance_warning: Option<String>,
}

/// Convert a parsed envelope into the configured result shape.
pub(crate) fn normalize(
    envelope: Envelope,
    format: ResponseFormat,
    low_balance_threshold: f64,
) -> NormalizedResult {
    match format {
        ResponseFormat::Raw => NormalizedResult::Raw(RawResponse {
            success: envelope.is_success(),
            envelope,
        }),
        ResponseFormat::Enhanced => NormalizedResult::Enhanced(enhance(&envelope, low_balance_threshold)),
        ResponseFormat::Both => {
            let enhanced = enhance(&envelope, low_balance_threshold);
            NormalizedResult::Both {
                raw: RawResponse {
                    success: envelope.is_success(),
                    envelope,
                },
                enhanced,
            }
        }
    }
}

fn enhance(envelope: &Envelope, low_balance_threshold: f64) -> EnhancedResponse {
    let low_balance_warning = envelope
        .balance_amount()
        .filter(|amount| *amount < low_balance_threshold)
        .map(|amount| {
            format!("account balance {amount} is below the configured threshold {low_balance_threshold}")
        });

    EnhancedResponse {
        success: envelope.is_success(),
        status_code: envelope.meta.code,
        status: envelope.meta.status.clone(),
        message: envelope.msg.clone(),
        data: envelope.data.clone(),
        low_balance_warning,
    }
}
