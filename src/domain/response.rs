use serde::Deserialize;
use serde_json::Value;

use crate::domain::value::{MessageId, RawPhoneNumber};

#[derive(Debug, Clone, PartialEq)]
/// Per-message outcome of a send, in submission order.
pub struct MessageReceipt {
    /// Recipient the receipt refers to.
    pub to: Option<RawPhoneNumber>,
    /// Whether the gateway accepted this message.
    pub success: bool,
    /// Numeric status code from the per-item envelope.
    pub status_code: i32,
    /// Status string from the per-item envelope.
    pub status: String,
    /// Gateway-assigned message id, present on accepted messages.
    pub message_id: Option<MessageId>,
}

#[derive(Debug, Clone, PartialEq)]
/// Typed view over the paginated `data` payload of an inbound poll.
///
/// Only fields present on the wire are mapped; absent fields stay `None`.
pub struct ResponsesPage {
    pub page: Option<u32>,
    pub total_pages: Option<u32>,
    pub total: Option<u64>,
    pub items: Vec<InboundMessage>,
}

#[derive(Debug, Clone, PartialEq)]
/// One inbound response message.
pub struct InboundMessage {
    pub id: Option<MessageId>,
    pub from: Option<String>,
    pub text: Option<String>,
    pub received_at: Option<String>,
    pub read: Option<bool>,
}

#[derive(Debug, Clone, PartialEq)]
/// Typed view over the `data` payload of a balance query.
pub struct BalanceInfo {
    pub balance: Option<f64>,
    pub currency: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct ResponsesPageWire {
    #[serde(default)]
    page: Option<u32>,
    #[serde(default)]
    total_pages: Option<u32>,
    #[serde(default)]
    total: Option<u64>,
    #[serde(default)]
    responses: Vec<InboundMessageWire>,
}

#[derive(Debug, Clone, Deserialize)]
struct InboundMessageWire {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    from: Option<String>,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    received_at: Option<String>,
    #[serde(default)]
    read: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
struct BalanceInfoWire {
    #[serde(default)]
    balance: Option<NumberOrString>,
    #[serde(default)]
    currency: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(f64),
    String(String),
}

impl NumberOrString {
    fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            Self::String(value) => value.trim().parse().ok(),
        }
    }
}

impl ResponsesPage {
    /// Decode the typed page view from an envelope's `data` payload.
    ///
    /// Returns `None` when the payload is missing or not page-shaped.
    pub fn from_data(data: &Value) -> Option<Self> {
        let wire: ResponsesPageWire = serde_json::from_value(data.clone()).ok()?;
        Some(Self {
            page: wire.page,
            total_pages: wire.total_pages,
            total: wire.total,
            items: wire
                .responses
                .into_iter()
                .map(|item| InboundMessage {
                    id: item.id.and_then(|id| MessageId::new(id).ok()),
                    from: item.from,
                    text: item.text,
                    received_at: item.received_at,
                    read: item.read,
                })
                .collect(),
        })
    }
}

impl BalanceInfo {
    /// Decode the typed balance view from an envelope's `data` payload.
    pub fn from_data(data: &Value) -> Option<Self> {
        let wire: BalanceInfoWire = serde_json::from_value(data.clone()).ok()?;
        Some(Self {
            balance: wire.balance.as_ref().and_then(NumberOrString::as_f64),
            currency: wire.currency,
        })
    }
}
