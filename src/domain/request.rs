use std::collections::BTreeMap;

use crate::domain::validation::ValidationError;
use crate::domain::value::{MessageId, MessageText, RawPhoneNumber, SenderId};

#[derive(Debug, Clone, Default)]
/// Shared options for a send.
pub struct SendOptions {
    /// Sender id; falls back to the configured default when absent.
    pub from: Option<SenderId>,
    /// Per-request override of the configured sandbox mode.
    pub sandbox: Option<bool>,
}

#[derive(Debug, Clone)]
/// A logical send request.
///
/// The recipient count is unbounded from the caller's perspective; the client
/// splits oversized requests into gateway-compliant batches.
pub enum SendSms {
    /// One text delivered to many recipients.
    ToMany(ToMany),
    /// A distinct text per recipient.
    PerRecipient(PerRecipient),
}

#[derive(Debug, Clone)]
pub struct ToMany {
    recipients: Vec<RawPhoneNumber>,
    text: MessageText,
    options: SendOptions,
}

#[derive(Debug, Clone)]
pub struct PerRecipient {
    messages: BTreeMap<RawPhoneNumber, MessageText>,
    options: SendOptions,
}

impl SendSms {
    /// Build a one-text-to-many send. Fails on an empty recipient list.
    pub fn to_many(
        recipients: Vec<RawPhoneNumber>,
        text: MessageText,
        options: SendOptions,
    ) -> Result<Self, ValidationError> {
        if recipients.is_empty() {
            return Err(ValidationError::Empty {
                field: RawPhoneNumber::FIELD,
            });
        }
        Ok(Self::ToMany(ToMany {
            recipients,
            text,
            options,
        }))
    }

    /// Build a per-recipient send. Fails on an empty message map.
    pub fn per_recipient(
        messages: BTreeMap<RawPhoneNumber, MessageText>,
        options: SendOptions,
    ) -> Result<Self, ValidationError> {
        if messages.is_empty() {
            return Err(ValidationError::Empty {
                field: RawPhoneNumber::FIELD,
            });
        }
        Ok(Self::PerRecipient(PerRecipient { messages, options }))
    }

    /// Shared options of either form.
    pub fn options(&self) -> &SendOptions {
        match self {
            Self::ToMany(to_many) => &to_many.options,
            Self::PerRecipient(per_recipient) => &per_recipient.options,
        }
    }

    /// Flat, ordered view of the individual (recipient, text) records.
    ///
    /// Chunking operates on this order, and per-item results are reported in
    /// it.
    pub fn records(&self) -> Vec<(&RawPhoneNumber, &MessageText)> {
        match self {
            Self::ToMany(to_many) => to_many
                .recipients
                .iter()
                .map(|to| (to, &to_many.text))
                .collect(),
            Self::PerRecipient(per_recipient) => per_recipient.messages.iter().collect(),
        }
    }

    /// Number of individual records in this logical request.
    pub fn item_count(&self) -> usize {
        match self {
            Self::ToMany(to_many) => to_many.recipients.len(),
            Self::PerRecipient(per_recipient) => per_recipient.messages.len(),
        }
    }
}

impl ToMany {
    pub fn recipients(&self) -> &[RawPhoneNumber] {
        &self.recipients
    }

    pub fn text(&self) -> &MessageText {
        &self.text
    }

    pub fn options(&self) -> &SendOptions {
        &self.options
    }
}

impl PerRecipient {
    pub fn messages(&self) -> &BTreeMap<RawPhoneNumber, MessageText> {
        &self.messages
    }

    pub fn options(&self) -> &SendOptions {
        &self.options
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Poll one page of inbound responses.
pub struct FetchResponses {
    page: u32,
}

impl FetchResponses {
    /// Request the given page (1-indexed).
    pub fn page(page: u32) -> Result<Self, ValidationError> {
        if page == 0 {
            return Err(ValidationError::InvalidPage { actual: page });
        }
        Ok(Self { page })
    }

    /// The requested page number.
    pub fn page_number(self) -> u32 {
        self.page
    }
}

impl Default for FetchResponses {
    /// The first page.
    fn default() -> Self {
        Self { page: 1 }
    }
}

#[derive(Debug, Clone)]
/// Mark inbound responses as read.
///
/// The id count is unbounded; the client chunks oversized requests.
pub struct MarkRead {
    ids: Vec<MessageId>,
}

impl MarkRead {
    /// Build a mark-read request. Fails on an empty id list.
    pub fn new(ids: Vec<MessageId>) -> Result<Self, ValidationError> {
        if ids.is_empty() {
            return Err(ValidationError::Empty {
                field: MessageId::FIELD,
            });
        }
        Ok(Self { ids })
    }

    /// The ids to mark, in submission order.
    pub fn ids(&self) -> &[MessageId] {
        &self.ids
    }
}
