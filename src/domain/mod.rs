//! Domain layer: strong types with validation and invariants (no I/O).

mod envelope;
mod request;
mod response;
mod validation;
mod value;

pub use envelope::{Balance, Envelope, Meta, STATUS_OVER_LIMIT, STATUS_SUCCESS};
pub use request::{FetchResponses, MarkRead, PerRecipient, SendOptions, SendSms, ToMany};
pub use response::{BalanceInfo, InboundMessage, MessageReceipt, ResponsesPage};
pub use validation::ValidationError;
pub use value::{AppKey, MessageId, MessageText, PhoneNumber, RawPhoneNumber, SenderId};
