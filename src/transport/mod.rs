//! Transport layer: wire-format details (request bodies, envelope decoding).

mod account;
mod envelope;
mod inbound;
mod send;

pub(crate) use account::encode_balance_body;
pub(crate) use envelope::{SendBatchResponse, TransportError, decode_envelope, decode_send_response};
pub(crate) use inbound::{encode_mark_read_body, encode_responses_body};
pub(crate) use send::{encode_per_recipient_body, encode_to_many_body, receipt_from_envelope};
