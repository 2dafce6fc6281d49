//! Typed async Rust client for APPKEY-authenticated SMS gateway HTTP APIs.
//!
//! The gateway speaks JSON over HTTPS and wraps every reply in a standard
//! envelope (`meta`, `msg`, `data`). This crate layers a domain of strong
//! types, a transport layer for wire-format quirks, and a client layer that
//! orchestrates chunking of bulk operations, retry with exponential backoff,
//! and normalization of responses into a caller-selectable shape.
//!
//! ```rust,no_run
//! use smsgate::{AppKey, MessageText, RawPhoneNumber, SendOptions, SendSms, SmsGateClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), smsgate::SmsGateError> {
//!     let client = SmsGateClient::new(AppKey::new("...")?)?;
//!     let phone = RawPhoneNumber::new("+14155550100")?;
//!     let text = MessageText::new("hello")?;
//!     let request = SendSms::to_many(vec![phone], text, SendOptions::default())?;
//!     let report = client.send_sms(request).await?;
//!     println!("sent {} of {}", report.success_count, report.total_items);
//!     Ok(())
//! }
//! ```
#![forbid(unsafe_code)]

pub mod bulk;
pub mod client;
pub mod config;
pub mod domain;
pub mod endpoint;
pub mod normalize;
mod retry;
mod transport;

pub use bulk::{BatchFailure, BatchResult, BulkReport, Outcome};
pub use client::{SmsGateClient, SmsGateClientBuilder, SmsGateError};
pub use config::{Config, ConfigBuilder, ConfigError, ResponseFormat};
pub use domain::{
    AppKey, Balance, BalanceInfo, Envelope, FetchResponses, InboundMessage, MarkRead,
    MessageId, MessageReceipt, MessageText, Meta, PhoneNumber, RawPhoneNumber, ResponsesPage,
    SendOptions, SendSms, SenderId, ValidationError,
};
pub use endpoint::{EndpointDescriptor, Operation};
pub use normalize::{EnhancedResponse, NormalizedResult, RawResponse};
