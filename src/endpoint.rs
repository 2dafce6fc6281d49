//! Endpoint descriptors: the mapping from logical operation to HTTP
//! method and path.
//!
//! The executor treats descriptors as data; adding an operation means adding
//! a variant here and its body builder in the transport layer.

use reqwest::Method;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Logical operations the client can execute.
pub enum Operation {
    /// Submit outbound messages (bulk, chunked).
    SendSms,
    /// Poll one page of inbound responses.
    FetchResponses,
    /// Mark inbound responses as read (bulk, chunked).
    MarkRead,
    /// Query the account balance.
    Balance,
}

#[derive(Debug, Clone)]
/// HTTP method and path for one operation, resolved against the client's
/// base URL.
pub struct EndpointDescriptor {
    pub method: Method,
    pub path: &'static str,
}

impl Operation {
    /// Resolve this operation's endpoint.
    pub fn descriptor(self) -> EndpointDescriptor {
        match self {
            Self::SendSms => EndpointDescriptor {
                method: Method::POST,
                path: "/sms/send",
            },
            Self::FetchResponses => EndpointDescriptor {
                method: Method::POST,
                path: "/sms/responses",
            },
            Self::MarkRead => EndpointDescriptor {
                method: Method::POST,
                path: "/sms/read",
            },
            Self::Balance => EndpointDescriptor {
                method: Method::POST,
                path: "/account/balance",
            },
        }
    }

    /// Stable operation name, used in log events.
    pub fn name(self) -> &'static str {
        match self {
            Self::SendSms => "sms.send",
            Self::FetchResponses => "sms.responses",
            Self::MarkRead => "sms.read",
            Self::Balance => "account.balance",
        }
    }
}
