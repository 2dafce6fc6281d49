//! Client layer: orchestrates chunking, retry, transport calls, and response
//! normalization.

use std::error::Error as StdError;
use std::future::Future;
use std::ops::Range;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use reqwest::Method;
use serde_json::Value;
use url::Url;

use crate::bulk::{self, BatchSuccess, BulkReport, Outcome};
use crate::config::{Config, ConfigError};
use crate::domain::{
    AppKey, Envelope, FetchResponses, MarkRead, MessageText, RawPhoneNumber, SendSms,
    STATUS_OVER_LIMIT, ValidationError,
};
use crate::endpoint::{EndpointDescriptor, Operation};
use crate::normalize::{NormalizedResult, normalize};
use crate::retry::RetryPolicy;
use crate::transport::{self, SendBatchResponse, TransportError};

const DEFAULT_BASE_URL: &str = "https://api.smsgate.io/v1";

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

#[derive(Debug, Clone)]
struct HttpResponse {
    status: u16,
    body: String,
    retry_after: Option<Duration>,
}

trait HttpTransport: Send + Sync {
    fn execute<'a>(
        &'a self,
        method: Method,
        url: &'a str,
        app_key: &'a str,
        body: &'a Value,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>>;
}

#[derive(Debug, Clone)]
struct ReqwestTransport {
    client: reqwest::Client,
}

impl HttpTransport for ReqwestTransport {
    fn execute<'a>(
        &'a self,
        method: Method,
        url: &'a str,
        app_key: &'a str,
        body: &'a Value,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>> {
        Box::pin(async move {
            let response = self
                .client
                .request(method, url)
                .header(AppKey::HEADER, app_key)
                .json(body)
                .send()
                .await?;
            let status = response.status().as_u16();
            let retry_after = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.trim().parse::<u64>().ok())
                .map(Duration::from_secs);
            let body = response.text().await?;
            Ok(HttpResponse {
                status,
                body,
                retry_after,
            })
        })
    }
}

#[derive(Debug, thiserror::Error)]
/// Errors returned by [`SmsGateClient`].
///
/// The gateway's own `code`/`status`/`msg` content is always preserved; a
/// specific gateway error is never replaced with a generic one.
pub enum SmsGateError {
    /// Invalid settings rejected at construction; never retried.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// One of the domain constructors rejected an invalid value.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// HTTP client / network failure (DNS, TLS, timeouts, etc). Retryable.
    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn StdError + Send + Sync>),

    /// The gateway reported `OVER_LIMIT` (or HTTP 429). Retryable, honoring
    /// the server's retry hint when one was provided.
    #[error("rate limited by gateway (code {code}): {message}")]
    RateLimit {
        code: i32,
        message: String,
        retry_after: Option<Duration>,
    },

    /// The gateway rejected the request (`AUTH_FAILED`, `FIELD_INVALID`, ...).
    /// Not retryable; retrying cannot fix the request.
    #[error("gateway error {status} (code {code}): {message}")]
    Application {
        code: i32,
        status: String,
        message: String,
    },

    /// Non-2xx HTTP status with no parsable envelope. Retryable for 5xx.
    #[error("unexpected HTTP status: {status}")]
    HttpStatus { status: u16, body: Option<String> },

    /// Response body could not be parsed as the expected format.
    #[error("parse error: {0}")]
    Parse(#[source] Box<dyn StdError + Send + Sync>),
}

impl SmsGateError {
    /// Whether the retry policy may re-attempt the call.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(_) | Self::RateLimit { .. } => true,
            Self::HttpStatus { status, .. } => (500..=599).contains(status),
            Self::Config(_) | Self::Validation(_) | Self::Application { .. } | Self::Parse(_) => {
                false
            }
        }
    }

    /// Server-provided wait hint, when the gateway sent one with a rate
    /// limit.
    pub fn retry_hint(&self) -> Option<Duration> {
        match self {
            Self::RateLimit { retry_after, .. } => *retry_after,
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
/// Builder for [`SmsGateClient`].
///
/// Use this to customize the base URL, configuration, or user-agent.
pub struct SmsGateClientBuilder {
    app_key: AppKey,
    base_url: String,
    config: Config,
    user_agent: Option<String>,
}

impl SmsGateClientBuilder {
    /// Create a builder with the default base URL and configuration.
    pub fn new(app_key: AppKey) -> Self {
        Self {
            app_key,
            base_url: DEFAULT_BASE_URL.to_owned(),
            config: Config::default(),
            user_agent: None,
        }
    }

    /// Override the gateway base URL.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Use the given configuration instead of the defaults.
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Override the HTTP `User-Agent` header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Build a [`SmsGateClient`].
    pub fn build(self) -> Result<SmsGateClient, SmsGateError> {
        let parsed = Url::parse(&self.base_url).map_err(|_| {
            SmsGateError::Config(ConfigError {
                field: "base_url",
                reason: "must be an absolute URL",
            })
        })?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(SmsGateError::Config(ConfigError {
                field: "base_url",
                reason: "must use the http or https scheme",
            }));
        }

        let mut builder = reqwest::Client::builder().timeout(self.config.timeout());
        if let Some(user_agent) = self.user_agent {
            builder = builder.user_agent(user_agent);
        }
        let client = builder
            .build()
            .map_err(|err| SmsGateError::Transport(Box::new(err)))?;

        Ok(SmsGateClient {
            retry: RetryPolicy::from_config(&self.config),
            config: self.config,
            app_key: self.app_key,
            base_url: self.base_url.trim_end_matches('/').to_owned(),
            http: Arc::new(ReqwestTransport { client }),
        })
    }
}

#[derive(Clone)]
/// High-level gateway client.
///
/// One logical call may fan out into several physical HTTP calls: oversized
/// bulk requests are split into batches of at most
/// [`Config::chunk_size`](crate::Config::chunk_size) items, each batch runs
/// under the retry policy, and every response is normalized into the
/// configured [`ResponseFormat`](crate::ResponseFormat).
pub struct SmsGateClient {
    config: Config,
    app_key: AppKey,
    base_url: String,
    http: Arc<dyn HttpTransport>,
    retry: RetryPolicy,
}

impl std::fmt::Debug for SmsGateClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmsGateClient")
            .field("config", &self.config)
            .field("app_key", &self.app_key)
            .field("base_url", &self.base_url)
            .field("http", &"<dyn HttpTransport>")
            .field("retry", &self.retry)
            .finish()
    }
}

impl SmsGateClient {
    /// Create a client with the default base URL and configuration.
    ///
    /// For more customization, use [`SmsGateClient::builder`].
    pub fn new(app_key: AppKey) -> Result<Self, SmsGateError> {
        Self::builder(app_key).build()
    }

    /// Start building a client with custom settings.
    pub fn builder(app_key: AppKey) -> SmsGateClientBuilder {
        SmsGateClientBuilder::new(app_key)
    }

    /// Submit outbound messages.
    ///
    /// Requests larger than the configured chunk size are split into ordered
    /// batches; batches that fail after exhausting retries are reported in
    /// the returned [`BulkReport`] without discarding the batches that
    /// succeeded. A request that fits in a single batch surfaces its failure
    /// as an `Err` instead.
    pub async fn send_sms(&self, request: SendSms) -> Result<BulkReport, SmsGateError> {
        let descriptor = Operation::SendSms.descriptor();
        let url = self.endpoint_url(&descriptor);
        let options = request.options();
        let sandbox = options.sandbox.unwrap_or(self.config.sandbox_mode());
        let from = options.from.as_ref().or_else(|| self.config.default_sender_id());

        let records = request.records();
        let ranges = bulk::batch_ranges(records.len(), self.config.chunk_size());

        let mut outcomes = Vec::with_capacity(ranges.len());
        for (batch_index, range) in ranges.iter().enumerate() {
            let batch = &records[range.clone()];
            let body = match &request {
                SendSms::ToMany(to_many) => {
                    let recipients: Vec<&RawPhoneNumber> =
                        batch.iter().map(|(to, _)| *to).collect();
                    transport::encode_to_many_body(&recipients, to_many.text(), from, sandbox)
                }
                SendSms::PerRecipient(_) => {
                    transport::encode_per_recipient_body(batch, from, sandbox)
                }
            };
            tracing::debug!(
                operation = Operation::SendSms.name(),
                batch_index,
                batch_size = batch.len(),
                "dispatching batch"
            );
            let outcome = self
                .retry
                .run(|| self.send_batch_once(&descriptor, &url, &body, batch))
                .await;
            if let Err(error) = &outcome {
                tracing::warn!(
                    operation = Operation::SendSms.name(),
                    batch_index,
                    error = %error,
                    "batch failed after exhausting retries"
                );
            }
            outcomes.push(outcome);
        }

        self.finish_bulk(&ranges, outcomes)
    }

    /// Poll one page of inbound responses.
    ///
    /// The paginated `data` payload is preserved as received; use
    /// [`ResponsesPage::from_data`](crate::ResponsesPage::from_data) for a
    /// typed view.
    pub async fn fetch_responses(
        &self,
        request: FetchResponses,
    ) -> Result<NormalizedResult, SmsGateError> {
        let descriptor = Operation::FetchResponses.descriptor();
        let url = self.endpoint_url(&descriptor);
        let body =
            transport::encode_responses_body(request.page_number(), self.config.sandbox_mode());
        let envelope = self
            .retry
            .run(|| self.call_envelope_once(&descriptor, &url, &body))
            .await?;
        Ok(self.normalized(envelope))
    }

    /// Mark inbound responses as read.
    ///
    /// Chunked over ids the same way [`SmsGateClient::send_sms`] chunks over
    /// recipients.
    pub async fn mark_read(&self, request: MarkRead) -> Result<BulkReport, SmsGateError> {
        let descriptor = Operation::MarkRead.descriptor();
        let url = self.endpoint_url(&descriptor);
        let sandbox = self.config.sandbox_mode();

        let ids = request.ids();
        let ranges = bulk::batch_ranges(ids.len(), self.config.chunk_size());

        let mut outcomes = Vec::with_capacity(ranges.len());
        for (batch_index, range) in ranges.iter().enumerate() {
            let batch = &ids[range.clone()];
            let body = transport::encode_mark_read_body(batch, sandbox);
            tracing::debug!(
                operation = Operation::MarkRead.name(),
                batch_index,
                batch_size = batch.len(),
                "dispatching batch"
            );
            let outcome = self
                .retry
                .run(|| self.mark_read_batch_once(&descriptor, &url, &body, batch.len()))
                .await;
            if let Err(error) = &outcome {
                tracing::warn!(
                    operation = Operation::MarkRead.name(),
                    batch_index,
                    error = %error,
                    "batch failed after exhausting retries"
                );
            }
            outcomes.push(outcome);
        }

        self.finish_bulk(&ranges, outcomes)
    }

    /// Query the account balance.
    ///
    /// With the enhanced format and a configured threshold, the result
    /// carries a low-balance warning when the account runs low.
    pub async fn balance(&self) -> Result<NormalizedResult, SmsGateError> {
        let descriptor = Operation::Balance.descriptor();
        let url = self.endpoint_url(&descriptor);
        let body = transport::encode_balance_body(self.config.sandbox_mode());
        let envelope = self
            .retry
            .run(|| self.call_envelope_once(&descriptor, &url, &body))
            .await?;
        Ok(self.normalized(envelope))
    }

    fn endpoint_url(&self, descriptor: &EndpointDescriptor) -> String {
        format!("{}{}", self.base_url, descriptor.path)
    }

    fn normalized(&self, envelope: Envelope) -> NormalizedResult {
        normalize(
            envelope,
            self.config.response_format(),
            self.config.low_balance_threshold(),
        )
    }

    fn finish_bulk(
        &self,
        ranges: &[Range<usize>],
        outcomes: Vec<Result<BatchSuccess, SmsGateError>>,
    ) -> Result<BulkReport, SmsGateError> {
        let single_call = ranges.len() == 1;
        let mut report = bulk::merge(ranges, outcomes);
        if single_call && report.outcome == Outcome::Failed {
            if let Some(failure) = report.failures.pop() {
                return Err(failure.error);
            }
        }
        Ok(report)
    }

    async fn call_envelope_once(
        &self,
        descriptor: &EndpointDescriptor,
        url: &str,
        body: &Value,
    ) -> Result<Envelope, SmsGateError> {
        let response = self
            .http
            .execute(descriptor.method.clone(), url, self.app_key.as_str(), body)
            .await
            .map_err(SmsGateError::Transport)?;
        envelope_from_response(&response)
    }

    async fn send_batch_once(
        &self,
        descriptor: &EndpointDescriptor,
        url: &str,
        body: &Value,
        batch: &[(&RawPhoneNumber, &MessageText)],
    ) -> Result<BatchSuccess, SmsGateError> {
        let response = self
            .http
            .execute(descriptor.method.clone(), url, self.app_key.as_str(), body)
            .await
            .map_err(SmsGateError::Transport)?;

        let envelopes = match transport::decode_send_response(&response.body) {
            Ok(SendBatchResponse::PerItem(envelopes)) => {
                if !(200..=299).contains(&response.status) {
                    return Err(SmsGateError::HttpStatus {
                        status: response.status,
                        body: non_blank(&response.body),
                    });
                }
                envelopes
            }
            Ok(SendBatchResponse::Single(envelope)) => {
                vec![accept_envelope(envelope, &response)?]
            }
            Err(err) => return Err(undecodable_response_error(&response, err)),
        };

        let mut receipts = Vec::with_capacity(envelopes.len());
        let mut results = Vec::with_capacity(envelopes.len());
        let mut success_count = 0;
        for (index, envelope) in envelopes.into_iter().enumerate() {
            let fallback = batch.get(index).map(|(to, _)| *to);
            let receipt = transport::receipt_from_envelope(&envelope, fallback);
            if receipt.success {
                success_count += 1;
            }
            receipts.push(receipt);
            results.push(self.normalized(envelope));
        }

        Ok(BatchSuccess {
            results,
            receipts,
            success_count,
        })
    }

    async fn mark_read_batch_once(
        &self,
        descriptor: &EndpointDescriptor,
        url: &str,
        body: &Value,
        batch_len: usize,
    ) -> Result<BatchSuccess, SmsGateError> {
        let envelope = self.call_envelope_once(descriptor, url, body).await?;
        Ok(BatchSuccess {
            results: vec![self.normalized(envelope)],
            receipts: Vec::new(),
            success_count: batch_len,
        })
    }
}

/// Map one HTTP response to a parsed envelope or the error taxonomy.
fn envelope_from_response(response: &HttpResponse) -> Result<Envelope, SmsGateError> {
    match transport::decode_envelope(&response.body) {
        Ok(envelope) => accept_envelope(envelope, response),
        Err(err) => Err(undecodable_response_error(response, err)),
    }
}

fn accept_envelope(envelope: Envelope, response: &HttpResponse) -> Result<Envelope, SmsGateError> {
    if response.status == 429 || envelope.is_over_limit() {
        return Err(SmsGateError::RateLimit {
            code: envelope.meta.code,
            message: preferred_message(&envelope),
            retry_after: response.retry_after,
        });
    }
    if !envelope.is_success() {
        return Err(SmsGateError::Application {
            code: envelope.meta.code,
            status: envelope.meta.status,
            message: envelope.msg,
        });
    }
    if !(200..=299).contains(&response.status) {
        return Err(SmsGateError::HttpStatus {
            status: response.status,
            body: non_blank(&response.body),
        });
    }
    Ok(envelope)
}

fn undecodable_response_error(response: &HttpResponse, err: TransportError) -> SmsGateError {
    if response.status == 429 {
        return SmsGateError::RateLimit {
            code: 429,
            message: non_blank(&response.body).unwrap_or_else(|| STATUS_OVER_LIMIT.to_owned()),
            retry_after: response.retry_after,
        };
    }
    if (200..=299).contains(&response.status) {
        SmsGateError::Parse(Box::new(err))
    } else {
        SmsGateError::HttpStatus {
            status: response.status,
            body: non_blank(&response.body),
        }
    }
}

fn preferred_message(envelope: &Envelope) -> String {
    if envelope.msg.trim().is_empty() {
        envelope.meta.status.clone()
    } else {
        envelope.msg.clone()
    }
}

fn non_blank(body: &str) -> Option<String> {
    if body.trim().is_empty() {
        None
    } else {
        Some(body.to_owned())
    }
}
