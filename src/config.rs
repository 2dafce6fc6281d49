//! Client configuration: validated once at construction, immutable afterwards.

use std::time::Duration;

use crate::domain::SenderId;

const DEFAULT_MAX_RETRIES: u32 = 3;
const DEFAULT_RETRY_BACKOFF_BASE: Duration = Duration::from_millis(500);
const DEFAULT_CHUNK_SIZE: usize = 1000;
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
/// Shape of the result returned for every gateway response.
pub enum ResponseFormat {
    /// The parsed envelope verbatim, annotated only with a success flag.
    Raw,
    /// A structured object with the envelope fields extracted and derived
    /// fields (such as the low-balance warning) populated.
    #[default]
    Enhanced,
    /// Both representations side by side, produced from a single parse.
    Both,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid configuration: {field} {reason}")]
/// A configuration field failed validation at construction time.
///
/// Carries the first invalid field; construction never partially succeeds.
pub struct ConfigError {
    /// Name of the offending field.
    pub field: &'static str,
    /// Why the value was rejected.
    pub reason: &'static str,
}

#[derive(Debug, Clone)]
/// Immutable client settings.
///
/// Build via [`Config::builder`]; every invariant is checked once in
/// [`ConfigBuilder::build`] and can no longer be violated mid-call.
pub struct Config {
    response_format: ResponseFormat,
    max_retries: u32,
    retry_backoff_base: Duration,
    chunk_size: usize,
    low_balance_threshold: f64,
    sandbox_mode: bool,
    default_sender_id: Option<SenderId>,
    auto_retry_failed: bool,
    timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            response_format: ResponseFormat::default(),
            max_retries: DEFAULT_MAX_RETRIES,
            retry_backoff_base: DEFAULT_RETRY_BACKOFF_BASE,
            chunk_size: DEFAULT_CHUNK_SIZE,
            low_balance_threshold: 0.0,
            sandbox_mode: false,
            default_sender_id: None,
            auto_retry_failed: true,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl Config {
    /// Start building a configuration from the defaults.
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }

    /// Selected response shape.
    pub fn response_format(&self) -> ResponseFormat {
        self.response_format
    }

    /// Maximum number of retries after the first attempt.
    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Base delay for exponential backoff between attempts.
    pub fn retry_backoff_base(&self) -> Duration {
        self.retry_backoff_base
    }

    /// Maximum number of items submitted in one physical call.
    ///
    /// The gateway's documented bulk limits have been observed to disagree
    /// with the limits reported in its error payloads, so the ceiling is a
    /// configuration default rather than a wire constant.
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Balance level below which enhanced results carry a warning.
    pub fn low_balance_threshold(&self) -> f64 {
        self.low_balance_threshold
    }

    /// Whether request bodies carry the sandbox flag.
    pub fn sandbox_mode(&self) -> bool {
        self.sandbox_mode
    }

    /// Sender id applied to sends that do not specify one.
    pub fn default_sender_id(&self) -> Option<&SenderId> {
        self.default_sender_id.as_ref()
    }

    /// Whether retryable failures are retried at all.
    pub fn auto_retry_failed(&self) -> bool {
        self.auto_retry_failed
    }

    /// Timeout applied to each physical HTTP call.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[derive(Debug, Clone)]
/// Builder for [`Config`].
pub struct ConfigBuilder {
    config: Config,
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigBuilder {
    /// Create a builder seeded with the default settings.
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    /// Select the response shape.
    pub fn response_format(mut self, format: ResponseFormat) -> Self {
        self.config.response_format = format;
        self
    }

    /// Set the maximum number of retries after the first attempt.
    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.config.max_retries = max_retries;
        self
    }

    /// Set the base delay for exponential backoff.
    pub fn retry_backoff_base(mut self, base: Duration) -> Self {
        self.config.retry_backoff_base = base;
        self
    }

    /// Set the per-call bulk item ceiling.
    pub fn chunk_size(mut self, chunk_size: usize) -> Self {
        self.config.chunk_size = chunk_size;
        self
    }

    /// Set the low-balance warning threshold.
    pub fn low_balance_threshold(mut self, threshold: f64) -> Self {
        self.config.low_balance_threshold = threshold;
        self
    }

    /// Route requests to the gateway's sandbox environment.
    pub fn sandbox_mode(mut self, sandbox: bool) -> Self {
        self.config.sandbox_mode = sandbox;
        self
    }

    /// Set the sender id used when a send does not specify one.
    pub fn default_sender_id(mut self, sender: SenderId) -> Self {
        self.config.default_sender_id = Some(sender);
        self
    }

    /// Enable or disable automatic retries.
    pub fn auto_retry_failed(mut self, auto_retry: bool) -> Self {
        self.config.auto_retry_failed = auto_retry;
        self
    }

    /// Set the per-call HTTP timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Validate every field and produce the immutable [`Config`].
    ///
    /// Fails with [`ConfigError`] naming the first invalid field.
    pub fn build(self) -> Result<Config, ConfigError> {
        let config = self.config;
        if config.retry_backoff_base.is_zero() {
            return Err(ConfigError {
                field: "retry_backoff_base",
                reason: "must be greater than zero",
            });
        }
        if config.chunk_size == 0 {
            return Err(ConfigError {
                field: "chunk_size",
                reason: "must be greater than zero",
            });
        }
        if !config.low_balance_threshold.is_finite() || config.low_balance_threshold < 0.0 {
            return Err(ConfigError {
                field: "low_balance_threshold",
                reason: "must be a finite value of at least zero",
            });
        }
        if config.timeout.is_zero() {
            return Err(ConfigError {
                field: "timeout",
                reason: "must be greater than zero",
            });
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = Config::builder().build().unwrap();
        assert_eq!(config.response_format(), ResponseFormat::Enhanced);
        assert_eq!(config.max_retries(), 3);
        assert_eq!(config.retry_backoff_base(), Duration::from_millis(500));
        assert_eq!(config.chunk_size(), 1000);
        assert_eq!(config.low_balance_threshold(), 0.0);
        assert!(!config.sandbox_mode());
        assert!(config.default_sender_id().is_none());
        assert!(config.auto_retry_failed());
        assert_eq!(config.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn build_rejects_zero_chunk_size() {
        let err = Config::builder().chunk_size(0).build().unwrap_err();
        assert_eq!(err.field, "chunk_size");
    }

    #[test]
    fn build_rejects_zero_backoff_base() {
        let err = Config::builder()
            .retry_backoff_base(Duration::ZERO)
            .build()
            .unwrap_err();
        assert_eq!(err.field, "retry_backoff_base");
    }

    #[test]
    fn build_rejects_negative_or_non_finite_threshold() {
        let err = Config::builder()
            .low_balance_threshold(-1.0)
            .build()
            .unwrap_err();
        assert_eq!(err.field, "low_balance_threshold");

        let err = Config::builder()
            .low_balance_threshold(f64::NAN)
            .build()
            .unwrap_err();
        assert_eq!(err.field, "low_balance_threshold");
    }

    #[test]
    fn build_rejects_zero_timeout() {
        let err = Config::builder().timeout(Duration::ZERO).build().unwrap_err();
        assert_eq!(err.field, "timeout");
    }

    #[test]
    fn build_names_first_invalid_field() {
        let err = Config::builder()
            .retry_backoff_base(Duration::ZERO)
            .chunk_size(0)
            .build()
            .unwrap_err();
        assert_eq!(err.field, "retry_backoff_base");
    }

    #[test]
    fn builder_applies_overrides() {
        let sender = SenderId::new("ACME").unwrap();
        let config = Config::builder()
            .response_format(ResponseFormat::Both)
            .max_retries(5)
            .retry_backoff_base(Duration::from_millis(100))
            .chunk_size(250)
            .low_balance_threshold(10.0)
            .sandbox_mode(true)
            .default_sender_id(sender.clone())
            .auto_retry_failed(false)
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap();

        assert_eq!(config.response_format(), ResponseFormat::Both);
        assert_eq!(config.max_retries(), 5);
        assert_eq!(config.chunk_size(), 250);
        assert_eq!(config.low_balance_threshold(), 10.0);
        assert!(config.sandbox_mode());
        assert_eq!(config.default_sender_id(), Some(&sender));
        assert!(!config.auto_retry_failed());
    }
}
