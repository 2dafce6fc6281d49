//! Retry policy: exponential backoff around a single physical call.

use std::future::Future;
use std::time::Duration;

use tokio::time::sleep;

use crate::client::SmsGateError;
use crate::config::Config;

#[derive(Debug, Clone)]
pub(crate) struct RetryPolicy {
    max_retries: u32,
    backoff_base: Duration,
    auto_retry: bool,
}

impl RetryPolicy {
    pub(crate) fn from_config(config: &Config) -> Self {
        Self {
            max_retries: config.max_retries(),
            backoff_base: config.retry_backoff_base(),
            auto_retry: config.auto_retry_failed(),
        }
    }

    /// Delay before the attempt following `attempt` (1-indexed):
    /// `backoff_base * 2^(attempt - 1)`.
    pub(crate) fn backoff_delay(&self, attempt: u32) -> Duration {
        self.backoff_base
            .saturating_mul(2u32.saturating_pow(attempt.saturating_sub(1)))
    }

    /// Run `call` until it succeeds, fails with a non-retryable error, or the
    /// attempt limit (`max_retries + 1`) is exhausted.
    ///
    /// The last attempt's error is surfaced unchanged. A server-provided
    /// retry hint replaces the computed backoff for that wait. With
    /// `auto_retry` disabled the first failure is surfaced immediately.
    pub(crate) async fn run<T, F, Fut>(&self, mut call: F) -> Result<T, SmsGateError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, SmsGateError>>,
    {
        let total_attempts = if self.auto_retry {
            self.max_retries.saturating_add(1)
        } else {
            1
        };

        let mut attempt: u32 = 1;
        loop {
            match call().await {
                Ok(value) => return Ok(value),
                Err(err) => {
                    if attempt >= total_attempts || !err.is_retryable() {
                        return Err(err);
                    }
                    let delay = err
                        .retry_hint()
                        .unwrap_or_else(|| self.backoff_delay(attempt));
                    tracing::debug!(
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "call failed, backing off before retry"
                    );
                    sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}
