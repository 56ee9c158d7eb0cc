//! Bounded retry of single REST calls.

use std::future::Future;
use std::time::Duration;

use super::request::RestResponse;
use crate::config::RetryConfig;
use crate::error::RestError;

/// Retry policy applied to each HTTP call.
///
/// Server errors (5xx) and transport failures are retried with exponential
/// backoff; every other outcome is returned after the first attempt. The
/// policy holds no state between calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    initial_backoff: Duration,
    max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&RetryConfig::default())
    }
}

impl RetryPolicy {
    /// Creates a policy. A `max_attempts` of zero is treated as one.
    #[must_use]
    pub const fn new(max_attempts: u32, initial_backoff: Duration, max_backoff: Duration) -> Self {
        Self {
            max_attempts: if max_attempts == 0 { 1 } else { max_attempts },
            initial_backoff,
            max_backoff,
        }
    }

    /// Creates a policy from the `[retry]` configuration section.
    #[must_use]
    pub const fn from_config(config: &RetryConfig) -> Self {
        Self::new(
            config.max_attempts,
            Duration::from_millis(config.initial_backoff_ms),
            Duration::from_millis(config.max_backoff_ms),
        )
    }

    /// A policy that never retries.
    #[must_use]
    pub const fn no_retry() -> Self {
        Self::new(1, Duration::ZERO, Duration::ZERO)
    }

    /// Total attempts per call, including the first.
    #[must_use]
    pub const fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Delay to wait after failed attempt number `attempt` (1-based).
    #[must_use]
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        let factor = 2_u32.saturating_pow(attempt.saturating_sub(1));
        self.initial_backoff
            .saturating_mul(factor)
            .min(self.max_backoff)
    }

    /// Runs `call` until it yields a non-retryable outcome or the attempts
    /// are used up.
    ///
    /// A 4xx response is handed back untouched after one attempt.
    ///
    /// # Errors
    ///
    /// Returns the last error once every attempt failed. A final 5xx
    /// response becomes [`RestError::HttpStatus`]; a final transport
    /// failure is returned as is. Non-retryable errors are returned at once.
    pub async fn run<F, Fut>(&self, mut call: F) -> Result<RestResponse, RestError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<RestResponse, RestError>>,
    {
        let mut attempt = 1;
        loop {
            let outcome = call().await;
            let retryable = match &outcome {
                Ok(response) => response.status >= 500,
                Err(error) => error.is_retryable(),
            };
            if !retryable {
                return outcome;
            }
            if attempt >= self.max_attempts {
                return match outcome {
                    Ok(response) => Err(RestError::HttpStatus {
                        code: response.status,
                        body: response.body,
                    }),
                    Err(error) => Err(error),
                };
            }

            let delay = self.backoff_for(attempt);
            tracing::warn!(
                attempt,
                max_attempts = self.max_attempts,
                delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                reason = %describe(&outcome),
                "retrying request"
            );
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }
}

fn describe(outcome: &Result<RestResponse, RestError>) -> String {
    match outcome {
        Ok(response) => format!("HTTP {}", response.status),
        Err(error) => error.to_string(),
    }
}
