//! Bounded retry with exponential backoff.
//!
//! The policy wraps one unit of work (one rate-limit acquire + LLM call +
//! normalization) for a single task. Retries never cross task boundaries:
//! after `max_retries` failed attempts the last error goes back to the
//! orchestrator, which converts it into a failure result. Every error kind
//! is retried; the backoff before attempt k is `base_delay * 2^(k-1)`.

use std::future::Future;
use std::time::Duration;

use crate::analysis::cancel::CancelFlag;
use crate::error::{RedsiftError, Result};

/// Explicit retry policy: bounds and backoff curve visible at the call site.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    max_retries: u32,
    base_delay: Duration,
}

impl RetryPolicy {
    /// `max_retries` is the total attempt budget and must be at least 1.
    pub fn new(max_retries: u32, base_delay: Duration) -> Self {
        Self {
            max_retries: max_retries.max(1),
            base_delay,
        }
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Backoff to sleep after `failed_attempts` attempts have failed.
    pub fn backoff_delay(&self, failed_attempts: u32) -> Duration {
        let exponent = failed_attempts.saturating_sub(1).min(16);
        self.base_delay * 2u32.saturating_pow(exponent)
    }

    /// Run `op` until it succeeds or the attempt budget is spent.
    ///
    /// The cancel flag is checked before each backoff sleep; a cancelled run
    /// surfaces `RedsiftError::Cancelled` instead of the operation's error.
    pub async fn run<T, F, Fut>(&self, cancel: &CancelFlag, mut op: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut attempt = 0;
        loop {
            attempt += 1;
            match op().await {
                Ok(value) => return Ok(value),
                Err(err) => {
                    if attempt >= self.max_retries {
                        tracing::error!(attempt, error = %err, "Final retry failed");
                        return Err(err);
                    }

                    if cancel.is_cancelled() {
                        return Err(RedsiftError::Cancelled);
                    }

                    let delay = self.backoff_delay(attempt);
                    tracing::warn!(
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "Attempt failed, retrying"
                    );
                    tokio::time::sleep(delay).await;

                    if cancel.is_cancelled() {
                        return Err(RedsiftError::Cancelled);
                    }
                }
            }
        }
    }
}
