//! Retry with exponential backoff for lookup adapters.

use std::future::Future;
use std::time::Duration;

use tokio_retry::strategy::ExponentialBackoff;
use tokio_retry::RetryIf;

use crate::config::{RETRY_BASE_DELAY_MS, RETRY_MAX_DELAY, RETRY_MAX_RETRIES};
use crate::error_handling::LookupError;

/// Retry budget and backoff of one retried operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the initial attempt
    pub max_retries: usize,
    /// Delay before the first retry; doubled on each further retry
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: RETRY_MAX_RETRIES,
            base_delay: Duration::from_millis(RETRY_BASE_DELAY_MS),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: usize, base_delay: Duration) -> Self {
        Self {
            max_retries,
            base_delay,
        }
    }

    /// Policy without waits between attempts (tests).
    pub fn immediate(max_retries: usize) -> Self {
        Self::new(max_retries, Duration::ZERO)
    }

    /// Total attempts, initial attempt included.
    pub fn max_attempts(&self) -> usize {
        self.max_retries + 1
    }

    /// Delays between attempts: base, 2*base, 4*base, ...
    pub fn strategy(&self) -> impl Iterator<Item = Duration> {
        // from_millis(2) doubles at each step starting at 2ms; the factor
        // rescales the first step to base_delay
        let factor = (self.base_delay.as_millis() / 2) as u64;
        ExponentialBackoff::from_millis(2)
            .factor(factor)
            .max_delay(RETRY_MAX_DELAY)
            .take(self.max_retries)
    }

    /// Runs `action` until it succeeds, fails with a non-retriable error, or
    /// the attempt budget is used up.
    pub async fn run<T, A, Fut, C>(&self, action: A, retriable: C) -> Result<T, LookupError>
    where
        A: FnMut() -> Fut,
        Fut: Future<Output = Result<T, LookupError>>,
        C: FnMut(&LookupError) -> bool,
    {
        RetryIf::start(self.strategy(), action, retriable).await
    }
}
