//! Fixed-delay retry loop for provider calls.
//!
//! The delay is deliberately fixed rather than exponential: a 429 from the
//! provider asks for a pause longer than the base request cadence, and the
//! source system's observable timing depends on that constant spacing.
//! Known weakness, kept on purpose; revisit only with a behavior change in
//! mind.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use crate::error::FetchError;

/// Default number of retries after the initial attempt.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Default pause before each retry. Independent of, and longer than, the
/// cooldown interval.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(20);

/// Configuration for the bounded retry loop.
///
/// Total attempts = `max_retries + 1`, counted per logical fetch call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub delay: Duration,
}

impl RetryPolicy {
    pub const fn new(max_retries: u32, delay: Duration) -> Self {
        Self { max_retries, delay }
    }

    pub const fn no_retry() -> Self {
        Self {
            max_retries: 0,
            delay: Duration::ZERO,
        }
    }

    /// Run `operation` until it succeeds, fails terminally, or the budget is
    /// spent.
    ///
    /// An explicit loop with an attempt counter, not recursion: the ceiling
    /// is independently testable and the stack stays flat. Retryable
    /// failures ([`FetchError::is_retryable`]) wait the fixed delay and loop;
    /// anything else surfaces immediately. A spent budget surfaces as
    /// [`FetchError::Exhausted`] carrying the total attempt count and the
    /// last underlying failure.
    pub async fn run<T, F, Fut>(&self, mut operation: F) -> Result<T, FetchError>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, FetchError>>,
    {
        let mut attempt = 0_u32;

        loop {
            match operation(attempt).await {
                Ok(value) => return Ok(value),
                Err(error) if error.is_retryable() && attempt < self.max_retries => {
                    warn!(
                        attempt = attempt + 1,
                        delay_ms = self.delay.as_millis() as u64,
                        %error,
                        "fetch attempt failed; retrying after fixed delay"
                    );
                    tokio::time::sleep(self.delay).await;
                    attempt += 1;
                }
                Err(error) if error.is_retryable() => {
                    let attempts = attempt + 1;
                    warn!(attempts, %error, "retry budget exhausted");
                    return Err(FetchError::Exhausted {
                        attempts,
                        last: Box::new(error),
                    });
                }
                Err(error) => return Err(error),
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_RETRIES, DEFAULT_RETRY_DELAY)
    }
}
