//! Minimum-spacing rate limiter for outbound provider calls.
//!
//! The data provider's free tier tolerates one request every 15 seconds, so
//! the limiter keeps a single piece of state: the instant of the last
//! permitted call. There is no queue; callers that arrive early simply sleep
//! for the remainder of the interval. The state sits behind an async mutex
//! so concurrent callers serialize correctly instead of racing the
//! timestamp.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

/// Default spacing between outbound requests to the data provider.
pub const DEFAULT_MIN_INTERVAL: Duration = Duration::from_secs(15);

/// Process-wide request spacing gate.
#[derive(Debug)]
pub struct Cooldown {
    min_interval: Duration,
    last_request: Mutex<Option<Instant>>,
}

impl Cooldown {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_request: Mutex::new(None),
        }
    }

    /// Shared limiter at the provider's default cadence.
    pub fn shared_default() -> Arc<Self> {
        Arc::new(Self::new(DEFAULT_MIN_INTERVAL))
    }

    pub const fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Suspend until at least `min_interval` has elapsed since the previous
    /// permitted call, then record the new call time.
    ///
    /// The lock is held across the sleep: if a second caller arrives while
    /// the first is waiting, it queues behind the mutex and observes the
    /// refreshed timestamp, so any two permits are always spaced by the full
    /// interval.
    pub async fn acquire(&self) {
        let mut last_request = self.last_request.lock().await;

        if let Some(previous) = *last_request {
            let elapsed = previous.elapsed();
            if elapsed < self.min_interval {
                let wait = self.min_interval - elapsed;
                debug!(wait_ms = wait.as_millis() as u64, "cooldown: waiting for request budget");
                tokio::time::sleep(wait).await;
            }
        }

        *last_request = Some(Instant::now());
    }
}

impl Default for Cooldown {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_INTERVAL)
    }
}
