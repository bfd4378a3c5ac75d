//! Request pacing for the extraction pipeline.
//!
//! Enforces a randomized delay before each network attempt so request
//! timing never forms a mechanical pattern, and a longer fixed pause after
//! the target signals rate limiting. Tracks only a "time of last request"
//! cursor; runs over distinct identifiers must each own their own limiter.

use std::time::Duration;

use rand::Rng;
use tokio::sync::Mutex;
use tokio::time::Instant;

pub struct RateLimiter {
    min_delay: Duration,
    max_delay: Duration,
    block_backoff: Duration,
    last_request: Mutex<Option<Instant>>,
}

impl RateLimiter {
    #[must_use]
    pub fn new(min_delay_ms: u64, max_delay_ms: u64, block_backoff_secs: u64) -> Self {
        Self {
            min_delay: Duration::from_millis(min_delay_ms),
            max_delay: Duration::from_millis(max_delay_ms.max(min_delay_ms)),
            block_backoff: Duration::from_secs(block_backoff_secs),
            last_request: Mutex::new(None),
        }
    }

    /// Block until a uniformly random delay within the configured range has
    /// elapsed since the previous request, then advance the cursor.
    ///
    /// The first call on a fresh limiter still sleeps the full delay: the
    /// caller has no way to know how recently some other process touched
    /// the target.
    pub async fn throttle(&self) {
        let delay = self.pick_delay();
        let mut last = self.last_request.lock().await;

        let wait = match *last {
            Some(at) => delay.saturating_sub(at.elapsed()),
            None => delay,
        };
        if !wait.is_zero() {
            tokio::time::sleep(wait).await;
        }
        *last = Some(Instant::now());
    }

    /// Fixed pause after an upstream rate-limit response, before the chain
    /// is allowed to continue. Repeated blocking is not escalated further;
    /// the affected strategy simply reports `Blocked` and the chain moves on.
    pub async fn note_blocked(&self) {
        tracing::warn!(
            backoff_secs = self.block_backoff.as_secs(),
            "upstream rate limit, backing off before next attempt"
        );
        tokio::time::sleep(self.block_backoff).await;
        *self.last_request.lock().await = Some(Instant::now());
    }

    fn pick_delay(&self) -> Duration {
        if self.min_delay == self.max_delay {
            return self.min_delay;
        }
        let mut rng = rand::rng();
        let millis = rng.random_range(self.min_delay.as_millis()..=self.max_delay.as_millis());
        Duration::from_millis(u64::try_from(millis).unwrap_or(u64::MAX))
    }
}
