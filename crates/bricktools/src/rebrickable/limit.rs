//! Fixed-interval spacing between remote calls
//!
//! The Rebrickable API budgets roughly one request per second per key.
//! Every remote call issued by the upsert and move paths goes through
//! [`RateLimiter::wait`], a blocking pause on the calling task. No burst
//! allowance, no adaptive backoff; 404 responses count as calls too.

use std::time::Duration;

use tokio::time::{sleep, Instant};

/// Minimum spacing the public API asks for.
pub const MIN_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug)]
pub struct RateLimiter {
    interval: Duration,
    last: Option<Instant>,
}

impl RateLimiter {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: None,
        }
    }

    /// A limiter spaced for the public Rebrickable API.
    pub fn api_default() -> Self {
        Self::new(MIN_INTERVAL)
    }

    /// Suspend until at least the configured interval has passed since the
    /// previous `wait` returned. The first call never sleeps.
    pub async fn wait(&mut self) {
        if let Some(last) = self.last {
            let elapsed = last.elapsed();
            if elapsed < self.interval {
                sleep(self.interval - elapsed).await;
            }
        }
        self.last = Some(Instant::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_consecutive_waits_are_spaced_by_the_interval() {
        let interval = Duration::from_millis(50);
        let mut limiter = RateLimiter::new(interval);

        let start = Instant::now();
        limiter.wait().await;
        limiter.wait().await;

        assert!(start.elapsed() >= interval);
    }

    #[tokio::test]
    async fn test_first_wait_does_not_sleep() {
        let mut limiter = RateLimiter::new(Duration::from_secs(5));

        let start = Instant::now();
        limiter.wait().await;

        assert!(start.elapsed() < Duration::from_millis(100));
    }
}
