//! Client-side rate limiting for outbound LLM calls.
//!
//! Fixed-interval policy: successive `acquire()` returns are spaced at least
//! `1 / rate_limit_per_second` seconds apart; a caller arriving early sleeps
//! for the remainder. Every attempt re-acquires, including retries.
//!
//! The interval bookkeeping sits behind an async mutex held across the sleep,
//! so concurrent callers serialize and each one observes the spacing.

use std::time::{Duration, Instant};

use tokio::sync::Mutex;

/// Enforces a minimum spacing between outbound calls.
#[derive(Debug)]
pub struct RateLimiter {
    min_interval: Duration,
    last_call: Mutex<Option<Instant>>,
}

impl RateLimiter {
    /// Create a limiter allowing `rate_limit_per_second` calls per second.
    ///
    /// Rates at or below zero collapse to no limiting.
    pub fn new(rate_limit_per_second: f64) -> Self {
        let min_interval = if rate_limit_per_second > 0.0 {
            Duration::from_secs_f64(1.0 / rate_limit_per_second)
        } else {
            Duration::ZERO
        };
        Self {
            min_interval,
            last_call: Mutex::new(None),
        }
    }

    /// Block until the next call is allowed, then record the call time.
    pub async fn acquire(&self) {
        let mut last_call = self.last_call.lock().await;

        if let Some(last) = *last_call {
            let elapsed = last.elapsed();
            if elapsed < self.min_interval {
                let wait = self.min_interval - elapsed;
                tracing::debug!(wait_ms = wait.as_millis() as u64, "Rate limit: sleeping");
                tokio::time::sleep(wait).await;
            }
        }

        *last_call = Some(Instant::now());
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_min_interval_from_rate() {
        let limiter = RateLimiter::new(0.5);
        assert_eq!(limiter.min_interval(), Duration::from_secs(2));

        let limiter = RateLimiter::new(10.0);
        assert_eq!(limiter.min_interval(), Duration::from_millis(100));
    }

    #[test]
    fn test_non_positive_rate_disables_limiting() {
        let limiter = RateLimiter::new(0.0);
        assert_eq!(limiter.min_interval(), Duration::ZERO);
    }

    #[tokio::test]
    async fn test_first_acquire_is_immediate() {
        let limiter = RateLimiter::new(0.1);

        let start = Instant::now();
        limiter.acquire().await;
        assert!(start.elapsed() < Duration::from_millis(100));
    }

    #[tokio::test]
    async fn test_consecutive_acquires_are_spaced() {
        // 50 calls per second = 20ms spacing; 3 acquires need >= 40ms
        let limiter = RateLimiter::new(50.0);

        let start = Instant::now();
        limiter.acquire().await;
        limiter.acquire().await;
        limiter.acquire().await;

        assert!(start.elapsed() >= Duration::from_millis(40));
    }

    #[tokio::test]
    async fn test_spacing_only_applies_within_interval() {
        let limiter = RateLimiter::new(100.0);

        limiter.acquire().await;
        tokio::time::sleep(Duration::from_millis(20)).await;

        // Interval already elapsed, no extra wait
        let start = Instant::now();
        limiter.acquire().await;
        assert!(start.elapsed() < Duration::from_millis(10));
    }

    #[tokio::test]
    async fn test_concurrent_acquires_serialize() {
        use std::sync::Arc;

        let limiter = Arc::new(RateLimiter::new(50.0));
        let start = Instant::now();

        let handles: Vec<_> = (0..3)
            .map(|_| {
                let limiter = Arc::clone(&limiter);
                tokio::spawn(async move { limiter.acquire().await })
            })
            .collect();

        for handle in handles {
            handle.await.unwrap();
        }

        assert!(start.elapsed() >= Duration::from_millis(40));
    }
}
