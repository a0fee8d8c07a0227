//! Outbound rate limiting for catalog API calls.
//!
//! IGDB allows roughly 4 requests per second; we run a token bucket with
//! capacity 1 and a 1-second refill so we never get anywhere near the limit.
//!
//! Callers queue in arrival order: slots are booked under a fair
//! `tokio::sync::Mutex`, so a burst of concurrent requests drains at exactly
//! one per period with no starvation. Waiting is a cooperative
//! `sleep_until` - no busy loops - and every wait is bounded by the caller's
//! timeout.

use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;

use super::domain::CatalogError;

/// Default time a caller is willing to wait for a slot.
pub const DEFAULT_ACQUIRE_TIMEOUT: Duration = Duration::from_secs(30);

/// Token-bucket rate limiter with capacity 1.
///
/// One instance is shared by all API calls of a client; it is cheap and safe
/// to call from concurrent tasks.
pub struct RateLimiter {
    period: Duration,
    /// Time the next slot becomes free. `None` until the first acquisition.
    next_free: Mutex<Option<Instant>>,
}

impl RateLimiter {
    /// Create a limiter granting one slot per `period`.
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            next_free: Mutex::new(None),
        }
    }

    /// Create the limiter used for IGDB: 1 request per second.
    pub fn per_second() -> Self {
        Self::new(Duration::from_secs(1))
    }

    /// Wait for a request slot, giving up after `timeout`.
    ///
    /// Returns `Ok(())` once the slot time arrives, or
    /// [`CatalogError::RateLimitTimeout`] if the next slot lies beyond the
    /// timeout. A timed-out caller does not consume a slot.
    pub async fn acquire(&self, timeout: Duration) -> Result<(), CatalogError> {
        let deadline = Instant::now() + timeout;

        // The fair mutex hands out slots in arrival order.
        let mut next_free = self.next_free.lock().await;
        let now = Instant::now();
        let slot = match *next_free {
            Some(t) if t > now => t,
            _ => now,
        };

        if slot > deadline {
            return Err(CatalogError::RateLimitTimeout);
        }

        *next_free = Some(slot + self.period);
        drop(next_free);

        tokio::time::sleep_until(slot).await;
        Ok(())
    }

    /// Wait for a slot with the default 30-second timeout.
    pub async fn acquire_default(&self) -> Result<(), CatalogError> {
        self.acquire(DEFAULT_ACQUIRE_TIMEOUT).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_first_acquisition_is_instant() {
        let limiter = RateLimiter::per_second();

        let start = Instant::now();
        limiter.acquire_default().await.unwrap();

        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sequential_acquisitions_are_throttled() {
        let limiter = RateLimiter::per_second();

        let start = Instant::now();
        for _ in 0..3 {
            limiter.acquire_default().await.unwrap();
        }

        // Three acquisitions against a 1/sec bucket: at least two full waits.
        assert!(start.elapsed() >= Duration::from_secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_slot_frees_after_period() {
        let limiter = RateLimiter::new(Duration::from_millis(500));

        limiter.acquire_default().await.unwrap();
        tokio::time::sleep(Duration::from_millis(600)).await;

        let before = Instant::now();
        limiter.acquire_default().await.unwrap();
        assert_eq!(before.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_acquire_times_out() {
        let limiter = RateLimiter::new(Duration::from_secs(10));

        limiter.acquire_default().await.unwrap();

        // Next slot is 10s away; a 1s timeout cannot reach it.
        let result = limiter.acquire(Duration::from_secs(1)).await;
        assert!(matches!(result, Err(CatalogError::RateLimitTimeout)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timed_out_caller_does_not_consume_slot() {
        let limiter = RateLimiter::new(Duration::from_secs(10));

        limiter.acquire_default().await.unwrap();
        let _ = limiter.acquire(Duration::from_secs(1)).await;

        // The failed acquire must not have pushed the next slot further out.
        let start = Instant::now();
        limiter.acquire(Duration::from_secs(30)).await.unwrap();
        assert_eq!(start.elapsed(), Duration::from_secs(10));
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_callers_are_serialized() {
        use std::sync::Arc;

        let limiter = Arc::new(RateLimiter::per_second());
        let start = Instant::now();

        let mut handles = Vec::new();
        for _ in 0..4 {
            let limiter = Arc::clone(&limiter);
            handles.push(tokio::spawn(async move {
                limiter.acquire_default().await.unwrap();
                start.elapsed()
            }));
        }

        let mut elapsed: Vec<Duration> = Vec::new();
        for handle in handles {
            elapsed.push(handle.await.unwrap());
        }
        elapsed.sort();

        // One slot per second: the k-th grant happens at k*period.
        for (i, e) in elapsed.iter().enumerate() {
            assert_eq!(*e, Duration::from_secs(i as u64));
        }
    }
}
