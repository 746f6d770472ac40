use std::num::NonZeroU32;
use std::sync::Arc;

use governor::clock::DefaultClock;
use governor::state::direct::NotKeyed;
use governor::state::InMemoryState;
use governor::{Quota, RateLimiter};

type DirectRateLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Shared request budget for one source. Cloning shares the budget.
#[derive(Clone)]
pub struct FetchThrottle {
    limiter: Arc<DirectRateLimiter>,
    per_second: NonZeroU32,
}

impl FetchThrottle {
    /// Allows `requests_per_second` requests per second with an equal burst.
    /// Zero is treated as one.
    pub fn per_second(requests_per_second: u32) -> Self {
        let per_second = NonZeroU32::new(requests_per_second).unwrap_or(NonZeroU32::MIN);
        Self {
            limiter: Arc::new(RateLimiter::direct(Quota::per_second(per_second))),
            per_second,
        }
    }

    pub fn requests_per_second(&self) -> u32 {
        self.per_second.get()
    }

    /// Takes one unit of budget without waiting.
    pub fn try_acquire(&self) -> bool {
        self.limiter.check().is_ok()
    }

    /// Waits until one unit of budget is available.
    pub async fn acquire(&self) {
        self.limiter.until_ready().await;
    }
}

impl std::fmt::Debug for FetchThrottle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchThrottle")
            .field("per_second", &self.per_second)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn burst_is_limited_to_quota() {
        let throttle = FetchThrottle::per_second(2);

        assert!(throttle.try_acquire());
        assert!(throttle.try_acquire());
        assert!(!throttle.try_acquire());
    }

    #[test]
    fn clones_share_budget() {
        let throttle = FetchThrottle::per_second(1);
        let other = throttle.clone();

        assert!(throttle.try_acquire());
        assert!(!other.try_acquire());
    }

    #[test]
    fn zero_rate_is_clamped_to_one() {
        assert_eq!(FetchThrottle::per_second(0).requests_per_second(), 1);
    }

    #[tokio::test]
    async fn acquire_returns_when_budget_is_available() {
        let throttle = FetchThrottle::per_second(5);
        throttle.acquire().await;
        throttle.acquire().await;
    }
}
