use std::num::NonZeroU32;
use std::sync::Arc;

use dashmap::DashMap;
use governor::{Quota, RateLimiter, clock::DefaultClock, state::InMemoryState, state::NotKeyed};
use uuid::Uuid;

use crate::config::RateLimitDefaults;

type TenantLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// One token bucket per tenant, built lazily on first use. Matches the
/// gateway's "per-tenant token bucket" requirement: a noisy tenant
/// cannot starve another tenant's request budget.
pub struct TenantRateLimiters {
    defaults: RateLimitDefaults,
    buckets: DashMap<Uuid, Arc<TenantLimiter>>,
}

impl TenantRateLimiters {
    #[must_use]
    pub fn new(defaults: RateLimitDefaults) -> Self {
        Self { defaults, buckets: DashMap::new() }
    }

    #[must_use]
    pub fn check(&self, tenant_id: Uuid) -> bool {
        let limiter = self
            .buckets
            .entry(tenant_id)
            .or_insert_with(|| Arc::new(build_limiter(&self.defaults)))
            .clone();
        limiter.check().is_ok()
    }
}

fn build_limiter(defaults: &RateLimitDefaults) -> TenantLimiter {
    let rps = NonZeroU32::new(defaults.requests_per_second.max(1)).unwrap_or(NonZeroU32::MIN);
    let burst = NonZeroU32::new(defaults.burst.max(1)).unwrap_or(NonZeroU32::MIN);
    RateLimiter::direct(Quota::per_second(rps).allow_burst(burst))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn separate_tenants_get_separate_buckets() {
        let limiters = TenantRateLimiters::new(RateLimitDefaults { requests_per_second: 1, burst: 1 });
        let tenant_a = Uuid::new_v4();
        let tenant_b = Uuid::new_v4();
        assert!(limiters.check(tenant_a));
        assert!(!limiters.check(tenant_a));
        // tenant_b's bucket is independent and still has its first token.
        assert!(limiters.check(tenant_b));
    }
}
