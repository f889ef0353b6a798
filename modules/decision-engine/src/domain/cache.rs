use std::time::Duration;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use uuid::Uuid;

use super::model::DecisionEffect;

/// Keying the cache on `bundle_version` makes bulk invalidation
/// implicit: once a tenant's bundle advances, every entry built from
/// the previous version simply stops being addressable and expires on
/// its own TTL rather than needing an explicit sweep.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub bundle_version: String,
    pub subject_hash: String,
    pub resource_id: Uuid,
    pub action: String,
    pub context_hash: String,
}

struct CacheEntry {
    effect: DecisionEffect,
    matched_policy_id: Option<Uuid>,
    expires_at: DateTime<Utc>,
}

pub struct DecisionCache {
    entries: DashMap<CacheKey, CacheEntry>,
    ttl: Duration,
}

impl DecisionCache {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self { entries: DashMap::new(), ttl }
    }

    #[must_use]
    pub fn get(&self, key: &CacheKey) -> Option<(DecisionEffect, Option<Uuid>)> {
        let entry = self.entries.get(key)?;
        if entry.expires_at < Utc::now() {
            drop(entry);
            self.entries.remove(key);
            return None;
        }
        Some((entry.effect, entry.matched_policy_id))
    }

    pub fn insert(&self, key: CacheKey, effect: DecisionEffect, matched_policy_id: Option<Uuid>) {
        let expires_at = Utc::now() + chrono::Duration::from_std(self.ttl).unwrap_or(chrono::Duration::zero());
        self.entries.insert(key, CacheEntry { effect, matched_policy_id, expires_at });
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn key() -> CacheKey {
        CacheKey { bundle_version: "v1".to_owned(), subject_hash: "s".to_owned(), resource_id: Uuid::new_v4(), action: "read".to_owned(), context_hash: "c".to_owned() }
    }

    #[test]
    fn inserted_entry_is_retrievable_before_expiry() {
        let cache = DecisionCache::new(Duration::from_secs(60));
        let key = key();
        cache.insert(key.clone(), DecisionEffect::Permit, None);
        assert_eq!(cache.get(&key), Some((DecisionEffect::Permit, None)));
    }

    #[test]
    fn expired_entry_is_evicted_on_read() {
        let cache = DecisionCache::new(Duration::from_secs(0));
        let key = key();
        cache.insert(key.clone(), DecisionEffect::Deny, None);
        std::thread::sleep(Duration::from_millis(5));
        assert_eq!(cache.get(&key), None);
        assert!(cache.entries.is_empty());
    }

    #[test]
    fn a_different_bundle_version_never_collides_with_a_cached_key() {
        let cache = DecisionCache::new(Duration::from_secs(60));
        let mut key = key();
        cache.insert(key.clone(), DecisionEffect::Permit, None);
        key.bundle_version = "v2".to_owned();
        assert_eq!(cache.get(&key), None);
    }
}
