//! TTL cache for extraction results.

use std::time::{Duration, Instant};

use dashmap::DashMap;
use tagtune_core::AudioInfo;
use tracing::debug;

/// Default time-to-live for cached results.
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

/// Map size above which an insert sweeps expired entries.
pub const DEFAULT_SOFT_LIMIT: usize = 200;

/// Cache entry with insertion time.
#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    inserted_at: Instant,
}

impl<V> CacheEntry<V> {
    const fn new(value: V, now: Instant) -> Self {
        Self {
            value,
            inserted_at: now,
        }
    }

    fn is_expired(&self, ttl: Duration, now: Instant) -> bool {
        now.saturating_duration_since(self.inserted_at) >= ttl
    }
}

/// Response cache with lazy expiry and a size-triggered sweep.
///
/// There is no background timer: stale entries are dropped when they are
/// next read, or all at once when an insert pushes the map past the soft
/// limit. Between sweeps the map may briefly hold more than the limit.
#[derive(Debug)]
pub struct ResponseCache<V = AudioInfo> {
    entries: DashMap<String, CacheEntry<V>>,
    ttl: Duration,
    soft_limit: usize,
}

impl<V: Clone> ResponseCache<V> {
    /// Create a cache with the default TTL and soft limit.
    pub fn new() -> Self {
        Self::with_settings(DEFAULT_TTL, DEFAULT_SOFT_LIMIT)
    }

    /// Create a cache with a custom TTL and soft limit.
    pub fn with_settings(ttl: Duration, soft_limit: usize) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
            soft_limit,
        }
    }

    /// The configured time-to-live.
    pub const fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Look up a live entry.
    pub fn get(&self, key: &str) -> Option<V> {
        self.get_at(key, Instant::now())
    }

    /// Store a value, sweeping expired entries if the map is over its limit.
    pub fn insert(&self, key: impl Into<String>, value: V) {
        self.insert_at(key.into(), value, Instant::now());
    }

    pub(crate) fn get_at(&self, key: &str, now: Instant) -> Option<V> {
        let entry = self.entries.get(key)?;
        if entry.is_expired(self.ttl, now) {
            drop(entry);
            self.entries.remove(key);
            debug!("Evicted stale cache entry for {key}");
            return None;
        }
        Some(entry.value.clone())
    }

    pub(crate) fn insert_at(&self, key: String, value: V, now: Instant) {
        self.entries.insert(key, CacheEntry::new(value, now));

        if self.entries.len() > self.soft_limit {
            self.sweep(now);
        }
    }

    fn sweep(&self, now: Instant) {
        let before = self.entries.len();
        self.entries
            .retain(|_, entry| !entry.is_expired(self.ttl, now));
        debug!(
            "Cache sweep removed {} expired entries",
            before.saturating_sub(self.entries.len())
        );
    }

    /// Number of entries currently held, live or stale.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every entry.
    pub fn clear(&self) {
        self.entries.clear();
    }
}

impl<V: Clone> Default for ResponseCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TTL: Duration = Duration::from_secs(300);

    #[test]
    fn test_hit_within_ttl() {
        let cache = ResponseCache::with_settings(TTL, 200);
        let t0 = Instant::now();
        cache.insert_at("https://x.com/a".to_string(), 1u32, t0);

        assert_eq!(cache.get_at("https://x.com/a", t0 + Duration::from_secs(299)), Some(1));
        assert_eq!(cache.get_at("https://x.com/b", t0), None);
    }

    #[test]
    fn test_lazy_expiry_removes_entry() {
        let cache = ResponseCache::with_settings(TTL, 200);
        let t0 = Instant::now();
        cache.insert_at("k".to_string(), 1u32, t0);

        assert_eq!(cache.get_at("k", t0 + TTL), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_sweep_on_insert_over_limit() {
        let cache = ResponseCache::with_settings(TTL, 3);
        let t0 = Instant::now();
        for i in 0..3 {
            cache.insert_at(format!("old-{i}"), i, t0);
        }
        assert_eq!(cache.len(), 3);

        let later = t0 + TTL + Duration::from_secs(1);
        cache.insert_at("fresh-0".to_string(), 10, later);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get_at("fresh-0", later), Some(10));
    }

    #[test]
    fn test_over_limit_keeps_live_entries() {
        let cache = ResponseCache::with_settings(TTL, 2);
        let t0 = Instant::now();
        for i in 0..5 {
            cache.insert_at(format!("k{i}"), i, t0);
        }
        // Nothing is stale yet, so the map is allowed to exceed the limit.
        assert_eq!(cache.len(), 5);
    }

    #[test]
    fn test_clear() {
        let cache: ResponseCache<u32> = ResponseCache::new();
        cache.insert("k", 1);
        assert_eq!(cache.get("k"), Some(1));
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.ttl(), DEFAULT_TTL);
    }
}
