//! Cache Store Module
//!
//! Expiring key-value storage for serialized list snapshots, with lazy expiry
//! on read, best-effort sweeping, and full invalidation.

use std::collections::HashMap;
use std::time::Duration;

use bytes::Bytes;
use tokio::time::Instant;

use crate::cache::{CacheEntry, CacheStats};

// == Cache Store ==
/// Snapshot cache keyed by an opaque cache key (the requesting host).
#[derive(Debug, Default)]
pub struct CacheStore {
    /// Key-value storage
    entries: HashMap<String, CacheEntry>,
    /// Performance statistics
    stats: CacheStats,
    /// Bumped by every `delete_all`
    generation: u64,
}

impl CacheStore {
    // == Constructor ==
    /// Creates an empty CacheStore.
    pub fn new() -> Self {
        Self::default()
    }

    // == Get ==
    /// Returns the snapshot stored under `key` if it has not expired.
    ///
    /// Expired entries are reported as absent but left in place for the sweep.
    pub fn get(&mut self, key: &str) -> Option<Bytes> {
        let now = Instant::now();
        match self.entries.get(key) {
            Some(entry) if !entry.is_expired_at(now) => {
                self.stats.record_hit();
                Some(entry.value.clone())
            }
            _ => {
                self.stats.record_miss();
                None
            }
        }
    }

    // == Set ==
    /// Inserts or overwrites `key`, expiring `ttl` from now.
    pub fn set(&mut self, key: impl Into<String>, value: Bytes, ttl: Duration) {
        self.entries.insert(key.into(), CacheEntry::new(value, ttl));
        self.stats.set_total_entries(self.entries.len());
    }

    // == Set If Current ==
    /// Inserts the snapshot only if no invalidation happened since
    /// `generation` was observed.
    ///
    /// Returns whether the snapshot was stored.
    pub fn set_if_current(
        &mut self,
        key: impl Into<String>,
        value: Bytes,
        ttl: Duration,
        generation: u64,
    ) -> bool {
        if generation != self.generation {
            return false;
        }
        self.set(key, value, ttl);
        true
    }

    /// Current invalidation generation.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    // == Delete All ==
    /// Removes every entry immediately.
    ///
    /// Returns the number of entries removed.
    pub fn delete_all(&mut self) -> usize {
        let count = self.entries.len();
        self.entries.clear();
        self.generation = self.generation.wrapping_add(1);
        self.stats.record_invalidation();
        self.stats.set_total_entries(0);
        count
    }

    // == Delete Expired ==
    /// Physically removes entries whose deadline has passed.
    ///
    /// Returns the number of entries removed.
    pub fn delete_expired(&mut self) -> usize {
        let now = Instant::now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired_at(now));

        let removed = before - self.entries.len();
        self.stats.record_swept(removed);
        self.stats.set_total_entries(self.entries.len());
        removed
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    /// Number of physically present entries, expired ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    const TTL: Duration = Duration::from_secs(3600);

    fn snapshot(raw: &'static str) -> Bytes {
        Bytes::from_static(raw.as_bytes())
    }

    #[test]
    fn test_store_new() {
        let store = CacheStore::new();
        assert_eq!(store.len(), 0);
        assert!(store.is_empty());
        assert_eq!(store.generation(), 0);
    }

    #[test]
    fn test_store_set_and_get() {
        let mut store = CacheStore::new();

        store.set("127.0.0.1", snapshot("[1]"), TTL);

        assert_eq!(store.get("127.0.0.1"), Some(snapshot("[1]")));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_get_nonexistent() {
        let mut store = CacheStore::new();
        assert!(store.get("nobody").is_none());
        assert_eq!(store.stats().misses, 1);
    }

    #[test]
    fn test_store_overwrite() {
        let mut store = CacheStore::new();

        store.set("host", snapshot("[1]"), TTL);
        store.set("host", snapshot("[2]"), TTL);

        assert_eq!(store.get("host"), Some(snapshot("[2]")));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_store_lazy_expiry_without_sweep() {
        let mut store = CacheStore::new();
        store.set("host", snapshot("[1]"), Duration::from_secs(1));

        tokio::time::advance(Duration::from_millis(1001)).await;

        // logically absent while still physically present
        assert!(store.get("host").is_none());
        assert_eq!(store.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_store_delete_expired_keeps_live_entries() {
        let mut store = CacheStore::new();
        store.set("short", snapshot("[1]"), Duration::from_secs(1));
        store.set("long", snapshot("[2]"), Duration::from_secs(10));

        tokio::time::advance(Duration::from_secs(2)).await;

        assert_eq!(store.delete_expired(), 1);
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("long"), Some(snapshot("[2]")));
    }

    #[tokio::test(start_paused = true)]
    async fn test_store_delete_expired_is_idempotent() {
        let mut store = CacheStore::new();
        store.set("a", snapshot("[1]"), Duration::from_secs(1));
        store.set("b", snapshot("[2]"), Duration::from_secs(1));

        tokio::time::advance(Duration::from_secs(5)).await;

        assert_eq!(store.delete_expired(), 2);
        assert_eq!(store.delete_expired(), 0);
        assert_eq!(store.stats().swept, 2);
    }

    #[test]
    fn test_store_delete_all() {
        let mut store = CacheStore::new();
        store.set("a", snapshot("[1]"), TTL);
        store.set("b", snapshot("[2]"), TTL);

        assert_eq!(store.delete_all(), 2);
        assert!(store.is_empty());
        assert!(store.get("a").is_none());
        assert_eq!(store.stats().invalidations, 1);

        // a second invalidation is harmless
        assert_eq!(store.delete_all(), 0);
    }

    #[test]
    fn test_set_if_current_rejects_stale_generation() {
        let mut store = CacheStore::new();
        let observed = store.generation();

        store.delete_all();

        assert!(!store.set_if_current("host", snapshot("[old]"), TTL, observed));
        assert!(store.get("host").is_none());

        let fresh = store.generation();
        assert!(store.set_if_current("host", snapshot("[new]"), TTL, fresh));
        assert_eq!(store.get("host"), Some(snapshot("[new]")));
    }

    #[test]
    fn test_store_stats() {
        let mut store = CacheStore::new();

        store.set("key1", snapshot("[]"), TTL);
        store.get("key1"); // hit
        store.get("nonexistent"); // miss

        let stats = store.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.total_entries, 1);
    }
}
