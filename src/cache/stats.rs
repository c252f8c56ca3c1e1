//! Cache Statistics Module
//!
//! Tracks cache performance metrics including hits, misses, invalidations
//! and sweep evictions.

use serde::Serialize;

// == Cache Stats ==
/// Tracks cache performance metrics.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CacheStats {
    /// Number of successful cache retrievals
    pub hits: u64,
    /// Number of failed cache retrievals (key not found or expired)
    pub misses: u64,
    /// Number of full invalidations (delete_all calls)
    pub invalidations: u64,
    /// Number of expired entries physically removed by sweeps
    pub swept: u64,
    /// Current number of entries in the cache
    pub total_entries: usize,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no requests have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_invalidation(&mut self) {
        self.invalidations += 1;
    }

    /// Adds `count` entries to the swept counter.
    pub fn record_swept(&mut self, count: usize) {
        self.swept += count as u64;
    }

    pub fn set_total_entries(&mut self, count: usize) {
        self.total_entries = count;
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_new() {
        let stats = CacheStats::new();
        assert_eq!(stats.hits, 0);
        assert_eq!(stats.misses, 0);
        assert_eq!(stats.invalidations, 0);
        assert_eq!(stats.swept, 0);
        assert_eq!(stats.total_entries, 0);
    }

    #[test]
    fn test_hit_rate_no_requests() {
        assert_eq!(CacheStats::new().hit_rate(), 0.0);
    }

    #[test]
    fn test_hit_rate_mixed() {
        let mut stats = CacheStats::new();
        stats.record_hit();
        stats.record_hit();
        stats.record_hit();
        stats.record_miss();
        assert_eq!(stats.hit_rate(), 0.75);
    }

    #[test]
    fn test_record_swept_accumulates() {
        let mut stats = CacheStats::new();
        stats.record_swept(3);
        stats.record_swept(0);
        stats.record_swept(2);
        assert_eq!(stats.swept, 5);
    }

    #[test]
    fn test_record_invalidation() {
        let mut stats = CacheStats::new();
        stats.record_invalidation();
        stats.record_invalidation();
        assert_eq!(stats.invalidations, 2);
    }
}
