//! Cache Module
//!
//! In-memory snapshot cache with per-entry TTL, lazy expiry on read and full
//! invalidation on writes.

mod entry;
mod stats;
mod store;

#[cfg(test)]
mod property_tests;

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;

// Re-export public types
pub use entry::CacheEntry;
pub use stats::CacheStats;
pub use store::CacheStore;

/// Cache store shared between request handlers and the janitor
pub type SharedCache = Arc<RwLock<CacheStore>>;

// == Public Constants ==
/// Default lifetime of a cached list snapshot
pub const DEFAULT_TTL: Duration = Duration::from_secs(3600);

/// Creates an empty shared cache.
pub fn shared() -> SharedCache {
    Arc::new(RwLock::new(CacheStore::new()))
}
