//! Cache Entry Module
//!
//! Defines a single serialized list snapshot with its expiry deadline.

use std::time::Duration;

use bytes::Bytes;
use tokio::time::Instant;

// == Cache Entry ==
/// A serialized snapshot plus the instant after which it is logically absent.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// Serialized snapshot bytes
    pub value: Bytes,
    /// Expiration instant (insertion time + TTL)
    pub expires_at: Instant,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new cache entry expiring `ttl` from now.
    pub fn new(value: Bytes, ttl: Duration) -> Self {
        Self {
            value,
            expires_at: Instant::now() + ttl,
        }
    }

    // == Is Expired ==
    /// Checks whether the entry is expired at `now`.
    ///
    /// Boundary condition: the entry is still live at exactly `expires_at`
    /// and expired strictly after it.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        now > self.expires_at
    }
}
