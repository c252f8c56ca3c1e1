//! Cache Janitor
//!
//! Request-driven sweep that removes expired cache entries at most once per
//! interval. There is no timer: the sweep only progresses when traffic does.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, info};

use crate::cache::SharedCache;

/// Default minimum time between two sweeps
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(30);

/// Marker for "no request seen yet"
const NEVER: u64 = u64::MAX;

/// Throttled sweeper for a shared cache.
///
/// `last_swept_at` is kept as milliseconds since the janitor's origin so the
/// check-then-update can be a single compare-and-swap.
#[derive(Debug)]
pub struct Janitor {
    cache: SharedCache,
    interval: Duration,
    origin: Instant,
    last_swept_ms: AtomicU64,
}

impl Janitor {
    pub fn new(cache: SharedCache, interval: Duration) -> Self {
        Self {
            cache,
            interval,
            origin: Instant::now(),
            last_swept_ms: AtomicU64::new(NEVER),
        }
    }

    /// Runs after every completed request.
    ///
    /// The first call only records the current time. Later calls sweep when
    /// more than `interval` has passed since the last sweep attempt; among
    /// concurrent callers only the one that wins the swap sweeps.
    ///
    /// Returns the number of entries removed when a sweep ran.
    pub async fn after_request(&self) -> Option<usize> {
        let now_ms = self.elapsed_ms();
        let last = self.last_swept_ms.load(Ordering::Acquire);

        if last == NEVER {
            let _ = self.last_swept_ms.compare_exchange(
                NEVER,
                now_ms,
                Ordering::AcqRel,
                Ordering::Acquire,
            );
            return None;
        }

        if now_ms.saturating_sub(last) <= self.interval_ms() {
            return None;
        }

        // Another request already claimed this sweep
        if self
            .last_swept_ms
            .compare_exchange(last, now_ms, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return None;
        }

        let removed = self.cache.write().await.delete_expired();
        if removed > 0 {
            info!(removed, "Cache sweep removed expired entries");
        } else {
            debug!("Cache sweep found no expired entries");
        }
        Some(removed)
    }

    fn elapsed_ms(&self) -> u64 {
        // Clamped below NEVER so an absurdly long uptime cannot look unset
        (self.origin.elapsed().as_millis() as u64).min(NEVER - 1)
    }

    fn interval_ms(&self) -> u64 {
        self.interval.as_millis() as u64
    }
}
