//! Per-client request throttling
//!
//! Sliding-window limiter: each client key keeps the instants of its recent
//! requests, and a request is admitted while fewer than `max_requests` fall
//! inside the window.

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use tokio::time::Instant;

/// Length of the throttling window
pub const RATE_LIMIT_WINDOW: Duration = Duration::from_secs(60);

#[derive(Debug, Clone)]
pub struct RateLimiter {
    window: Duration,
    max_requests: u32,
    buckets: Arc<DashMap<String, Vec<Instant>>>,
}

impl RateLimiter {
    pub fn new(window: Duration, max_requests: u32) -> Self {
        Self {
            window,
            max_requests,
            buckets: Arc::new(DashMap::new()),
        }
    }

    /// Limiter allowing `max_requests` per minute.
    pub fn per_minute(max_requests: u32) -> Self {
        Self::new(RATE_LIMIT_WINDOW, max_requests)
    }

    /// Records a request for `key` if it fits in the window.
    ///
    /// Returns whether the request is admitted and how many remain.
    pub fn allow(&self, key: &str) -> (bool, u32) {
        let now = Instant::now();
        let window = self.window;

        let mut entry = self.buckets.entry(key.to_string()).or_default();
        entry.retain(|instant| now.duration_since(*instant) < window);

        let remaining = self.max_requests.saturating_sub(entry.len() as u32);
        if remaining == 0 {
            return (false, 0);
        }

        entry.push(now);
        (true, remaining - 1)
    }

    /// Drops buckets whose requests have all left the window.
    ///
    /// Returns the number of buckets removed.
    pub fn prune(&self) -> usize {
        let now = Instant::now();
        let window = self.window;
        let before = self.buckets.len();

        self.buckets.retain(|_, instants| {
            instants.retain(|instant| now.duration_since(*instant) < window);
            !instants.is_empty()
        });

        before.saturating_sub(self.buckets.len())
    }

    /// Number of clients currently tracked.
    pub fn tracked_clients(&self) -> usize {
        self.buckets.len()
    }

    /// Seconds a rejected client should wait, never less than one.
    pub fn retry_after_secs(&self) -> u64 {
        self.window.as_secs().max(1)
    }

    pub fn limit(&self) -> u32 {
        self.max_requests
    }
}
