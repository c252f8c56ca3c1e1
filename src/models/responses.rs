//! Response DTOs for the todo server API
//!
//! Defines the structure of outgoing HTTP response bodies other than the
//! todo items themselves.

use serde::Serialize;

use crate::cache::CacheStats;

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Number of cache hits
    pub hits: u64,
    /// Number of cache misses (absent or logically expired)
    pub misses: u64,
    /// Number of full invalidations
    pub invalidations: u64,
    /// Number of entries removed by sweeps
    pub swept: u64,
    /// Current number of entries in cache, expired-but-unswept included
    pub total_entries: usize,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl From<CacheStats> for StatsResponse {
    fn from(stats: CacheStats) -> Self {
        Self {
            hit_rate: stats.hit_rate(),
            hits: stats.hits,
            misses: stats.misses,
            invalidations: stats.invalidations,
            swept: stats.swept,
            total_entries: stats.total_entries,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error envelope for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Always "error"
    pub status: &'static str,
    /// Error message describing what went wrong
    pub message: String,
}

impl ErrorResponse {
    /// Creates a new ErrorResponse
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: "error",
            message: message.into(),
        }
    }
}
