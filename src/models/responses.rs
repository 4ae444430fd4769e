//! Response DTOs for the cache server API
//!
//! Defines the structure of outgoing HTTP response bodies.

use std::collections::HashMap;

use serde::Serialize;

use crate::facade::CacheStats;

/// Response body for GET /get/:key
#[derive(Debug, Clone, Serialize)]
pub struct GetResponse {
    /// The requested key
    pub key: String,
    /// The stored value
    pub value: String,
}

impl GetResponse {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Response body for POST /get_all. Only found keys are listed.
#[derive(Debug, Clone, Serialize)]
pub struct GetAllResponse {
    pub entries: HashMap<String, String>,
}

/// Response body for PUT /set and PUT /set_all
#[derive(Debug, Clone, Serialize)]
pub struct SetResponse {
    /// Success message
    pub message: String,
    /// Number of logical keys written
    pub count: usize,
}

impl SetResponse {
    pub fn new(count: usize) -> Self {
        Self {
            message: format!("{} key(s) set successfully", count),
            count,
        }
    }
}

/// Response body for DELETE /del/:key and POST /del_all
#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    /// Success message
    pub message: String,
    /// Number of logical keys removed
    pub count: usize,
}

impl DeleteResponse {
    pub fn new(count: usize) -> Self {
        Self {
            message: format!("{} key(s) deleted successfully", count),
            count,
        }
    }
}

/// Response body for GET /stats
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Logical keys returned by reads
    pub hits: u64,
    /// Logical keys reads could not return
    pub misses: u64,
    /// Logical keys purged after failed verification
    pub purged: u64,
    /// Physical entries evicted by the store for capacity
    pub evictions: u64,
    /// Physical entries currently stored
    pub total_entries: usize,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl StatsResponse {
    pub fn new(stats: &CacheStats, evictions: u64) -> Self {
        Self {
            hits: stats.hits,
            misses: stats.misses,
            purged: stats.purged,
            evictions,
            total_entries: stats.total_entries,
            hit_rate: stats.hit_rate(),
        }
    }
}

/// Response body for GET /health
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
