//! Cache Statistics Module
//!
//! Counts logical reads and the chunk sets purged after failed
//! reconstruction.

use serde::Serialize;

// == Cache Stats ==
#[derive(Debug, Clone, Default, Serialize)]
pub struct CacheStats {
    /// Logical keys returned by reads
    pub hits: u64,
    /// Logical keys a read could not return (never written, expired or corrupt)
    pub misses: u64,
    /// Logical keys whose remnants were purged after failed reconstruction
    pub purged: u64,
    /// Physical entries currently held by the store
    pub total_entries: usize,
}

impl CacheStats {
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Returns hits / (hits + misses), or 0.0 if nothing has been read.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    pub fn record_hits(&mut self, count: usize) {
        self.hits += count as u64;
    }

    pub fn record_misses(&mut self, count: usize) {
        self.misses += count as u64;
    }

    pub fn record_purges(&mut self, count: usize) {
        self.purged += count as u64;
    }

    pub fn set_total_entries(&mut self, count: usize) {
        self.total_entries = count;
    }
}
