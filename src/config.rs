//! Configuration Module
//!
//! Handles loading server and codec configuration from environment variables.

use std::env;

use tracing::warn;

use crate::cache::{MAX_ENTRIES, MAX_TTL, MIN_TTL};
use crate::chunk::{ChunkConfig, DEFAULT_TTL, MAX_ENTRY_BYTES};

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of physical entries the store can hold
    pub max_entries: usize,
    /// Maximum size of one physical entry, in bytes
    pub max_entry_bytes: usize,
    /// TTL in seconds for writes that give none
    pub default_ttl: u64,
    /// HTTP server port
    pub server_port: u16,
    /// Background cleanup task interval in seconds
    pub cleanup_interval: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `MAX_ENTRIES` - Maximum physical entries (default: 1000)
    /// - `MAX_ENTRY_BYTES` - Maximum bytes per physical entry (default: 102400)
    /// - `DEFAULT_TTL` - Default TTL in seconds, 1..=21600 (default: 600)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `CLEANUP_INTERVAL` - Cleanup frequency in seconds (default: 1)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_entries: env_or("MAX_ENTRIES", defaults.max_entries),
            max_entry_bytes: env_or("MAX_ENTRY_BYTES", defaults.max_entry_bytes),
            default_ttl: ttl_in_range(
                env_or("DEFAULT_TTL", defaults.default_ttl),
                defaults.default_ttl,
            ),
            server_port: env_or("SERVER_PORT", defaults.server_port),
            cleanup_interval: env_or("CLEANUP_INTERVAL", defaults.cleanup_interval),
        }
    }

    /// Codec settings derived from this configuration.
    pub fn chunk_config(&self) -> ChunkConfig {
        ChunkConfig {
            max_entry_bytes: self.max_entry_bytes,
            default_ttl: self.default_ttl,
            ..ChunkConfig::default()
        }
    }
}

fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Out-of-range ttls would fail every write that relies on the default.
fn ttl_in_range(ttl: u64, fallback: u64) -> u64 {
    if (MIN_TTL..=MAX_TTL).contains(&ttl) {
        ttl
    } else {
        warn!(
            "DEFAULT_TTL {} outside {}..={}, using {}",
            ttl, MIN_TTL, MAX_TTL, fallback
        );
        fallback
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_entries: MAX_ENTRIES,
            max_entry_bytes: MAX_ENTRY_BYTES,
            default_ttl: DEFAULT_TTL,
            server_port: 3000,
            cleanup_interval: 1,
        }
    }
}
