//! Cache Module
//!
//! The bounded key/value store the chunked cache writes physical entries
//! into: the [`KeyValueStore`] seam plus an in-memory implementation with TTL
//! expiration and LRU eviction.

mod backend;
mod entry;
mod lru;
mod store;

// Re-export public types
pub use backend::KeyValueStore;
pub use entry::StoreEntry;
pub use lru::LruTracker;
pub use store::MemoryStore;

// == Public Constants ==
/// Maximum key length the store accepts, in characters
pub const MAX_STORE_KEY_LENGTH: usize = 250;

/// Maximum number of entries the store holds
pub const MAX_ENTRIES: usize = 1000;

/// Shortest accepted ttl, in seconds
pub const MIN_TTL: u64 = 1;

/// Longest accepted ttl, in seconds (six hours)
pub const MAX_TTL: u64 = 21_600;
