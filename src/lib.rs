//! Chunked Cache - large values in a size-capped key/value cache
//!
//! Stores values far larger than the per-entry cap of a bounded cache by
//! compressing and splitting them across several entries, with fingerprint
//! checks and self-healing on read.

pub mod api;
pub mod cache;
pub mod chunk;
pub mod config;
pub mod error;
pub mod facade;
pub mod models;
pub mod tasks;

pub use api::AppState;
pub use cache::{KeyValueStore, MemoryStore};
pub use chunk::{fingerprint, keyed_fingerprint, Charset, ChunkConfig};
pub use config::Config;
pub use error::{CacheError, Result};
pub use facade::ChunkedCache;
pub use tasks::spawn_cleanup_task;
