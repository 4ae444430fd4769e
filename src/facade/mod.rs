//! Facade Module
//!
//! The caller-facing cache: logical get/put/remove over chunked physical
//! entries.

mod chunked;
mod stats;
mod validate;

pub use chunked::ChunkedCache;
pub use stats::CacheStats;
pub use validate::{validate_key, validate_keys, validate_ttl, validate_writable_key};
