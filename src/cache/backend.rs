//! Store Backend Trait
//!
//! The bounded key/value store the chunked cache is layered on.

use std::collections::HashMap;

use crate::error::Result;

// == Key Value Store ==
/// A size- and count-bounded string store with per-entry expiry.
///
/// Implementations own their own expiry and eviction; entries may vanish at
/// any time. Reads take `&mut self` so implementations can keep recency
/// bookkeeping.
pub trait KeyValueStore {
    /// Fetches the given keys. Missing and expired keys are left out.
    fn get_all(&mut self, keys: &[String]) -> Result<HashMap<String, String>>;

    /// Writes every entry with the same ttl, overwriting silently.
    fn put_all(&mut self, entries: &HashMap<String, String>, ttl_seconds: u64) -> Result<()>;

    /// Deletes the given keys. Absent keys are ignored.
    fn remove_all(&mut self, keys: &[String]) -> Result<()>;

    /// Keys of all live entries.
    fn keys(&self) -> Vec<String>;

    fn get(&mut self, key: &str) -> Result<Option<String>> {
        Ok(self.get_all(&[key.to_string()])?.remove(key))
    }

    fn put(&mut self, key: &str, value: &str, ttl_seconds: u64) -> Result<()> {
        let entries = HashMap::from([(key.to_string(), value.to_string())]);
        self.put_all(&entries, ttl_seconds)
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.remove_all(&[key.to_string()])
    }

    /// Number of live entries.
    fn len(&self) -> usize {
        self.keys().len()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
