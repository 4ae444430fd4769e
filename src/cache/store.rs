//! Memory Store Module
//!
//! In-process bounded store combining HashMap storage with LRU tracking and
//! TTL expiration. Enforces the same limits as the hosted cache service the
//! chunked cache was designed for.

use std::collections::HashMap;

use tracing::debug;

use crate::cache::{
    KeyValueStore, LruTracker, StoreEntry, MAX_ENTRIES, MAX_STORE_KEY_LENGTH, MAX_TTL, MIN_TTL,
};
use crate::chunk::{estimate_bytes, MAX_ENTRY_BYTES};
use crate::error::{CacheError, Result};

// == Memory Store ==
/// Bounded in-memory store with LRU eviction and TTL support.
#[derive(Debug)]
pub struct MemoryStore {
    /// Key-value storage
    entries: HashMap<String, StoreEntry>,
    /// LRU access tracker
    lru: LruTracker,
    /// Maximum number of entries allowed
    max_entries: usize,
    /// Maximum size of a single value, in estimated bytes
    max_entry_bytes: usize,
    /// Entries dropped to make room
    evictions: u64,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new(MAX_ENTRIES, MAX_ENTRY_BYTES)
    }
}

impl MemoryStore {
    // == Constructor ==
    /// Creates a store holding at most `max_entries` values of at most
    /// `max_entry_bytes` each.
    pub fn new(max_entries: usize, max_entry_bytes: usize) -> Self {
        Self {
            entries: HashMap::new(),
            lru: LruTracker::new(),
            max_entries,
            max_entry_bytes,
            evictions: 0,
        }
    }

    /// Number of entries evicted for capacity so far.
    pub fn evictions(&self) -> u64 {
        self.evictions
    }

    /// Entries held in memory, including expired ones not yet swept.
    pub fn allocated(&self) -> usize {
        self.entries.len()
    }

    /// Mutable access to a stored value, bypassing validation and recency.
    pub fn raw_value_mut(&mut self, key: &str) -> Option<&mut String> {
        self.entries.get_mut(key).map(|entry| &mut entry.value)
    }

    // == Cleanup Expired ==
    /// Removes all expired entries. Returns the number removed.
    pub fn cleanup_expired(&mut self) -> usize {
        let expired_keys: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired())
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired_keys {
            self.entries.remove(key);
            self.lru.remove(key);
        }

        expired_keys.len()
    }

    fn validate_entry(&self, key: &str, value: &str) -> Result<()> {
        if key.is_empty() {
            return Err(CacheError::Store("Key cannot be empty".to_string()));
        }
        if key.chars().count() > MAX_STORE_KEY_LENGTH {
            return Err(CacheError::Store(format!(
                "Key exceeds maximum length of {} characters",
                MAX_STORE_KEY_LENGTH
            )));
        }
        let size = estimate_bytes(value);
        if size > self.max_entry_bytes {
            return Err(CacheError::Store(format!(
                "Value for {} is {} bytes, limit is {}",
                key, size, self.max_entry_bytes
            )));
        }
        Ok(())
    }

    fn insert(&mut self, key: &str, value: &str, ttl_seconds: u64) {
        let is_overwrite = self.entries.contains_key(key);

        if !is_overwrite && self.entries.len() >= self.max_entries {
            // Expired entries go before live ones
            if self.cleanup_expired() == 0 {
                if let Some(evicted_key) = self.lru.evict_oldest() {
                    debug!("Evicting {} to make room for {}", evicted_key, key);
                    self.entries.remove(&evicted_key);
                    self.evictions += 1;
                }
            }
        }

        self.entries
            .insert(key.to_string(), StoreEntry::new(value.to_string(), ttl_seconds));
        self.lru.touch(key);
    }
}

impl KeyValueStore for MemoryStore {
    fn get_all(&mut self, keys: &[String]) -> Result<HashMap<String, String>> {
        let mut found = HashMap::new();

        for key in keys {
            let expired = match self.entries.get(key) {
                Some(entry) if entry.is_expired() => true,
                Some(entry) => {
                    found.insert(key.clone(), entry.value.clone());
                    false
                }
                None => continue,
            };

            if expired {
                self.entries.remove(key);
                self.lru.remove(key);
            } else {
                self.lru.touch(key);
            }
        }

        Ok(found)
    }

    fn put_all(&mut self, entries: &HashMap<String, String>, ttl_seconds: u64) -> Result<()> {
        if !(MIN_TTL..=MAX_TTL).contains(&ttl_seconds) {
            return Err(CacheError::Store(format!(
                "TTL must be between {} and {} seconds",
                MIN_TTL, MAX_TTL
            )));
        }
        for (key, value) in entries {
            self.validate_entry(key, value)?;
        }

        for (key, value) in entries {
            self.insert(key, value, ttl_seconds);
        }

        Ok(())
    }

    fn remove_all(&mut self, keys: &[String]) -> Result<()> {
        for key in keys {
            if self.entries.remove(key).is_some() {
                self.lru.remove(key);
            }
        }
        Ok(())
    }

    fn keys(&self) -> Vec<String> {
        self.entries
            .iter()
            .filter(|(_, entry)| !entry.is_expired())
            .map(|(key, _)| key.clone())
            .collect()
    }

    fn len(&self) -> usize {
        self.entries
            .values()
            .filter(|entry| !entry.is_expired())
            .count()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;
    use std::time::Duration;

    #[test]
    fn test_store_new() {
        let store = MemoryStore::default();
        assert_eq!(store.len(), 0);
        assert!(store.is_empty());
    }

    #[test]
    fn test_store_put_and_get() {
        let mut store = MemoryStore::default();

        store.put("key1", "value1", 60).unwrap();

        assert_eq!(store.get("key1").unwrap(), Some("value1".to_string()));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_get_all_returns_found_only() {
        let mut store = MemoryStore::default();
        store.put("a", "1", 60).unwrap();
        store.put("b", "2", 60).unwrap();

        let keys = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let found = store.get_all(&keys).unwrap();

        assert_eq!(found.len(), 2);
        assert_eq!(found["a"], "1");
        assert!(!found.contains_key("c"));
    }

    #[test]
    fn test_store_remove_absent_is_noop() {
        let mut store = MemoryStore::default();
        store.put("a", "1", 60).unwrap();

        store.remove("missing").unwrap();
        store.remove("a").unwrap();
        store.remove("a").unwrap();

        assert!(store.is_empty());
    }

    #[test]
    fn test_store_overwrite() {
        let mut store = MemoryStore::default();

        store.put("key1", "value1", 60).unwrap();
        store.put("key1", "value2", 60).unwrap();

        assert_eq!(store.get("key1").unwrap(), Some("value2".to_string()));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_ttl_expiration() {
        let mut store = MemoryStore::default();

        store.put("key1", "value1", 1).unwrap();
        assert!(store.get("key1").unwrap().is_some());

        sleep(Duration::from_millis(1100));

        assert_eq!(store.get("key1").unwrap(), None);
        assert!(store.keys().is_empty());
    }

    #[test]
    fn test_store_lru_eviction() {
        let mut store = MemoryStore::new(3, MAX_ENTRY_BYTES);

        store.put("key1", "value1", 60).unwrap();
        store.put("key2", "value2", 60).unwrap();
        store.put("key3", "value3", 60).unwrap();
        store.get("key1").unwrap();
        store.put("key4", "value4", 60).unwrap();

        assert_eq!(store.len(), 3);
        assert_eq!(store.evictions(), 1);
        assert!(store.get("key1").unwrap().is_some());
        assert!(store.get("key2").unwrap().is_none());
    }

    #[test]
    fn test_store_cleanup_expired() {
        let mut store = MemoryStore::default();

        store.put("key1", "value1", 1).unwrap();
        store.put("key2", "value2", 10).unwrap();

        sleep(Duration::from_millis(1100));

        assert_eq!(store.allocated(), 2);
        assert_eq!(store.len(), 1);
        assert_eq!(store.cleanup_expired(), 1);
        assert_eq!(store.allocated(), 1);
    }

    #[test]
    fn test_store_key_too_long() {
        let mut store = MemoryStore::default();
        let long_key = "x".repeat(MAX_STORE_KEY_LENGTH + 1);

        let result = store.put(&long_key, "value", 60);
        assert!(matches!(result, Err(CacheError::Store(_))));
    }

    #[test]
    fn test_store_value_too_large() {
        let mut store = MemoryStore::new(10, 8);

        assert!(store.put("fits", "12345678", 60).is_ok());
        // Four characters, eight bytes, plus one
        let result = store.put("big", "éééé1", 60);
        assert!(matches!(result, Err(CacheError::Store(_))));
    }

    #[test]
    fn test_store_ttl_out_of_range() {
        let mut store = MemoryStore::default();

        assert!(matches!(store.put("k", "v", 0), Err(CacheError::Store(_))));
        assert!(matches!(
            store.put("k", "v", MAX_TTL + 1),
            Err(CacheError::Store(_))
        ));
    }

    #[test]
    fn test_store_put_all_is_all_or_nothing_on_validation() {
        let mut store = MemoryStore::new(10, 4);
        let entries = HashMap::from([
            ("ok".to_string(), "1234".to_string()),
            ("big".to_string(), "12345".to_string()),
        ]);

        assert!(store.put_all(&entries, 60).is_err());
        assert!(store.is_empty());
    }
}
