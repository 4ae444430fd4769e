//! Chunked Cache Module
//!
//! Store facade that lets logical values of any size live in a bounded
//! store. Orchestrates batched reads, writes and removals around the
//! encoder and decoder, clears stale layouts before overwriting and purges
//! chunk sets that fail verification.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::cache::KeyValueStore;
use crate::chunk::layout::{manifest_key, probe_keys, zip_key, Manifest};
use crate::chunk::{ChunkConfig, ChunkDecoder, ChunkEncoder, DecodeOutcome, PhysicalEntries};
use crate::error::Result;
use crate::facade::validate::{validate_key, validate_keys, validate_ttl, validate_writable_key};
use crate::facade::CacheStats;

// == Chunked Cache ==
/// Transparent large-value layer over a [`KeyValueStore`].
///
/// Reads never fail for integrity reasons: a chunk set that is partially
/// expired, tampered with or mixed between two writers reads as a miss and
/// is deleted as a side effect. Only argument validation errors reach the
/// caller of a read.
#[derive(Debug)]
pub struct ChunkedCache<S> {
    store: S,
    config: ChunkConfig,
    encoder: ChunkEncoder,
    decoder: ChunkDecoder,
    stats: CacheStats,
}

impl<S: KeyValueStore> ChunkedCache<S> {
    // == Constructor ==
    pub fn new(store: S) -> Self {
        Self::with_config(store, ChunkConfig::default())
    }

    pub fn with_config(store: S, config: ChunkConfig) -> Self {
        Self {
            encoder: ChunkEncoder::new(&config),
            decoder: ChunkDecoder::new(&config),
            store,
            config,
            stats: CacheStats::new(),
        }
    }

    pub fn config(&self) -> &ChunkConfig {
        &self.config
    }

    /// The underlying store, for inspection.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The underlying store, for maintenance such as expiry sweeps.
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.store.len());
        stats
    }

    // == Get ==
    /// Returns the value stored under `key`, or `None` on a miss.
    pub fn get(&mut self, key: &str) -> Result<Option<String>> {
        validate_key(key, self.config.max_key_length)?;
        let keys = [key.to_string()];
        Ok(self.get_all(&keys)?.remove(key))
    }

    // == Get All ==
    /// Returns the entries found for `keys`. Missing and corrupt keys are
    /// left out; corrupt ones are purged.
    pub fn get_all(&mut self, keys: &[String]) -> Result<HashMap<String, String>> {
        validate_keys(keys, self.config.max_key_length)?;
        if keys.is_empty() {
            return Ok(HashMap::new());
        }

        let outcome = match self.fetch_and_decode(keys) {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!("Read of {} keys failed, treating as miss: {}", keys.len(), e);
                self.stats.record_misses(keys.len());
                return Ok(HashMap::new());
            }
        };

        let purge = outcome.purge_keys();
        if !purge.is_empty() {
            for key in &purge {
                if let Some(reason) = outcome.get(key) {
                    warn!("Purging corrupt entry {}: {:?}", key, reason);
                }
            }
            self.purge(&purge);
        }

        let requested = outcome.results.len();
        let values = outcome.into_values();
        self.stats.record_hits(values.len());
        self.stats.record_misses(requested - values.len());

        Ok(values)
    }

    fn fetch_and_decode(&mut self, keys: &[String]) -> Result<DecodeOutcome> {
        let probes: Vec<String> = keys.iter().flat_map(|k| probe_keys(k)).collect();
        let fetched = self.store.get_all(&probes)?;
        let first = self.decoder.classify(keys, &fetched);

        let part_keys = first.part_keys();
        let parts = if part_keys.is_empty() {
            HashMap::new()
        } else {
            debug!(
                "Fetching {} parts for {} split values",
                part_keys.len(),
                first.pending.len()
            );
            self.store.get_all(&part_keys)?
        };

        Ok(self.decoder.resolve(first, &parts))
    }

    /// Best-effort removal of corrupt chunk sets. Failures are logged only.
    fn purge(&mut self, keys: &[String]) {
        self.stats.record_purges(keys.len());
        if let Err(e) = self.remove_all(keys) {
            warn!("Purge of {} keys failed: {}", keys.len(), e);
        }
    }

    // == Put ==
    /// Stores `value` under `key` for `ttl` seconds (default 600).
    pub fn put(&mut self, key: &str, value: &str, ttl: Option<u64>) -> Result<()> {
        let entries = HashMap::from([(key.to_string(), value.to_string())]);
        self.put_all(&entries, ttl)
    }

    // == Put All ==
    /// Stores every entry with the same ttl in one batched write.
    ///
    /// Any previous layout of each key is removed first, so a key never ends
    /// up with two representations. Store failures propagate unchanged.
    pub fn put_all(&mut self, entries: &HashMap<String, String>, ttl: Option<u64>) -> Result<()> {
        let ttl = ttl.unwrap_or(self.config.default_ttl);
        validate_ttl(ttl)?;
        let keys: Vec<String> = entries.keys().cloned().collect();
        validate_keys(&keys, self.config.max_key_length)?;
        keys.iter().try_for_each(|k| validate_writable_key(k))?;

        let mut physical = PhysicalEntries::new();
        for (key, value) in entries {
            physical.extend(self.encoder.encode(key, value)?);
        }

        self.remove_all(&keys)?;
        debug!(
            "Writing {} logical keys as {} physical entries (ttl {}s)",
            keys.len(),
            physical.len(),
            ttl
        );
        self.store.put_all(&physical, ttl)
    }

    // == Remove ==
    pub fn remove(&mut self, key: &str) -> Result<()> {
        self.remove_all(&[key.to_string()])
    }

    // == Remove All ==
    /// Deletes every physical entry of each key in one batched delete.
    ///
    /// Manifests are read first to discover parts. An unreadable manifest is
    /// skipped; its parts are left for the store to expire.
    pub fn remove_all(&mut self, keys: &[String]) -> Result<()> {
        validate_keys(keys, self.config.max_key_length)?;
        if keys.is_empty() {
            return Ok(());
        }

        let manifest_keys: Vec<String> = keys.iter().map(|k| manifest_key(k)).collect();
        let manifests = self.store.get_all(&manifest_keys)?;

        let mut doomed = Vec::with_capacity(keys.len() * 3);
        for key in keys {
            doomed.push(key.clone());
            doomed.push(zip_key(key));

            match manifests.get(&manifest_key(key)).map(|raw| Manifest::parse(raw)) {
                Some(Some(manifest)) if manifest.num_parts < self.config.max_parts => {
                    doomed.extend(manifest.all_keys(key));
                }
                Some(_) => {
                    debug!("Ignoring unreadable manifest for {}", key);
                    doomed.push(manifest_key(key));
                }
                None => doomed.push(manifest_key(key)),
            }
        }

        self.store.remove_all(&doomed)
    }
}
