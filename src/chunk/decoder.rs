//! Chunk Decoder
//!
//! Reconstructs logical values from fetched physical entries. Works in two
//! passes so the caller can batch its store reads: [`ChunkDecoder::classify`]
//! settles direct and single-entry compressed values and collects the
//! manifests of split values, then [`ChunkDecoder::resolve`] reassembles
//! those from their fetched parts.
//!
//! Nothing here returns an error. A chunk set that fails any check comes
//! back as [`Reconstruction::Corrupt`], which the caller treats as a miss and
//! purges.

use std::collections::{HashMap, HashSet};

use crate::chunk::layout::{manifest_key, zip_key, Manifest};
use crate::chunk::zip::decompress_text;
use crate::chunk::{content_hash, estimate_bytes, Charset, ChunkConfig, Corruption};

// == Reconstruction ==
/// Read result for one logical key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reconstruction {
    /// The value was rebuilt and verified
    Hit(String),
    /// No physical entry exists for the key
    Absent,
    /// Entries exist but do not form a valid value; they must be purged
    Corrupt(Corruption),
}

impl Reconstruction {
    pub fn is_corrupt(&self) -> bool {
        matches!(self, Reconstruction::Corrupt(_))
    }
}

/// A split value waiting for its parts.
#[derive(Debug, Clone)]
pub struct PendingManifest {
    pub key: String,
    pub manifest: Manifest,
}

// == First Pass ==
/// Output of [`ChunkDecoder::classify`].
#[derive(Debug, Default)]
pub struct FirstPass {
    /// Keys whose outcome is already known
    pub settled: HashMap<String, Reconstruction>,
    /// Split values that still need their parts fetched
    pub pending: Vec<PendingManifest>,
}

impl FirstPass {
    /// Every part key the pending manifests reference.
    pub fn part_keys(&self) -> Vec<String> {
        self.pending
            .iter()
            .flat_map(|p| p.manifest.part_keys(&p.key))
            .collect()
    }
}

// == Decode Outcome ==
/// Final per-key results of a read.
#[derive(Debug, Default)]
pub struct DecodeOutcome {
    pub results: HashMap<String, Reconstruction>,
}

impl DecodeOutcome {
    pub fn get(&self, key: &str) -> Option<&Reconstruction> {
        self.results.get(key)
    }

    /// Logical keys whose remnants should be deleted, sorted.
    pub fn purge_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .results
            .iter()
            .filter(|(_, r)| r.is_corrupt())
            .map(|(k, _)| k.clone())
            .collect();
        keys.sort();
        keys
    }

    /// Successfully rebuilt values only.
    pub fn into_values(self) -> HashMap<String, String> {
        self.results
            .into_iter()
            .filter_map(|(key, r)| match r {
                Reconstruction::Hit(value) => Some((key, value)),
                _ => None,
            })
            .collect()
    }
}

enum Slot {
    Split(Manifest),
    Settled(Reconstruction),
}

// == Chunk Decoder ==
#[derive(Debug, Clone)]
pub struct ChunkDecoder {
    max_parts: usize,
    charset: Charset,
}

impl ChunkDecoder {
    pub fn new(config: &ChunkConfig) -> Self {
        Self {
            max_parts: config.max_parts,
            charset: config.charset,
        }
    }

    // == Classify ==
    /// First pass over the entries fetched for each key's probe names
    /// (`K`, `K.zip`, `K[0].zip`).
    ///
    /// If racing writers left more than one representation, `K` wins over
    /// `K.zip`, which wins over `K[0].zip`.
    pub fn classify(&self, keys: &[String], fetched: &HashMap<String, String>) -> FirstPass {
        let mut first = FirstPass::default();
        let mut seen = HashSet::new();

        for key in keys {
            if !seen.insert(key.as_str()) {
                continue;
            }

            let slot = if let Some(value) = fetched.get(key) {
                Slot::Settled(Reconstruction::Hit(value.clone()))
            } else if let Some(raw) = fetched.get(&zip_key(key)) {
                self.read_zip_slot(raw)
            } else if let Some(raw) = fetched.get(&manifest_key(key)) {
                self.read_zip_slot(raw)
            } else {
                Slot::Settled(Reconstruction::Absent)
            };

            match slot {
                Slot::Settled(r) => {
                    first.settled.insert(key.clone(), r);
                }
                Slot::Split(manifest) => first.pending.push(PendingManifest {
                    key: key.clone(),
                    manifest,
                }),
            }
        }

        first
    }

    // == Resolve ==
    /// Second pass: reassembles every pending split value from `parts`.
    pub fn resolve(&self, first: FirstPass, parts: &HashMap<String, String>) -> DecodeOutcome {
        let mut results = first.settled;

        for pending in first.pending {
            let r = self.reassemble(&pending, parts);
            results.insert(pending.key, r);
        }

        DecodeOutcome { results }
    }

    /// Both passes over one map holding every physical entry.
    pub fn decode(&self, keys: &[String], entries: &HashMap<String, String>) -> DecodeOutcome {
        let first = self.classify(keys, entries);
        self.resolve(first, entries)
    }

    /// A `.zip` slot holds either a manifest or compressed text.
    fn read_zip_slot(&self, raw: &str) -> Slot {
        match Manifest::parse(raw) {
            Some(manifest) if manifest.num_parts == 0 || manifest.num_parts >= self.max_parts => {
                Slot::Settled(Reconstruction::Corrupt(Corruption::BadManifest(
                    manifest.num_parts,
                )))
            }
            Some(manifest) => Slot::Split(manifest),
            None => Slot::Settled(match decompress_text(raw) {
                Ok(value) => Reconstruction::Hit(value),
                Err(corruption) => Reconstruction::Corrupt(corruption),
            }),
        }
    }

    fn reassemble(&self, pending: &PendingManifest, parts: &HashMap<String, String>) -> Reconstruction {
        match self.try_reassemble(pending, parts) {
            Ok(value) => Reconstruction::Hit(value),
            Err(corruption) => Reconstruction::Corrupt(corruption),
        }
    }

    fn try_reassemble(
        &self,
        pending: &PendingManifest,
        parts: &HashMap<String, String>,
    ) -> Result<String, Corruption> {
        let manifest = &pending.manifest;

        let mut zip_text = String::with_capacity(manifest.zip.size);
        for part_key in manifest.part_keys(&pending.key) {
            let part = parts
                .get(&part_key)
                .ok_or(Corruption::MissingPart(part_key))?;
            zip_text.push_str(part);
        }

        let actual = estimate_bytes(&zip_text);
        if actual != manifest.zip.size {
            return Err(Corruption::SizeMismatch {
                expected: manifest.zip.size,
                actual,
            });
        }
        if !self.matches(&zip_text, &manifest.zip.hash) {
            return Err(Corruption::ZipHashMismatch);
        }

        let value = decompress_text(&zip_text)?;
        if !self.matches(&value, &manifest.hash) {
            return Err(Corruption::ValueHashMismatch);
        }

        Ok(value)
    }

    fn matches(&self, content: &str, expected: &str) -> bool {
        content_hash(content, self.charset).eq_ignore_ascii_case(expected)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::layout::part_key;
    use crate::chunk::zip::compress_to_text;
    use crate::chunk::ChunkEncoder;

    fn small_config() -> ChunkConfig {
        ChunkConfig {
            max_entry_bytes: 512,
            ..ChunkConfig::default()
        }
    }

    fn noisy_value(len: usize) -> String {
        let mut state: u64 = 0x2545_f491_4f6c_dd1d;
        (0..len)
            .map(|_| {
                state ^= state << 13;
                state ^= state >> 7;
                state ^= state << 17;
                char::from(b'a' + (state % 26) as u8)
            })
            .collect()
    }

    fn keys(list: &[&str]) -> Vec<String> {
        list.iter().map(|k| k.to_string()).collect()
    }

    fn split_entries(key: &str, value: &str) -> HashMap<String, String> {
        let entries = ChunkEncoder::new(&small_config()).encode(key, value).unwrap();
        assert!(entries.contains_key(&manifest_key(key)), "value should split");
        entries
    }

    #[test]
    fn test_direct_value() {
        let decoder = ChunkDecoder::new(&small_config());
        let entries = HashMap::from([("a".to_string(), "plain".to_string())]);

        let outcome = decoder.decode(&keys(&["a"]), &entries);
        assert_eq!(outcome.get("a"), Some(&Reconstruction::Hit("plain".to_string())));
    }

    #[test]
    fn test_absent_key() {
        let decoder = ChunkDecoder::new(&small_config());

        let outcome = decoder.decode(&keys(&["nope"]), &HashMap::new());
        assert_eq!(outcome.get("nope"), Some(&Reconstruction::Absent));
        assert!(outcome.purge_keys().is_empty());
    }

    #[test]
    fn test_single_zip_entry() {
        let decoder = ChunkDecoder::new(&small_config());
        let value = "z".repeat(10_000);
        let entries = HashMap::from([("c.zip".to_string(), compress_to_text(&value).unwrap())]);

        let outcome = decoder.decode(&keys(&["c"]), &entries);
        assert_eq!(outcome.into_values()["c"], value);
    }

    #[test]
    fn test_literal_compressed_text_in_manifest_slot() {
        let decoder = ChunkDecoder::new(&small_config());
        let entries =
            HashMap::from([("m[0].zip".to_string(), compress_to_text("hello").unwrap())]);

        let outcome = decoder.decode(&keys(&["m"]), &entries);
        assert_eq!(outcome.get("m"), Some(&Reconstruction::Hit("hello".to_string())));
    }

    #[test]
    fn test_split_value_two_passes() {
        let decoder = ChunkDecoder::new(&small_config());
        let value = noisy_value(4000);
        let entries = split_entries("b", &value);

        let probe: HashMap<String, String> = entries
            .iter()
            .filter(|(k, _)| k.as_str() == "b[0].zip")
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        let first = decoder.classify(&keys(&["b"]), &probe);
        assert_eq!(first.pending.len(), 1);
        assert_eq!(first.part_keys().len(), first.pending[0].manifest.num_parts);

        let outcome = decoder.resolve(first, &entries);
        assert_eq!(outcome.into_values()["b"], value);
    }

    #[test]
    fn test_missing_part_is_corrupt() {
        let decoder = ChunkDecoder::new(&small_config());
        let mut entries = split_entries("b", &noisy_value(4000));
        entries.remove(&part_key("b", 2));

        let outcome = decoder.decode(&keys(&["b"]), &entries);
        assert_eq!(
            outcome.get("b"),
            Some(&Reconstruction::Corrupt(Corruption::MissingPart(
                "b[2].zip".to_string()
            )))
        );
        assert_eq!(outcome.purge_keys(), vec!["b".to_string()]);
        assert!(outcome.into_values().is_empty());
    }

    #[test]
    fn test_swapped_parts_fail_zip_hash() {
        let decoder = ChunkDecoder::new(&small_config());
        let mut entries = split_entries("b", &noisy_value(4000));
        let first = entries[&part_key("b", 1)].clone();
        let second = entries[&part_key("b", 2)].clone();
        entries.insert(part_key("b", 1), second);
        entries.insert(part_key("b", 2), first);

        let outcome = decoder.decode(&keys(&["b"]), &entries);
        assert_eq!(
            outcome.get("b"),
            Some(&Reconstruction::Corrupt(Corruption::ZipHashMismatch))
        );
    }

    #[test]
    fn test_mixed_generation_parts_detected() {
        let decoder = ChunkDecoder::new(&small_config());
        let old = split_entries("g", &noisy_value(4000));
        let mut new = split_entries("g", &noisy_value(4001));
        // Writer A's manifest with writer B's parts
        new.insert(manifest_key("g"), old[&manifest_key("g")].clone());

        let outcome = decoder.decode(&keys(&["g"]), &new);
        assert!(outcome.get("g").is_some_and(Reconstruction::is_corrupt));
    }

    #[test]
    fn test_wrong_value_hash_detected() {
        let decoder = ChunkDecoder::new(&small_config());
        let mut entries = split_entries("b", &noisy_value(4000));
        let mut manifest = Manifest::parse(&entries[&manifest_key("b")]).unwrap();
        manifest.hash = "0".repeat(64);
        entries.insert(manifest_key("b"), manifest.to_json().unwrap());

        let outcome = decoder.decode(&keys(&["b"]), &entries);
        assert_eq!(
            outcome.get("b"),
            Some(&Reconstruction::Corrupt(Corruption::ValueHashMismatch))
        );
    }

    #[test]
    fn test_absurd_part_count_rejected() {
        let decoder = ChunkDecoder::new(&small_config());
        let raw = r#"{"hash":"a","zip":{"hash":"b","size":1},"num_parts":5000}"#;
        let entries = HashMap::from([("x[0].zip".to_string(), raw.to_string())]);

        let first = decoder.classify(&keys(&["x"]), &entries);
        assert!(first.pending.is_empty());
        assert_eq!(
            first.settled["x"],
            Reconstruction::Corrupt(Corruption::BadManifest(5000))
        );
    }

    #[test]
    fn test_garbage_zip_is_corrupt() {
        let decoder = ChunkDecoder::new(&small_config());
        let entries = HashMap::from([("c.zip".to_string(), "1,2,3".to_string())]);

        let outcome = decoder.decode(&keys(&["c"]), &entries);
        assert!(matches!(
            outcome.get("c"),
            Some(Reconstruction::Corrupt(Corruption::Decompression(_)))
        ));
    }

    #[test]
    fn test_direct_wins_over_stale_zip() {
        let decoder = ChunkDecoder::new(&small_config());
        let entries = HashMap::from([
            ("k".to_string(), "fresh".to_string()),
            ("k.zip".to_string(), compress_to_text("stale").unwrap()),
        ]);

        let outcome = decoder.decode(&keys(&["k"]), &entries);
        assert_eq!(outcome.get("k"), Some(&Reconstruction::Hit("fresh".to_string())));
    }

    #[test]
    fn test_duplicate_keys_decoded_once() {
        let decoder = ChunkDecoder::new(&small_config());
        let entries = HashMap::from([("a".to_string(), "1".to_string())]);

        let first = decoder.classify(&keys(&["a", "a"]), &entries);
        assert_eq!(first.settled.len(), 1);
    }
}
