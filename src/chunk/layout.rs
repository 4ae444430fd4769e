//! Physical Layout Module
//!
//! Naming rules for the physical entries backing a logical key, and the
//! manifest record stored in front of a split value.
//!
//! For a logical key `K`:
//! - `K` holds a small value verbatim
//! - `K.zip` holds a compressed value that fits in one entry
//! - `K[0].zip` holds the manifest of a split value
//! - `K[1].zip` .. `K[n].zip` hold the ordered parts of a split value

use serde::{Deserialize, Serialize};

use crate::error::{CacheError, Result};

/// Suffix shared by every compressed physical key.
pub const ZIP_SUFFIX: &str = ".zip";

// == Key Naming ==
/// Key of the single-entry compressed form.
pub fn zip_key(key: &str) -> String {
    format!("{}{}", key, ZIP_SUFFIX)
}

/// Key of part `index` of a split value. Index 0 is the manifest.
pub fn part_key(key: &str, index: usize) -> String {
    format!("{}[{}]{}", key, index, ZIP_SUFFIX)
}

/// Key of the manifest of a split value.
pub fn manifest_key(key: &str) -> String {
    part_key(key, 0)
}

/// The three physical names a read must probe for `key`.
pub fn probe_keys(key: &str) -> [String; 3] {
    [key.to_string(), zip_key(key), manifest_key(key)]
}

// == Manifest ==
/// Reconstruction record for a split value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    /// Fingerprint of the original value
    pub hash: String,
    /// Fingerprint and size of the compressed text before splitting
    pub zip: ZipInfo,
    /// Number of parts, stored at `K[1].zip` .. `K[num_parts].zip`
    pub num_parts: usize,
}

/// Describes the compressed text a split value was cut from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZipInfo {
    pub hash: String,
    pub size: usize,
}

impl Manifest {
    /// Parses a stored manifest.
    ///
    /// Returns `None` for anything that is not a JSON object of the full
    /// manifest shape. Compressed byte text never is, so a `None` here means
    /// the slot holds a compressed payload instead.
    pub fn parse(raw: &str) -> Option<Self> {
        serde_json::from_str(raw).ok()
    }

    /// Serializes the manifest in its stored JSON form.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|e| CacheError::Internal(format!("manifest serialization failed: {}", e)))
    }

    /// Keys of all parts, in concatenation order.
    pub fn part_keys(&self, key: &str) -> Vec<String> {
        (1..=self.num_parts).map(|n| part_key(key, n)).collect()
    }

    /// Keys of the manifest and all parts.
    pub fn all_keys(&self, key: &str) -> Vec<String> {
        (0..=self.num_parts).map(|n| part_key(key, n)).collect()
    }
}
