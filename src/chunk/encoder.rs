//! Chunk Encoder
//!
//! Maps one logical (key, value) pair onto the physical entries that
//! represent it: the value itself, a single compressed entry, or a manifest
//! plus numbered parts.

use tracing::debug;

use crate::chunk::layout::{part_key, zip_key, Manifest, ZipInfo};
use crate::chunk::{
    content_hash, estimate_bytes, zip::compress_to_text, Charset, ChunkConfig, PhysicalEntries,
};
use crate::error::{CacheError, Result};

// == Chunk Encoder ==
#[derive(Debug, Clone)]
pub struct ChunkEncoder {
    max_entry_bytes: usize,
    max_parts: usize,
    charset: Charset,
}

impl ChunkEncoder {
    pub fn new(config: &ChunkConfig) -> Self {
        Self {
            max_entry_bytes: config.max_entry_bytes,
            max_parts: config.max_parts,
            charset: config.charset,
        }
    }

    // == Encode ==
    /// Produces the physical entries for `key` holding `value`.
    ///
    /// Performs no store I/O. Fails with [`CacheError::TooManyParts`] when
    /// even the compressed form needs `max_parts` parts or more.
    pub fn encode(&self, key: &str, value: &str) -> Result<PhysicalEntries> {
        if estimate_bytes(value) <= self.max_entry_bytes {
            return Ok(PhysicalEntries::from([(key.to_string(), value.to_string())]));
        }

        let zip_text = compress_to_text(value)?;
        self.layout_compressed(key, value, zip_text)
    }

    /// Places already-compressed text for `value` as one entry or as parts.
    pub(crate) fn layout_compressed(
        &self,
        key: &str,
        value: &str,
        zip_text: String,
    ) -> Result<PhysicalEntries> {
        let zip_size = estimate_bytes(&zip_text);
        if zip_size <= self.max_entry_bytes {
            debug!("Storing {} compressed ({} bytes)", key, zip_size);
            return Ok(PhysicalEntries::from([(zip_key(key), zip_text)]));
        }

        let parts = split_text(&zip_text, self.max_entry_bytes);
        if parts.len() >= self.max_parts {
            return Err(CacheError::TooManyParts {
                parts: parts.len(),
                limit: self.max_parts,
            });
        }

        let manifest = Manifest {
            hash: content_hash(value, self.charset),
            zip: ZipInfo {
                hash: content_hash(&zip_text, self.charset),
                size: zip_size,
            },
            num_parts: parts.len(),
        };
        debug!(
            "Splitting {} into {} parts ({} compressed bytes)",
            key, manifest.num_parts, zip_size
        );

        let mut entries = PhysicalEntries::with_capacity(parts.len() + 1);
        entries.insert(part_key(key, 0), manifest.to_json()?);
        for (index, part) in parts.iter().enumerate() {
            entries.insert(part_key(key, index + 1), part.to_string());
        }

        Ok(entries)
    }
}

// == Split Text ==
/// Cuts `text` into consecutive slices of at most `max_bytes` bytes each,
/// never inside a character.
///
/// A slice only exceeds `max_bytes` when a single character is wider than
/// the limit.
pub fn split_text(text: &str, max_bytes: usize) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;

    while start < text.len() {
        let mut end = (start + max_bytes).min(text.len());
        while end > start && !text.is_char_boundary(end) {
            end -= 1;
        }
        if end == start {
            end = start + text[start..].chars().next().map_or(1, char::len_utf8);
        }

        parts.push(&text[start..end]);
        start = end;
    }

    parts
}
