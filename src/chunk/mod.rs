//! Chunk Module
//!
//! The codec that lets values far larger than one store entry live in a
//! size-capped store: compression, splitting, manifests, fingerprints and
//! the verifying reconstruction on read.

mod decoder;
mod digest;
mod encoder;
pub mod layout;
mod size;
pub mod zip;


use std::collections::HashMap;

use thiserror::Error;

// Re-export public types
pub use decoder::{ChunkDecoder, DecodeOutcome, FirstPass, PendingManifest, Reconstruction};
pub(crate) use digest::content_hash;
pub use digest::{fingerprint, keyed_fingerprint, Charset};
pub use encoder::{split_text, ChunkEncoder};
pub use layout::Manifest;
pub use size::estimate_bytes;

// == Public Constants ==
/// Maximum size of one physical value, in bytes (100 KB)
pub const MAX_ENTRY_BYTES: usize = 102_400;

/// Part count at which encoding is refused
pub const MAX_PARTS: usize = 1000;

/// Maximum logical key length, in characters. The store allows 250; the
/// rest is reserved for the `[n].zip` suffix.
pub const MAX_KEY_LENGTH: usize = 240;

/// Ttl applied when the caller gives none, in seconds
pub const DEFAULT_TTL: u64 = 600;

/// Physical key to physical value, as produced by the encoder.
pub type PhysicalEntries = HashMap<String, String>;

// == Chunk Config ==
/// Limits and defaults shared by the encoder, decoder and facade.
#[derive(Debug, Clone)]
pub struct ChunkConfig {
    /// Largest value written to a single physical entry
    pub max_entry_bytes: usize,
    /// Part count at which encoding fails
    pub max_parts: usize,
    /// Longest accepted logical key
    pub max_key_length: usize,
    /// Ttl used when none is given
    pub default_ttl: u64,
    /// Byte interpretation used for fingerprints
    pub charset: Charset,
}

impl Default for ChunkConfig {
    fn default() -> Self {
        Self {
            max_entry_bytes: MAX_ENTRY_BYTES,
            max_parts: MAX_PARTS,
            max_key_length: MAX_KEY_LENGTH,
            default_ttl: DEFAULT_TTL,
            charset: Charset::Utf8,
        }
    }
}

// == Corruption ==
/// Why a stored chunk set could not be turned back into its value.
///
/// Expected under normal operation (partial expiry, racing writers); read
/// paths turn it into a miss plus a purge.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Corruption {
    #[error("manifest declares unusable part count {0}")]
    BadManifest(usize),

    #[error("missing part {0}")]
    MissingPart(String),

    #[error("compressed size {actual} does not match manifest size {expected}")]
    SizeMismatch { expected: usize, actual: usize },

    #[error("compressed text fingerprint mismatch")]
    ZipHashMismatch,

    #[error("value fingerprint mismatch")]
    ValueHashMismatch,

    #[error("malformed byte text: {0}")]
    ByteText(String),

    #[error("decompression failed: {0}")]
    Decompression(String),
}
