//! Digest Utility
//!
//! Content fingerprints used to detect corrupted or mixed-generation chunk
//! sets. Fingerprints are never used to address entries.

use std::fmt;
use std::str::FromStr;

use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};

use crate::error::{CacheError, Result};

type HmacSha256 = Hmac<Sha256>;

// == Charset ==
/// Byte interpretation applied to a string before hashing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Charset {
    #[default]
    Utf8,
    /// Seven-bit ASCII; every other character becomes `?`.
    UsAscii,
}

impl Charset {
    fn encode(self, value: &str) -> Vec<u8> {
        match self {
            Charset::Utf8 => value.as_bytes().to_vec(),
            Charset::UsAscii => value
                .chars()
                .map(|c| if c.is_ascii() { c as u8 } else { b'?' })
                .collect(),
        }
    }
}

impl FromStr for Charset {
    type Err = CacheError;

    fn from_str(token: &str) -> Result<Self> {
        match token.to_ascii_uppercase().as_str() {
            "UTF_8" | "UTF-8" | "UTF8" => Ok(Charset::Utf8),
            "US_ASCII" | "US-ASCII" | "ASCII" => Ok(Charset::UsAscii),
            other => Err(CacheError::InvalidArgument(format!(
                "Unsupported charset: {}",
                other
            ))),
        }
    }
}

impl fmt::Display for Charset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Charset::Utf8 => f.write_str("UTF_8"),
            Charset::UsAscii => f.write_str("US_ASCII"),
        }
    }
}

// == Fingerprint ==
/// Returns the lowercase hex SHA-256 of `value` under `charset`.
///
/// Fails when `value` is empty or whitespace-only.
pub fn fingerprint(value: &str, charset: Charset) -> Result<String> {
    require_content("value", value)?;
    Ok(content_hash(value, charset))
}

/// Hex SHA-256 of any string, blank ones included. Chunk verification
/// hashes stored content with this so every value round-trips.
pub(crate) fn content_hash(value: &str, charset: Charset) -> String {
    let mut hasher = Sha256::new();
    hasher.update(charset.encode(value));
    hex::encode(hasher.finalize())
}

// == Keyed Fingerprint ==
/// Returns the lowercase hex HMAC-SHA256 of `value` keyed by `key`.
///
/// Both the key and the value go through `charset`. Fails when either is
/// empty or whitespace-only.
pub fn keyed_fingerprint(key: &str, value: &str, charset: Charset) -> Result<String> {
    require_content("key", key)?;
    require_content("value", value)?;

    let mut mac = HmacSha256::new_from_slice(&charset.encode(key))
        .map_err(|e| CacheError::InvalidArgument(format!("Unusable HMAC key: {}", e)))?;
    mac.update(&charset.encode(value));
    Ok(hex::encode(mac.finalize().into_bytes()))
}

fn require_content(name: &str, input: &str) -> Result<()> {
    if input.trim().is_empty() {
        return Err(CacheError::InvalidArgument(format!(
            "{} must not be empty",
            name
        )));
    }
    Ok(())
}
