//! Validate Module
//!
//! Argument checks run before any store I/O.

use crate::cache::{MAX_STORE_KEY_LENGTH, MAX_TTL, MIN_TTL};
use crate::chunk::layout::ZIP_SUFFIX;
use crate::error::{CacheError, Result};

// == Validate Key ==
/// Accepts non-empty keys of at most `max_len` characters.
///
/// Internal `.zip` forms may run up to the store's own key limit.
pub fn validate_key(key: &str, max_len: usize) -> Result<()> {
    if key.is_empty() {
        return Err(CacheError::InvalidRequest("Key cannot be empty".to_string()));
    }

    let len = key.chars().count();
    let internal_form = key.ends_with(ZIP_SUFFIX) && len <= MAX_STORE_KEY_LENGTH;
    if len > max_len && !internal_form {
        return Err(CacheError::InvalidRequest(format!(
            "Key exceeds maximum length of {} characters",
            max_len
        )));
    }

    Ok(())
}

// == Validate Writable Key ==
/// Rejects keys shaped like a derived physical key (`k.zip`, `k[3]`).
///
/// Storing under such a key would share slots with another logical key's
/// compressed entry, manifest or parts.
pub fn validate_writable_key(key: &str) -> Result<()> {
    if key.ends_with(ZIP_SUFFIX) || has_index_suffix(key) {
        return Err(CacheError::InvalidRequest(format!(
            "Key {} ends with a reserved suffix",
            key
        )));
    }
    Ok(())
}

fn has_index_suffix(key: &str) -> bool {
    key.strip_suffix(']')
        .and_then(|rest| rest.rfind('[').map(|open| &rest[open + 1..]))
        .is_some_and(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
}

pub fn validate_keys<K: AsRef<str>>(keys: &[K], max_len: usize) -> Result<()> {
    keys.iter().try_for_each(|k| validate_key(k.as_ref(), max_len))
}

// == Validate TTL ==
pub fn validate_ttl(ttl: u64) -> Result<()> {
    if !(MIN_TTL..=MAX_TTL).contains(&ttl) {
        return Err(CacheError::InvalidRequest(format!(
            "TTL must be between {} and {} seconds, got {}",
            MIN_TTL, MAX_TTL, ttl
        )));
    }
    Ok(())
}
