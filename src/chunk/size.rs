//! Byte-Size Estimator
//!
//! Measures strings the way the backing store charges for them.

// == Estimate Bytes ==
/// Returns the number of bytes `value` occupies in the store's accounting.
///
/// The store charges per encoded byte, so non-ASCII characters cost two to
/// four bytes each. This is the exact UTF-8 length.
pub fn estimate_bytes(value: &str) -> usize {
    value.len()
}
