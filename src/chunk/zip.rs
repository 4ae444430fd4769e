//! Compression Module
//!
//! Gzip compression and the comma-separated decimal text form compressed
//! bytes are stored in. Bytes are written as signed 8-bit values, matching
//! the layout existing deployments produce; reads accept -128..=255.

use std::io::{Read, Write};

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;

use crate::chunk::Corruption;
use crate::error::{CacheError, Result};

// == Compress ==
/// Gzips `value` and renders the bytes as comma-separated decimals.
pub fn compress_to_text(value: &str) -> Result<String> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(value.as_bytes())
        .map_err(|e| CacheError::Internal(format!("gzip failed: {}", e)))?;
    let bytes = encoder
        .finish()
        .map_err(|e| CacheError::Internal(format!("gzip failed: {}", e)))?;

    Ok(bytes_to_text(&bytes))
}

// == Decompress ==
/// Parses compressed text and gunzips it back to the original string.
pub fn decompress_text(text: &str) -> std::result::Result<String, Corruption> {
    let bytes = text_to_bytes(text)?;

    let mut decoder = GzDecoder::new(bytes.as_slice());
    let mut value = String::new();
    decoder
        .read_to_string(&mut value)
        .map_err(|e| Corruption::Decompression(e.to_string()))?;

    Ok(value)
}

/// Renders bytes as signed decimals joined by commas.
pub fn bytes_to_text(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| (*b as i8).to_string())
        .collect::<Vec<_>>()
        .join(",")
}

/// Parses comma-separated decimals back into bytes.
pub fn text_to_bytes(text: &str) -> std::result::Result<Vec<u8>, Corruption> {
    if text.is_empty() {
        return Err(Corruption::ByteText("empty payload".to_string()));
    }

    text.split(',')
        .map(|token| {
            let n: i16 = token
                .trim()
                .parse()
                .map_err(|_| Corruption::ByteText(format!("bad byte {:?}", token)))?;
            match n {
                -128..=-1 => Ok((n + 256) as u8),
                0..=255 => Ok(n as u8),
                _ => Err(Corruption::ByteText(format!("byte out of range: {}", n))),
            }
        })
        .collect()
}
