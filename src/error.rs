//! Error types for the chunked cache
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the chunked cache and its HTTP surface.
///
/// Integrity failures during reconstruction are not represented here: they
/// never leave the read path (see [`crate::chunk::Corruption`]).
#[derive(Error, Debug)]
pub enum CacheError {
    /// Key not found in cache (HTTP surface only)
    #[error("Key not found: {0}")]
    NotFound(String),

    /// Bad key shape, key list or ttl
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Bad input to a fingerprint function
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Compressed value needs more parts than the store can hold
    #[error("Too many parts: {parts} (limit {limit})")]
    TooManyParts { parts: usize, limit: usize },

    /// The underlying store rejected an operation
    #[error("Store error: {0}")]
    Store(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::NotFound(_) => StatusCode::NOT_FOUND,
            CacheError::InvalidRequest(_) | CacheError::InvalidArgument(_) => {
                StatusCode::BAD_REQUEST
            }
            CacheError::TooManyParts { .. } => StatusCode::INSUFFICIENT_STORAGE,
            CacheError::Store(_) | CacheError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the chunked cache.
pub type Result<T> = std::result::Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let cases = [
            (CacheError::NotFound("k".into()), StatusCode::NOT_FOUND),
            (CacheError::InvalidRequest("bad".into()), StatusCode::BAD_REQUEST),
            (CacheError::InvalidArgument("bad".into()), StatusCode::BAD_REQUEST),
            (
                CacheError::TooManyParts { parts: 1000, limit: 1000 },
                StatusCode::INSUFFICIENT_STORAGE,
            ),
            (CacheError::Store("down".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }

    #[test]
    fn test_too_many_parts_message() {
        let err = CacheError::TooManyParts { parts: 1200, limit: 1000 };
        assert_eq!(err.to_string(), "Too many parts: 1200 (limit 1000)");
    }
}
