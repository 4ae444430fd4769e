//! Request DTOs for the cache server API
//!
//! Defines the structure of incoming HTTP request bodies. Key and ttl checks
//! happen in the cache itself.

use std::collections::HashMap;

use serde::Deserialize;

/// Request body for PUT /set
#[derive(Debug, Clone, Deserialize)]
pub struct SetRequest {
    /// The cache key
    pub key: String,
    /// The value to store, of any size
    pub value: String,
    /// Optional TTL in seconds
    #[serde(default)]
    pub ttl: Option<u64>,
}

/// Request body for PUT /set_all
#[derive(Debug, Clone, Deserialize)]
pub struct SetAllRequest {
    pub entries: HashMap<String, String>,
    #[serde(default)]
    pub ttl: Option<u64>,
}

/// Request body for POST /get_all and POST /del_all
#[derive(Debug, Clone, Deserialize)]
pub struct KeysRequest {
    pub keys: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_request_deserialize() {
        let json = r#"{"key": "test", "value": "hello"}"#;
        let req: SetRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.key, "test");
        assert_eq!(req.value, "hello");
        assert!(req.ttl.is_none());
    }

    #[test]
    fn test_set_request_with_ttl() {
        let json = r#"{"key": "test", "value": "hello", "ttl": 60}"#;
        let req: SetRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.ttl, Some(60));
    }

    #[test]
    fn test_set_request_rejects_non_string_value() {
        let json = r#"{"key": "test", "value": 42}"#;
        assert!(serde_json::from_str::<SetRequest>(json).is_err());
    }

    #[test]
    fn test_set_all_request() {
        let json = r#"{"entries": {"a": "1", "b": "2"}, "ttl": 30}"#;
        let req: SetAllRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.entries.len(), 2);
        assert_eq!(req.ttl, Some(30));
    }

    #[test]
    fn test_keys_request_requires_array() {
        assert!(serde_json::from_str::<KeysRequest>(r#"{"keys": ["a", "b"]}"#).is_ok());
        assert!(serde_json::from_str::<KeysRequest>(r#"{"keys": "a"}"#).is_err());
    }
}
