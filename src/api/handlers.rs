//! API Handlers
//!
//! HTTP request handlers for each cache server endpoint.

use std::sync::Arc;
use tokio::sync::RwLock;

use axum::{
    extract::{Path, State},
    Json,
};

use crate::cache::MemoryStore;
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::facade::ChunkedCache;
use crate::models::{
    DeleteResponse, GetAllResponse, GetResponse, HealthResponse, KeysRequest, SetAllRequest,
    SetRequest, SetResponse, StatsResponse,
};

/// The cache type served over HTTP.
pub type SharedCache = Arc<RwLock<ChunkedCache<MemoryStore>>>;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Thread-safe chunked cache
    pub cache: SharedCache,
}

impl AppState {
    /// Creates a new AppState around the given cache.
    pub fn new(cache: ChunkedCache<MemoryStore>) -> Self {
        Self {
            cache: Arc::new(RwLock::new(cache)),
        }
    }

    /// Creates a new AppState from configuration.
    pub fn from_config(config: &Config) -> Self {
        let store = MemoryStore::new(config.max_entries, config.max_entry_bytes);
        Self::new(ChunkedCache::with_config(store, config.chunk_config()))
    }
}

/// Handler for PUT /set
pub async fn set_handler(
    State(state): State<AppState>,
    Json(req): Json<SetRequest>,
) -> Result<Json<SetResponse>> {
    let mut cache = state.cache.write().await;
    cache.put(&req.key, &req.value, req.ttl)?;

    Ok(Json(SetResponse::new(1)))
}

/// Handler for PUT /set_all
pub async fn set_all_handler(
    State(state): State<AppState>,
    Json(req): Json<SetAllRequest>,
) -> Result<Json<SetResponse>> {
    let mut cache = state.cache.write().await;
    cache.put_all(&req.entries, req.ttl)?;

    Ok(Json(SetResponse::new(req.entries.len())))
}

/// Handler for GET /get/:key
///
/// A missing, expired or corrupt value is a 404.
pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<GetResponse>> {
    // Write lock: reads may purge and update stats
    let mut cache = state.cache.write().await;
    let value = cache
        .get(&key)?
        .ok_or_else(|| CacheError::NotFound(key.clone()))?;

    Ok(Json(GetResponse::new(key, value)))
}

/// Handler for POST /get_all
pub async fn get_all_handler(
    State(state): State<AppState>,
    Json(req): Json<KeysRequest>,
) -> Result<Json<GetAllResponse>> {
    let mut cache = state.cache.write().await;
    let entries = cache.get_all(&req.keys)?;

    Ok(Json(GetAllResponse { entries }))
}

/// Handler for DELETE /del/:key
///
/// Deleting an absent key succeeds.
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<DeleteResponse>> {
    let mut cache = state.cache.write().await;
    cache.remove(&key)?;

    Ok(Json(DeleteResponse::new(1)))
}

/// Handler for POST /del_all
pub async fn delete_all_handler(
    State(state): State<AppState>,
    Json(req): Json<KeysRequest>,
) -> Result<Json<DeleteResponse>> {
    let mut cache = state.cache.write().await;
    cache.remove_all(&req.keys)?;

    Ok(Json(DeleteResponse::new(req.keys.len())))
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let cache = state.cache.read().await;
    let stats = cache.stats();

    Json(StatsResponse::new(&stats, cache.store().evictions()))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
