//! API Routes
//!
//! Configures the Axum router with all cache server endpoints.

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    delete_all_handler, delete_handler, get_all_handler, get_handler, health_handler,
    set_all_handler, set_handler, stats_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `PUT /set` - Store a key-value pair of any size
/// - `PUT /set_all` - Store several pairs with one ttl
/// - `GET /get/:key` - Retrieve a value by key
/// - `POST /get_all` - Retrieve several keys; only found keys are returned
/// - `DELETE /del/:key` - Delete a key and all its chunks
/// - `POST /del_all` - Delete several keys
/// - `GET /stats` - Get cache statistics
/// - `GET /health` - Health check endpoint
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/set", put(set_handler))
        .route("/set_all", put(set_all_handler))
        .route("/get/:key", get(get_handler))
        .route("/get_all", post(get_all_handler))
        .route("/del/:key", delete(delete_handler))
        .route("/del_all", post(delete_all_handler))
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
