//! API Module
//!
//! HTTP handlers and routing exposing the chunked cache as a REST service.
//!
//! # Endpoints
//! - `PUT /set`, `PUT /set_all` - Store values of any size
//! - `GET /get/:key`, `POST /get_all` - Retrieve values
//! - `DELETE /del/:key`, `POST /del_all` - Delete values and their chunks
//! - `GET /stats` - Get cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
