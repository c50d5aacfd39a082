//! HTTP server layer
//!
//! Axum adapter over [`UserStore`](crate::db::UserStore) with:
//! - JSON error responses mapped from store errors
//! - Request logging
//! - Graceful shutdown

pub mod error;
pub mod extractors;
pub mod logging;
pub mod routes;
pub mod server;

pub use error::ApiError;
pub use server::{build_router, run_server, AppState, ServerConfig};
