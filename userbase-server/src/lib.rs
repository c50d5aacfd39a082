//! userbase-server: user records over HTTP, stored in PostgreSQL
//!
//! Layers, leaf first:
//! - [`models`]: user entity, input validation, wire projections
//! - [`db`]: storage contract, Postgres engine, pool, migrations
//! - [`http`]: Axum routes mapping store errors to status codes

pub mod db;
pub mod error;
pub mod http;
pub mod models;

pub use db::{PgUserStore, PostgresConfig, StoreError, UserStore};
pub use error::{Error, Result};
pub use http::{build_router, run_server, ServerConfig};
