//! Database layer - storage contract, Postgres engine, pool and migrations
//!
//! # Design Principles
//!
//! - Connection pool sized from config - no shared connection behind a lock
//! - Rely on DB constraints, map the violation - no check-then-insert
//! - One error translation path for every operation
//! - Transactions only where a read spans statements (listing)

pub mod error;
#[cfg(any(test, feature = "test-support"))]
pub mod memory;
pub mod migrations;
pub mod pool;
pub mod repos;
pub mod store;

pub use error::{map_sqlx_error, StoreError};
#[cfg(any(test, feature = "test-support"))]
pub use memory::MemoryUserStore;
pub use pool::{create_pool, PostgresConfig};
pub use repos::PgUserStore;
pub use store::UserStore;
