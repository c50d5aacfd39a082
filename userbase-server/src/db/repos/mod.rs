//! Repository implementations for database access
//!
//! Each repository follows these patterns:
//! - Input guards before any round trip
//! - Handles conflicts via constraint violations (no check-then-insert)
//! - Uses transactions for multi-statement reads

pub mod users;

pub use users::{update_statement, PgUserStore, UpdateStatement};
