//! Error types for userbase-server setup (pool, migrations, listener)

use std::time::Duration;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid database configuration: {0}")]
    Config(#[source] sqlx::Error),

    #[error("failed to reach database: {0}")]
    Connect(#[source] sqlx::Error),

    #[error("database did not answer within {0:?}")]
    ConnectTimeout(Duration),

    #[error("migration failed: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
