//! Database connection pool management
//!
//! Uses sqlx PgPool sized from [`PostgresConfig`]. The pool is probed once
//! at startup so a bad configuration fails fast instead of on first request.

use std::fmt;
use std::time::Duration;

use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgSslMode};
use sqlx::PgPool;

use crate::error::{Error, Result};

/// Upper bound for the startup connectivity probe.
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// PostgreSQL connection and pool settings.
#[derive(Clone, PartialEq, Eq)]
pub struct PostgresConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
    /// libpq-style mode: disable, allow, prefer, require, verify-ca, verify-full
    pub ssl_mode: String,
    pub max_open_connections: u32,
    /// Connections kept open while idle (sqlx `min_connections`)
    pub max_idle_connections: u32,
    /// Zero disables the limit
    pub conn_max_lifetime: Duration,
    /// Zero disables the limit
    pub conn_max_idle_time: Duration,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            user: "postgres".to_string(),
            password: "postgres".to_string(),
            database: "users_db".to_string(),
            ssl_mode: "disable".to_string(),
            max_open_connections: 25,
            max_idle_connections: 5,
            conn_max_lifetime: Duration::from_secs(5 * 60),
            conn_max_idle_time: Duration::from_secs(5 * 60),
        }
    }
}

impl fmt::Debug for PostgresConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PostgresConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("database", &self.database)
            .field("ssl_mode", &self.ssl_mode)
            .field("max_open_connections", &self.max_open_connections)
            .field("max_idle_connections", &self.max_idle_connections)
            .field("conn_max_lifetime", &self.conn_max_lifetime)
            .field("conn_max_idle_time", &self.conn_max_idle_time)
            .finish()
    }
}

impl PostgresConfig {
    /// Connection options for a single session.
    pub fn connect_options(&self) -> Result<PgConnectOptions> {
        let ssl_mode: PgSslMode = self.ssl_mode.parse().map_err(Error::Config)?;

        Ok(PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.database)
            .ssl_mode(ssl_mode))
    }

    /// Pool sizing and connection lifetimes.
    pub fn pool_options(&self) -> PgPoolOptions {
        let max_open = self.max_open_connections.max(1);

        PgPoolOptions::new()
            .max_connections(max_open)
            .min_connections(self.max_idle_connections.min(max_open))
            .max_lifetime(non_zero(self.conn_max_lifetime))
            .idle_timeout(non_zero(self.conn_max_idle_time))
    }
}

fn non_zero(d: Duration) -> Option<Duration> {
    (!d.is_zero()).then_some(d)
}

/// Create a PostgreSQL connection pool and verify the database answers.
///
/// # Errors
///
/// Returns an error if the configuration is invalid, the database can't be
/// reached, or the probe takes longer than [`PROBE_TIMEOUT`]. The pool is
/// closed before any error is returned.
///
/// # Example
///
/// ```ignore
/// let pool = create_pool(&PostgresConfig::default()).await?;
/// ```
pub async fn create_pool(config: &PostgresConfig) -> Result<PgPool> {
    let pool = config
        .pool_options()
        .connect_lazy_with(config.connect_options()?);

    if let Err(err) = probe(&pool, PROBE_TIMEOUT).await {
        pool.close().await;
        return Err(err);
    }

    tracing::debug!(
        host = %config.host,
        port = config.port,
        database = %config.database,
        max_open = config.max_open_connections,
        "database pool ready"
    );
    Ok(pool)
}

/// Round-trip a trivial query within `limit`.
async fn probe(pool: &PgPool, limit: Duration) -> Result<()> {
    match tokio::time::timeout(limit, sqlx::query("SELECT 1").execute(pool)).await {
        Ok(Ok(_)) => Ok(()),
        Ok(Err(err)) => Err(Error::Connect(err)),
        Err(_) => Err(Error::ConnectTimeout(limit)),
    }
}
