//! Environment-driven configuration
//!
//! Values come from flags, then environment variables, then the defaults
//! below. `.env` files are read before parsing so they feed the `env`
//! fallbacks.

use std::time::Duration;

use clap::Args;
use userbase_server::PostgresConfig;

/// Load `.env` files into the process environment.
///
/// Priority order (highest to lowest):
/// 1. Variables already set
/// 2. ./.env
/// 3. ~/.userbase/.env
///
/// dotenvy never overwrites existing variables, so the first file wins.
/// Runs before tracing is installed, so nothing is logged here.
pub fn load_dotenv() -> Vec<String> {
    let mut loaded_from = Vec::new();

    if let Ok(path) = dotenvy::dotenv() {
        loaded_from.push(path.display().to_string());
    }

    if let Some(home) = dirs::home_dir() {
        let env_file = home.join(".userbase").join(".env");
        if env_file.exists() && dotenvy::from_path(&env_file).is_ok() {
            loaded_from.push(env_file.display().to_string());
        }
    }

    loaded_from
}

/// PostgreSQL connection and pool settings
#[derive(Args, Debug, Clone)]
pub struct DatabaseArgs {
    /// Database host
    #[arg(long = "db-host", env = "POSTGRES_HOST", default_value = "localhost")]
    pub host: String,

    /// Database port
    #[arg(id = "db_port", long = "db-port", env = "POSTGRES_PORT", default_value_t = 5432)]
    pub port: u16,

    /// Database user
    #[arg(long = "db-user", env = "POSTGRES_USER", default_value = "postgres")]
    pub user: String,

    /// Database password
    #[arg(
        long = "db-password",
        env = "POSTGRES_PASSWORD",
        default_value = "postgres",
        hide_env_values = true
    )]
    pub password: String,

    /// Database name
    #[arg(long = "db-name", env = "POSTGRES_DB", default_value = "users_db")]
    pub database: String,

    /// TLS mode (disable, prefer, require, verify-ca, verify-full)
    #[arg(long = "db-sslmode", env = "POSTGRES_SSLMODE", default_value = "disable")]
    pub ssl_mode: String,

    /// Maximum open connections in the pool
    #[arg(long, env = "MAX_OPEN_CONNS", default_value_t = 25)]
    pub max_open_conns: u32,

    /// Connections kept open while idle
    #[arg(long, env = "MAX_IDLE_CONNS", default_value_t = 5)]
    pub max_idle_conns: u32,

    /// Maximum lifetime of a connection (e.g. 5m, 1h; 0s disables)
    #[arg(long, env = "CONN_MAX_LIFETIME", default_value = "5m", value_parser = humantime::parse_duration)]
    pub conn_max_lifetime: Duration,

    /// Maximum idle time of a connection (e.g. 5m; 0s disables)
    #[arg(long, env = "CONN_MAX_IDLETIME", default_value = "5m", value_parser = humantime::parse_duration)]
    pub conn_max_idle_time: Duration,
}

impl DatabaseArgs {
    pub fn to_config(&self) -> PostgresConfig {
        PostgresConfig {
            host: self.host.clone(),
            port: self.port,
            user: self.user.clone(),
            password: self.password.clone(),
            database: self.database.clone(),
            ssl_mode: self.ssl_mode.clone(),
            max_open_connections: self.max_open_conns,
            max_idle_connections: self.max_idle_conns,
            conn_max_lifetime: self.conn_max_lifetime,
            conn_max_idle_time: self.conn_max_idle_time,
        }
    }
}
