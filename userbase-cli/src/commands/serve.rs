//! HTTP server command
//!
//! Connects to PostgreSQL, then serves the user API until shutdown.

use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;

use userbase_server::http::{run_server, ServerConfig};
use userbase_server::PgUserStore;

use crate::config::DatabaseArgs;

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Port to listen on (all interfaces)
    #[arg(long, short = 'p', env = "SERVER_PORT", default_value_t = 8080)]
    pub port: u16,

    /// Full bind address; overrides --port
    #[arg(long, short = 'b')]
    pub bind: Option<SocketAddr>,

    /// Upper bound for a single request (e.g. 15s)
    #[arg(long, default_value = "15s", value_parser = humantime::parse_duration)]
    pub request_timeout: Duration,

    /// How long in-flight requests may drain after a shutdown signal
    #[arg(long, default_value = "30s", value_parser = humantime::parse_duration)]
    pub shutdown_timeout: Duration,

    #[command(flatten)]
    pub db: DatabaseArgs,
}

impl ServeArgs {
    fn bind_addr(&self) -> SocketAddr {
        self.bind
            .unwrap_or_else(|| SocketAddr::from((Ipv4Addr::UNSPECIFIED, self.port)))
    }
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    let db = args.db.to_config();
    tracing::info!(
        host = %db.host,
        port = db.port,
        database = %db.database,
        max_open = db.max_open_connections,
        "connecting to database"
    );

    let store = PgUserStore::connect(&db)
        .await
        .context("Failed to connect to database")?;

    let config = ServerConfig {
        bind_addr: args.bind_addr(),
        request_timeout: args.request_timeout,
        shutdown_timeout: args.shutdown_timeout,
    };

    // Blocks until shutdown; closes the store on the way out
    run_server(Arc::new(store), config)
        .await
        .context("Server error")?;

    Ok(())
}
