//! userbase CLI - user records service over PostgreSQL
//!
//! Entry point for the `userbase` binary:
//! - `serve`: run the HTTP API
//! - `migrate up|down`: manage the database schema

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod config;
mod tracing_setup;

use tracing_setup::{LogFormat, TracingConfig};

#[derive(Parser, Debug)]
#[command(
    name = "userbase",
    author,
    version,
    about = "CRUD HTTP service for user records backed by PostgreSQL"
)]
struct Cli {
    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(long, global = true)]
    debug: bool,

    /// Deployment environment; `production` switches logs to JSON
    #[arg(long = "env", env = "ENV", global = true, default_value = "development")]
    environment: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API server
    Serve(commands::serve::ServeArgs),
    /// Apply or revert database migrations
    Migrate(commands::migrate::MigrateArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let env_files = config::load_dotenv();
    let cli = Cli::parse();

    tracing_setup::init(&TracingConfig {
        debug: cli.debug,
        format: LogFormat::for_env(&cli.environment),
    })
    .ok();

    if env_files.is_empty() {
        tracing::debug!("no .env file found, using environment variables only");
    } else {
        tracing::debug!(files = ?env_files, "loaded .env files");
    }

    match cli.command {
        Commands::Serve(args) => commands::run_serve(args).await?,
        Commands::Migrate(args) => commands::run_migrate(args).await?,
    }
    Ok(())
}
