//! Tracing setup for the userbase binary
//!
//! Usage:
//!   userbase --debug ...                # Debug logging to console
//!   RUST_LOG=userbase_server=debug ...  # Fine-grained log control
//!   ENV=production userbase serve       # JSON lines instead of compact text
//!
//! Environment variables:
//!   RUST_LOG                            # Log filter (default: info)
//!   ENV                                 # `production` selects JSON output

use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

/// Output format for log events
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

impl LogFormat {
    /// JSON in production, compact everywhere else.
    pub fn for_env(env: &str) -> Self {
        if env.eq_ignore_ascii_case("production") {
            Self::Json
        } else {
            Self::Compact
        }
    }
}

/// Tracing configuration options
#[derive(Debug, Clone, Default)]
pub struct TracingConfig {
    /// Enable debug logging (used unless RUST_LOG is set)
    pub debug: bool,
    pub format: LogFormat,
}

/// Install the global subscriber.
pub fn init(config: &TracingConfig) -> Result<()> {
    let default_level = if config.debug { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(config.debug);

    match config.format {
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Json => builder.json().try_init(),
    }
    .map_err(|err| anyhow!(err))
}
