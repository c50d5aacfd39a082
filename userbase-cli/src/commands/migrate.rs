//! Schema migration command

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use userbase_server::db::{create_pool, migrations};

use crate::config::DatabaseArgs;

/// Arguments for the migrate command
#[derive(Parser, Debug)]
pub struct MigrateArgs {
    #[command(subcommand)]
    pub direction: Direction,

    #[command(flatten)]
    pub db: DatabaseArgs,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Apply all pending migrations
    Up,
    /// Revert applied migrations newer than the target version
    Down {
        /// Version to roll back to (0 reverts everything)
        #[arg(long, default_value_t = 0)]
        target: i64,
    },
}

/// Run migrations in the requested direction
pub async fn run_migrate(args: MigrateArgs) -> Result<()> {
    let pool = create_pool(&args.db.to_config())
        .await
        .context("Failed to connect to database")?;

    let result = match args.direction {
        Direction::Up => migrations::run_up(&pool).await,
        Direction::Down { target } => migrations::run_down(&pool, target).await,
    };
    pool.close().await;

    result.context("Migration failed")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn down_defaults_to_zero() {
        let args = MigrateArgs::parse_from(["migrate", "down"]);
        assert_eq!(args.direction, Direction::Down { target: 0 });

        let args = MigrateArgs::parse_from(["migrate", "down", "--target", "20240101000000"]);
        assert_eq!(
            args.direction,
            Direction::Down {
                target: 20240101000000
            }
        );
    }
}
