//! Schema migrations for the users table
//!
//! SQL lives in `userbase-server/migrations/` as reversible
//! `<version>_<name>.up.sql` / `.down.sql` pairs and is embedded at build time.

use sqlx::migrate::Migrator;
use sqlx::PgPool;

use crate::Result;

/// Embedded migration set
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Apply every pending migration.
pub async fn run_up(pool: &PgPool) -> Result<()> {
    tracing::info!(available = MIGRATOR.iter().count(), "applying migrations");
    MIGRATOR.run(pool).await?;
    tracing::info!("migrations up to date");
    Ok(())
}

/// Revert applied migrations newer than `target`. A target of 0 reverts all.
pub async fn run_down(pool: &PgPool, target: i64) -> Result<()> {
    tracing::info!(target, "reverting migrations");
    MIGRATOR.undo(pool, target).await?;
    tracing::info!(target, "migrations reverted");
    Ok(())
}
