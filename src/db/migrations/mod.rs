//! Schema upgrades. `SCHEMA[n]` takes the database from version `n` to `n + 1`, so the version a
//! fully upgraded database reports is `SCHEMA.len()`.

use crate::error::Res;
use anyhow::{bail, Context};
use sqlx::{Executor, SqlitePool};
use tracing::debug;

const SCHEMA: &[&str] = &[include_str!("001_collections.sql")];

/// The schema version this build writes and reads.
pub(super) fn latest() -> i32 {
    SCHEMA.len() as i32
}

/// Brings the database up to `latest()`, creating the version bookkeeping on a fresh file.
/// Returns the version the database was at before.
///
/// Fails without touching anything when the database was written by a newer build.
pub(super) async fn upgrade(pool: &SqlitePool) -> Res<i32> {
    sqlx::query("CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL)")
        .execute(pool)
        .await
        .context("Failed to create schema_version table")?;
    let from = version(pool).await?;
    if from > latest() {
        bail!(
            "The database schema is at version {from} which is newer than this program \
            supports ({})",
            latest()
        );
    }

    for (step, sql) in SCHEMA.iter().enumerate().skip(from as usize) {
        let to = step as i32 + 1;
        debug!("Upgrading database schema to version {to}");
        let mut tx = pool
            .begin()
            .await
            .context("Failed to begin schema upgrade")?;
        tx.execute(*sql)
            .await
            .with_context(|| format!("Failed to apply schema version {to}"))?;
        sqlx::query("DELETE FROM schema_version")
            .execute(&mut *tx)
            .await
            .context("Failed to clear schema_version")?;
        sqlx::query("INSERT INTO schema_version (version) VALUES (?)")
            .bind(to)
            .execute(&mut *tx)
            .await
            .context("Failed to record schema version")?;
        tx.commit()
            .await
            .with_context(|| format!("Failed to commit schema version {to}"))?;
    }
    Ok(from)
}

/// The recorded schema version, zero when nothing has been recorded yet.
async fn version(pool: &SqlitePool) -> Res<i32> {
    let row: (Option<i32>,) = sqlx::query_as("SELECT MAX(version) FROM schema_version")
        .fetch_one(pool)
        .await
        .context("Failed to query schema version")?;
    Ok(row.0.unwrap_or_default())
}
