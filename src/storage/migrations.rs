//! Schema migrations, applied on startup.

use sqlx::{Pool, Sqlite};

use crate::error_handling::DatabaseError;

/// Creates the schema if it does not exist.
///
/// One row per domain; `listing` holds the matched listing as JSON and is
/// NULL when no acceptable listing was found. `checked_at` is epoch
/// milliseconds and drives the freshness window.
pub async fn run_migrations(pool: &Pool<Sqlite>) -> Result<(), DatabaseError> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS domain_checks (
            domain TEXT PRIMARY KEY,
            listing TEXT,
            checked_at INTEGER NOT NULL,
            domain_age_years REAL,
            domain_rating REAL,
            semrush_rank INTEGER,
            facebook_shares INTEGER,
            ahrefs_rank INTEGER
        )",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_domain_checks_checked_at
         ON domain_checks (checked_at)",
    )
    .execute(pool)
    .await?;

    Ok(())
}
