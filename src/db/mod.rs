//! Database module for SQLite persistence.
//!
//! SQLite plays the document store: one table per collection, media and id
//! lists kept as JSON columns.

mod repository;

pub use repository::*;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::str::FromStr;

/// Initialize the database connection pool and run migrations.
pub async fn init_database(db_path: &Path) -> Result<SqlitePool, sqlx::Error> {
    // Ensure the parent directory exists
    if let Some(parent) = db_path.parent() {
        tokio::fs::create_dir_all(parent).await.ok();
    }

    let db_url = format!("sqlite:{}?mode=rwc", db_path.display());

    let options = SqliteConnectOptions::from_str(&db_url)?
        .create_if_missing(true)
        .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
        .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
        .busy_timeout(std::time::Duration::from_secs(30));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    run_migrations(&pool).await?;

    Ok(pool)
}

/// Run database migrations.
async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS properties (
            id TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            address TEXT NOT NULL,
            price INTEGER NOT NULL,
            category TEXT NOT NULL,
            availability TEXT NOT NULL DEFAULT 'available',
            landlord_contact TEXT,
            notes TEXT,
            media TEXT NOT NULL DEFAULT '{}',
            created_at TEXT NOT NULL,
            updated_at TEXT
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS shortlists (
            id TEXT PRIMARY KEY,
            owner_ref TEXT NOT NULL,
            label TEXT NOT NULL,
            property_ids TEXT NOT NULL,
            share_token TEXT NOT NULL UNIQUE,
            is_active INTEGER NOT NULL DEFAULT 1,
            created_at TEXT NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_properties_created_at ON properties(created_at);
        CREATE INDEX IF NOT EXISTS idx_shortlists_token_active ON shortlists(share_token, is_active);
        "#,
    )
    .execute(pool)
    .await?;

    // Older clients wrote "Available"/"Taken"; lowercase is canonical.
    let migrated = sqlx::query(
        "UPDATE properties SET availability = lower(availability) WHERE availability <> lower(availability)",
    )
    .execute(pool)
    .await?
    .rows_affected();

    if migrated > 0 {
        tracing::info!("Normalized availability casing on {} properties", migrated);
    }

    Ok(())
}
