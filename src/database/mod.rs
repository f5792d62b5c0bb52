pub mod schema;

use std::path::Path;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tracing::{info, instrument};

use crate::error::StoreError;

/// Opens (creating if absent) a database file and applies the declarative
/// schema. Schema creation is idempotent, so reopening an existing file is
/// safe.
#[instrument(skip(schema))]
pub(crate) async fn open_file(path: &Path, schema: &str) -> Result<SqlitePool, StoreError> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|e| {
            StoreError::Internal(format!(
                "Failed to create data directory {}: {}",
                dir.display(),
                e
            ))
        })?;
    }

    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    apply_schema(&pool, schema).await?;
    info!(path = %path.display(), "Opened database");
    Ok(pool)
}

/// A pooled in-memory SQLite database is one database per connection; the
/// pool is capped at a single connection so every operation sees the same
/// data.
pub(crate) async fn open_in_memory(schema: &str) -> Result<SqlitePool, StoreError> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await?;

    apply_schema(&pool, schema).await?;
    Ok(pool)
}

async fn apply_schema(pool: &SqlitePool, schema: &str) -> Result<(), StoreError> {
    sqlx::raw_sql(schema).execute(pool).await?;
    Ok(())
}
