//! SQLite pool construction and schema initialization

use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use tracing::info;

use crate::domain::DomainError;

/// Connect to the SQLite database and ensure the schema exists.
///
/// The pool is process-wide and shared across all requests; a broken
/// connection is recycled by the pool rather than poisoning later requests.
/// WAL mode plus a busy timeout keeps concurrent row upserts from failing
/// with lock errors.
pub async fn connect(url: &str) -> Result<SqlitePool, DomainError> {
    let options = SqliteConnectOptions::from_str(url)
        .map_err(|e| {
            DomainError::configuration(format!("Invalid database URL '{}': {}", url, e))
        })?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(5));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to connect to SQLite: {}", e)))?;

    init_schema(&pool).await?;
    info!("SQLite storage ready at {}", url);

    Ok(pool)
}

async fn init_schema(pool: &SqlitePool) -> Result<(), DomainError> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS api_keys (
            key        TEXT PRIMARY KEY,
            expires_at TEXT,
            tier       TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await
    .map_err(|e| DomainError::storage(format!("Failed to create api_keys table: {}", e)))?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS usage (
            key   TEXT NOT NULL,
            date  TEXT NOT NULL,
            count INTEGER NOT NULL,
            PRIMARY KEY (key, date)
        )
        "#,
    )
    .execute(pool)
    .await
    .map_err(|e| DomainError::storage(format!("Failed to create usage table: {}", e)))?;

    Ok(())
}
