//! SQLite usage ledger repository implementation

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{Row, SqlitePool};

use crate::domain::usage::{UsageCounter, UsageRepository};
use crate::domain::DomainError;

/// SQLite implementation of UsageRepository
#[derive(Debug, Clone)]
pub struct SqliteUsageRepository {
    pool: SqlitePool,
}

impl SqliteUsageRepository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UsageRepository for SqliteUsageRepository {
    async fn get(&self, key: &str, date: NaiveDate) -> Result<Option<UsageCounter>, DomainError> {
        let row = sqlx::query("SELECT count FROM usage WHERE key = $1 AND date = $2")
            .bind(key)
            .bind(date)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to get usage counter: {}", e)))?;

        match row {
            Some(row) => {
                let count: i64 = row.try_get("count").map_err(|e| {
                    DomainError::storage(format!("Failed to read usage row: {}", e))
                })?;
                Ok(Some(UsageCounter::new(key, date, count)))
            }
            None => Ok(None),
        }
    }

    async fn increment(&self, key: &str, date: NaiveDate) -> Result<UsageCounter, DomainError> {
        // Single-statement upsert keeps concurrent increments for the same
        // (key, date) from losing updates.
        let count: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO usage (key, date, count)
            VALUES ($1, $2, 1)
            ON CONFLICT (key, date) DO UPDATE SET count = count + 1
            RETURNING count
            "#,
        )
        .bind(key)
        .bind(date)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to increment usage counter: {}", e)))?;

        Ok(UsageCounter::new(key, date, count))
    }
}
