//! SQLite credential repository implementation

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};

use crate::domain::credential::{Credential, CredentialRepository, Tier};
use crate::domain::DomainError;

/// SQLite implementation of CredentialRepository
#[derive(Debug, Clone)]
pub struct SqliteCredentialRepository {
    pool: SqlitePool,
}

impl SqliteCredentialRepository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CredentialRepository for SqliteCredentialRepository {
    async fn get(&self, key: &str) -> Result<Option<Credential>, DomainError> {
        let row = sqlx::query("SELECT key, expires_at, tier FROM api_keys WHERE key = $1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to get credential: {}", e)))?;

        match row {
            Some(row) => Ok(Some(row_to_credential(&row)?)),
            None => Ok(None),
        }
    }

    async fn upsert(&self, credential: Credential) -> Result<Credential, DomainError> {
        sqlx::query(
            r#"
            INSERT INTO api_keys (key, expires_at, tier)
            VALUES ($1, $2, $3)
            ON CONFLICT (key) DO UPDATE SET
                expires_at = excluded.expires_at,
                tier = excluded.tier
            "#,
        )
        .bind(credential.key())
        .bind(credential.expires_at())
        .bind(credential.tier().as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to upsert credential: {}", e)))?;

        Ok(credential)
    }
}

fn row_to_credential(row: &sqlx::sqlite::SqliteRow) -> Result<Credential, DomainError> {
    let key: String = row
        .try_get("key")
        .map_err(|e| DomainError::storage(format!("Failed to read credential row: {}", e)))?;
    let expires_at: Option<DateTime<Utc>> = row
        .try_get("expires_at")
        .map_err(|e| DomainError::storage(format!("Failed to read credential row: {}", e)))?;
    let tier: String = row
        .try_get("tier")
        .map_err(|e| DomainError::storage(format!("Failed to read credential row: {}", e)))?;

    let mut credential = Credential::new(key, tier_from_str(&tier)?);

    if let Some(expires_at) = expires_at {
        credential = credential.with_expiration(expires_at);
    }

    Ok(credential)
}

// The tier column is a closed set; an unknown stored value must never
// silently fall through to unmetered behavior.
fn tier_from_str(value: &str) -> Result<Tier, DomainError> {
    match value {
        "free" => Ok(Tier::Free),
        "unlimited" => Ok(Tier::Unlimited),
        other => Err(DomainError::storage(format!(
            "Unknown tier '{}' in registry",
            other
        ))),
    }
}
