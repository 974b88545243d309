//! Key registry repository trait

use async_trait::async_trait;
use std::fmt::Debug;

use super::entity::Credential;
use crate::domain::DomainError;

/// Repository trait for credential storage
#[async_trait]
pub trait CredentialRepository: Send + Sync + Debug {
    /// Get the credential record for a key, if one exists
    async fn get(&self, key: &str) -> Result<Option<Credential>, DomainError>;

    /// Insert or fully replace the record for a key.
    ///
    /// Replaying the same upsert yields the same stored state.
    async fn upsert(&self, credential: Credential) -> Result<Credential, DomainError>;
}
