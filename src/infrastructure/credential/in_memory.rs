//! In-memory credential repository

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::credential::{Credential, CredentialRepository};
use crate::domain::DomainError;

/// In-memory implementation of CredentialRepository.
///
/// Registry contents do not survive a restart; intended for development
/// and tests.
#[derive(Debug, Default)]
pub struct InMemoryCredentialRepository {
    records: Arc<RwLock<HashMap<String, Credential>>>,
}

impl InMemoryCredentialRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a repository seeded with existing credentials
    pub fn with_credentials(credentials: Vec<Credential>) -> Self {
        let records = credentials
            .into_iter()
            .map(|credential| (credential.key().to_string(), credential))
            .collect();

        Self {
            records: Arc::new(RwLock::new(records)),
        }
    }
}

#[async_trait]
impl CredentialRepository for InMemoryCredentialRepository {
    async fn get(&self, key: &str) -> Result<Option<Credential>, DomainError> {
        let records = self.records.read().await;
        Ok(records.get(key).cloned())
    }

    async fn upsert(&self, credential: Credential) -> Result<Credential, DomainError> {
        let mut records = self.records.write().await;
        records.insert(credential.key().to_string(), credential.clone());
        Ok(credential)
    }
}
