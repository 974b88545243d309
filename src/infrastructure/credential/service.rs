//! Credential service - the sole admission authority over the key registry

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::domain::credential::{Credential, CredentialRepository, Tier};
use crate::domain::DomainError;

/// Service exposing registry validation and provisioning
#[derive(Debug, Clone)]
pub struct CredentialService {
    repository: Arc<dyn CredentialRepository>,
}

impl CredentialService {
    pub fn new(repository: Arc<dyn CredentialRepository>) -> Self {
        Self { repository }
    }

    /// Validate a caller-supplied key.
    ///
    /// Returns the stored tier for a known, unexpired key. A missing record
    /// and an expired one are indistinguishable to the caller.
    pub async fn validate(&self, key: &str) -> Result<Option<Tier>, DomainError> {
        let Some(credential) = self.repository.get(key).await? else {
            return Ok(None);
        };

        if credential.is_expired() {
            debug!(tier = %credential.tier(), "Rejecting expired credential");
            return Ok(None);
        }

        Ok(Some(credential.tier()))
    }

    /// Insert or fully replace a credential record. Idempotent.
    pub async fn upsert(
        &self,
        key: &str,
        expires_at: Option<DateTime<Utc>>,
        tier: Tier,
    ) -> Result<Credential, DomainError> {
        if key.trim().is_empty() {
            return Err(DomainError::validation("Credential key must not be empty"));
        }

        let mut credential = Credential::new(key, tier);

        if let Some(expires_at) = expires_at {
            credential = credential.with_expiration(expires_at);
        }

        self.repository.upsert(credential).await
    }
}
