//! Admission pipeline: credential presence, validity, then quota

use std::sync::Arc;

use tracing::debug;

use crate::domain::credential::Tier;
use crate::domain::DomainError;
use crate::infrastructure::credential::CredentialService;
use crate::infrastructure::usage::UsageService;

/// Outcome of a successful admission
#[derive(Debug, Clone)]
pub struct Admission {
    pub key: String,
    pub tier: Tier,
}

/// Admission pipeline over the key registry and the usage ledger
#[derive(Debug, Clone)]
pub struct AdmissionService {
    credentials: Arc<CredentialService>,
    usage: Arc<UsageService>,
    free_daily_limit: i64,
}

impl AdmissionService {
    pub fn new(
        credentials: Arc<CredentialService>,
        usage: Arc<UsageService>,
        free_daily_limit: i64,
    ) -> Self {
        Self {
            credentials,
            usage,
            free_daily_limit,
        }
    }

    /// Run the admission checks for one request.
    ///
    /// Checks short-circuit in order: credential presence, registry
    /// validity, then quota. The quota check reads the current ledger value,
    /// and the call that would exceed the limit is itself rejected without
    /// being counted. Only metered tiers ever touch the ledger.
    pub async fn admit(&self, key: Option<&str>) -> Result<Admission, DomainError> {
        let key = match key {
            Some(key) if !key.is_empty() => key,
            _ => return Err(DomainError::credential("X-API-Key header missing")),
        };

        let tier = self
            .credentials
            .validate(key)
            .await?
            .ok_or_else(|| DomainError::credential("Invalid or expired API key"))?;

        if tier.is_metered() {
            let calls = self.usage.calls_today(key).await?;

            if calls >= self.free_daily_limit {
                return Err(DomainError::quota_exceeded("Daily usage limit exceeded"));
            }

            let count = self.usage.record_call(key).await?;
            debug!(
                key_prefix = %key_prefix(key),
                calls_today = count,
                limit = self.free_daily_limit,
                "Recorded metered call"
            );
        }

        Ok(Admission {
            key: key.to_string(),
            tier,
        })
    }
}

// The full key is a secret; logs only ever see a prefix.
fn key_prefix(key: &str) -> String {
    key.chars().take(8).collect()
}
