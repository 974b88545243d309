//! Credential records and tier classification

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Tier of a credential, controlling whether the daily quota applies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    /// Quota-enforced tier
    #[default]
    Free,
    /// Exempt from quota accounting
    Unlimited,
}

impl Tier {
    /// Whether calls for this tier count against the daily quota
    pub fn is_metered(&self) -> bool {
        matches!(self, Self::Free)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Free => "free",
            Self::Unlimited => "unlimited",
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Credential record for a caller
///
/// Expiry is computed at read time; no "expired" state is ever persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Credential {
    /// Opaque caller-supplied secret, primary key of the registry
    key: String,
    /// Expiration timestamp (None = never expires)
    #[serde(skip_serializing_if = "Option::is_none")]
    expires_at: Option<DateTime<Utc>>,
    /// Tier controlling quota enforcement
    tier: Tier,
}

impl Credential {
    /// Create a new credential without expiration
    pub fn new(key: impl Into<String>, tier: Tier) -> Self {
        Self {
            key: key.into(),
            expires_at: None,
            tier,
        }
    }

    /// Set expiration
    pub fn with_expiration(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    pub fn tier(&self) -> Tier {
        self.tier
    }

    /// A credential is expired only when `expires_at` is strictly before
    /// `now`; a missing `expires_at` never expires.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at {
            Some(expires_at) => expires_at < now,
            None => false,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }
}
