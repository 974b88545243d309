//! Credential provisioning endpoints

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::domain::credential::{Credential, Tier};

/// Request to insert or replace a credential record
#[derive(Debug, Deserialize)]
pub struct UpsertKeyRequest {
    pub key: String,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub tier: Tier,
}

/// Stored credential record as returned to the provisioning caller
#[derive(Debug, Serialize)]
pub struct KeyResponse {
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    pub tier: Tier,
}

impl From<Credential> for KeyResponse {
    fn from(credential: Credential) -> Self {
        Self {
            key: credential.key().to_string(),
            expires_at: credential.expires_at(),
            tier: credential.tier(),
        }
    }
}

/// Insert or fully replace a credential record. Idempotent.
pub async fn upsert_key(
    State(state): State<AppState>,
    Json(request): Json<UpsertKeyRequest>,
) -> Result<Json<KeyResponse>, ApiError> {
    let credential = state
        .credentials
        .upsert(&request.key, request.expires_at, request.tier)
        .await?;

    info!(tier = %credential.tier(), "Credential upserted");

    Ok(Json(credential.into()))
}
