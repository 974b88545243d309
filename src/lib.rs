//! Keygate
//!
//! An authenticating reverse proxy gateway: validates caller API keys
//! against a key registry, enforces a per-key daily call quota for
//! free-tier callers, and forwards admitted requests to a single
//! configured upstream endpoint.

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use tracing::info;

use api::state::AppState;
use config::StorageBackend;
use domain::credential::CredentialRepository;
use domain::usage::UsageRepository;
use infrastructure::admission::AdmissionService;
use infrastructure::credential::{
    CredentialService, InMemoryCredentialRepository, SqliteCredentialRepository,
};
use infrastructure::storage;
use infrastructure::upstream::UpstreamRelay;
use infrastructure::usage::{InMemoryUsageRepository, SqliteUsageRepository, UsageService};

/// Create the application state with all services initialized
pub async fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    if config.upstream.url.is_empty() {
        anyhow::bail!("upstream.url must be configured");
    }

    let (credential_repository, usage_repository): (
        Arc<dyn CredentialRepository>,
        Arc<dyn UsageRepository>,
    ) = match config.storage.backend {
        StorageBackend::Sqlite => {
            info!("Using SQLite storage at {}", config.storage.url);
            let pool = storage::connect(&config.storage.url).await?;
            (
                Arc::new(SqliteCredentialRepository::new(pool.clone())),
                Arc::new(SqliteUsageRepository::new(pool)),
            )
        }
        StorageBackend::Memory => {
            info!("Using in-memory storage; registry and ledger reset on restart");
            (
                Arc::new(InMemoryCredentialRepository::new()),
                Arc::new(InMemoryUsageRepository::new()),
            )
        }
    };

    let credentials = Arc::new(CredentialService::new(credential_repository));
    let usage = Arc::new(UsageService::new(usage_repository));
    let admission = Arc::new(AdmissionService::new(
        credentials.clone(),
        usage.clone(),
        config.quota.free_daily_limit,
    ));
    let relay = Arc::new(UpstreamRelay::new(&config.upstream)?);

    Ok(AppState::new(admission, credentials, usage, relay))
}
