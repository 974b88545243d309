//! Application state for shared services

use std::sync::Arc;

use crate::infrastructure::admission::AdmissionService;
use crate::infrastructure::credential::CredentialService;
use crate::infrastructure::upstream::UpstreamRelay;
use crate::infrastructure::usage::UsageService;

/// Application state containing shared services.
///
/// The services are process-wide; per-request storage access goes through
/// the repositories they wrap.
#[derive(Clone)]
pub struct AppState {
    pub admission: Arc<AdmissionService>,
    pub credentials: Arc<CredentialService>,
    pub usage: Arc<UsageService>,
    pub relay: Arc<UpstreamRelay>,
}

impl AppState {
    pub fn new(
        admission: Arc<AdmissionService>,
        credentials: Arc<CredentialService>,
        usage: Arc<UsageService>,
        relay: Arc<UpstreamRelay>,
    ) -> Self {
        Self {
            admission,
            credentials,
            usage,
            relay,
        }
    }
}
