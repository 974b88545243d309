//! Administrative provisioning API

pub mod keys;

use axum::{routing::put, Router};

use super::state::AppState;

/// Create the admin router
pub fn create_admin_router() -> Router<AppState> {
    Router::new().route("/keys", put(keys::upsert_key))
}
