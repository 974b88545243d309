use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

use super::admin;
use super::health;
use super::middleware;
use super::state::AppState;
use super::v1;

/// Create the full router with application state
pub fn create_router_with_state(state: AppState) -> Router {
    Router::new()
        // Health endpoints
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))
        .route("/live", get(health::live_check))
        // The proxied endpoint
        .nest("/v1", v1::create_v1_router())
        // Provisioning API
        .nest("/admin", admin::create_admin_router())
        // Add state and middleware
        .layer(axum::middleware::from_fn(middleware::logging_middleware))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
