//! Proxied endpoint surface

pub mod proxy;

use axum::{routing::get, Router};

use super::state::AppState;

/// Create the v1 router.
///
/// Only GET and POST are routed; any other method gets 405 from the method
/// router without reaching admission or the upstream.
pub fn create_v1_router() -> Router<AppState> {
    Router::new().route("/endpoint", get(proxy::relay_request).post(proxy::relay_request))
}
