//! Forwarding relay to the configured upstream

pub mod relay;

pub use relay::{ProxiedRequest, RelayedResponse, UpstreamRelay, API_KEY_HEADER};
