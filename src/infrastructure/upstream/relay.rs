//! Upstream request forwarding and response relay

use std::time::Duration;

use axum::http::{header, HeaderMap, HeaderValue, Method, StatusCode};
use bytes::Bytes;
use tracing::warn;

use crate::config::UpstreamConfig;
use crate::domain::DomainError;

/// Header carrying the caller's credential; consumed by admission and never
/// forwarded upstream.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Admitted request, ready to forward
#[derive(Debug, Clone)]
pub struct ProxiedRequest {
    pub method: Method,
    pub query: Option<String>,
    pub headers: HeaderMap,
    pub body: Bytes,
}

/// Upstream response reduced to what the caller receives: the status code,
/// the body, and the content type. All other upstream headers are dropped.
#[derive(Debug, Clone)]
pub struct RelayedResponse {
    pub status: StatusCode,
    pub content_type: Option<HeaderValue>,
    pub body: Bytes,
}

/// Relay issuing calls against the single configured upstream endpoint
#[derive(Debug, Clone)]
pub struct UpstreamRelay {
    client: reqwest::Client,
    url: String,
}

impl UpstreamRelay {
    /// Build a relay with a bounded per-request timeout
    pub fn new(config: &UpstreamConfig) -> Result<Self, DomainError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| {
                DomainError::internal(format!("Failed to build upstream client: {}", e))
            })?;

        Ok(Self {
            client,
            url: config.url.clone(),
        })
    }

    /// Forward an admitted request and relay the upstream response.
    ///
    /// The upstream status and body come back verbatim, success or not; only
    /// transport failures surface as errors, with the detail logged rather
    /// than leaked to the caller.
    pub async fn forward(&self, request: ProxiedRequest) -> Result<RelayedResponse, DomainError> {
        let url = match &request.query {
            Some(query) => format!("{}?{}", self.url, query),
            None => self.url.clone(),
        };

        let mut outbound = self
            .client
            .request(request.method.clone(), &url)
            .headers(sanitize_headers(&request.headers));

        if request.method == Method::POST {
            outbound = outbound.body(request.body);
        }

        let response = outbound.send().await.map_err(|e| {
            warn!(url = %self.url, error = %e, "Upstream call failed");
            if e.is_timeout() {
                DomainError::upstream("Upstream request timed out")
            } else {
                DomainError::upstream("Upstream request failed")
            }
        })?;

        let status = response.status();
        let content_type = response.headers().get(header::CONTENT_TYPE).cloned();
        let body = response.bytes().await.map_err(|e| {
            warn!(url = %self.url, error = %e, "Failed to read upstream response body");
            DomainError::upstream("Failed to read upstream response")
        })?;

        Ok(RelayedResponse {
            status,
            content_type,
            body,
        })
    }
}

/// Drop headers that must not reach the upstream: the connection-scoped host
/// and content-length, and the gateway's own credential header.
fn sanitize_headers(headers: &HeaderMap) -> HeaderMap {
    let mut sanitized = headers.clone();
    sanitized.remove(header::HOST);
    sanitized.remove(header::CONTENT_LENGTH);
    sanitized.remove(API_KEY_HEADER);
    sanitized
}
