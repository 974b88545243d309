//! The proxied endpoint: admission, then forward and relay

use axum::{
    body::Body,
    extract::{Request, State},
    http::header,
    response::Response,
};
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::infrastructure::upstream::{ProxiedRequest, API_KEY_HEADER};

/// Handle one proxied call.
///
/// Admission runs first; a rejected request never reaches the upstream. On
/// admission the request is forwarded with its method, query string, headers
/// (minus internal ones) and raw body, and the upstream status and body are
/// relayed back verbatim with only the content type copied.
pub async fn relay_request(
    State(state): State<AppState>,
    request: Request,
) -> Result<Response, ApiError> {
    let (parts, body) = request.into_parts();

    let api_key = parts
        .headers
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|key| !key.is_empty());

    let admission = state.admission.admit(api_key).await?;
    debug!(tier = %admission.tier, "Request admitted");

    let body = axum::body::to_bytes(body, usize::MAX)
        .await
        .map_err(|e| ApiError::bad_request(format!("Failed to read request body: {}", e)))?;

    let relayed = state
        .relay
        .forward(ProxiedRequest {
            method: parts.method,
            query: parts.uri.query().map(str::to_string),
            headers: parts.headers,
            body,
        })
        .await?;

    let mut response = Response::builder().status(relayed.status);

    if let Some(content_type) = relayed.content_type {
        response = response.header(header::CONTENT_TYPE, content_type);
    }

    response
        .body(Body::from(relayed.body))
        .map_err(|e| ApiError::internal(format!("Failed to build response: {}", e)))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Bytes;
    use axum::http::StatusCode;
    use axum::Router;
    use tower::ServiceExt;
    use wiremock::matchers::{body_bytes, method, path, query_param};
    use wiremock::{Match, Mock, MockServer, ResponseTemplate};

    use crate::api::router::create_router_with_state;
    use crate::api::state::AppState;
    use crate::config::UpstreamConfig;
    use crate::domain::credential::Tier;
    use crate::infrastructure::admission::AdmissionService;
    use crate::infrastructure::credential::{CredentialService, InMemoryCredentialRepository};
    use crate::infrastructure::upstream::UpstreamRelay;
    use crate::infrastructure::usage::{InMemoryUsageRepository, UsageService};

    struct TestApp {
        router: Router,
        credentials: Arc<CredentialService>,
        usage: Arc<UsageService>,
    }

    fn create_test_app(upstream_url: &str, free_daily_limit: i64) -> TestApp {
        let credentials = Arc::new(CredentialService::new(Arc::new(
            InMemoryCredentialRepository::new(),
        )));
        let usage = Arc::new(UsageService::new(Arc::new(InMemoryUsageRepository::new())));
        let admission = Arc::new(AdmissionService::new(
            credentials.clone(),
            usage.clone(),
            free_daily_limit,
        ));
        let relay = Arc::new(
            UpstreamRelay::new(&UpstreamConfig {
                url: upstream_url.to_string(),
                timeout_secs: 30,
            })
            .unwrap(),
        );

        let state = AppState::new(admission, credentials.clone(), usage.clone(), relay);

        TestApp {
            router: create_router_with_state(state),
            credentials,
            usage,
        }
    }

    fn request(method: &str, uri: &str, api_key: Option<&str>) -> axum::http::Request<axum::body::Body> {
        let mut builder = axum::http::Request::builder().method(method).uri(uri);

        if let Some(api_key) = api_key {
            builder = builder.header("x-api-key", api_key);
        }

        builder.body(axum::body::Body::empty()).unwrap()
    }

    async fn body_of(response: axum::response::Response) -> Bytes {
        axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
    }

    /// Matches only requests where the named header is absent
    struct HeaderAbsent(&'static str);

    impl Match for HeaderAbsent {
        fn matches(&self, request: &wiremock::Request) -> bool {
            !request.headers.contains_key(self.0)
        }
    }

    /// Matches only requests where the named header does not carry the value
    struct HeaderNotEqual(&'static str, &'static str);

    impl Match for HeaderNotEqual {
        fn matches(&self, request: &wiremock::Request) -> bool {
            request
                .headers
                .get(self.0)
                .map(|value| value != self.1)
                .unwrap_or(true)
        }
    }

    #[tokio::test]
    async fn test_missing_credential_is_401_without_upstream_call() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let app = create_test_app(&server.uri(), 100);

        let response = app
            .router
            .oneshot(request("GET", "/v1/endpoint", None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = body_of(response).await;
        assert!(String::from_utf8_lossy(&body).contains("X-API-Key header missing"));
    }

    #[tokio::test]
    async fn test_unknown_key_is_401() {
        let server = MockServer::start().await;
        let app = create_test_app(&server.uri(), 100);

        let response = app
            .router
            .oneshot(request("GET", "/v1/endpoint", Some("no-such-key")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_expired_key_is_401_regardless_of_tier() {
        let server = MockServer::start().await;
        let app = create_test_app(&server.uri(), 100);
        let past = chrono::Utc::now() - chrono::Duration::hours(1);
        app.credentials
            .upsert("abc", Some(past), Tier::Unlimited)
            .await
            .unwrap();

        let response = app
            .router
            .oneshot(request("GET", "/v1/endpoint", Some("abc")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_free_tier_daily_quota_flow() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_raw("ok", "text/plain"))
            .mount(&server)
            .await;

        let app = create_test_app(&server.uri(), 2);
        app.credentials.upsert("abc", None, Tier::Free).await.unwrap();

        // Calls 1 and 2 are admitted and counted
        for expected in 1..=2 {
            let response = app
                .router
                .clone()
                .oneshot(request("GET", "/v1/endpoint", Some("abc")))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
            assert_eq!(app.usage.calls_today("abc").await.unwrap(), expected);
        }

        // Call 3 is rejected and the ledger stays at the limit
        let response = app
            .router
            .clone()
            .oneshot(request("GET", "/v1/endpoint", Some("abc")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(app.usage.calls_today("abc").await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_unlimited_tier_is_never_rate_limited() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let app = create_test_app(&server.uri(), 1);
        app.credentials
            .upsert("abc", None, Tier::Unlimited)
            .await
            .unwrap();

        for _ in 0..5 {
            let response = app
                .router
                .clone()
                .oneshot(request("GET", "/v1/endpoint", Some("abc")))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }

        // Unlimited calls never touch the ledger
        assert_eq!(app.usage.calls_today("abc").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_get_forwards_query_and_relays_response_verbatim() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .and(query_param("q", "1"))
            .respond_with(
                ResponseTemplate::new(418)
                    .set_body_raw(r#"{"answer": 42}"#, "application/json")
                    .insert_header("x-upstream-internal", "not-for-callers"),
            )
            .expect(1)
            .mount(&server)
            .await;

        let app = create_test_app(&server.uri(), 100);
        app.credentials
            .upsert("abc", None, Tier::Unlimited)
            .await
            .unwrap();

        let response = app
            .router
            .oneshot(request("GET", "/v1/endpoint?q=1", Some("abc")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::IM_A_TEAPOT);
        assert_eq!(
            response.headers().get("content-type").unwrap(),
            "application/json"
        );
        // Only content-type is copied from the upstream response
        assert!(response.headers().get("x-upstream-internal").is_none());
        assert_eq!(body_of(response).await, Bytes::from(r#"{"answer": 42}"#));
    }

    #[tokio::test]
    async fn test_post_forwards_raw_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_bytes(b"raw payload".to_vec()))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;

        let app = create_test_app(&server.uri(), 100);
        app.credentials.upsert("abc", None, Tier::Free).await.unwrap();

        let response = app
            .router
            .oneshot(
                axum::http::Request::builder()
                    .method("POST")
                    .uri("/v1/endpoint")
                    .header("x-api-key", "abc")
                    .body(axum::body::Body::from("raw payload"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
    }

    #[tokio::test]
    async fn test_credential_header_is_never_forwarded() {
        let server = MockServer::start().await;
        // The client stack sets its own host header for the upstream
        // connection; the inbound one must not leak through.
        Mock::given(method("GET"))
            .and(HeaderAbsent("x-api-key"))
            .and(HeaderNotEqual("host", "gateway.local"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let app = create_test_app(&server.uri(), 100);
        app.credentials.upsert("abc", None, Tier::Free).await.unwrap();

        let response = app
            .router
            .oneshot(
                axum::http::Request::builder()
                    .method("GET")
                    .uri("/v1/endpoint")
                    .header("x-api-key", "abc")
                    .header("host", "gateway.local")
                    .body(axum::body::Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        // The mock only matches when nothing internal leaked through
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unsupported_method_is_405_without_upstream_call() {
        let server = MockServer::start().await;
        Mock::given(wiremock::matchers::any())
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let app = create_test_app(&server.uri(), 100);
        app.credentials.upsert("abc", None, Tier::Free).await.unwrap();

        let response = app
            .router
            .oneshot(request("DELETE", "/v1/endpoint", Some("abc")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        // The rejected call was not counted either
        assert_eq!(app.usage.calls_today("abc").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_unreachable_upstream_is_502() {
        let app = create_test_app("http://127.0.0.1:9", 100);
        app.credentials.upsert("abc", None, Tier::Free).await.unwrap();

        let response = app
            .router
            .oneshot(request("GET", "/v1/endpoint", Some("abc")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let body = body_of(response).await;
        assert!(String::from_utf8_lossy(&body).contains("detail"));
    }
}
