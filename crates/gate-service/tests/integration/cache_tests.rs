//! Principal-cache behavior observed through the router.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use gate_service::config::{DEFAULT_JWT_CLOCK_SKEW_SECONDS, DEFAULT_JWT_LEEWAY_SECONDS};
use gate_service::crypto::TokenVerifier;
use gate_service::routes::build_routes;
use gate_service::services::auth_gate::{AuthGate, ProtectedPaths};
use gate_service::services::principal_resolver::PrincipalResolver;
use gate_test_utils::crypto_fixtures::{sign_token, valid_claims, TEST_PUBLIC_KEY_PEM};
use gate_test_utils::directory::InMemoryDirectory;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

const PREFIX: &str = "/wp-json/blu/mcp";

fn app(directory: Arc<InMemoryDirectory>, ttl: Duration) -> Router {
    let verifier = TokenVerifier::new(
        TEST_PUBLIC_KEY_PEM,
        DEFAULT_JWT_LEEWAY_SECONDS,
        DEFAULT_JWT_CLOCK_SKEW_SECONDS,
        None,
        None,
    )
    .expect("test verifier should build");

    let gate = AuthGate::new(
        ProtectedPaths::new(PREFIX),
        verifier,
        PrincipalResolver::new(directory, ttl),
    );

    build_routes(Arc::new(gate), PREFIX)
}

async fn authed_request(app: &Router, token: &str) -> StatusCode {
    let request = Request::builder()
        .uri(PREFIX)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .expect("request should build");

    app.clone()
        .oneshot(request)
        .await
        .expect("router should respond")
        .status()
}

#[tokio::test]
async fn test_repeat_requests_hit_directory_once() {
    let directory = Arc::new(InMemoryDirectory::with_admin(1, "admin"));
    let app = app(directory.clone(), Duration::from_secs(60));
    let token = sign_token(&valid_claims());

    for _ in 0..5 {
        assert_eq!(authed_request(&app, &token).await, StatusCode::OK);
    }

    assert_eq!(
        directory.lookup_count(),
        1,
        "All requests after the first should be served from cache"
    );
}

#[tokio::test]
async fn test_directory_requeried_after_ttl_expiry() {
    let directory = Arc::new(InMemoryDirectory::with_admin(1, "admin"));
    let app = app(directory.clone(), Duration::from_millis(20));
    let token = sign_token(&valid_claims());

    assert_eq!(authed_request(&app, &token).await, StatusCode::OK);
    tokio::time::sleep(Duration::from_millis(40)).await;
    assert_eq!(authed_request(&app, &token).await, StatusCode::OK);

    assert_eq!(directory.lookup_count(), 2);
}

#[tokio::test]
async fn test_missing_administrator_is_not_cached() {
    let directory = Arc::new(InMemoryDirectory::empty());
    let app = app(directory.clone(), Duration::from_secs(60));
    let token = sign_token(&valid_claims());

    assert_eq!(
        authed_request(&app, &token).await,
        StatusCode::UNAUTHORIZED
    );

    // As soon as an administrator exists the gateway recovers, without
    // waiting out a cache TTL.
    directory.add_admin(7, "new-admin");
    assert_eq!(authed_request(&app, &token).await, StatusCode::OK);
}
