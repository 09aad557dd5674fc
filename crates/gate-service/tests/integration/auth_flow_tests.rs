//! End-to-end authentication flow through the router.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use chrono::Utc;
use gate_service::config::{DEFAULT_JWT_CLOCK_SKEW_SECONDS, DEFAULT_JWT_LEEWAY_SECONDS};
use gate_service::crypto::TokenVerifier;
use gate_service::routes::build_routes;
use gate_service::services::auth_gate::{AuthGate, ProtectedPaths};
use gate_service::services::principal_resolver::PrincipalResolver;
use gate_test_utils::crypto_fixtures::{
    sign_token, sign_with, valid_claims, TEST_PUBLIC_KEY_PEM, WRONG_PRIVATE_KEY_PEM,
};
use gate_test_utils::directory::InMemoryDirectory;
use http_body_util::BodyExt;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

const PREFIX: &str = "/wp-json/blu/mcp";

fn app(directory: Arc<InMemoryDirectory>) -> Router {
    app_with_ttl(directory, Duration::from_secs(60))
}

fn app_with_ttl(directory: Arc<InMemoryDirectory>, ttl: Duration) -> Router {
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

async fn send(app: Router, path: &str, authorization: Option<&str>) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder().uri(path);
    if let Some(value) = authorization {
        builder = builder.header(header::AUTHORIZATION, value);
    }
    let request = builder.body(Body::empty()).expect("request should build");

    let response = app.oneshot(request).await.expect("router should respond");
    let status = response.status();
    let body = response
        .into_body()
        .collect()
        .await
        .expect("body should collect")
        .to_bytes();
    let json = if body.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null)
    };

    (status, json)
}

#[tokio::test]
async fn test_missing_header_is_401_missing_credential() {
    let app = app(Arc::new(InMemoryDirectory::with_admin(1, "admin")));

    let (status, body) = send(app, PREFIX, None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "MISSING_CREDENTIAL");
}

#[tokio::test]
async fn test_non_bearer_scheme_is_401_missing_credential() {
    let app = app(Arc::new(InMemoryDirectory::with_admin(1, "admin")));

    let (status, body) = send(app, PREFIX, Some("Basic dXNlcjpwYXNz")).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "MISSING_CREDENTIAL");
}

#[tokio::test]
async fn test_malformed_token_is_401_malformed_token() {
    let app = app(Arc::new(InMemoryDirectory::with_admin(1, "admin")));

    let (status, body) = send(app, PREFIX, Some("Bearer not-a-jwt")).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "MALFORMED_TOKEN");
}

#[tokio::test]
async fn test_valid_token_reaches_handoff_with_principal() {
    let app = app(Arc::new(InMemoryDirectory::with_admin(2, "site-admin")));
    let token = sign_token(&valid_claims());

    let (status, body) = send(app, PREFIX, Some(&format!("Bearer {}", token))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["authenticated"], true);
    assert_eq!(body["principal"]["user_id"], 2);
    assert_eq!(body["principal"]["username"], "site-admin");
}

#[tokio::test]
async fn test_subpaths_are_protected_too() {
    let directory = Arc::new(InMemoryDirectory::with_admin(1, "admin"));
    let token = sign_token(&valid_claims());

    let (status, _) = send(
        app(directory.clone()),
        &format!("{}/tools/list", PREFIX),
        Some(&format!("Bearer {}", token)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(app(directory), &format!("{}/tools/list", PREFIX), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "MISSING_CREDENTIAL");
}

#[tokio::test]
async fn test_wrong_key_signature_is_401_invalid_credential() {
    let app = app(Arc::new(InMemoryDirectory::with_admin(1, "admin")));
    let token = sign_with(&valid_claims(), WRONG_PRIVATE_KEY_PEM);

    let (status, body) = send(app, PREFIX, Some(&format!("Bearer {}", token))).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "INVALID_CREDENTIAL");
}

#[tokio::test]
async fn test_expired_token_is_401_invalid_credential() {
    let app = app(Arc::new(InMemoryDirectory::with_admin(1, "admin")));
    let mut claims = valid_claims();
    let now = Utc::now().timestamp();
    claims.iat = Some(now - 7200);
    claims.exp = now - 3600;
    let token = sign_token(&claims);

    let (status, body) = send(app, PREFIX, Some(&format!("Bearer {}", token))).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "INVALID_CREDENTIAL");
}

#[tokio::test]
async fn test_no_administrator_is_401_no_principal() {
    let app = app(Arc::new(InMemoryDirectory::empty()));
    let token = sign_token(&valid_claims());

    let (status, body) = send(app, PREFIX, Some(&format!("Bearer {}", token))).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "NO_PRINCIPAL");
}

#[tokio::test]
async fn test_health_probe_bypasses_authentication() {
    let app = app(Arc::new(InMemoryDirectory::empty()));

    // A garbage credential on an unprotected path is simply ignored.
    let (status, _) = send(app, "/health", Some("Bearer utterly-bogus")).await;

    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_unknown_unprotected_path_is_404_not_401() {
    let app = app(Arc::new(InMemoryDirectory::with_admin(1, "admin")));

    let (status, _) = send(app, "/wp/v2/posts", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}
