//! Route configuration for the auth gateway.

use crate::handlers::transport::handoff;
use crate::middleware::auth::{authenticate_request, AuthMiddlewareState};
use crate::services::auth_gate::AuthGate;
use axum::{
    middleware,
    routing::{any, get},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Build the router: the protected mount behind the auth gate, plus an
/// unauthenticated health probe.
pub fn build_routes(gate: Arc<AuthGate>, protected_prefix: &str) -> Router {
    let state = Arc::new(AuthMiddlewareState { gate });

    Router::new()
        .route(protected_prefix, any(handoff))
        .route(&format!("{}/*rest", protected_prefix), any(handoff))
        .route("/health", get(health_check))
        .layer(middleware::from_fn_with_state(state, authenticate_request))
        .layer(TraceLayer::new_for_http())
}

async fn health_check() -> &'static str {
    "OK"
}
