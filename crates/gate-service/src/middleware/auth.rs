//! Authentication middleware.
//!
//! Runs on every request. Paths outside the protected mount pass through
//! untouched; protected paths must authorize or the request terminates here
//! with the gate's error response. On success the resolved [`Principal`] is
//! inserted into the request extensions for downstream handlers.

use crate::errors::GateError;
use crate::services::auth_gate::{AuthDecision, AuthGate};
use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::IntoResponse,
};
use std::sync::Arc;
use tracing::{error, warn};

/// Shared state for the authentication middleware.
pub struct AuthMiddlewareState {
    pub gate: Arc<AuthGate>,
}

/// Gate every incoming request on the protected mount.
pub async fn authenticate_request(
    State(state): State<Arc<AuthMiddlewareState>>,
    mut req: Request,
    next: Next,
) -> Result<impl IntoResponse, GateError> {
    let path = req.uri().path().to_string();
    let authorization = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.to_string());

    match state.gate.authorize(&path, authorization.as_deref()).await {
        Ok(AuthDecision::NotApplicable) => Ok(next.run(req).await),
        Ok(AuthDecision::Authenticated(principal)) => {
            req.extensions_mut().insert(principal);
            Ok(next.run(req).await)
        }
        Err(err) => {
            match &err {
                // Misconfiguration, not a caller mistake: surface loudly.
                GateError::NoPrincipalAvailable => {
                    error!(path = %path, "No administrator account available for authentication")
                }
                GateError::Database(detail) => {
                    error!(path = %path, detail = %detail, "Directory lookup failed during authentication")
                }
                other => {
                    warn!(path = %path, error = %other, "Request rejected by auth gate")
                }
            }
            Err(err)
        }
    }
}
