use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Gateway error taxonomy.
///
/// Status-code convention: 401 for every authentication failure (missing,
/// malformed, or rejected credential, and the no-principal misconfiguration),
/// reserving 403 for authenticated-but-forbidden outcomes, which the gateway
/// currently never produces. Internal faults map to 500.
///
/// The `InvalidCredential` and `Database` payloads carry diagnostic detail for
/// operators; only a stable code and generic message cross the trust boundary
/// in the HTTP response.
#[derive(Debug, Error)]
pub enum GateError {
    #[error("Authentication required")]
    MissingCredential,

    #[error("Token format is invalid")]
    MalformedToken,

    #[error("Invalid token: {0}")]
    InvalidCredential(String),

    #[error("No account available for authentication")]
    NoPrincipalAvailable,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal server error")]
    Internal,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

impl IntoResponse for GateError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            GateError::MissingCredential => (
                StatusCode::UNAUTHORIZED,
                "MISSING_CREDENTIAL",
                "Authentication required. Please provide a Bearer token.".to_string(),
            ),
            GateError::MalformedToken => (
                StatusCode::UNAUTHORIZED,
                "MALFORMED_TOKEN",
                "Token format is invalid.".to_string(),
            ),
            // Decode detail stays in logs; callers get a generic message.
            GateError::InvalidCredential(_) => (
                StatusCode::UNAUTHORIZED,
                "INVALID_CREDENTIAL",
                "The access token is invalid or expired.".to_string(),
            ),
            GateError::NoPrincipalAvailable => (
                StatusCode::UNAUTHORIZED,
                "NO_PRINCIPAL",
                "No account is available to authenticate this request.".to_string(),
            ),
            GateError::Database(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "DATABASE_ERROR",
                "An internal database error occurred.".to_string(),
            ),
            GateError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred.".to_string(),
            ),
        };

        let error_response = ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message,
            },
        };

        (status, Json(error_response)).into_response()
    }
}
