//! Protected-mount handoff handler.
//!
//! The gateway's job ends once a request is authenticated; this handler is
//! the seam where a transport backend (proxy, embedded MCP server) would take
//! over. It echoes the bound principal so the contract is visible end to end.

use crate::models::Principal;
use axum::{response::IntoResponse, Extension, Json};
use serde_json::json;

/// Terminal handler for authenticated requests on the protected mount.
///
/// The `Principal` extension is inserted by the auth middleware; by
/// construction this handler never runs without it.
pub async fn handoff(Extension(principal): Extension<Principal>) -> impl IntoResponse {
    Json(json!({
        "authenticated": true,
        "principal": principal,
    }))
}
