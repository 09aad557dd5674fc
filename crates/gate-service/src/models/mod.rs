//! Data models for the gateway.

use serde::Serialize;
use std::fmt;

/// Authenticated actor bound to a request after successful token verification.
///
/// Resolution deliberately ignores the token's own subject claim: a valid
/// token always maps to the installation's first administrator account, a
/// shared-service-account model inherited from the deployment this gateway
/// fronts. A `Principal` is only ever produced after verification succeeds.
#[derive(Clone, Serialize, PartialEq, Eq)]
pub struct Principal {
    /// Internal directory id; selection picks the lowest.
    pub user_id: i64,
    /// Account login name.
    pub username: String,
}

/// Custom Debug implementation that redacts the `username` field.
///
/// Account names are identifying and should not be exposed in logs or
/// debug output.
impl fmt::Debug for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Principal")
            .field("user_id", &self.user_id)
            .field("username", &"[REDACTED]")
            .finish()
    }
}
