//! Request authorization orchestration.
//!
//! One gate instance serves the whole process. Per request the flow is:
//! protected-path check, bearer extraction, token verification, principal
//! resolution. Nothing carries across requests except the resolver's
//! bounded-TTL cache.

use crate::config::{Config, ConfigError};
use crate::crypto::TokenVerifier;
use crate::errors::GateError;
use crate::models::Principal;
use crate::observability::metrics::record_auth_decision;
use crate::observability::ErrorCategory;
use crate::repositories::users::UserDirectory;
use crate::services::principal_resolver::PrincipalResolver;
use std::sync::Arc;

/// Predicate over request paths for the protected mount.
///
/// Matches the configured prefix at a segment boundary: the prefix itself and
/// everything below it, but not sibling paths that merely share the prefix
/// text.
#[derive(Debug, Clone)]
pub struct ProtectedPaths {
    prefix: String,
}

impl ProtectedPaths {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn matches(&self, path: &str) -> bool {
        match path.strip_prefix(self.prefix.as_str()) {
            Some(rest) => rest.is_empty() || rest.starts_with('/'),
            None => false,
        }
    }
}

/// Outcome of authorizing one request.
#[derive(Debug)]
pub enum AuthDecision {
    /// Path is outside the protected mount; the gateway takes no position
    /// and the caller proceeds under whatever policy governs that path.
    NotApplicable,
    /// Token verified; the principal is bound for this request only.
    Authenticated(Principal),
}

/// Token substring of a `Bearer <token>` header value.
///
/// Case-sensitive keyword, exactly one whitespace character as separator
/// (HTTP permits HTAB in field content, not just space); the token is the
/// run of non-whitespace immediately following. Anything else is absent.
pub fn extract_bearer_token(header: &str) -> Option<&str> {
    let rest = header.strip_prefix("Bearer")?;
    let mut chars = rest.chars();
    if !chars.next().is_some_and(|c| c.is_ascii_whitespace()) {
        return None;
    }
    let token = chars.as_str().split(char::is_whitespace).next()?;
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}

/// The per-request authorization orchestrator.
pub struct AuthGate {
    protected: ProtectedPaths,
    verifier: TokenVerifier,
    resolver: PrincipalResolver,
}

impl AuthGate {
    pub fn new(
        protected: ProtectedPaths,
        verifier: TokenVerifier,
        resolver: PrincipalResolver,
    ) -> Self {
        Self {
            protected,
            verifier,
            resolver,
        }
    }

    /// Build a gate from service configuration and a directory handle.
    pub fn from_config(
        config: &Config,
        directory: Arc<dyn UserDirectory>,
    ) -> Result<Self, ConfigError> {
        let verifier = TokenVerifier::new(
            &config.public_key_pem,
            config.jwt_leeway_seconds,
            config.jwt_clock_skew_seconds,
            config.expected_audience.as_deref(),
            config.expected_issuer.as_deref(),
        )?;

        Ok(Self::new(
            ProtectedPaths::new(config.protected_prefix.clone()),
            verifier,
            PrincipalResolver::new(directory, config.principal_cache_ttl),
        ))
    }

    /// Authorize one request by path and `Authorization` header value.
    ///
    /// Unprotected paths short-circuit to `NotApplicable` without inspecting
    /// the header. Protected paths must present a bearer token that verifies
    /// and resolves to a principal; any failure is terminal for the request,
    /// with no retry and no fallback identity.
    pub async fn authorize(
        &self,
        path: &str,
        authorization: Option<&str>,
    ) -> Result<AuthDecision, GateError> {
        let result = self.authorize_inner(path, authorization).await;

        match &result {
            Ok(AuthDecision::Authenticated(_)) => record_auth_decision("success", None),
            Ok(AuthDecision::NotApplicable) => {}
            Err(err) => {
                record_auth_decision("error", Some(ErrorCategory::from(err).as_str()))
            }
        }

        result
    }

    async fn authorize_inner(
        &self,
        path: &str,
        authorization: Option<&str>,
    ) -> Result<AuthDecision, GateError> {
        if !self.protected.matches(path) {
            return Ok(AuthDecision::NotApplicable);
        }

        let token = authorization
            .and_then(extract_bearer_token)
            .ok_or(GateError::MissingCredential)?;

        // The decoded payload is deliberately unused for identity: policy
        // binds every valid token to the first administrator account.
        let claims = self.verifier.verify(token)?;
        tracing::debug!(claims = ?claims, "transport token verified");

        let principal = self.resolver.resolve().await?;

        Ok(AuthDecision::Authenticated(principal))
    }

    /// Drop the cached principal; the next authorized request re-queries the
    /// directory.
    pub fn invalidate_principal_cache(&self) {
        self.resolver.invalidate_cache();
    }
}
