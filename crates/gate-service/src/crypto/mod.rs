//! Token verification against the gateway's fixed RSA trust anchor.
//!
//! Verification is a purely local cryptographic check: no network calls, no
//! shared state. Structural pre-checks (size limit, three-segment shape) run
//! before any base64 decoding or signature work so junk input is rejected
//! cheaply and with a distinct error.

use crate::config::ConfigError;
use crate::errors::GateError;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::instrument;

/// Maximum allowed JWT size in bytes (4KB).
///
/// Typical transport tokens are 300-800 bytes (RS256 signature plus basic
/// claims); anything larger is rejected before base64 decode or signature
/// verification to bound the work an unauthenticated caller can cause.
///
/// Per OWASP API Security Top 10 - API4:2023 (Unrestricted Resource Consumption)
pub const MAX_JWT_SIZE_BYTES: usize = 4096; // 4KB

/// Decoded JWT payload after signature and structural checks pass.
///
/// Exists only within the scope of one verification call; never persisted.
/// The `sub` field may identify the token holder and is redacted in Debug
/// output. Audience and issuer are decoded here but only asserted when the
/// gateway is configured with expected values.
#[derive(Clone, Serialize, Deserialize, PartialEq)]
pub struct VerifiedClaims {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
    /// RFC 7519 allows a single string or an array of strings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aud: Option<serde_json::Value>,
    /// Expiration timestamp (required).
    pub exp: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nbf: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
}

/// Custom Debug implementation that redacts the `sub` field.
impl fmt::Debug for VerifiedClaims {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VerifiedClaims")
            .field("sub", &"[REDACTED]")
            .field("iss", &self.iss)
            .field("aud", &self.aud)
            .field("exp", &self.exp)
            .field("nbf", &self.nbf)
            .field("iat", &self.iat)
            .finish()
    }
}

/// Verifies candidate bearer tokens against the configured public key.
///
/// Built once at startup; verification itself is side-effect free and safe to
/// run concurrently across requests.
pub struct TokenVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
    clock_skew_seconds: i64,
}

impl TokenVerifier {
    /// Build a verifier for RS256 tokens signed by the counterpart of
    /// `public_key_pem`.
    ///
    /// `exp` is required and `nbf` is enforced when present, both with
    /// `leeway_seconds` tolerance. Audience and issuer are only asserted
    /// when expected values are supplied.
    pub fn new(
        public_key_pem: &str,
        leeway_seconds: u64,
        clock_skew_seconds: i64,
        expected_audience: Option<&str>,
        expected_issuer: Option<&str>,
    ) -> Result<Self, ConfigError> {
        let decoding_key = DecodingKey::from_rsa_pem(public_key_pem.as_bytes())
            .map_err(|e| ConfigError::InvalidPublicKey(e.to_string()))?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.leeway = leeway_seconds;
        validation.validate_exp = true;
        validation.validate_nbf = true;

        match expected_audience {
            Some(aud) => validation.set_audience(&[aud]),
            // jsonwebtoken rejects tokens carrying an aud claim when none is
            // expected; the observed contract decodes aud without asserting it.
            None => validation.validate_aud = false,
        }

        if let Some(iss) = expected_issuer {
            validation.set_issuer(&[iss]);
        }

        Ok(Self {
            decoding_key,
            validation,
            clock_skew_seconds,
        })
    }

    /// Verify a candidate token and return its decoded claims.
    ///
    /// Errors distinguish a malformed candidate (not even JWT-shaped) from a
    /// cryptographically or temporally rejected one; the latter carries the
    /// decode error's text for operator logs.
    #[instrument(skip_all)]
    pub fn verify(&self, token: &str) -> Result<VerifiedClaims, GateError> {
        // Size check BEFORE any parsing or cryptographic operations.
        if token.len() > MAX_JWT_SIZE_BYTES {
            tracing::debug!(
                target: "crypto",
                token_size = token.len(),
                max_size = MAX_JWT_SIZE_BYTES,
                "Token rejected: size exceeds maximum allowed"
            );
            return Err(GateError::MalformedToken);
        }

        // Fail fast on candidates that are not even three dot-separated
        // segments, with a distinct error for clearer diagnostics.
        if token.split('.').count() != 3 {
            tracing::debug!(target: "crypto", "Token rejected: not a three-segment JWT");
            return Err(GateError::MalformedToken);
        }

        let token_data = decode::<VerifiedClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| {
                tracing::debug!(target: "crypto", error = %e, "Token verification failed");
                GateError::InvalidCredential(e.to_string())
            })?;

        // Reject tokens issued too far in the future (pre-generation attack
        // or badly skewed issuer clock).
        if let Some(iat) = token_data.claims.iat {
            let now = chrono::Utc::now().timestamp();
            let max_iat = now + self.clock_skew_seconds;
            if iat > max_iat {
                tracing::debug!(
                    target: "crypto",
                    iat = iat,
                    now = now,
                    max_allowed = max_iat,
                    "Token rejected: iat too far in the future"
                );
                return Err(GateError::InvalidCredential(
                    "token issued-at is in the future".to_string(),
                ));
            }
        }

        Ok(token_data.claims)
    }
}
