use jsonwebtoken::DecodingKey;
use std::collections::HashMap;
use std::env;
use std::time::Duration;
use thiserror::Error;

/// Default clock skew tolerance for `iat` validation (5 minutes per
/// NIST SP 800-63B).
pub const DEFAULT_JWT_CLOCK_SKEW_SECONDS: i64 = 300;

/// Default leeway applied to `exp`/`nbf` checks.
pub const DEFAULT_JWT_LEEWAY_SECONDS: u64 = 60;

/// Default time-to-live for the resolved-principal cache (2 hours).
pub const DEFAULT_PRINCIPAL_CACHE_TTL: Duration = Duration::from_secs(2 * 60 * 60);

/// Default protected mount: the MCP transport endpoint and everything below it.
pub const DEFAULT_PROTECTED_PREFIX: &str = "/wp-json/blu/mcp";

const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8085";

/// Compiled-in trust anchor: the RSA public key whose private counterpart
/// signs transport tokens. There is no rotation mechanism; the key can only
/// be replaced via `GATE_JWT_PUBLIC_KEY_PEM` at startup.
pub const DEFAULT_PUBLIC_KEY_PEM: &str = "-----BEGIN PUBLIC KEY-----
MIIBIjANBgkqhkiG9w0BAQEFAAOCAQ8AMIIBCgKCAQEAuzWHNM5f+amCjQztc5QT
fJfzCC5J4nuW+L/aOxZ4f8J3FrewM2c/dufrnmedsApb0By7WhaHlcqCh/ScAPyJ
hzkPYLae7bTVro3hok0zDITR8F6SJGL42JAEUk+ILkPI+DONM0+3vzk6Kvfe548t
u4czCuqU8BGVOlnp6IqBHhAswNMM78pos/2z0CjPM4tbeXqSTTbNkXRboxjU29vS
opcT51koWOgiTf3C7nJUoMWZHZI5HqnIhPAG9yv8HAgNk6CMk2CadVHDo4IxjxTz
TTqo1SCSH2pooJl9O8at6kkRYsrZWwsKlOFE2LUce7ObnXsYihStBUDoeBQlGG/B
wQIDAQAB
-----END PUBLIC KEY-----";

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub bind_address: String,
    pub public_key_pem: String,
    pub protected_prefix: String,
    pub principal_cache_ttl: Duration,
    pub jwt_leeway_seconds: u64,
    pub jwt_clock_skew_seconds: i64,
    pub expected_audience: Option<String>,
    pub expected_issuer: Option<String>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),

    #[error("Invalid public key: {0}")]
    InvalidPublicKey(String),
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&env::vars().collect())
    }

    /// Load configuration from a HashMap (for testing)
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let database_url = vars
            .get("DATABASE_URL")
            .ok_or_else(|| ConfigError::MissingEnvVar("DATABASE_URL".to_string()))?
            .clone();

        let bind_address = vars
            .get("BIND_ADDRESS")
            .cloned()
            .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string());

        let public_key_pem = vars
            .get("GATE_JWT_PUBLIC_KEY_PEM")
            .map(|pem| pem.replace("\\n", "\n"))
            .unwrap_or_else(|| DEFAULT_PUBLIC_KEY_PEM.to_string());

        // Fail startup on an unusable trust anchor rather than rejecting
        // every request at runtime.
        DecodingKey::from_rsa_pem(public_key_pem.as_bytes())
            .map_err(|e| ConfigError::InvalidPublicKey(e.to_string()))?;

        let protected_prefix = vars
            .get("GATE_PROTECTED_PREFIX")
            .cloned()
            .unwrap_or_else(|| DEFAULT_PROTECTED_PREFIX.to_string());

        // The bare root "/" is also rejected here: the mount must name at
        // least one path segment, since unprotected routes such as /health
        // live outside it.
        if !protected_prefix.starts_with('/') || protected_prefix.ends_with('/') {
            return Err(ConfigError::InvalidValue(
                "GATE_PROTECTED_PREFIX",
                format!(
                    "expected a non-root absolute path without trailing slash \
                     (at least one segment, e.g. \"/wp-json/blu/mcp\"), got {:?}",
                    protected_prefix
                ),
            ));
        }

        let principal_cache_ttl = match vars.get("GATE_PRINCIPAL_CACHE_TTL_SECONDS") {
            Some(raw) => Duration::from_secs(raw.parse::<u64>().map_err(|_| {
                ConfigError::InvalidValue("GATE_PRINCIPAL_CACHE_TTL_SECONDS", raw.clone())
            })?),
            None => DEFAULT_PRINCIPAL_CACHE_TTL,
        };

        let jwt_leeway_seconds = match vars.get("GATE_JWT_LEEWAY_SECONDS") {
            Some(raw) => raw
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidValue("GATE_JWT_LEEWAY_SECONDS", raw.clone()))?,
            None => DEFAULT_JWT_LEEWAY_SECONDS,
        };

        let jwt_clock_skew_seconds = match vars.get("GATE_JWT_CLOCK_SKEW_SECONDS") {
            Some(raw) => raw
                .parse::<i64>()
                .map_err(|_| ConfigError::InvalidValue("GATE_JWT_CLOCK_SKEW_SECONDS", raw.clone()))?,
            None => DEFAULT_JWT_CLOCK_SKEW_SECONDS,
        };

        let expected_audience = vars.get("GATE_EXPECTED_AUDIENCE").cloned();
        let expected_issuer = vars.get("GATE_EXPECTED_ISSUER").cloned();

        Ok(Config {
            database_url,
            bind_address,
            public_key_pem,
            protected_prefix,
            principal_cache_ttl,
            jwt_leeway_seconds,
            jwt_clock_skew_seconds,
            expected_audience,
            expected_issuer,
        })
    }
}
