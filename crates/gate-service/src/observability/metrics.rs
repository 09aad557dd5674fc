//! Metrics definitions for the gateway.
//!
//! All metrics follow Prometheus naming conventions:
//! - `gate_` prefix for the auth gateway
//! - `_total` suffix for counters
//!
//! # Cardinality
//!
//! Labels are bounded to prevent cardinality explosion:
//! - `outcome`: 2 values (success, error)
//! - `error_category`: 4 values (authentication, cryptographic, internal, none)
//! - `source`: 2 values (cache, directory)
//! - `status`: 2 values (success, empty)

use metrics::counter;

/// Record the outcome of one authorization decision on the protected mount.
///
/// Metric: `gate_auth_decisions_total`
/// Labels: `outcome`, `error_category`
pub fn record_auth_decision(outcome: &str, error_category: Option<&str>) {
    let category = error_category.unwrap_or("none");
    counter!("gate_auth_decisions_total", "outcome" => outcome.to_string(), "error_category" => category.to_string())
        .increment(1);
}

/// Record a principal resolution, attributed to the cache or the directory.
///
/// Metric: `gate_principal_lookups_total`
/// Labels: `source`, `status`
pub fn record_principal_lookup(source: &str, status: &str) {
    counter!("gate_principal_lookups_total", "source" => source.to_string(), "status" => status.to_string())
        .increment(1);
}
