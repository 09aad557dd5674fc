//! Observability for the gateway: bounded-cardinality metrics and error
//! categorization.
//!
//! Authentication failures are frequent and attacker-controlled; labels are
//! restricted to small fixed sets so metric cardinality stays bounded no
//! matter what callers send. Tokens and account names never appear in labels
//! or log fields.

pub mod metrics;

use crate::errors::GateError;

/// Error categories for metrics labels (bounded cardinality).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// No usable credential presented.
    Authentication,
    /// Credential presented but rejected (shape, signature, claims).
    Cryptographic,
    /// Server-side faults: directory errors, missing administrator account.
    Internal,
}

impl ErrorCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Authentication => "authentication",
            ErrorCategory::Cryptographic => "cryptographic",
            ErrorCategory::Internal => "internal",
        }
    }
}

impl From<&GateError> for ErrorCategory {
    fn from(err: &GateError) -> Self {
        match err {
            GateError::MissingCredential => ErrorCategory::Authentication,
            GateError::MalformedToken | GateError::InvalidCredential(_) => {
                ErrorCategory::Cryptographic
            }
            GateError::NoPrincipalAvailable | GateError::Database(_) | GateError::Internal => {
                ErrorCategory::Internal
            }
        }
    }
}
