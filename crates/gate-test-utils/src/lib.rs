//! Shared test fixtures for the auth gateway.
//!
//! Provides deterministic RSA keypairs with token-signing helpers, and
//! in-memory [`UserDirectory`](gate_service::repositories::users::UserDirectory)
//! implementations so service tests run without a database.

pub mod crypto_fixtures;
pub mod directory;
