//! MCP Auth Gateway service library
//!
//! This library provides the request-authentication gateway that fronts an
//! MCP transport endpoint: every request under the protected path must carry
//! a bearer token that verifies as an RS256-signed JWT against the gateway's
//! trust anchor, and a verified request is bound to the installation's
//! administrator principal for downstream handling.
//!
//! # Modules
//!
//! - `config` - Service configuration
//! - `crypto` - Token verification (RS256 JWT against the trust anchor)
//! - `errors` - Error types
//! - `handlers` - HTTP request handlers
//! - `middleware` - Authentication middleware
//! - `models` - Data models
//! - `observability` - Metrics and error categorization
//! - `repositories` - User directory access layer
//! - `routes` - Route construction
//! - `services` - Authorization orchestration and principal resolution

pub mod config;
pub mod crypto;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod observability;
pub mod repositories;
pub mod routes;
pub mod services;
