//! Business logic layer: authorization orchestration and principal
//! resolution.

pub mod auth_gate;
pub mod principal_resolver;
