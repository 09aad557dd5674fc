//! HTTP request handlers.

pub mod transport;
