//! Data access layer for the external user directory.

pub mod users;
