//! In-memory user directory doubles.

use async_trait::async_trait;
use gate_service::errors::GateError;
use gate_service::models::Principal;
use gate_service::repositories::users::UserDirectory;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;

/// Directory backed by an in-memory account list.
///
/// Counts lookups so tests can assert whether a resolution hit the cache or
/// went to the directory.
pub struct InMemoryDirectory {
    admins: RwLock<Vec<Principal>>,
    lookups: AtomicUsize,
}

impl InMemoryDirectory {
    pub fn new(admins: Vec<Principal>) -> Self {
        Self {
            admins: RwLock::new(admins),
            lookups: AtomicUsize::new(0),
        }
    }

    /// A directory with a single administrator account.
    pub fn with_admin(user_id: i64, username: &str) -> Self {
        Self::new(vec![Principal {
            user_id,
            username: username.to_string(),
        }])
    }

    /// A directory with no administrator accounts.
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Number of `first_administrator` calls served so far.
    pub fn lookup_count(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    /// Add an administrator account after construction.
    pub fn add_admin(&self, user_id: i64, username: &str) {
        self.admins
            .write()
            .expect("directory lock should not be poisoned")
            .push(Principal {
                user_id,
                username: username.to_string(),
            });
    }
}

#[async_trait]
impl UserDirectory for InMemoryDirectory {
    async fn first_administrator(&self) -> Result<Option<Principal>, GateError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        let admins = self
            .admins
            .read()
            .expect("directory lock should not be poisoned");
        Ok(admins.iter().min_by_key(|p| p.user_id).cloned())
    }
}

/// Directory whose every lookup fails, for error-path tests.
pub struct FailingDirectory;

#[async_trait]
impl UserDirectory for FailingDirectory {
    async fn first_administrator(&self) -> Result<Option<Principal>, GateError> {
        Err(GateError::Database("directory unavailable".to_string()))
    }
}
