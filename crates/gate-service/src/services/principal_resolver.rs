//! Principal resolution with a bounded-TTL directory-lookup cache.

use crate::errors::GateError;
use crate::models::Principal;
use crate::observability::metrics::record_principal_lookup;
use crate::repositories::users::UserDirectory;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

struct CacheEntry {
    principal: Principal,
    expires_at: Instant,
}

/// Single-entry cache for the resolved principal.
///
/// An explicit object (rather than process-global state) so the TTL and
/// invalidation are testable and nothing leaks across instances. This cache
/// only avoids repeated directory reads under load; it is not a security
/// boundary and every request still re-verifies its own token.
pub struct PrincipalCache {
    entry: RwLock<Option<CacheEntry>>,
    ttl: Duration,
}

impl PrincipalCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entry: RwLock::new(None),
            ttl,
        }
    }

    /// Cached principal, if present and unexpired. A poisoned lock is
    /// treated as a miss.
    pub fn get(&self) -> Option<Principal> {
        let guard = self.entry.read().ok()?;
        guard
            .as_ref()
            .filter(|entry| entry.expires_at > Instant::now())
            .map(|entry| entry.principal.clone())
    }

    /// Replace the cached entry. Concurrent writers race benignly: entry
    /// replacement is atomic and the resolved value is deterministic, so
    /// last-writer-wins is safe.
    pub fn put(&self, principal: Principal) {
        if let Ok(mut guard) = self.entry.write() {
            *guard = Some(CacheEntry {
                principal,
                expires_at: Instant::now() + self.ttl,
            });
        }
    }

    /// Drop the cached entry; the next resolve will query the directory.
    pub fn invalidate(&self) {
        if let Ok(mut guard) = self.entry.write() {
            *guard = None;
        }
    }
}

/// Maps a verified request to the acting principal.
///
/// The token's own identity claims are never consulted; resolution always
/// selects the installation's first administrator account.
pub struct PrincipalResolver {
    directory: Arc<dyn UserDirectory>,
    cache: PrincipalCache,
}

impl PrincipalResolver {
    pub fn new(directory: Arc<dyn UserDirectory>, cache_ttl: Duration) -> Self {
        Self {
            directory,
            cache: PrincipalCache::new(cache_ttl),
        }
    }

    /// Resolve the acting principal, serving from cache when fresh.
    ///
    /// An empty directory result is a configuration error, not cached, and
    /// reported distinctly from any token failure.
    pub async fn resolve(&self) -> Result<Principal, GateError> {
        if let Some(principal) = self.cache.get() {
            record_principal_lookup("cache", "success");
            return Ok(principal);
        }

        match self.directory.first_administrator().await? {
            Some(principal) => {
                self.cache.put(principal.clone());
                record_principal_lookup("directory", "success");
                Ok(principal)
            }
            None => {
                record_principal_lookup("directory", "empty");
                Err(GateError::NoPrincipalAvailable)
            }
        }
    }

    /// Explicit invalidation hook for operators (e.g. after changing the
    /// administrator account).
    pub fn invalidate_cache(&self) {
        self.cache.invalidate();
    }
}
