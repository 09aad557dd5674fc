//! User directory access.
//!
//! The gateway issues exactly one kind of read against the directory: the
//! first account holding the administrator role. The seam is a trait so the
//! resolver can be exercised without a database.

use crate::errors::GateError;
use crate::models::Principal;
use async_trait::async_trait;
use sqlx::PgPool;

/// Read-side seam over the external user store.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// The account holding the administrator role with the lowest user id,
    /// if any exists.
    async fn first_administrator(&self) -> Result<Option<Principal>, GateError>;
}

/// Postgres-backed directory (maps to the `users` / `user_roles` tables).
pub struct PgUserDirectory {
    pool: PgPool,
}

impl PgUserDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserDirectory for PgUserDirectory {
    async fn first_administrator(&self) -> Result<Option<Principal>, GateError> {
        let row: Option<(i64, String)> = sqlx::query_as(
            r#"
            SELECT u.user_id, u.username
            FROM users u
            JOIN user_roles r ON r.user_id = u.user_id
            WHERE r.role = 'administrator'
            ORDER BY u.user_id
            LIMIT 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            GateError::Database(format!("Failed to fetch administrator account: {}", e))
        })?;

        Ok(row.map(|(user_id, username)| Principal { user_id, username }))
    }
}
