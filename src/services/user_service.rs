//! Account self-service and administrative account operations.

use thiserror::Error;

use crate::auth::Role;

#[derive(Debug, Error)]
pub enum UserError {
    #[error("User not found")]
    NotFound,

    #[error("Email is already taken")]
    EmailTaken,

    #[error("Admin role required")]
    Forbidden,

    #[error("{0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<anyhow::Error> for UserError {
    fn from(err: anyhow::Error) -> Self {
        Self::Database(format!("{err:#}"))
    }
}

/// Outward-facing account representation. Deliberately has no field for the
/// password hash.
#[derive(Debug, Clone)]
pub struct Account {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub created_at: String,
}

/// Self-service update; empty or absent fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct AccountPatch {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[async_trait::async_trait]
pub trait UserService: Send + Sync {
    async fn current(&self, caller_id: i32) -> Result<Account, UserError>;

    /// # Errors
    ///
    /// Returns [`UserError::EmailTaken`] when the requested email already
    /// belongs to a different account.
    async fn update_current(
        &self,
        caller_id: i32,
        patch: AccountPatch,
    ) -> Result<Account, UserError>;

    /// Deletes the caller's account together with all reports it owns.
    async fn delete_current(&self, caller_id: i32) -> Result<(), UserError>;

    /// Admin only: all accounts, hashes stripped.
    async fn list_all(&self, caller_role: Role) -> Result<Vec<Account>, UserError>;

    /// Admin only: delete any account together with its reports.
    async fn delete_account(&self, target_id: i32, caller_role: Role) -> Result<(), UserError>;
}
