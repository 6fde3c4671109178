//! Domain service for registration and login.
//!
//! Verifies or creates credentials, delegates token issuance, and returns
//! an authenticated-session descriptor.

use thiserror::Error;

use crate::auth::Role;

/// Errors specific to authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Username is already taken")]
    UsernameTaken,

    #[error("Email is already registered")]
    EmailTaken,

    /// Unknown username and failed password verification produce this same
    /// variant, so neither response leaks which check failed.
    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("{0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        Self::Database(format!("{err:#}"))
    }
}

/// Authenticated-session descriptor returned by register and login.
#[derive(Debug, Clone)]
pub struct Session {
    pub user_id: i32,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub token: String,
}

/// Domain service trait for authentication.
#[async_trait::async_trait]
pub trait AuthService: Send + Sync {
    /// Creates a new account with role `User` and returns a fresh session.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::UsernameTaken`] / [`AuthError::EmailTaken`] when
    /// either uniqueness check (or the storage-level unique constraint)
    /// fails.
    async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<Session, AuthError>;

    /// Verifies credentials and returns a fresh session.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] if login fails.
    async fn login(&self, username: &str, password: &str) -> Result<Session, AuthError>;
}
