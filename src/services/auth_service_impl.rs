//! `SeaORM` implementation of the [`AuthService`] trait.

use std::sync::Arc;

use tokio::task;

use crate::auth::{PasswordHasher, Role, TokenIssuer};
use crate::db::{NewUser, Store, UserWriteError};
use crate::entities::users;
use crate::services::auth_service::{AuthError, AuthService, Session};

pub const MAX_USERNAME_LEN: usize = 100;
pub const MAX_EMAIL_LEN: usize = 255;

pub struct SeaOrmAuthService {
    store: Store,
    hasher: Arc<dyn PasswordHasher>,
    tokens: TokenIssuer,
}

impl SeaOrmAuthService {
    #[must_use]
    pub fn new(store: Store, hasher: Arc<dyn PasswordHasher>, tokens: TokenIssuer) -> Self {
        Self {
            store,
            hasher,
            tokens,
        }
    }

    fn session_from(&self, user: &users::Model) -> Result<Session, AuthError> {
        let role: Role = user
            .role
            .parse()
            .map_err(|e| AuthError::Internal(format!("Stored role is invalid: {e}")))?;

        let token = self
            .tokens
            .issue(user.id, &user.username, role)
            .map_err(|e| AuthError::Internal(format!("Token issuance failed: {e}")))?;

        Ok(Session {
            user_id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            role,
            token,
        })
    }

    /// Argon2 is CPU-expensive by design; keep it off the async workers.
    async fn hash_password(&self, password: &str) -> Result<String, AuthError> {
        let hasher = Arc::clone(&self.hasher);
        let password = password.to_string();

        task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| AuthError::Internal(format!("Password hashing task panicked: {e}")))?
            .map_err(|e| AuthError::Internal(format!("{e:#}")))
    }

    async fn verify_password(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        let hasher = Arc::clone(&self.hasher);
        let password = password.to_string();
        let hash = hash.to_string();

        task::spawn_blocking(move || hasher.verify(&password, &hash))
            .await
            .map_err(|e| AuthError::Internal(format!("Password verification task panicked: {e}")))
    }
}

fn validate_registration(username: &str, email: &str, password: &str) -> Result<(), AuthError> {
    if username.is_empty() {
        return Err(AuthError::Validation("Username is required".to_string()));
    }
    if username.len() > MAX_USERNAME_LEN {
        return Err(AuthError::Validation(format!(
            "Username must be at most {MAX_USERNAME_LEN} characters"
        )));
    }
    if email.is_empty() {
        return Err(AuthError::Validation("Email is required".to_string()));
    }
    if email.len() > MAX_EMAIL_LEN {
        return Err(AuthError::Validation(format!(
            "Email must be at most {MAX_EMAIL_LEN} characters"
        )));
    }
    if !looks_like_email(email) {
        return Err(AuthError::Validation(
            "Email address is invalid".to_string(),
        ));
    }
    if password.is_empty() {
        return Err(AuthError::Validation("Password is required".to_string()));
    }
    Ok(())
}

pub(crate) fn looks_like_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && !domain.is_empty())
}

#[async_trait::async_trait]
impl AuthService for SeaOrmAuthService {
    async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<Session, AuthError> {
        validate_registration(username, email, password)?;

        // Two independent pre-checks; either failure aborts before creation.
        if self.store.username_exists(username).await? {
            return Err(AuthError::UsernameTaken);
        }
        if self.store.email_exists(email).await? {
            return Err(AuthError::EmailTaken);
        }

        let password_hash = self.hash_password(password).await?;

        // Concurrent registrations can both pass the pre-checks; the unique
        // constraints settle the race and surface the same error.
        let user = self
            .store
            .insert_user(NewUser {
                username,
                email,
                password_hash: &password_hash,
                role: Role::User.as_str(),
                created_at: chrono::Utc::now().to_rfc3339(),
            })
            .await
            .map_err(|e| match e {
                UserWriteError::DuplicateUsername => AuthError::UsernameTaken,
                UserWriteError::DuplicateEmail => AuthError::EmailTaken,
                UserWriteError::Other(e) => e.into(),
            })?;

        tracing::info!("Registered new account: {}", user.username);

        self.session_from(&user)
    }

    async fn login(&self, username: &str, password: &str) -> Result<Session, AuthError> {
        let Some(user) = self.store.find_user_by_username(username).await? else {
            return Err(AuthError::InvalidCredentials);
        };

        if !self.verify_password(password, &user.password_hash).await? {
            return Err(AuthError::InvalidCredentials);
        }

        self.session_from(&user)
    }
}
