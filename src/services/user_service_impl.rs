//! `SeaORM` implementation of the [`UserService`] trait.

use std::sync::Arc;

use tokio::task;

use crate::auth::{PasswordHasher, Role};
use crate::db::{Store, UserWriteError};
use crate::entities::users;
use crate::services::auth_service_impl::{MAX_EMAIL_LEN, looks_like_email};
use crate::services::user_service::{Account, AccountPatch, UserError, UserService};

pub struct SeaOrmUserService {
    store: Store,
    hasher: Arc<dyn PasswordHasher>,
}

impl SeaOrmUserService {
    #[must_use]
    pub fn new(store: Store, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self { store, hasher }
    }

    async fn hash_password(&self, password: &str) -> Result<String, UserError> {
        let hasher = Arc::clone(&self.hasher);
        let password = password.to_string();

        task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| UserError::Internal(format!("Password hashing task panicked: {e}")))?
            .map_err(|e| UserError::Internal(format!("{e:#}")))
    }

    /// Deletes the account and everything it owns. Reports go first so no
    /// report ever references a deleted account.
    async fn delete_with_reports(&self, user_id: i32) -> Result<(), UserError> {
        let removed = self.store.delete_reports_for_owner(user_id).await?;
        if removed > 0 {
            tracing::info!("Removed {removed} reports owned by account {user_id}");
        }

        if self.store.delete_user(user_id).await? {
            Ok(())
        } else {
            Err(UserError::NotFound)
        }
    }
}

fn account_from(model: users::Model) -> Result<Account, UserError> {
    let role: Role = model
        .role
        .parse()
        .map_err(|e| UserError::Internal(format!("Stored role is invalid: {e}")))?;

    Ok(Account {
        id: model.id,
        username: model.username,
        email: model.email,
        role,
        created_at: model.created_at,
    })
}

#[async_trait::async_trait]
impl UserService for SeaOrmUserService {
    async fn current(&self, caller_id: i32) -> Result<Account, UserError> {
        self.store
            .find_user(caller_id)
            .await?
            .map(account_from)
            .ok_or(UserError::NotFound)?
    }

    async fn update_current(
        &self,
        caller_id: i32,
        patch: AccountPatch,
    ) -> Result<Account, UserError> {
        // Empty strings are treated the same as absent fields.
        let email = patch.email.as_deref().filter(|e| !e.is_empty());
        let password = patch.password.as_deref().filter(|p| !p.is_empty());

        if let Some(email) = email {
            if email.len() > MAX_EMAIL_LEN {
                return Err(UserError::Validation(format!(
                    "Email must be at most {MAX_EMAIL_LEN} characters"
                )));
            }
            if !looks_like_email(email) {
                return Err(UserError::Validation(
                    "Email address is invalid".to_string(),
                ));
            }
            if self.store.email_taken_by_other(email, caller_id).await? {
                return Err(UserError::EmailTaken);
            }
        }

        let password_hash = match password {
            Some(password) => Some(self.hash_password(password).await?),
            None => None,
        };

        let updated = self
            .store
            .update_user(caller_id, email, password_hash.as_deref())
            .await
            .map_err(|e| match e {
                // The pre-check raced against a concurrent update; same error.
                UserWriteError::DuplicateEmail => UserError::EmailTaken,
                UserWriteError::DuplicateUsername => {
                    UserError::Internal("Unexpected username conflict".to_string())
                }
                UserWriteError::Other(e) => e.into(),
            })?
            .ok_or(UserError::NotFound)?;

        account_from(updated)
    }

    async fn delete_current(&self, caller_id: i32) -> Result<(), UserError> {
        self.delete_with_reports(caller_id).await
    }

    async fn list_all(&self, caller_role: Role) -> Result<Vec<Account>, UserError> {
        if !caller_role.is_admin() {
            return Err(UserError::Forbidden);
        }

        self.store
            .list_users()
            .await?
            .into_iter()
            .map(account_from)
            .collect()
    }

    async fn delete_account(&self, target_id: i32, caller_role: Role) -> Result<(), UserError> {
        if !caller_role.is_admin() {
            return Err(UserError::Forbidden);
        }

        self.delete_with_reports(target_id).await
    }
}
