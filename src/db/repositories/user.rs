use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, SqlErr,
};
use thiserror::Error;

use crate::entities::users;

/// Insert/update failure surfaced with enough detail to translate a
/// storage-level unique constraint violation into the same validation
/// error the uniqueness pre-checks produce.
#[derive(Debug, Error)]
pub enum UserWriteError {
    #[error("Username is already taken")]
    DuplicateUsername,

    #[error("Email is already registered")]
    DuplicateEmail,

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

fn classify_write_error(err: DbErr) -> UserWriteError {
    if let Some(SqlErr::UniqueConstraintViolation(detail)) = err.sql_err() {
        if detail.contains("username") {
            return UserWriteError::DuplicateUsername;
        }
        if detail.contains("email") {
            return UserWriteError::DuplicateEmail;
        }
    }
    UserWriteError::Other(anyhow::Error::new(err).context("Failed to write user"))
}

pub struct NewUser<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub role: &'a str,
    pub created_at: String,
}

pub struct UserRepository {
    conn: DatabaseConnection,
}

impl UserRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn username_exists(&self, username: &str) -> Result<bool> {
        let count = users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .count(&self.conn)
            .await
            .context("Failed to check username uniqueness")?;

        Ok(count > 0)
    }

    pub async fn email_exists(&self, email: &str) -> Result<bool> {
        let count = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .count(&self.conn)
            .await
            .context("Failed to check email uniqueness")?;

        Ok(count > 0)
    }

    /// True if another account than `user_id` already holds `email`.
    pub async fn email_taken_by_other(&self, email: &str, user_id: i32) -> Result<bool> {
        let count = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .filter(users::Column::Id.ne(user_id))
            .count(&self.conn)
            .await
            .context("Failed to check email uniqueness")?;

        Ok(count > 0)
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<users::Model>> {
        users::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query user by id")
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<users::Model>> {
        users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .one(&self.conn)
            .await
            .context("Failed to query user by username")
    }

    pub async fn list_all(&self) -> Result<Vec<users::Model>> {
        users::Entity::find()
            .order_by_asc(users::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list users")
    }

    pub async fn insert(&self, new: NewUser<'_>) -> Result<users::Model, UserWriteError> {
        let active = users::ActiveModel {
            username: Set(new.username.to_string()),
            email: Set(new.email.to_string()),
            password_hash: Set(new.password_hash.to_string()),
            role: Set(new.role.to_string()),
            created_at: Set(new.created_at),
            ..Default::default()
        };

        active.insert(&self.conn).await.map_err(classify_write_error)
    }

    /// Read-modify-write update of email and/or password hash.
    /// Returns `None` if the user no longer exists.
    pub async fn update(
        &self,
        id: i32,
        email: Option<&str>,
        password_hash: Option<&str>,
    ) -> Result<Option<users::Model>, UserWriteError> {
        let Some(user) = self
            .find_by_id(id)
            .await
            .map_err(UserWriteError::Other)?
        else {
            return Ok(None);
        };

        let mut active: users::ActiveModel = user.into();

        if let Some(email) = email {
            active.email = Set(email.to_string());
        }
        if let Some(hash) = password_hash {
            active.password_hash = Set(hash.to_string());
        }

        let updated = active.update(&self.conn).await.map_err(classify_write_error)?;

        Ok(Some(updated))
    }

    pub async fn delete(&self, id: i32) -> Result<bool> {
        let result = users::Entity::delete_by_id(id)
            .exec(&self.conn)
            .await
            .context("Failed to delete user")?;

        Ok(result.rows_affected > 0)
    }
}
