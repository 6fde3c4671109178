use anyhow::Result;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::entities::{reports, users};

pub mod migrator;
pub mod repositories;

pub use repositories::user::{NewUser, UserWriteError};

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if !db_url.contains(":memory:") {
            let path_str = db_url.trim_start_matches("sqlite:");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    fn report_repo(&self) -> repositories::report::ReportRepository {
        repositories::report::ReportRepository::new(self.conn.clone())
    }

    // Users

    pub async fn username_exists(&self, username: &str) -> Result<bool> {
        self.user_repo().username_exists(username).await
    }

    pub async fn email_exists(&self, email: &str) -> Result<bool> {
        self.user_repo().email_exists(email).await
    }

    pub async fn email_taken_by_other(&self, email: &str, user_id: i32) -> Result<bool> {
        self.user_repo().email_taken_by_other(email, user_id).await
    }

    pub async fn find_user(&self, id: i32) -> Result<Option<users::Model>> {
        self.user_repo().find_by_id(id).await
    }

    pub async fn find_user_by_username(&self, username: &str) -> Result<Option<users::Model>> {
        self.user_repo().find_by_username(username).await
    }

    pub async fn list_users(&self) -> Result<Vec<users::Model>> {
        self.user_repo().list_all().await
    }

    pub async fn insert_user(&self, new: NewUser<'_>) -> Result<users::Model, UserWriteError> {
        self.user_repo().insert(new).await
    }

    pub async fn update_user(
        &self,
        id: i32,
        email: Option<&str>,
        password_hash: Option<&str>,
    ) -> Result<Option<users::Model>, UserWriteError> {
        self.user_repo().update(id, email, password_hash).await
    }

    pub async fn delete_user(&self, id: i32) -> Result<bool> {
        self.user_repo().delete(id).await
    }

    // Reports

    pub async fn list_reports(&self, owner_id: i32) -> Result<Vec<reports::Model>> {
        self.report_repo().list_for_owner(owner_id).await
    }

    pub async fn find_report(&self, id: i32, owner_id: i32) -> Result<Option<reports::Model>> {
        self.report_repo().find_owned(id, owner_id).await
    }

    pub async fn insert_report(
        &self,
        title: &str,
        content: &str,
        owner_id: i32,
        now: String,
    ) -> Result<reports::Model> {
        self.report_repo()
            .insert(title, content, owner_id, now)
            .await
    }

    pub async fn update_report(
        &self,
        id: i32,
        owner_id: i32,
        title: &str,
        content: &str,
        now: String,
    ) -> Result<Option<reports::Model>> {
        self.report_repo()
            .update_owned(id, owner_id, title, content, now)
            .await
    }

    pub async fn delete_report(&self, id: i32, owner_id: i32) -> Result<bool> {
        self.report_repo().delete_owned(id, owner_id).await
    }

    pub async fn delete_reports_for_owner(&self, owner_id: i32) -> Result<u64> {
        self.report_repo().delete_for_owner(owner_id).await
    }
}
