use crate::entities::prelude::*;
use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::Schema;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Hash the bootstrap admin password using Argon2id.
fn hash_bootstrap_password() -> Result<String, DbErr> {
    use argon2::{
        Argon2,
        password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
    };

    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(b"admin", &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| DbErr::Custom(format!("Failed to hash bootstrap password: {e}")))
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let backend = manager.get_database_backend();
        let schema = Schema::new(backend);

        // Unique indexes on username/email and the reports FK come from the
        // entity definitions. The unique constraints are the final authority
        // for concurrent duplicate registrations.
        manager
            .create_table(
                schema
                    .create_table_from_entity(Users)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(Reports)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_reports_owner_id")
                    .table(Reports)
                    .col(crate::entities::reports::Column::OwnerId)
                    .to_owned(),
            )
            .await?;

        // Seed bootstrap admin account. Deployments should change the
        // password immediately after first login.
        let now = chrono::Utc::now().to_rfc3339();
        let password_hash = hash_bootstrap_password()?;

        let insert = sea_orm_migration::sea_query::Query::insert()
            .into_table(Users)
            .columns([
                crate::entities::users::Column::Username,
                crate::entities::users::Column::Email,
                crate::entities::users::Column::PasswordHash,
                crate::entities::users::Column::Role,
                crate::entities::users::Column::CreatedAt,
            ])
            .values_panic([
                "admin".into(),
                "admin@localhost".into(),
                password_hash.into(),
                "Admin".into(),
                now.into(),
            ])
            .to_owned();

        manager.exec_stmt(insert).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Reports).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Users).to_owned())
            .await?;

        Ok(())
    }
}
