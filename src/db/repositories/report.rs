use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use crate::entities::reports;

/// Report persistence. Every read and write on an existing record filters
/// on `owner_id`, so a report owned by someone else is indistinguishable
/// from one that does not exist.
pub struct ReportRepository {
    conn: DatabaseConnection,
}

impl ReportRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn list_for_owner(&self, owner_id: i32) -> Result<Vec<reports::Model>> {
        reports::Entity::find()
            .filter(reports::Column::OwnerId.eq(owner_id))
            .order_by_desc(reports::Column::CreatedAt)
            .all(&self.conn)
            .await
            .context("Failed to list reports")
    }

    pub async fn find_owned(&self, id: i32, owner_id: i32) -> Result<Option<reports::Model>> {
        reports::Entity::find()
            .filter(reports::Column::Id.eq(id))
            .filter(reports::Column::OwnerId.eq(owner_id))
            .one(&self.conn)
            .await
            .context("Failed to query report")
    }

    pub async fn insert(
        &self,
        title: &str,
        content: &str,
        owner_id: i32,
        now: String,
    ) -> Result<reports::Model> {
        let active = reports::ActiveModel {
            title: Set(title.to_string()),
            content: Set(content.to_string()),
            owner_id: Set(owner_id),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };

        active
            .insert(&self.conn)
            .await
            .context("Failed to insert report")
    }

    /// Replaces title and content, refreshing `updated_at`. `owner_id` and
    /// `created_at` are immutable. Returns `None` when the report does not
    /// exist under this owner.
    pub async fn update_owned(
        &self,
        id: i32,
        owner_id: i32,
        title: &str,
        content: &str,
        now: String,
    ) -> Result<Option<reports::Model>> {
        let Some(report) = self.find_owned(id, owner_id).await? else {
            return Ok(None);
        };

        let mut active: reports::ActiveModel = report.into();
        active.title = Set(title.to_string());
        active.content = Set(content.to_string());
        active.updated_at = Set(now);

        let updated = active
            .update(&self.conn)
            .await
            .context("Failed to update report")?;

        Ok(Some(updated))
    }

    pub async fn delete_owned(&self, id: i32, owner_id: i32) -> Result<bool> {
        let result = reports::Entity::delete_many()
            .filter(reports::Column::Id.eq(id))
            .filter(reports::Column::OwnerId.eq(owner_id))
            .exec(&self.conn)
            .await
            .context("Failed to delete report")?;

        Ok(result.rows_affected > 0)
    }

    /// Removes every report owned by `owner_id`. Used when an account is
    /// deleted so no report outlives its owner.
    pub async fn delete_for_owner(&self, owner_id: i32) -> Result<u64> {
        let result = reports::Entity::delete_many()
            .filter(reports::Column::OwnerId.eq(owner_id))
            .exec(&self.conn)
            .await
            .context("Failed to delete reports for owner")?;

        Ok(result.rows_affected)
    }
}
