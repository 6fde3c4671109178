//! `SeaORM` implementation of the [`ReportService`] trait.

use crate::db::Store;
use crate::entities::reports;
use crate::services::report_service::{Report, ReportDraft, ReportError, ReportService};

pub const MAX_TITLE_LEN: usize = 200;

pub struct SeaOrmReportService {
    store: Store,
}

impl SeaOrmReportService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }
}

fn validate_draft(draft: &ReportDraft) -> Result<(), ReportError> {
    if draft.title.trim().is_empty() {
        return Err(ReportError::Validation("Title is required".to_string()));
    }
    if draft.title.len() > MAX_TITLE_LEN {
        return Err(ReportError::Validation(format!(
            "Title must be at most {MAX_TITLE_LEN} characters"
        )));
    }
    if draft.content.trim().is_empty() {
        return Err(ReportError::Validation("Content is required".to_string()));
    }
    Ok(())
}

impl From<reports::Model> for Report {
    fn from(model: reports::Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            content: model.content,
            owner_id: model.owner_id,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[async_trait::async_trait]
impl ReportService for SeaOrmReportService {
    async fn list(&self, caller_id: i32) -> Result<Vec<Report>, ReportError> {
        let reports = self.store.list_reports(caller_id).await?;
        Ok(reports.into_iter().map(Report::from).collect())
    }

    async fn get(&self, report_id: i32, caller_id: i32) -> Result<Report, ReportError> {
        self.store
            .find_report(report_id, caller_id)
            .await?
            .map(Report::from)
            .ok_or(ReportError::NotFound)
    }

    async fn create(&self, draft: ReportDraft, caller_id: i32) -> Result<Report, ReportError> {
        validate_draft(&draft)?;

        let now = chrono::Utc::now().to_rfc3339();
        let stored = self
            .store
            .insert_report(&draft.title, &draft.content, caller_id, now)
            .await?;

        Ok(stored.into())
    }

    async fn update(
        &self,
        report_id: i32,
        patch: ReportDraft,
        caller_id: i32,
    ) -> Result<Report, ReportError> {
        validate_draft(&patch)?;

        let now = chrono::Utc::now().to_rfc3339();
        self.store
            .update_report(report_id, caller_id, &patch.title, &patch.content, now)
            .await?
            .map(Report::from)
            .ok_or(ReportError::NotFound)
    }

    async fn delete(&self, report_id: i32, caller_id: i32) -> Result<(), ReportError> {
        if self.store.delete_report(report_id, caller_id).await? {
            Ok(())
        } else {
            Err(ReportError::NotFound)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::NewUser;

    async fn service() -> (SeaOrmReportService, Store) {
        // A single connection keeps the in-memory database alive across queries.
        let store = Store::with_pool_options("sqlite::memory:", 1, 1)
            .await
            .unwrap();
        (SeaOrmReportService::new(store.clone()), store)
    }

    /// Reports carry a foreign key to their owner, so tests need real
    /// account rows.
    async fn seed_user(store: &Store, username: &str) -> i32 {
        store
            .insert_user(NewUser {
                username,
                email: &format!("{username}@example.com"),
                password_hash: "x",
                role: "User",
                created_at: chrono::Utc::now().to_rfc3339(),
            })
            .await
            .unwrap()
            .id
    }

    fn draft(title: &str, content: &str) -> ReportDraft {
        ReportDraft {
            title: title.to_string(),
            content: content.to_string(),
        }
    }

    #[tokio::test]
    async fn create_then_get_round_trip() {
        let (svc, store) = service().await;
        let owner = seed_user(&store, "alice").await;

        let created = svc.create(draft("T", "C"), owner).await.unwrap();
        assert_eq!(created.owner_id, owner);
        assert_eq!(created.created_at, created.updated_at);

        let fetched = svc.get(created.id, owner).await.unwrap();
        assert_eq!(fetched.title, "T");
        assert_eq!(fetched.content, "C");
        assert_eq!(fetched.owner_id, owner);
    }

    #[tokio::test]
    async fn ownership_is_enforced_on_every_operation() {
        let (svc, store) = service().await;
        let alice = seed_user(&store, "alice").await;
        let bob = seed_user(&store, "bob").await;

        let created = svc.create(draft("T", "C"), alice).await.unwrap();

        // Another caller sees the report as nonexistent.
        assert!(matches!(
            svc.get(created.id, bob).await,
            Err(ReportError::NotFound)
        ));
        assert!(matches!(
            svc.update(created.id, draft("X", "Y"), bob).await,
            Err(ReportError::NotFound)
        ));
        assert!(matches!(
            svc.delete(created.id, bob).await,
            Err(ReportError::NotFound)
        ));

        // The owner still sees the untouched record.
        let fetched = svc.get(created.id, alice).await.unwrap();
        assert_eq!(fetched.title, "T");
    }

    #[tokio::test]
    async fn update_refreshes_updated_at_only() {
        let (svc, store) = service().await;
        let owner = seed_user(&store, "alice").await;
        let created = svc.create(draft("T", "C"), owner).await.unwrap();

        tokio::time::sleep(std::time::Duration::from_millis(5)).await;

        let updated = svc
            .update(created.id, draft("T2", "C2"), owner)
            .await
            .unwrap();

        assert_eq!(updated.title, "T2");
        assert_eq!(updated.content, "C2");
        assert_eq!(updated.created_at, created.created_at);
        assert_eq!(updated.owner_id, owner);
        assert!(updated.updated_at >= created.updated_at);
    }

    #[tokio::test]
    async fn delete_then_get_is_not_found() {
        let (svc, store) = service().await;
        let owner = seed_user(&store, "alice").await;
        let created = svc.create(draft("T", "C"), owner).await.unwrap();

        svc.delete(created.id, owner).await.unwrap();
        assert!(matches!(
            svc.get(created.id, owner).await,
            Err(ReportError::NotFound)
        ));
    }

    #[tokio::test]
    async fn list_is_owner_scoped_and_newest_first() {
        let (svc, store) = service().await;
        let alice = seed_user(&store, "alice").await;
        let bob = seed_user(&store, "bob").await;

        // Insert with explicit timestamps so the ordering is deterministic.
        store
            .insert_report("old", "c", alice, "2026-01-01T00:00:00+00:00".to_string())
            .await
            .unwrap();
        store
            .insert_report("new", "c", alice, "2026-02-01T00:00:00+00:00".to_string())
            .await
            .unwrap();
        store
            .insert_report("other", "c", bob, "2026-03-01T00:00:00+00:00".to_string())
            .await
            .unwrap();

        let listed = svc.list(alice).await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].title, "new");
        assert_eq!(listed[1].title, "old");

        // Empty, not an error, for a caller with no reports.
        let carol = seed_user(&store, "carol").await;
        assert!(svc.list(carol).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn rejects_invalid_drafts() {
        let (svc, store) = service().await;
        let owner = seed_user(&store, "alice").await;

        assert!(matches!(
            svc.create(draft("", "C"), owner).await,
            Err(ReportError::Validation(_))
        ));
        assert!(matches!(
            svc.create(draft("T", ""), owner).await,
            Err(ReportError::Validation(_))
        ));
        assert!(matches!(
            svc.create(draft(&"x".repeat(201), "C"), owner).await,
            Err(ReportError::Validation(_))
        ));
    }
}
