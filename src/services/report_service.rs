//! Domain service for user-owned report records.
//!
//! Every operation takes the caller's account id explicitly and enforces
//! that the target report belongs to the caller. A report owned by another
//! account is reported as not found.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Report not found")]
    NotFound,

    #[error("{0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<anyhow::Error> for ReportError {
    fn from(err: anyhow::Error) -> Self {
        Self::Database(format!("{err:#}"))
    }
}

#[derive(Debug, Clone)]
pub struct Report {
    pub id: i32,
    pub title: String,
    pub content: String,
    pub owner_id: i32,
    pub created_at: String,
    pub updated_at: String,
}

/// Incoming report fields; used for both create and update. Any owner or
/// timestamp information from the client is ignored.
#[derive(Debug, Clone)]
pub struct ReportDraft {
    pub title: String,
    pub content: String,
}

#[async_trait::async_trait]
pub trait ReportService: Send + Sync {
    /// Reports owned by the caller, newest first. Never fails with NotFound.
    async fn list(&self, caller_id: i32) -> Result<Vec<Report>, ReportError>;

    async fn get(&self, report_id: i32, caller_id: i32) -> Result<Report, ReportError>;

    /// Owner is forced to `caller_id`; `created_at == updated_at` on the
    /// stored record.
    async fn create(&self, draft: ReportDraft, caller_id: i32) -> Result<Report, ReportError>;

    /// Replaces title and content and refreshes `updated_at`. Owner and
    /// `created_at` are immutable.
    async fn update(
        &self,
        report_id: i32,
        patch: ReportDraft,
        caller_id: i32,
    ) -> Result<Report, ReportError>;

    async fn delete(&self, report_id: i32, caller_id: i32) -> Result<(), ReportError>;
}
