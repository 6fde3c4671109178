use axum::{
    Json,
    extract::{Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::{ApiError, AppState};
use crate::auth::CallerIdentity;
use crate::services::{Report, ReportDraft};

#[derive(Deserialize)]
pub struct ReportPayload {
    pub title: String,
    pub content: String,
}

impl From<ReportPayload> for ReportDraft {
    fn from(payload: ReportPayload) -> Self {
        Self {
            title: payload.title,
            content: payload.content,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportDto {
    pub id: i32,
    pub title: String,
    pub content: String,
    pub user_id: i32,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Report> for ReportDto {
    fn from(report: Report) -> Self {
        Self {
            id: report.id,
            title: report.title,
            content: report.content,
            user_id: report.owner_id,
            created_at: report.created_at,
            updated_at: report.updated_at,
        }
    }
}

/// GET /api/reports
pub async fn list_reports(
    State(state): State<Arc<AppState>>,
    caller: CallerIdentity,
) -> Result<Json<Vec<ReportDto>>, ApiError> {
    let reports = state.report_service.list(caller.user_id).await?;

    Ok(Json(reports.into_iter().map(ReportDto::from).collect()))
}

/// GET /api/reports/{id}
pub async fn get_report(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    caller: CallerIdentity,
) -> Result<Json<ReportDto>, ApiError> {
    let report = state.report_service.get(id, caller.user_id).await?;

    Ok(Json(report.into()))
}

/// POST /api/reports
pub async fn create_report(
    State(state): State<Arc<AppState>>,
    caller: CallerIdentity,
    Json(payload): Json<ReportPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let report = state
        .report_service
        .create(payload.into(), caller.user_id)
        .await?;

    let location = format!("/api/reports/{}", report.id);

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(ReportDto::from(report)),
    ))
}

/// PUT /api/reports/{id}
pub async fn update_report(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    caller: CallerIdentity,
    Json(payload): Json<ReportPayload>,
) -> Result<Json<ReportDto>, ApiError> {
    let report = state
        .report_service
        .update(id, payload.into(), caller.user_id)
        .await?;

    Ok(Json(report.into()))
}

/// DELETE /api/reports/{id}
pub async fn delete_report(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    caller: CallerIdentity,
) -> Result<StatusCode, ApiError> {
    state.report_service.delete(id, caller.user_id).await?;

    Ok(StatusCode::NO_CONTENT)
}
