use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::{ApiError, AppState};
use crate::auth::CallerIdentity;
use crate::services::{Account, AccountPatch};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountDto {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub role: String,
    pub created_at: String,
}

impl From<Account> for AccountDto {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            username: account.username,
            email: account.email,
            role: account.role.as_str().to_string(),
            created_at: account.created_at,
        }
    }
}

#[derive(Deserialize)]
pub struct UpdateAccountRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// GET /api/users/current
pub async fn get_current_account(
    State(state): State<Arc<AppState>>,
    caller: CallerIdentity,
) -> Result<Json<AccountDto>, ApiError> {
    let account = state.user_service.current(caller.user_id).await?;

    Ok(Json(account.into()))
}

/// PUT /api/users/current
pub async fn update_current_account(
    State(state): State<Arc<AppState>>,
    caller: CallerIdentity,
    Json(payload): Json<UpdateAccountRequest>,
) -> Result<Json<AccountDto>, ApiError> {
    let patch = AccountPatch {
        email: payload.email,
        password: payload.password,
    };

    let account = state
        .user_service
        .update_current(caller.user_id, patch)
        .await?;

    Ok(Json(account.into()))
}

/// DELETE /api/users/current
pub async fn delete_current_account(
    State(state): State<Arc<AppState>>,
    caller: CallerIdentity,
) -> Result<StatusCode, ApiError> {
    state.user_service.delete_current(caller.user_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/users (Admin only)
pub async fn list_accounts(
    State(state): State<Arc<AppState>>,
    caller: CallerIdentity,
) -> Result<Json<Vec<AccountDto>>, ApiError> {
    let accounts = state.user_service.list_all(caller.role).await?;

    Ok(Json(accounts.into_iter().map(AccountDto::from).collect()))
}

/// DELETE /api/users/{id} (Admin only)
pub async fn delete_account(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    caller: CallerIdentity,
) -> Result<StatusCode, ApiError> {
    state.user_service.delete_account(id, caller.role).await?;

    Ok(StatusCode::NO_CONTENT)
}
