use axum::{
    Json,
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, request::Parts},
    middleware::Next,
    response::Response,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::{ApiError, AppState};
use crate::auth::{CallerIdentity, TokenIssuer};
use crate::services::Session;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub user_id: i32,
    pub username: String,
    pub email: String,
    pub role: String,
    pub token: String,
}

impl From<Session> for AuthResponse {
    fn from(session: Session) -> Self {
        Self {
            user_id: session.user_id,
            username: session.username,
            email: session.email,
            role: session.role.as_str().to_string(),
            token: session.token,
        }
    }
}

// ============================================================================
// Middleware
// ============================================================================

/// Bearer-token middleware for every protected route. Validates the JWT
/// (signature, issuer, audience, expiry) and injects the caller identity
/// into request extensions before any handler runs.
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer_token(&headers).map_err(ApiError::unauthorized)?;

    let claims = state
        .tokens
        .validate(&token)
        .map_err(|e| ApiError::unauthorized(e.to_string()))?;

    // A validated token with unusable claims is our bug, not the client's.
    let identity = TokenIssuer::caller_identity(&claims)
        .map_err(|e| ApiError::internal(e.to_string()))?;

    request.extensions_mut().insert(identity);

    Ok(next.run(request).await)
}

fn extract_bearer_token(headers: &HeaderMap) -> Result<String, String> {
    let auth_header = headers
        .get("Authorization")
        .ok_or_else(|| "Missing Authorization header".to_string())?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Invalid Authorization header format".to_string())?;

    if let Some(token) = auth_str.strip_prefix("Bearer ") {
        let token = token.trim();
        if token.is_empty() {
            return Err("Empty bearer token".to_string());
        }
        Ok(token.to_string())
    } else {
        Err("Authorization header must use Bearer token format".to_string())
    }
}

/// Extractor for the identity the middleware injected. Absence on a
/// protected route means a route was wired up without the middleware,
/// which is a programming error, not an authentication failure.
impl<S> FromRequestParts<S> for CallerIdentity
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Self>()
            .cloned()
            .ok_or_else(|| ApiError::internal("User ID not found in token"))
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/auth/register
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RegisterRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let session = state
        .auth_service
        .register(&payload.username, &payload.email, &payload.password)
        .await?;

    Ok(Json(session.into()))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let session = state
        .auth_service
        .login(&payload.username, &payload.password)
        .await?;

    Ok(Json(session.into()))
}
