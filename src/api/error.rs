use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use std::fmt;

use crate::services::{AuthError, ReportError, UserError};

/// Request-boundary error. Services raise typed errors; only this type
/// decides status codes and response bodies.
#[derive(Debug)]
pub enum ApiError {
    Validation(String),

    Unauthorized(String),

    Forbidden(String),

    NotFound(String),

    InternalError(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation(msg) => write!(f, "Validation error: {msg}"),
            Self::Unauthorized(msg) => write!(f, "Unauthorized: {msg}"),
            Self::Forbidden(msg) => write!(f, "Forbidden: {msg}"),
            Self::NotFound(msg) => write!(f, "Not found: {msg}"),
            Self::InternalError(msg) => write!(f, "Internal error: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

/// Recovered errors produce a small `{message}` object; the generic 500
/// handler adds the status code and hides the detail.
#[derive(Serialize)]
struct ErrorBody {
    #[serde(rename = "statusCode", skip_serializing_if = "Option::is_none")]
    status_code: Option<u16>,

    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            Self::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            Self::Forbidden(msg) => (StatusCode::FORBIDDEN, msg.clone()),
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            Self::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An unexpected error occurred".to_string(),
                )
            }
        };

        let status_code = if status == StatusCode::INTERNAL_SERVER_ERROR {
            Some(status.as_u16())
        } else {
            None
        };

        let body = ErrorBody {
            status_code,
            message,
        };

        (status, Json(body)).into_response()
    }
}

impl ApiError {
    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::InternalError(msg.into())
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            // Credential failures surface as 400 on the auth endpoints.
            AuthError::UsernameTaken
            | AuthError::EmailTaken
            | AuthError::InvalidCredentials
            | AuthError::Validation(_) => Self::Validation(err.to_string()),
            AuthError::Database(msg) | AuthError::Internal(msg) => Self::InternalError(msg),
        }
    }
}

impl From<ReportError> for ApiError {
    fn from(err: ReportError) -> Self {
        match err {
            ReportError::NotFound => Self::NotFound(err.to_string()),
            ReportError::Validation(_) => Self::Validation(err.to_string()),
            ReportError::Database(msg) => Self::InternalError(msg),
        }
    }
}

impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::NotFound => Self::NotFound(err.to_string()),
            UserError::EmailTaken | UserError::Validation(_) => Self::Validation(err.to_string()),
            UserError::Forbidden => Self::Forbidden(err.to_string()),
            UserError::Database(msg) | UserError::Internal(msg) => Self::InternalError(msg),
        }
    }
}
