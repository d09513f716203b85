//! API error type: every handler failure funnels through [`ApiError`] so
//! status codes and bodies stay consistent across the surface.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use reelvault_auth::AuthError;
use reelvault_core::CoreError;
use reelvault_storage::StorageError;
use serde_json::json;
use thiserror::Error;

use crate::contracts::{ValidationErrorResponse, ValidationFailureResponse};

#[derive(Debug, Error)]
pub enum ApiError {
    /// One or more validation rules failed; all failures are reported.
    #[error("validation failed")]
    Validation(Vec<ValidationFailureResponse>),

    #[error("resource not found")]
    NotFound,

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        if err.is_client_error() {
            Self::InvalidRequest(err.to_string())
        } else {
            Self::Internal(err.to_string())
        }
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        Self::Internal(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                Json(ValidationErrorResponse { errors }),
            )
                .into_response(),
            ApiError::NotFound => StatusCode::NOT_FOUND.into_response(),
            ApiError::InvalidRequest(message) => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": message })),
            )
                .into_response(),
            ApiError::Auth(err) => err.into_response(),
            ApiError::Internal(message) => {
                // Internals are logged, never leaked to clients.
                tracing::error!(error = %message, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "internal server error" })),
                )
                    .into_response()
            }
        }
    }
}
