//! HTTP error mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::error;

/// Error returned by handlers. Every variant renders as `{"detail": ...}`.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    Internal(insight_core::Error),
}

impl From<insight_core::Error> for ApiError {
    fn from(err: insight_core::Error) -> Self {
        match err {
            insight_core::Error::InvalidInput(msg) => ApiError::BadRequest(msg),
            insight_core::Error::NotFound(msg) => ApiError::NotFound(msg),
            other => ApiError::Internal(other),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Internal(err) => {
                error!(
                    subsystem = "api",
                    component = "error",
                    op = "into_response",
                    error = %err,
                    "Request failed"
                );
                (StatusCode::INTERNAL_SERVER_ERROR, err.detail())
            }
        };

        (status, Json(json!({ "detail": detail }))).into_response()
    }
}
