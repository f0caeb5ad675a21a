//! Application error type mapping to HTTP status codes.
//!
//! One translation point for the whole API: handlers return `AppError`
//! and the pipeline's error taxonomy maps onto statuses here. Provider
//! failures surface as 502 because the fault lies upstream of this
//! service.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use marketforge_types::error::PipelineError;

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Pipeline errors (validation, not-found, generation, storage).
    Pipeline(PipelineError),
    /// Missing or invalid API key.
    Unauthorized(String),
    /// Authenticated, but the resource belongs to someone else.
    Forbidden(String),
    /// Generic internal error.
    Internal(String),
}

impl From<PipelineError> for AppError {
    fn from(e: PipelineError) -> Self {
        AppError::Pipeline(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Pipeline(PipelineError::Validation(msg)) => {
                (StatusCode::BAD_REQUEST, msg.clone())
            }
            AppError::Pipeline(PipelineError::NotFound(what)) => {
                (StatusCode::NOT_FOUND, format!("{what} not found"))
            }
            AppError::Pipeline(PipelineError::Generation(e)) => {
                (StatusCode::BAD_GATEWAY, format!("generation failed: {e}"))
            }
            AppError::Pipeline(PipelineError::Repository(e)) => {
                tracing::error!(error = %e, "storage error");
                (StatusCode::INTERNAL_SERVER_ERROR, "storage error".to_string())
            }
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg.clone()),
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, msg.clone())
            }
        };

        let body = json!({
            "success": false,
            "error": message,
        });

        (status, axum::Json(body)).into_response()
    }
}
