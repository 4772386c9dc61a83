//! Error types for Lectern server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Main application error type
///
/// The repository layer only produces domain failures; the `IntoResponse`
/// impl below owns the translation into transport status codes.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Referenced entity not found: {0}")]
    ReferenceNotFound(String),

    #[error("Integrity violation: the write was rejected by the store")]
    IntegrityViolation,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Validation(errors.to_string())
    }
}

/// Error response body
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NotFound", msg.clone()),
            AppError::Duplicate(msg) => (StatusCode::BAD_REQUEST, "Duplicate", msg.clone()),
            AppError::ReferenceNotFound(msg) => {
                (StatusCode::NOT_FOUND, "ReferenceNotFound", msg.clone())
            }
            AppError::IntegrityViolation => (
                StatusCode::BAD_REQUEST,
                "IntegrityViolation",
                "The write was rejected by the store".to_string(),
            ),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "Validation", msg.clone()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "Conflict", msg.clone()),
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Database",
                    "Database error".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse {
            error: error.to_string(),
            message,
        });

        (status, body).into_response()
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
