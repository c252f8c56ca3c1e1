//! Error types for the todo server
//!
//! Provides unified error handling using thiserror. Every variant maps to one
//! HTTP status and renders the `{"status": "error", "message": ...}` envelope.

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::error;

use crate::models::ErrorResponse;

// == App Error Enum ==
/// Unified error type for the todo server.
#[derive(Error, Debug)]
pub enum AppError {
    /// Malformed or out-of-range input
    #[error("Validation error: {0}")]
    Validation(String),

    /// Referenced todo item does not exist
    #[error("Todo item with id {0} not found")]
    NotFound(i64),

    /// Store integrity constraint violated
    #[error("{0}")]
    Conflict(String),

    /// Client exceeded its request budget
    #[error("Too many requests")]
    RateLimited {
        /// Seconds until the client may retry
        retry_after: u64,
    },

    /// Store failure other than an integrity violation
    #[error("Store error: {0}")]
    Store(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Builds a validation error from any displayable detail.
    pub fn validation(detail: impl Into<String>) -> Self {
        AppError::Validation(detail.into())
    }

    /// HTTP status for this error kind.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            AppError::Store(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// == Extractor Rejections ==
// Request-shape failures are reported as validation errors with axum's detail.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Unhandled errors never leak their detail to the client
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!(error = %self, "Unhandled error while serving request");
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        let mut response = (status, Json(ErrorResponse::new(message))).into_response();

        if let AppError::RateLimited { retry_after } = self {
            if let Ok(value) = HeaderValue::from_str(&retry_after.to_string()) {
                response.headers_mut().insert(header::RETRY_AFTER, value);
            }
        }

        response
    }
}

// == Result Type Alias ==
/// Convenience Result type for the todo server.
pub type Result<T> = std::result::Result<T, AppError>;
