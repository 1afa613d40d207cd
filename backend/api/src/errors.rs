//! Application-wide error types and their HTTP mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use viewshare_engine::EngineError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),
}

pub type Result<T> = std::result::Result<T, ApiError>;

/// Structured error body: `kind` is stable for programmatic handling,
/// `error` is the human-readable detail.
#[derive(Serialize)]
struct ErrorBody {
    kind: &'static str,
    error: String,
}

impl ApiError {
    fn status_and_kind(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::Engine(e) => match e {
                EngineError::Validation(_) => (StatusCode::BAD_REQUEST, "validation_error"),
                EngineError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
                EngineError::Unauthorized { .. } => (StatusCode::FORBIDDEN, "unauthorized"),
                EngineError::SaleClosed { .. } => (StatusCode::CONFLICT, "sale_closed"),
                EngineError::InsufficientShares { .. } => {
                    (StatusCode::CONFLICT, "insufficient_shares")
                }
                EngineError::NothingToClaim { .. } => (StatusCode::CONFLICT, "nothing_to_claim"),
                EngineError::Overflow(_) => {
                    (StatusCode::UNPROCESSABLE_ENTITY, "arithmetic_overflow")
                }
            },
            ApiError::Database(_) | ApiError::Migrate(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error")
            }
            ApiError::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "validation_error"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, kind) = self.status_and_kind();
        let body = ErrorBody {
            kind,
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
