//! API error type for HTTP handlers.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

use crate::engine::EngineError;

/// Errors surfaced to API clients as structured JSON.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Invalid request data
    #[error("{message}")]
    BadRequest { message: String },

    /// Convert/metadata request named an unknown handle
    #[error("upload {id} not found")]
    UploadNotFound { id: String },

    /// Parameterless convert with nothing uploaded yet
    #[error("no file has been uploaded yet")]
    NoUpload,

    /// Upload exceeds the configured size cap
    #[error("upload exceeds the {limit} byte limit")]
    TooLarge { limit: usize },

    /// Engine spawn/exit/timeout failure
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// Unexpected error with full context chain
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::UploadNotFound { .. } | ApiError::NoUpload => StatusCode::NOT_FOUND,
            ApiError::TooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Engine(EngineError::NotAvailable(_)) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Engine(EngineError::TimedOut(_)) => StatusCode::GATEWAY_TIMEOUT,
            ApiError::Engine(EngineError::Io(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Engine(EngineError::Failed { .. }) => StatusCode::BAD_GATEWAY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Internal(_) | ApiError::Engine(EngineError::Io(_)) => {
                tracing::error!("internal error: {:#}", self);
            }
            ApiError::Engine(_) => {
                tracing::warn!("engine error: {}", self);
            }
            _ => {
                tracing::debug!("client error: {}", self);
            }
        }

        let status = self.status_code();
        let body = json!({
            "status": "error",
            "message": self.to_string(),
        });
        (status, axum::Json(body)).into_response()
    }
}

/// Type alias for handler results.
pub type Result<T> = std::result::Result<T, ApiError>;
