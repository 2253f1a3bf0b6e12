//! API error types.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use fierymud_events_core::error::UnknownEventType;
use fierymud_events_publisher::PublisherError;
use serde::Serialize;
use thiserror::Error;

/// Startup and runtime errors for the relay service.
#[derive(Debug, Error)]
pub enum AppError {
    /// A required environment variable is missing or invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// The event publisher could not be started.
    #[error("publisher error: {0}")]
    Publisher(#[from] PublisherError),

    /// Network binding or I/O error.
    #[error("server error: {0}")]
    Server(#[from] std::io::Error),
}

/// JSON body returned for error responses.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Machine-readable error code.
    pub error: &'static str,
    /// Human-readable error message.
    pub message: String,
}

/// Request-level errors returned by handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request named an event type that does not exist.
    #[error(transparent)]
    UnknownEventType(#[from] UnknownEventType),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code) = match &self {
            ApiError::UnknownEventType(_) => (StatusCode::BAD_REQUEST, "validation_error"),
        };

        let body = ErrorBody {
            error: error_code,
            message: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}
