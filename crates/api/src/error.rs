use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use bedwatch_core::backend::BackendError;
use bedwatch_core::error::CoreError;
use serde::Serialize;
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and [`BackendError`] for storage
/// failures. Implements [`IntoResponse`] to produce consistent JSON error
/// responses of the shape `{ code, message, details?, hint? }`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `bedwatch_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A storage backend failure.
    #[error(transparent)]
    Backend(#[from] BackendError),

    /// An internal failure, such as a recovered handler panic. The message is
    /// logged, never sent to the client.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

/// JSON body of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<&'static str>,
}

impl ErrorBody {
    fn new(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
            hint: None,
        }
    }
}

const SANITIZED_MESSAGE: &str = "An internal error occurred";

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, key } => (
                    StatusCode::NOT_FOUND,
                    ErrorBody::new("NOT_FOUND", format!("{entity} '{key}' not found")),
                ),
                CoreError::Validation { field, message } => (
                    StatusCode::BAD_REQUEST,
                    ErrorBody {
                        details: Some(json!({ "field": field })),
                        ..ErrorBody::new("VALIDATION_ERROR", message.clone())
                    },
                ),
                CoreError::Conflict(msg) => {
                    (StatusCode::CONFLICT, ErrorBody::new("CONFLICT", msg.clone()))
                }
                CoreError::Unauthorized(msg) => (
                    StatusCode::UNAUTHORIZED,
                    ErrorBody::new("UNAUTHORIZED", msg.clone()),
                ),
            },

            // --- Storage errors ---
            AppError::Backend(err) => classify_backend_error(err),

            // --- HTTP-specific errors ---
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody::new("INTERNAL_ERROR", SANITIZED_MESSAGE),
                )
            }
        };

        (status, axum::Json(body)).into_response()
    }
}

/// Classify a storage failure into an HTTP status and error body.
///
/// - Uniqueness violations map to 409.
/// - Everything else maps to 500 with a sanitized message and a retry hint.
fn classify_backend_error(err: &BackendError) -> (StatusCode, ErrorBody) {
    match err {
        BackendError::Conflict(msg) => (StatusCode::CONFLICT, ErrorBody::new("CONFLICT", msg.clone())),
        BackendError::Query(msg) => {
            tracing::error!(error = %msg, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorBody {
                    hint: Some("The data store is temporarily unavailable, retry later"),
                    ..ErrorBody::new("DATABASE_ERROR", "A database error occurred")
                },
            )
        }
    }
}
