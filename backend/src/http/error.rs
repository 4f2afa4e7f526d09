//! HTTP error handling and response types.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::TimelineError;

/// API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

/// Application error type for HTTP handlers.
#[derive(Debug)]
pub enum AppError {
    /// Body missing, malformed, or of the wrong shape
    InvalidBody(JsonRejection),
    /// Draft endpoints called without `autosave.path` configured
    DraftsDisabled,
    Timeline(TimelineError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            AppError::InvalidBody(rejection) => (
                StatusCode::BAD_REQUEST,
                ApiError::new("INVALID_INPUT", "Request body could not be read")
                    .with_details(rejection.body_text()),
            ),
            AppError::DraftsDisabled => (
                StatusCode::SERVICE_UNAVAILABLE,
                ApiError::new("DRAFTS_DISABLED", "Draft auto-save is not configured"),
            ),
            AppError::Timeline(e) if e.is_invalid_input() => (
                StatusCode::BAD_REQUEST,
                ApiError::new("INVALID_INPUT", "Request contains an unsupported value")
                    .with_details(e.to_string()),
            ),
            AppError::Timeline(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::new("TIMELINE_ERROR", e.to_string()),
            ),
        };

        (status, Json(error)).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidBody(rejection)
    }
}

impl From<TimelineError> for AppError {
    fn from(err: TimelineError) -> Self {
        AppError::Timeline(err)
    }
}
