//! Error types for Relaygate
//!
//! Every failure is caught at the handler boundary and rendered as the
//! `{"success": false, "error": ...}` envelope.

use std::error::Error as StdError;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Application-level errors
#[derive(Debug, Error)]
pub enum AppError {
    /// The caller omitted or garbled a required field
    #[error("{0}")]
    Validation(String),

    /// The request body exceeds the configured size limit
    #[error("{0}")]
    PayloadTooLarge(String),

    /// The server is missing a required credential
    #[error("{0}")]
    Configuration(String),

    /// Network failure, timeout, undecodable body or provider-reported error
    #[error("{message}")]
    Upstream {
        message: String,
        trace: Option<String>,
    },
}

impl AppError {
    /// Upstream error without a diagnostic trace
    pub fn upstream(message: impl Into<String>) -> Self {
        AppError::Upstream {
            message: message.into(),
            trace: None,
        }
    }

    /// HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Upstream { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Drop the diagnostic trace unless debug output is enabled
    pub fn redact(self, debug_enabled: bool) -> Self {
        match self {
            AppError::Upstream { message, .. } if !debug_enabled => AppError::Upstream {
                message,
                trace: None,
            },
            other => other,
        }
    }
}

/// Render an error and its source chain, one cause per line
pub fn error_chain(err: &(dyn StdError + 'static)) -> String {
    let mut lines = vec![err.to_string()];
    let mut source = err.source();
    while let Some(cause) = source {
        lines.push(format!("caused by: {}", cause));
        source = cause.source();
    }
    lines.join("\n")
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        let message = if err.is_timeout() {
            "Upstream request timed out".to_string()
        } else if err.is_connect() {
            "Failed to connect to upstream provider".to_string()
        } else if err.is_decode() {
            "Upstream returned an invalid JSON body".to_string()
        } else {
            format!("Upstream request failed: {}", err)
        };

        AppError::Upstream {
            message,
            trace: Some(error_chain(&err)),
        }
    }
}

/// Error envelope returned to callers
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match self {
            AppError::Validation(message)
            | AppError::PayloadTooLarge(message)
            | AppError::Configuration(message) => ErrorResponse {
                success: false,
                error: message,
                trace: None,
            },
            AppError::Upstream { message, trace } => ErrorResponse {
                success: false,
                error: message,
                trace,
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;
