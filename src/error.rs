//! Common error types and the client-facing error mapping

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

/// Message returned in place of upstream/internal details for 5xx failures
const GENERIC_UPSTREAM_MESSAGE: &str = "Image service request failed";
const GENERIC_INTERNAL_MESSAGE: &str = "Internal server error";

/// Application-wide error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Invalid request body: {0}")]
    InvalidBody(#[from] JsonRejection),

    /// Caller input is incomplete or malformed
    #[error("{0}")]
    Validation(String),

    /// The upstream image service rejected or failed the call
    #[error("API error: {message}")]
    Upstream { status: Option<u16>, message: String },

    /// One of this gateway's own invariants was violated
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Validation failure naming every missing field
    pub fn missing_fields(fields: &[&str]) -> Self {
        AppError::Validation(format!(
            "Missing required parameters: {}",
            fields.join(", ")
        ))
    }

    /// Validation failure for a field whose content could not be used
    pub fn invalid_field(field: &str, reason: impl std::fmt::Display) -> Self {
        AppError::Validation(format!("Invalid base64 data in '{}': {}", field, reason))
    }

    /// HTTP status this error is reported with
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            // Well-formed JSON with mistyped fields is still a bad request
            AppError::InvalidBody(JsonRejection::JsonDataError(_)) => StatusCode::BAD_REQUEST,
            AppError::InvalidBody(rejection) => rejection.status(),
            AppError::Upstream { status, .. } => upstream_status(*status),
            AppError::HttpClient(e) => upstream_status(e.status().map(|s| s.as_u16())),
            AppError::Config(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            AppError::Validation(_) | AppError::InvalidBody(_) => "validation",
            AppError::Upstream { .. } | AppError::HttpClient(_) => "upstream",
            AppError::Config(_) | AppError::Internal(_) => "internal",
        }
    }
}

/// Upstream-supplied status, or 500 when absent or not a valid HTTP status
fn upstream_status(status: Option<u16>) -> StatusCode {
    status
        .and_then(|s| StatusCode::from_u16(s).ok())
        .filter(|s| s.is_client_error() || s.is_server_error())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

/// Error response body
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub status_code: u16,
    pub status_message: String,
}

/// Converts failures from any pipeline stage into the client-facing error envelope.
///
/// This is the only place a failure is logged. Unless `expose_upstream_errors` is set,
/// 5xx responses carry a generic message and the detail stays in the server log.
#[derive(Debug, Clone, Copy, Default)]
pub struct ErrorMapper {
    pub expose_upstream_errors: bool,
}

impl ErrorMapper {
    pub fn new(expose_upstream_errors: bool) -> Self {
        Self {
            expose_upstream_errors,
        }
    }

    /// Build the status and body for an error without logging it
    pub fn body(&self, err: &AppError) -> (StatusCode, ErrorBody) {
        let status = err.status_code();
        let message = if !status.is_server_error() {
            err.to_string()
        } else {
            match err {
                AppError::Upstream { .. } | AppError::HttpClient(_)
                    if self.expose_upstream_errors =>
                {
                    err.to_string()
                }
                AppError::Upstream { .. } | AppError::HttpClient(_) => {
                    GENERIC_UPSTREAM_MESSAGE.to_string()
                }
                _ => GENERIC_INTERNAL_MESSAGE.to_string(),
            }
        };

        (
            status,
            ErrorBody {
                status_code: status.as_u16(),
                status_message: message,
            },
        )
    }

    /// Log the failure and convert it into a response
    pub fn map(&self, err: AppError) -> Response {
        let (status, body) = self.body(&err);

        if status.is_server_error() {
            error!(kind = err.kind(), status = status.as_u16(), error = %err, "Request failed");
        } else {
            warn!(kind = err.kind(), status = status.as_u16(), error = %err, "Request rejected");
        }

        (status, Json(body)).into_response()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        ErrorMapper::default().map(self)
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, AppError>;
