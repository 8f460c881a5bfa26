//! Error types for webhook-dl
//!
//! This module provides error handling for the library, including:
//! - Domain-specific error variants (validation, job lookup, shutdown, etc.)
//! - HTTP status code mapping for API integration
//! - Structured error responses with machine-readable error codes
//!
//! Job-execution failures are deliberately NOT part of this taxonomy: they
//! are captured inside the download executor and surfaced only as terminal
//! job results, never as request-time errors.

use crate::types::JobId;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Result type alias for webhook-dl operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for webhook-dl
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed or incomplete submission payload
    #[error("validation error: {0}")]
    Validation(String),

    /// Job not found in the ledger
    #[error("job {0} not found")]
    JobNotFound(JobId),

    /// Job id collision on ledger insert
    ///
    /// Cannot occur through the public API (ids are freshly generated v4
    /// UUIDs); kept so the ledger contract is total.
    #[error("job {0} already exists")]
    Duplicate(JobId),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Token file read/write failure (non-fatal; degrades to in-memory token)
    #[error("token file error: {0}")]
    TokenFile(String),

    /// Shutdown in progress - not accepting new jobs
    #[error("shutdown in progress: not accepting new jobs")]
    ShuttingDown,

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// API server error
    #[error("API server error: {0}")]
    ApiServer(String),
}

/// API error response format
///
/// Returned by API endpoints when an error occurs, with a machine-readable
/// code, a human-readable message, and optional contextual details.
///
/// # Example JSON Response
///
/// ```json
/// {
///   "error": {
///     "code": "job_not_found",
///     "message": "job 7c9e6679-7425-40de-944b-e07fc1f90ae7 not found"
///   }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiError {
    /// The error details
    pub error: ErrorDetail,
}

/// Detailed error information for API responses
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g., "job_not_found", "validation_error")
    pub code: String,

    /// Human-readable error message
    pub message: String,

    /// Optional additional context about the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    /// Create a new API error with code and message
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: ErrorDetail {
                code: code.into(),
                message: message.into(),
                details: None,
            },
        }
    }

    /// Create an API error with additional details
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: serde_json::Value,
    ) -> Self {
        Self {
            error: ErrorDetail {
                code: code.into(),
                message: message.into(),
                details: Some(details),
            },
        }
    }

    /// Create a "validation error" error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new("validation_error", message)
    }

    /// Create an "unauthorized" error
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new("unauthorized", message)
    }

    /// Create a "not found" error
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::new("not_found", format!("{} not found", resource.into()))
    }

    /// Create an "internal server error"
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new("internal_error", message)
    }
}

/// Convert errors to HTTP status codes for API responses
pub trait ToHttpStatus {
    /// Get the HTTP status code for this error
    fn status_code(&self) -> u16;

    /// Get the machine-readable error code
    fn error_code(&self) -> &str;
}

impl ToHttpStatus for Error {
    fn status_code(&self) -> u16 {
        match self {
            // 400 Bad Request - Client error (invalid input)
            Error::Validation(_) => 400,
            Error::Config(_) => 400,

            // 404 Not Found
            Error::JobNotFound(_) => 404,

            // 409 Conflict
            Error::Duplicate(_) => 409,

            // 500 Internal Server Error - Server-side issues
            Error::TokenFile(_) => 500,
            Error::Io(_) => 500,
            Error::Serialization(_) => 500,
            Error::ApiServer(_) => 500,

            // 503 Service Unavailable
            Error::ShuttingDown => 503,
        }
    }

    fn error_code(&self) -> &str {
        match self {
            Error::Validation(_) => "validation_error",
            Error::JobNotFound(_) => "job_not_found",
            Error::Duplicate(_) => "duplicate_job",
            Error::Config(_) => "config_error",
            Error::TokenFile(_) => "token_file_error",
            Error::ShuttingDown => "shutting_down",
            Error::Io(_) => "io_error",
            Error::Serialization(_) => "serialization_error",
            Error::ApiServer(_) => "api_server_error",
        }
    }
}

impl From<Error> for ApiError {
    fn from(error: Error) -> Self {
        let code = error.error_code().to_string();
        let message = error.to_string();

        let details = match &error {
            Error::JobNotFound(id) => Some(serde_json::json!({
                "job_id": id,
            })),
            Error::Duplicate(id) => Some(serde_json::json!({
                "job_id": id,
            })),
            _ => None,
        };

        ApiError {
            error: ErrorDetail {
                code,
                message,
                details,
            },
        }
    }
}
