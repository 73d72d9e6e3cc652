//! Error types for cardfile
//!
//! Exit codes:
//! - 0: Success
//! - 2: User error (bad args, bad config, unknown card or status)
//! - 4: Operation failed (io, lock contention, malformed card file)

use std::path::PathBuf;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Exit codes for the cardfile CLI
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const USER_ERROR: i32 = 2;
    pub const OPERATION_FAILED: i32 = 4;
}

/// Main error type for cardfile operations
#[derive(Error, Debug)]
pub enum Error {
    // User errors (exit code 2)
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Unknown status '{0}'")]
    UnknownStatus(String),

    #[error("No card with id '{0}'")]
    CardNotFound(String),

    #[error("Session required")]
    SessionRequired,

    // Operation failures (exit code 4)
    #[error("Malformed card file at line {line}: {reason}")]
    MalformedRow { line: usize, reason: String },

    #[error("Duplicate card id '{id}' at line {line}")]
    DuplicateCardId { id: String, line: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("Lock acquisition failed: {0}")]
    LockFailed(PathBuf),

    #[error("Operation failed: {0}")]
    OperationFailed(String),
}

impl Error {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            // User errors
            Error::InvalidConfig(_)
            | Error::InvalidArgument(_)
            | Error::UnknownStatus(_)
            | Error::CardNotFound(_)
            | Error::SessionRequired => exit_codes::USER_ERROR,

            // Operation failures
            Error::MalformedRow { .. }
            | Error::DuplicateCardId { .. }
            | Error::Io(_)
            | Error::Json(_)
            | Error::TomlParse(_)
            | Error::TomlSerialize(_)
            | Error::LockFailed(_)
            | Error::OperationFailed(_) => exit_codes::OPERATION_FAILED,
        }
    }

    /// HTTP status for this error when it escapes a handler
    pub fn status(&self) -> StatusCode {
        match self {
            Error::InvalidArgument(_) | Error::UnknownStatus(_) => StatusCode::BAD_REQUEST,
            Error::CardNotFound(_) => StatusCode::NOT_FOUND,
            Error::SessionRequired => StatusCode::UNAUTHORIZED,
            Error::LockFailed(_) => StatusCode::SERVICE_UNAVAILABLE,
            Error::InvalidConfig(_)
            | Error::MalformedRow { .. }
            | Error::DuplicateCardId { .. }
            | Error::Io(_)
            | Error::Json(_)
            | Error::TomlParse(_)
            | Error::TomlSerialize(_)
            | Error::OperationFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        (self.status(), self.to_string()).into_response()
    }
}

/// Result type alias for cardfile operations
pub type Result<T> = std::result::Result<T, Error>;
