//! # Application Error Type
//!
//! Unified error type for CLI commands.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  read bill.json ──── io::Error ─────────────┐                           │
//! │        │                                    │                           │
//! │        ▼                                    ▼                           │
//! │  parse JSON ──────── serde_json::Error ──► AppError ──► stderr + exit   │
//! │        │                                    ▲                           │
//! │        ▼                                    │                           │
//! │  Session mutations ─ CoreError ─────────────┘                           │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! With `--format json`, failures are printed as an [`ErrorReport`] so a
//! script can branch on `code` instead of parsing the message.

use serde::Serialize;
use std::path::PathBuf;
use tabsplit_core::CoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid bill file {}: {source}", path.display())]
    BillFormat {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid configuration {key}: {reason}")]
    Config { key: String, reason: String },

    #[error("{count} line item(s) are not assigned to anyone")]
    Unassigned { count: usize },

    #[error("Cannot serialize output: {0}")]
    Output(#[from] serde_json::Error),

    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Machine-readable error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Bill file missing or unreadable
    IoError,

    /// Bill file is not valid JSON or has the wrong shape
    BillFormat,

    /// Bill content rejected by the session (unknown id, bad price...)
    ValidationError,

    /// Bad TABSPLIT_* environment variable
    ConfigError,

    /// Some items were never assigned (strict mode / `check`)
    Unassigned,

    Internal,
}

impl AppError {
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::Io { .. } => ErrorCode::IoError,
            AppError::BillFormat { .. } => ErrorCode::BillFormat,
            AppError::Config { .. } => ErrorCode::ConfigError,
            AppError::Unassigned { .. } => ErrorCode::Unassigned,
            AppError::Output(_) => ErrorCode::Internal,
            AppError::Core(_) => ErrorCode::ValidationError,
        }
    }

    /// Process exit status. `Unassigned` gets its own status so `check`
    /// can be used as a gate in scripts.
    pub fn exit_code(&self) -> u8 {
        match self.code() {
            ErrorCode::Unassigned => 3,
            ErrorCode::IoError | ErrorCode::ConfigError => 2,
            _ => 1,
        }
    }
}

/// JSON shape of a failure.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorReport {
    pub code: ErrorCode,
    pub message: String,
}

impl From<&AppError> for ErrorReport {
    fn from(err: &AppError) -> Self {
        ErrorReport {
            code: err.code(),
            message: err.to_string(),
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
