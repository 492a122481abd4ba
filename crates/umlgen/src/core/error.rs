//! Core error types for diagram export
//!
//! Only request validation and the filesystem/archive layer abort an export.
//! Everything the analyzer and the emitters find is reported as a
//! [`Diagnostic`](super::Diagnostic) instead.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Fatal export failures
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    #[error("IO error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Archive error: {message}")]
    Archive { message: String },

    #[error("Export timed out after {}s while {stage}", limit.as_secs())]
    Timeout { stage: String, limit: Duration },

    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },
}

impl ExportError {
    /// Create a new invalid request error
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    /// Create a new IO error bound to the path that failed
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a new archive error
    pub fn archive(message: impl Into<String>) -> Self {
        Self::Archive {
            message: message.into(),
        }
    }

    /// Create a new timeout error
    pub fn timeout(stage: impl Into<String>, limit: Duration) -> Self {
        Self::Timeout {
            stage: stage.into(),
            limit,
        }
    }

    /// Whether the error was raised before any file was touched
    pub fn is_request_error(&self) -> bool {
        matches!(self, Self::InvalidRequest { .. })
    }
}

pub type ExportResult<T> = std::result::Result<T, ExportError>;
