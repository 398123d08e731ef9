//! Error types and exit code mapping for qtport.
//!
//! Only conditions that stop a run are errors. A construct that is missing
//! from the input (no local include, no constructor, no qualifying class) is
//! not an error: the affected step reports itself as skipped and the run
//! carries on.
//!
//! ## Exit Codes
//!
//! - `2`: Invalid arguments
//! - `3`: Input file not found
//! - `4`: Read or write failure
//! - `10`: Internal errors (bugs, unexpected state)

use std::fmt;
use std::io;
use std::path::Path;

use thiserror::Error;

// ============================================================================
// Output Error Codes
// ============================================================================

/// Stable numeric codes used as process exit codes and in JSON error output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum OutputErrorCode {
    /// Invalid arguments from caller.
    InvalidArguments = 2,
    /// The input file does not exist.
    FileNotFound = 3,
    /// Reading the input or writing the output failed.
    IoError = 4,
    /// Internal errors (bugs, unexpected state).
    InternalError = 10,
}

impl OutputErrorCode {
    /// Get the numeric code value.
    pub fn code(&self) -> u8 {
        *self as u8
    }
}

impl fmt::Display for OutputErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

// ============================================================================
// Unified Error Type
// ============================================================================

/// Unified error type for the engine and the CLI.
#[derive(Debug, Error)]
pub enum PortError {
    /// Invalid arguments from caller.
    #[error("invalid arguments: {message}")]
    InvalidArguments { message: String },

    /// Input file not found.
    #[error("file not found: {path}")]
    FileNotFound { path: String },

    /// Read or write failure on a concrete path.
    #[error("I/O error on {path}: {message}")]
    Io { path: String, message: String },

    /// Internal error (bug or unexpected state).
    #[error("internal error: {message}")]
    Internal { message: String },
}

impl From<&PortError> for OutputErrorCode {
    fn from(err: &PortError) -> Self {
        match err {
            PortError::InvalidArguments { .. } => OutputErrorCode::InvalidArguments,
            PortError::FileNotFound { .. } => OutputErrorCode::FileNotFound,
            PortError::Io { .. } => OutputErrorCode::IoError,
            PortError::Internal { .. } => OutputErrorCode::InternalError,
        }
    }
}

// ============================================================================
// Convenience Constructors
// ============================================================================

impl PortError {
    /// Create an invalid arguments error.
    pub fn invalid_args(message: impl Into<String>) -> Self {
        PortError::InvalidArguments {
            message: message.into(),
        }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        PortError::Internal {
            message: message.into(),
        }
    }

    /// Classify an `io::Error` raised while touching `path`.
    pub fn from_io(path: &Path, err: io::Error) -> Self {
        let path = path.display().to_string();
        if err.kind() == io::ErrorKind::NotFound {
            PortError::FileNotFound { path }
        } else {
            PortError::Io {
                path,
                message: err.to_string(),
            }
        }
    }

    /// Error code for this error.
    pub fn error_code(&self) -> OutputErrorCode {
        OutputErrorCode::from(self)
    }
}

/// Result alias used throughout the engine.
pub type PortResult<T> = Result<T, PortError>;
