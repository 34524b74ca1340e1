//! Error types for tl
//!
//! The board store's mutation API is infallible by contract: unknown ids are
//! absorbed as silent no-ops. Errors exist only at the CLI and persistence
//! surface.
//!
//! Exit codes:
//! - 0: Success
//! - 2: User error (bad args, unknown board/task name)
//! - 4: Operation failed (I/O, serialization)

use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the tl CLI
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const USER_ERROR: i32 = 2;
    pub const OPERATION_FAILED: i32 = 4;
}

/// Main error type for tl operations
#[derive(Error, Debug)]
pub enum Error {
    // User errors (exit code 2)
    #[error("Board not found: {0}")]
    BoardNotFound(String),

    #[error("Task not found: {0}")]
    TaskNotFound(String),

    #[error("Ambiguous task reference: {reference} matches {count} tasks")]
    AmbiguousTask { reference: String, count: usize },

    #[error("No active board")]
    NoActiveBoard,

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    // Operation failures (exit code 4)
    #[error("No state directory available for this platform")]
    NoStateDir,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Failed to write state file: {0}")]
    WriteFailed(PathBuf),
}

impl Error {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            // User errors
            Error::BoardNotFound(_)
            | Error::TaskNotFound(_)
            | Error::AmbiguousTask { .. }
            | Error::NoActiveBoard
            | Error::InvalidArgument(_) => exit_codes::USER_ERROR,

            // Operation failures
            Error::NoStateDir
            | Error::Io(_)
            | Error::Json(_)
            | Error::TomlParse(_)
            | Error::WriteFailed(_) => exit_codes::OPERATION_FAILED,
        }
    }
}

/// Result type alias for tl operations
pub type Result<T> = std::result::Result<T, Error>;
