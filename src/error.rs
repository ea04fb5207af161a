//! Error types for runbook definition and execution.

use thiserror::Error;

/// Result type for runbook operations.
pub type RunbookResult<T> = Result<T, RunbookError>;

/// Errors that can occur while extracting steps or running a procedure.
#[derive(Debug, Error)]
pub enum RunbookError {
    /// A step declares an illegal flag combination. Raised during
    /// extraction, before any step is presented.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The runner was constructed without a log file path.
    #[error("a log file path must be provided")]
    MissingPath,

    /// The log file could not be read or written. Simple absence of the
    /// file is not an error (it means a fresh run).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
