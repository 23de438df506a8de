//! Error types for af-checks
//!
//! These cover the checkpoint failing to run at all. Expectations that
//! execute and find bad rows are reported through `SuiteResult`, never
//! through `CheckError`.

use thiserror::Error;

/// Checkpoint execution errors
#[derive(Error, Debug)]
pub enum CheckError {
    /// Checkpoint name not declared in configuration (C001)
    #[error("[C001] Unknown checkpoint: {0}")]
    UnknownCheckpoint(String),

    /// Suite name not declared in configuration (C002)
    #[error("[C002] Unknown suite: {0}")]
    UnknownSuite(String),

    /// An expectation's SQL could not execute (C003)
    #[error("[C003] Expectation '{name}' could not execute: {message}")]
    Execution { name: String, message: String },

    /// Validation-result store I/O failure (C004)
    #[error("[C004] Failed to store validation result: {0}")]
    Store(#[from] std::io::Error),

    /// Validation-result encoding failure (C005)
    #[error("[C005] Failed to encode validation result: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Result type alias for CheckError
pub type CheckResult<T> = Result<T, CheckError>;
