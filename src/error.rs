//! Error types for the difflint CLI.
//!
//! Uses thiserror for derive macros and provides user-actionable error messages.
//! Adapter failures are not part of this enum: they are recovered per linter
//! and surface as report messages (see `linters::AdapterFailure`).

use crate::exit_codes;
use thiserror::Error;

/// Main error type for difflint operations.
#[derive(Error, Debug)]
pub enum LintError {
    /// Invalid command-line value.
    #[error("{0}")]
    UserError(String),

    /// Malformed configuration: bad filter rule, unknown linter id, bad YAML.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Git operation failed.
    #[error("Git operation failed: {0}")]
    GitError(String),

    /// No usable diff could be produced between the requested revisions.
    ///
    /// The run coordinator recovers from this by switching to full-report mode.
    #[error("Diff unavailable: {0}")]
    DiffUnavailable(String),

    /// The run was interrupted by a termination signal.
    #[error("Run cancelled by signal; no report produced")]
    Cancelled,
}

impl LintError {
    /// Returns the appropriate exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            LintError::UserError(_) => exit_codes::CONFIG_ERROR,
            LintError::ConfigError(_) => exit_codes::CONFIG_ERROR,
            LintError::GitError(_) => exit_codes::GIT_FAILURE,
            LintError::DiffUnavailable(_) => exit_codes::GIT_FAILURE,
            LintError::Cancelled => exit_codes::CANCELLED,
        }
    }
}

/// Result type alias for difflint operations.
pub type Result<T> = std::result::Result<T, LintError>;
