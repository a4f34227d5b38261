//! Exit code constants for the difflint CLI.
//!
//! - 0: No in-scope blocking messages
//! - 1: At least one in-scope blocking message
//! - 2: Configuration or usage error
//! - 3: Git operation failure
//! - 130: Run interrupted by a termination signal

/// Successful run with no in-scope blocking messages.
pub const SUCCESS: i32 = 0;

/// The report contains in-scope messages at or above the blocking severity.
pub const FINDINGS: i32 = 1;

/// Malformed configuration, unknown linter id, or bad command-line value.
pub const CONFIG_ERROR: i32 = 2;

/// Git could not list tracked files or locate the repository.
pub const GIT_FAILURE: i32 = 3;

/// The run was cancelled by SIGINT/SIGTERM.
pub const CANCELLED: i32 = 130;
