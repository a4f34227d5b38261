//! Command implementations for difflint.
//!
//! This module provides the dispatcher that routes CLI commands to their
//! implementations. Commands return the process exit code on success.

mod check;
mod linters;

use crate::cli::Command;
use crate::error::Result;

/// Dispatch a command to its implementation.
pub fn dispatch(command: Command) -> Result<i32> {
    match command {
        Command::Check(args) => check::cmd_check(args),
        Command::Linters => linters::cmd_linters(),
    }
}
