//! Diff parsing and the changed-line index.
//!
//! The index answers one question for the change filter: which lines of which
//! files differ between the reference revision and the revision being linted.
//!
//! The parsing is deterministic and supports:
//! - Added lines with line numbers from `git diff -U0 {old} [{new}]`
//! - Hunks with context lines (context is never marked as changed)
//! - New files (from /dev/null) and deleted files (to /dev/null)
//! - Renames, with or without content changes
//! - Plain unified diffs without `diff --git` headers

mod helpers;
mod index;
mod parser;

#[cfg(test)]
mod tests;

pub use index::{DiffHunk, DiffIndex, FileChange};
pub use parser::{FileDiff, FileStatus, HunkSpan, parse_unified_diff};
