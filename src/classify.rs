//! Change filtering: decide whether a linter message concerns changed code.
//!
//! Rules, in order:
//! - no diff index (full-report mode): in scope
//! - no path (linter-level message): in scope
//! - deleted file: dropped
//! - new file: in scope
//! - file untouched by the diff: out of scope
//! - changed file: in scope if the message has no line, or if its line range
//!   overlaps the changed lines at all

use crate::diff::{DiffIndex, FileChange};
use crate::message::LintMessage;
use serde::Serialize;

/// A message together with its scope decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilteredResult {
    pub message: LintMessage,
    pub in_scope: bool,
}

/// Classify `message` against `index`.
///
/// Returns `None` when the message must be dropped (its file was deleted).
pub fn classify(message: LintMessage, index: Option<&DiffIndex>) -> Option<FilteredResult> {
    let Some(index) = index else {
        return Some(FilteredResult {
            message,
            in_scope: true,
        });
    };

    let Some(path) = message.path.as_deref() else {
        return Some(FilteredResult {
            message,
            in_scope: true,
        });
    };

    let in_scope = match index.lookup(path) {
        FileChange::Deleted => return None,
        FileChange::New => true,
        FileChange::Untouched => false,
        FileChange::Changed(lines) => match message.line_range() {
            None => true,
            Some((start, end)) => lines.range(start..=end).next().is_some(),
        },
    };

    Some(FilteredResult { message, in_scope })
}
