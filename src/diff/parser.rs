//! Core diff parsing logic.

use std::collections::BTreeSet;

use crate::error::{LintError, Result};

use super::helpers::{parse_diff_git_line, parse_hunk_header, parse_marker_path};

/// How a file was affected by the diff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileStatus {
    /// File did not exist in the old revision.
    Added,
    /// File does not exist in the new revision.
    Deleted,
    /// File content (or only its mode) changed in place.
    Modified,
    /// File moved from `from`; content may or may not have changed.
    Renamed { from: String },
}

/// Extent of a hunk in the old file, as given by its `@@ -start,len` header.
///
/// `len == 0` means lines were only inserted, after line `start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HunkSpan {
    pub start: u32,
    pub len: u32,
}

/// One file entry of a unified diff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDiff {
    /// Repository-relative path in the new revision (old path for deletions).
    pub path: String,
    pub status: FileStatus,
    /// Line numbers (1-based) in the new revision carried by `+` lines.
    pub added_lines: BTreeSet<u32>,
    /// Old-side extent of every hunk, in diff order.
    pub old_spans: Vec<HunkSpan>,
}

impl FileDiff {
    fn new(path: String) -> Self {
        Self {
            path,
            status: FileStatus::Modified,
            added_lines: BTreeSet::new(),
            old_spans: Vec::new(),
        }
    }
}

/// File entry under construction plus the state needed to finish it.
struct Pending {
    diff: FileDiff,
    seen_hunk: bool,
}

/// Remaining body lines of the hunk being read.
#[derive(Default)]
struct HunkCursor {
    new_line: u32,
    old_remaining: u32,
    new_remaining: u32,
}

impl HunkCursor {
    fn is_open(&self) -> bool {
        self.old_remaining > 0 || self.new_remaining > 0
    }
}

/// Parse a unified diff into per-file entries.
///
/// Accepts `git diff` output (with `diff --git` headers and extended header
/// lines such as `new file mode` or `rename from`) as well as plain
/// `--- a/x` / `+++ b/x` diffs. Works with any amount of context: context
/// lines advance the new-side line counter but are never recorded.
///
/// # Returns
///
/// * `Ok(Vec<FileDiff>)` - Entries in diff order
/// * `Err(LintError::DiffUnavailable)` - A hunk header could not be parsed
pub fn parse_unified_diff(diff_output: &str) -> Result<Vec<FileDiff>> {
    let mut result = Vec::new();
    let mut current: Option<Pending> = None;
    let mut hunk = HunkCursor::default();

    for line in diff_output.lines() {
        if hunk.is_open() {
            if let Some(pending) = current.as_mut() {
                if consume_hunk_line(line, &mut hunk, &mut pending.diff) {
                    continue;
                }
            }
            // Anything else ends the hunk early and is handled as a header.
            hunk = HunkCursor::default();
        }

        if let Some(rest) = line.strip_prefix("diff --git ") {
            finish(&mut result, current.take());
            let path = parse_diff_git_line(rest).ok_or_else(|| {
                LintError::DiffUnavailable(format!("malformed diff header: {}", line))
            })?;
            current = Some(Pending {
                diff: FileDiff::new(path),
                seen_hunk: false,
            });
            continue;
        }

        if let Some(rest) = line.strip_prefix("--- ") {
            // Without a `diff --git` header, `---` opens a new file entry.
            let starts_new = current.as_ref().is_none_or(|p| p.seen_hunk);
            let old_path = parse_marker_path(rest, "a/");
            if starts_new {
                finish(&mut result, current.take());
                current = Some(Pending {
                    diff: FileDiff::new(old_path.clone().unwrap_or_default()),
                    seen_hunk: false,
                });
            }
            if old_path.is_none() {
                if let Some(pending) = current.as_mut() {
                    pending.diff.status = FileStatus::Added;
                }
            }
            continue;
        }

        if let Some(rest) = line.strip_prefix("+++ ") {
            if let Some(pending) = current.as_mut() {
                match parse_marker_path(rest, "b/") {
                    Some(path) => pending.diff.path = path,
                    None => pending.diff.status = FileStatus::Deleted,
                }
            }
            continue;
        }

        if line.starts_with("@@") {
            let range = parse_hunk_header(line).ok_or_else(|| {
                LintError::DiffUnavailable(format!("malformed hunk header: {}", line))
            })?;
            let pending = current.as_mut().ok_or_else(|| {
                LintError::DiffUnavailable(format!("hunk outside of a file entry: {}", line))
            })?;
            pending.seen_hunk = true;
            pending.diff.old_spans.push(HunkSpan {
                start: range.old_start,
                len: range.old_len,
            });
            hunk = HunkCursor {
                new_line: range.new_start,
                old_remaining: range.old_len,
                new_remaining: range.new_len,
            };
            continue;
        }

        let Some(pending) = current.as_mut() else {
            continue;
        };

        if line.starts_with("new file mode") {
            pending.diff.status = FileStatus::Added;
        } else if line.starts_with("deleted file mode") {
            pending.diff.status = FileStatus::Deleted;
        } else if let Some(from) = line.strip_prefix("rename from ") {
            pending.diff.status = FileStatus::Renamed {
                from: crate::filter::normalize_path(from),
            };
        } else if let Some(to) = line.strip_prefix("rename to ") {
            pending.diff.path = crate::filter::normalize_path(to);
        }
        // index, similarity, mode and "Binary files ... differ" lines carry
        // no line information; the file still counts as touched.
    }

    finish(&mut result, current.take());
    Ok(result)
}

/// Apply one hunk body line. Returns false if the line is not part of a hunk.
fn consume_hunk_line(line: &str, hunk: &mut HunkCursor, diff: &mut FileDiff) -> bool {
    match line.as_bytes().first() {
        Some(b'+') => {
            diff.added_lines.insert(hunk.new_line);
            hunk.new_line = hunk.new_line.saturating_add(1);
            hunk.new_remaining = hunk.new_remaining.saturating_sub(1);
            true
        }
        Some(b'-') => {
            hunk.old_remaining = hunk.old_remaining.saturating_sub(1);
            true
        }
        // Some tools strip the single space of empty context lines.
        Some(b' ') | None => {
            hunk.new_line = hunk.new_line.saturating_add(1);
            hunk.old_remaining = hunk.old_remaining.saturating_sub(1);
            hunk.new_remaining = hunk.new_remaining.saturating_sub(1);
            true
        }
        // "\ No newline at end of file"
        Some(b'\\') => true,
        _ => false,
    }
}

fn finish(result: &mut Vec<FileDiff>, pending: Option<Pending>) {
    if let Some(pending) = pending {
        if !pending.diff.path.is_empty() {
            result.push(pending.diff);
        }
    }
}
