//! Helper functions for diff parsing.

use crate::filter::normalize_path;

/// Line ranges of a hunk header.
///
/// Lengths default to 1 when the header omits them (`@@ -3 +4 @@`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct HunkRange {
    pub old_start: u32,
    pub old_len: u32,
    pub new_start: u32,
    pub new_len: u32,
}

/// Parse the file path from a "diff --git" line.
///
/// Handles various formats:
/// - "a/path/to/file b/path/to/file" (normal)
/// - "a/path/to/file b/path/to/renamed" (rename)
/// - "\"a/with space\" \"b/with space\"" (quoted)
///
/// Returns the "b/" path (new file path), or None if parsing fails.
pub(super) fn parse_diff_git_line(rest: &str) -> Option<String> {
    let rest = rest.trim_end();

    // Quoted form: the new path is the last quoted string.
    if rest.ends_with('"') {
        if let Some(pos) = rest.rfind(" \"b/") {
            let unquoted = unquote_path(&rest[pos + 1..]);
            return unquoted.strip_prefix("b/").map(normalize_path);
        }
    }

    // Unchanged path: both halves have the same length, so split in the middle.
    if let Some(path) = split_same_path(rest) {
        return Some(normalize_path(path));
    }

    // Paths can contain spaces, so look for the last " b/" occurrence.
    if let Some(b_pos) = rest.rfind(" b/") {
        let b_path = &rest[b_pos + 3..];
        return Some(normalize_path(b_path));
    }

    None
}

/// Split `a/<path> b/<path>` where both sides name the same path.
fn split_same_path(rest: &str) -> Option<&str> {
    if rest.len() % 2 == 0 {
        return None;
    }
    let mid = rest.len() / 2;
    let old = rest.get(..mid)?.strip_prefix("a/")?;
    let new = rest.get(mid..)?.strip_prefix(" b/")?;
    (old == new).then_some(new)
}

/// Parse the path of a `--- ` or `+++ ` marker line.
///
/// Returns `None` for `/dev/null`. The expected prefix (`a/` or `b/`) is
/// stripped when present; a trailing tab-separated timestamp is dropped.
pub(super) fn parse_marker_path(rest: &str, prefix: &str) -> Option<String> {
    let first = rest.split('\t').next().unwrap_or(rest).trim_end();
    if first == "/dev/null" {
        return None;
    }

    let unquoted = unquote_path(first);
    let path = unquoted.strip_prefix(prefix).unwrap_or(&unquoted);
    if path.is_empty() {
        None
    } else {
        Some(normalize_path(path))
    }
}

/// Parse a hunk header line.
///
/// Format: "@@ -old_start,old_len +new_start,new_len @@" or "@@ -old_start +new_start @@"
/// Also handles: "@@ -old_start,old_len +new_start,new_len @@ context info"
pub(super) fn parse_hunk_header(line: &str) -> Option<HunkRange> {
    let line = line.strip_prefix("@@ ")?;

    let end_marker = line.find(" @@")?;
    let range_part = &line[..end_marker];

    let parts: Vec<&str> = range_part.split_whitespace().collect();
    if parts.len() != 2 {
        return None;
    }

    let (old_start, old_len) = parse_range(parts[0].strip_prefix('-')?)?;
    let (new_start, new_len) = parse_range(parts[1].strip_prefix('+')?)?;

    Some(HunkRange {
        old_start,
        old_len,
        new_start,
        new_len,
    })
}

/// Parse "start" or "start,len".
fn parse_range(range: &str) -> Option<(u32, u32)> {
    match range.split_once(',') {
        Some((start, len)) => Some((start.parse().ok()?, len.parse().ok()?)),
        None => Some((range.parse().ok()?, 1)),
    }
}

/// Strip the surrounding quotes git puts around unusual paths.
fn unquote_path(path: &str) -> String {
    let inner = path
        .strip_prefix('"')
        .and_then(|p| p.strip_suffix('"'))
        .unwrap_or(path);
    inner.replace("\\\"", "\"").replace("\\\\", "\\")
}
