//! Per-run index of changed lines.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use tracing::debug;

use crate::error::Result;
use crate::filter::normalize_path;
use crate::git;

use super::parser::{FileDiff, FileStatus, parse_unified_diff};

/// Changed lines of one existing file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffHunk {
    /// Repository-relative file path (forward slashes).
    pub path: String,
    /// Line numbers in the new revision that were added or modified.
    pub added_lines: BTreeSet<u32>,
}

impl DiffHunk {
    pub fn new(path: impl Into<String>, added_lines: impl IntoIterator<Item = u32>) -> Self {
        Self {
            path: path.into(),
            added_lines: added_lines.into_iter().collect(),
        }
    }
}

/// How a path relates to the diff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileChange<'a> {
    /// Wholly new file: every line counts as changed.
    New,
    /// Removed in the new revision.
    Deleted,
    /// Existing file touched by the diff, with its changed lines (may be empty).
    Changed(&'a BTreeSet<u32>),
    /// Not part of the diff.
    Untouched,
}

/// Changed-line index between two revisions.
///
/// Built once per run and never mutated afterwards, so it can be shared by
/// reference between worker threads.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffIndex {
    changed: BTreeMap<String, BTreeSet<u32>>,
    new_files: BTreeSet<String>,
    deleted: BTreeSet<String>,
}

impl DiffIndex {
    /// Build the index from `git diff` between `old_ref` and `new_ref`, or
    /// between `old_ref` and the working tree when `new_ref` is `None`.
    ///
    /// # Returns
    ///
    /// * `Ok(DiffIndex)` - The changed-line index
    /// * `Err(LintError::DiffUnavailable)` - Git could not produce a diff or it was malformed
    pub fn build<P: AsRef<Path>>(cwd: P, old_ref: &str, new_ref: Option<&str>) -> Result<Self> {
        let diff = git::unified_diff(cwd, old_ref, new_ref)?;
        let index = Self::from_diff(&diff)?;
        debug!(
            "diff index: {} changed, {} new, {} deleted",
            index.changed.len(),
            index.new_files.len(),
            index.deleted.len()
        );
        Ok(index)
    }

    /// Build the index from raw unified diff text.
    pub fn from_diff(diff_output: &str) -> Result<Self> {
        Ok(Self::from_file_diffs(parse_unified_diff(diff_output)?))
    }

    /// Build the index from parsed file entries.
    pub fn from_file_diffs(files: Vec<FileDiff>) -> Self {
        let mut index = Self::default();

        for file in files {
            match file.status {
                FileStatus::Added => {
                    index.new_files.insert(file.path);
                }
                FileStatus::Deleted => {
                    index.deleted.insert(file.path);
                }
                FileStatus::Modified => {
                    index
                        .changed
                        .entry(file.path)
                        .or_default()
                        .extend(file.added_lines);
                }
                FileStatus::Renamed { from } => {
                    index.deleted.insert(from);
                    index
                        .changed
                        .entry(file.path)
                        .or_default()
                        .extend(file.added_lines);
                }
            }
        }

        index.settle();
        index
    }

    /// Build the index from pre-parsed hunks.
    ///
    /// Hunks for the same path are merged.
    pub fn from_hunks(
        new_files: impl IntoIterator<Item = String>,
        deleted: impl IntoIterator<Item = String>,
        hunks: impl IntoIterator<Item = DiffHunk>,
    ) -> Self {
        let mut index = Self {
            new_files: new_files.into_iter().map(|p| normalize_path(&p)).collect(),
            deleted: deleted.into_iter().map(|p| normalize_path(&p)).collect(),
            changed: BTreeMap::new(),
        };

        for hunk in hunks {
            index
                .changed
                .entry(normalize_path(&hunk.path))
                .or_default()
                .extend(hunk.added_lines);
        }

        index.settle();
        index
    }

    /// A path that reappears in the new revision is not deleted, and a new
    /// file needs no per-line bookkeeping.
    fn settle(&mut self) {
        for path in &self.new_files {
            self.changed.remove(path);
        }
        let deleted = std::mem::take(&mut self.deleted);
        self.deleted = deleted
            .into_iter()
            .filter(|p| !self.new_files.contains(p) && !self.changed.contains_key(p))
            .collect();
    }

    /// Look up how `path` relates to the diff.
    pub fn lookup(&self, path: &str) -> FileChange<'_> {
        let path = normalize_path(path);
        if self.deleted.contains(&path) {
            FileChange::Deleted
        } else if self.new_files.contains(&path) {
            FileChange::New
        } else if let Some(lines) = self.changed.get(&path) {
            FileChange::Changed(lines)
        } else {
            FileChange::Untouched
        }
    }

    /// Changed lines of an existing file, if the diff touched it.
    pub fn changed_lines(&self, path: &str) -> Option<&BTreeSet<u32>> {
        self.changed.get(&normalize_path(path))
    }

    pub fn is_new(&self, path: &str) -> bool {
        matches!(self.lookup(path), FileChange::New)
    }

    pub fn is_deleted(&self, path: &str) -> bool {
        matches!(self.lookup(path), FileChange::Deleted)
    }

    /// Returns true if the file is touched by the diff and still exists.
    pub fn is_selectable(&self, path: &str) -> bool {
        matches!(
            self.lookup(path),
            FileChange::New | FileChange::Changed(_)
        )
    }

    /// Touched, non-deleted paths in sorted order.
    pub fn selectable_paths(&self) -> Vec<&str> {
        let mut paths: Vec<&str> = self
            .new_files
            .iter()
            .chain(self.changed.keys())
            .map(String::as_str)
            .collect();
        paths.sort_unstable();
        paths
    }

    pub fn deleted_paths(&self) -> impl Iterator<Item = &str> {
        self.deleted.iter().map(String::as_str)
    }

    /// Number of touched files, deletions included.
    pub fn len(&self) -> usize {
        self.changed.len() + self.new_files.len() + self.deleted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
