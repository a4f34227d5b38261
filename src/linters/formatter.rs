//! Check-only adapters for code formatters (black, autopep8).
//!
//! The formatter prints the diff it would apply; every hunk becomes one
//! message covering the lines it would rewrite. Files are never modified.

use super::{Adapter, AdapterFailure, RunContext, push_files, run_tool};
use crate::diff::{FileStatus, HunkSpan, parse_unified_diff};
use crate::message::LintMessage;
use serde::Deserialize;

/// Turn a formatter's diff into one message per hunk.
///
/// `prefix` is the directory the formatter puts in front of the new-side
/// path (autopep8 writes `fixed/`).
fn diff_messages(diff: &str, prefix: &str, tool: &str) -> Result<Vec<LintMessage>, AdapterFailure> {
    let files =
        parse_unified_diff(diff).map_err(|e| AdapterFailure::Unparsable(e.to_string()))?;

    let mut messages = Vec::new();
    for file in files {
        if file.status != FileStatus::Modified {
            continue;
        }
        let path = file.path.strip_prefix(prefix).unwrap_or(&file.path);
        for span in &file.old_spans {
            let (start, end) = span_lines(*span);
            messages.push(
                LintMessage::new(path, Some(start), format!("{} would reformat this code", tool))
                    .with_line_end((end > start).then_some(end)),
            );
        }
    }
    Ok(messages)
}

/// First and last old-file line a hunk touches.
fn span_lines(span: HunkSpan) -> (u32, u32) {
    if span.len == 0 {
        // Pure insertion after line `start`.
        let line = span.start.max(1);
        (line, line)
    } else {
        (span.start, span.start + span.len - 1)
    }
}

fn default_target_version() -> String {
    "py37".to_string()
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BlackOptions {
    /// Path to a pyproject.toml with black settings, passed as `--config`.
    #[serde(default)]
    pub config: Option<String>,

    #[serde(default = "default_target_version")]
    pub target_version: String,
}

impl Default for BlackOptions {
    fn default() -> Self {
        Self {
            config: None,
            target_version: default_target_version(),
        }
    }
}

impl BlackOptions {
    fn args(&self, files: &[String]) -> Vec<String> {
        let mut args = vec![
            "--diff".to_string(),
            "--quiet".to_string(),
            "--target-version".to_string(),
            self.target_version.clone(),
        ];
        if let Some(config) = &self.config {
            args.push(format!("--config={}", config));
        }
        push_files(&mut args, files);
        args
    }
}

impl Adapter for BlackOptions {
    fn run(&self, files: &[String], ctx: &RunContext) -> Result<Vec<LintMessage>, AdapterFailure> {
        let output = run_tool("black", &self.args(files), ctx, |code| code == 0)?;
        diff_messages(&output.stdout, "", "black")
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Autopep8Options {
    /// Global config file; local configs are then ignored.
    #[serde(default)]
    pub config: Option<String>,

    /// Tolerated line-length range, `[low, high]`.
    #[serde(default, rename = "line-range", alias = "line_range")]
    pub line_range: Option<[u32; 2]>,
}

impl Autopep8Options {
    fn args(&self, files: &[String]) -> Vec<String> {
        let mut args = vec!["--diff".to_string()];
        if let Some(config) = &self.config {
            args.push(format!("--global-config={}", config));
            args.push("--ignore-local-config".to_string());
        }
        if let Some([low, high]) = self.line_range {
            args.push("--line-range".to_string());
            args.push(low.to_string());
            args.push(high.to_string());
        }
        push_files(&mut args, files);
        args
    }
}

impl Adapter for Autopep8Options {
    fn run(&self, files: &[String], ctx: &RunContext) -> Result<Vec<LintMessage>, AdapterFailure> {
        let output = run_tool("autopep8", &self.args(files), ctx, |code| code == 0)?;
        diff_messages(&output.stdout, "fixed/", "autopep8")
    }
}
