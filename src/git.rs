//! Git command runner for difflint.
//!
//! Provides a safe wrapper around git commands with captured stdout/stderr
//! and structured error handling. Everything difflint needs from version
//! control (tracked files, repository root, unified diffs) goes through here.

use crate::error::{LintError, Result};
use crate::filter::normalize_path;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tracing::debug;

/// Result of a successful git command execution.
#[derive(Debug, Clone)]
pub struct GitOutput {
    /// Standard output from the command (trailing newlines removed).
    pub stdout: String,
    /// Standard error from the command (trimmed).
    pub stderr: String,
}

impl GitOutput {
    /// Create a new GitOutput from raw output bytes.
    fn from_output(output: &Output) -> Self {
        Self {
            stdout: String::from_utf8_lossy(&output.stdout)
                .trim_end_matches(['\r', '\n'])
                .to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        }
    }

    /// Returns stdout lines as a vector.
    pub fn lines(&self) -> Vec<&str> {
        if self.stdout.is_empty() {
            Vec::new()
        } else {
            self.stdout.lines().collect()
        }
    }
}

/// Run a git command with the specified working directory.
///
/// Paths in the output are never octal-quoted (`core.quotePath=false`).
///
/// # Returns
///
/// * `Ok(GitOutput)` - On successful execution (exit code 0)
/// * `Err(LintError::GitError)` - On non-zero exit code (mapped to exit code 3)
pub fn run_git<P: AsRef<Path>>(cwd: P, args: &[&str]) -> Result<GitOutput> {
    let cwd = cwd.as_ref();
    debug!("git {}", args.join(" "));

    let output = Command::new("git")
        .current_dir(cwd)
        .args(["-c", "core.quotePath=false"])
        .args(args)
        .output()
        .map_err(|e| {
            LintError::GitError(format!(
                "failed to execute git {}: {}",
                args.first().unwrap_or(&""),
                e
            ))
        })?;

    let git_output = GitOutput::from_output(&output);

    if output.status.success() {
        Ok(git_output)
    } else {
        let exit_code = output.status.code().unwrap_or(-1);
        let error_msg = if git_output.stderr.is_empty() {
            git_output.stdout.clone()
        } else {
            git_output.stderr.clone()
        };

        Err(LintError::GitError(format!(
            "git {} failed (exit code {}): {}",
            args.first().unwrap_or(&""),
            exit_code,
            error_msg
        )))
    }
}

/// Get the repository root directory using `git rev-parse --show-toplevel`.
///
/// # Returns
///
/// * `Ok(PathBuf)` - The absolute path to the repository root
/// * `Err(LintError::GitError)` - If not inside a git repository
pub fn get_repo_root<P: AsRef<Path>>(cwd: P) -> Result<PathBuf> {
    match run_git(cwd.as_ref(), &["rev-parse", "--show-toplevel"]) {
        Ok(output) => Ok(PathBuf::from(&output.stdout)),
        Err(LintError::GitError(msg)) if msg.contains("not a git repository") => {
            Err(LintError::GitError(
                "not inside a git repository. Run difflint from within a git repository."
                    .to_string(),
            ))
        }
        Err(e) => Err(e),
    }
}

/// List the files of the working tree that git knows about.
///
/// Returns tracked files followed by untracked files that are not ignored,
/// in git's order, as repo-relative paths with forward slashes. Tracked
/// files deleted from the working tree are skipped.
pub fn tracked_files<P: AsRef<Path>>(cwd: P) -> Result<Vec<String>> {
    let cwd = cwd.as_ref();
    let tracked = run_git(cwd, &["ls-files", "--cached", "--exclude-standard"])?;
    let untracked = run_git(cwd, &["ls-files", "--others", "--exclude-standard"])?;

    let mut seen = std::collections::HashSet::new();
    let files: Vec<String> = tracked
        .lines()
        .into_iter()
        .chain(untracked.lines())
        .map(normalize_path)
        .filter(|path| cwd.join(path).is_file())
        .filter(|path| seen.insert(path.clone()))
        .collect();

    debug!("{} files known to git", files.len());
    Ok(files)
}

/// Produce a zero-context unified diff between two revisions.
///
/// When `new_ref` is `None` the diff is taken against the working tree.
///
/// # Returns
///
/// * `Ok(String)` - Raw diff output (possibly empty)
/// * `Err(LintError::DiffUnavailable)` - Invalid reference, missing history, or git failure
pub fn unified_diff<P: AsRef<Path>>(cwd: P, old_ref: &str, new_ref: Option<&str>) -> Result<String> {
    let mut args = vec![
        "diff",
        "-U0",
        "--no-color",
        "--no-ext-diff",
        "-M",
        "--src-prefix=a/",
        "--dst-prefix=b/",
        old_ref,
    ];
    if let Some(new_ref) = new_ref {
        args.push(new_ref);
    }
    args.push("--");

    run_git(cwd, &args)
        .map(|output| output.stdout)
        .map_err(|e| match e {
            LintError::GitError(msg) => LintError::DiffUnavailable(msg),
            other => other,
        })
}
