//! Run coordination.
//!
//! A run goes through these steps in order:
//! 1. build the diff index (changed-lines mode only; falls back to a full
//!    report with one warning when the diff is unavailable)
//! 2. list candidate files and select each linter's worklist
//! 3. dispatch the linters on a bounded rayon pool
//! 4. classify every message against the index and assemble the report

use crate::cancel::CancelToken;
use crate::classify::classify;
use crate::config::Config;
use crate::diff::DiffIndex;
use crate::error::{LintError, Result};
use crate::git;
use crate::linters::{AdapterFailure, LinterEntry, RunContext};
use crate::message::{LintMessage, Severity};
use crate::report::{Report, ReportMode};
use crate::select::select;
use rayon::prelude::*;
use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Which messages a run reports as in scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunMode {
    /// Lint every candidate file and report everything.
    FullReport,
    /// Lint changed files and report only messages on changed lines.
    ChangedLinesOnly {
        old_ref: String,
        /// `None` compares against the working tree.
        new_ref: Option<String>,
    },
}

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub mode: RunMode,
    /// Worker threads; at least 1.
    pub jobs: usize,
    pub cancel: CancelToken,
}

/// Result of one linter's worker.
struct LinterOutcome<'a> {
    entry: &'a LinterEntry,
    result: std::result::Result<Vec<LintMessage>, AdapterFailure>,
}

/// Run `linters` over the repository at `root` and build the report.
///
/// # Returns
///
/// * `Ok(Report)` - Sorted report; adapter failures appear as error messages
/// * `Err(LintError::GitError)` - The file list could not be obtained
/// * `Err(LintError::Cancelled)` - A termination signal arrived during the run
pub fn run(
    config: &Config,
    linters: &[&LinterEntry],
    options: &RunOptions,
    root: &Path,
) -> Result<Report> {
    let start = Instant::now();
    let mut warnings = Vec::new();

    let index = match &options.mode {
        RunMode::FullReport => None,
        RunMode::ChangedLinesOnly { old_ref, new_ref } => {
            match DiffIndex::build(root, old_ref, new_ref.as_deref()) {
                Ok(index) => Some(index),
                Err(LintError::DiffUnavailable(reason)) => {
                    warn!("{}; falling back to a full report", reason);
                    warnings.push(format!(
                        "diff against '{}' unavailable ({}); reporting all messages",
                        old_ref, reason
                    ));
                    None
                }
                Err(e) => return Err(e),
            }
        }
    };

    let mode = if index.is_some() {
        ReportMode::ChangedLines
    } else {
        ReportMode::Full
    };

    let mut candidates = git::tracked_files(root)?;
    if let Some(index) = &index {
        info!("diff touches {} file(s)", index.len());
        for path in index.deleted_paths() {
            debug!("{} was deleted; its messages will be dropped", path);
        }
        candidates.retain(|path| index.is_selectable(path));
    }
    debug!("{} candidate file(s)", candidates.len());

    let selection = select(
        &candidates,
        &config.pre_filefilter,
        linters.iter().map(|e| (e.id.as_str(), &e.filefilter)),
    );

    check_cancelled(&options.cancel)?;

    let outcomes = dispatch(linters, &selection, options, root)?;

    check_cancelled(&options.cancel)?;

    let mut report = Report::new(mode, config.fail_on);
    report.warnings = warnings;
    report.linters = linters.iter().map(|e| e.id.clone()).collect();

    for outcome in outcomes {
        let id = outcome.entry.id.as_str();
        let messages = match outcome.result {
            Ok(messages) => messages,
            Err(AdapterFailure::Cancelled) => return Err(LintError::Cancelled),
            Err(failure) => {
                warn!("{} failed: {}", id, failure);
                vec![LintMessage::linter_level(
                    Severity::Error,
                    format!("{} failed: {}", id, failure),
                )]
            }
        };

        let selected: HashSet<&str> = selection
            .get(id)
            .map(|files| files.iter().map(String::as_str).collect())
            .unwrap_or_default();

        for message in messages {
            if let Some(path) = message.path.as_deref() {
                if !selected.contains(path) {
                    warn!(
                        "{} reported '{}', which was not in its worklist; message dropped",
                        id, path
                    );
                    report.dropped += 1;
                    continue;
                }
            }

            match classify(message, index.as_ref()) {
                Some(result) => report.push(id, result),
                None => report.dropped += 1,
            }
        }
    }

    report.sort();
    info!(
        "{} linter(s) finished in {:.2}s: {} message(s), {} suppressed",
        linters.len(),
        start.elapsed().as_secs_f64(),
        report.entries.len(),
        report.suppressed_count()
    );
    Ok(report)
}

/// Run every linter with a non-empty worklist on a pool of `options.jobs` threads.
fn dispatch<'a>(
    linters: &[&'a LinterEntry],
    selection: &BTreeMap<String, Vec<String>>,
    options: &RunOptions,
    root: &Path,
) -> Result<Vec<LinterOutcome<'a>>> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(options.jobs.max(1))
        .thread_name(|i| format!("difflint-worker-{}", i))
        .build()
        .map_err(|e| LintError::UserError(format!("failed to start worker pool: {}", e)))?;

    let outcomes = pool.install(|| {
        linters
            .par_iter()
            .filter_map(|&entry| {
                let files = selection.get(&entry.id).map(Vec::as_slice).unwrap_or(&[]);
                if files.is_empty() {
                    info!("{}: no files selected, skipped", entry.id);
                    return None;
                }
                if options.cancel.is_cancelled() {
                    return Some(LinterOutcome {
                        entry,
                        result: Err(AdapterFailure::Cancelled),
                    });
                }

                let ctx = RunContext {
                    root: root.to_path_buf(),
                    jobs: options.jobs,
                    timeout: entry.timeout,
                    cancel: options.cancel.clone(),
                };

                info!("{}: linting {} file(s)", entry.id, files.len());
                let started = Instant::now();
                let result = entry.adapter().run(files, &ctx);
                debug!(
                    "{}: done in {:.2}s",
                    entry.id,
                    started.elapsed().as_secs_f64()
                );
                Some(LinterOutcome { entry, result })
            })
            .collect::<Vec<_>>()
    });

    Ok(outcomes)
}

fn check_cancelled(cancel: &CancelToken) -> Result<()> {
    if cancel.is_cancelled() {
        Err(LintError::Cancelled)
    } else {
        Ok(())
    }
}
