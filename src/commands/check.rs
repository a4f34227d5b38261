//! Implementation of the `difflint check` command.
//!
//! Resolves the repository and configuration, narrows the linter list from
//! the command line, runs the linters and prints the report.

use crate::cancel::CancelToken;
use crate::cli::{CheckArgs, OutputFormat};
use crate::config::{CONFIG_FILE_NAME, Config, LinterSelection, Part};
use crate::error::{LintError, Result};
use crate::git;
use crate::runner::{self, RunMode, RunOptions};
use std::num::NonZeroUsize;
use tracing::{info, warn};

/// Execute the `difflint check` command.
///
/// Returns the exit code derived from the report.
pub fn cmd_check(args: CheckArgs) -> Result<i32> {
    let cwd = std::env::current_dir().map_err(|e| {
        LintError::UserError(format!("failed to read the current directory: {}", e))
    })?;
    let root = git::get_repo_root(&cwd)?;

    let config_path = args
        .config
        .clone()
        .unwrap_or_else(|| root.join(CONFIG_FILE_NAME));
    let config = Config::load(&config_path)?;

    let selection = LinterSelection {
        names: args.linters.clone(),
        language: args.language,
        style: args.style,
        part: args.part.as_deref().map(str::parse::<Part>).transpose()?,
    };
    let linters = config.select_linters(&selection)?;
    if linters.is_empty() {
        warn!("no linters left after applying the selection");
    }

    let jobs = resolve_jobs(args.jobs.as_deref(), config.jobs)?;

    let mode = match (&args.refspec, args.full) {
        (Some(old_ref), false) => RunMode::ChangedLinesOnly {
            old_ref: old_ref.clone(),
            new_ref: args.new_ref.clone(),
        },
        _ => RunMode::FullReport,
    };
    info!("running {} linter(s) on {} worker(s), {:?}", linters.len(), jobs, mode);

    let cancel = CancelToken::new();
    cancel.install_signal_handler();

    let options = RunOptions { mode, jobs, cancel };
    let report = runner::run(&config, &linters, &options, &root)?;

    match args.format {
        OutputFormat::Text => print!("{}", report.render_text()),
        OutputFormat::Json => println!("{}", report.to_json()?),
    }

    Ok(report.exit_code())
}

/// Worker count from `--jobs`, then the config, then the machine.
fn resolve_jobs(arg: Option<&str>, configured: Option<usize>) -> Result<usize> {
    match arg.map(str::trim) {
        Some("auto") => Ok(available_parallelism()),
        Some(value) => match value.parse::<usize>() {
            Ok(jobs) if jobs > 0 => Ok(jobs),
            _ => Err(LintError::UserError(format!(
                "invalid --jobs value '{}': expected a positive number or 'auto'",
                value
            ))),
        },
        None => Ok(configured.unwrap_or_else(available_parallelism)),
    }
}

fn available_parallelism() -> usize {
    std::thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1)
}
