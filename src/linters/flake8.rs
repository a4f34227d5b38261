//! flake8 adapter.

use super::colon::{code_and_text, parse_location_lines};
use super::{Adapter, AdapterFailure, RunContext, exit_code_up_to, push_files, run_tool};
use crate::message::LintMessage;
use serde::Deserialize;

/// Options for `flake8`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Flake8Options {
    /// Path to a flake8 config file, passed as `--config`.
    #[serde(default)]
    pub config: Option<String>,
}

impl Flake8Options {
    fn args(&self, files: &[String], jobs: usize) -> Vec<String> {
        let mut args = vec![format!("--jobs={}", jobs)];
        if let Some(config) = &self.config {
            args.push(format!("--config={}", config));
        }
        push_files(&mut args, files);
        args
    }
}

impl Adapter for Flake8Options {
    fn run(&self, files: &[String], ctx: &RunContext) -> Result<Vec<LintMessage>, AdapterFailure> {
        // 0: clean, 1: problems found.
        let output = run_tool("flake8", &self.args(files, ctx.jobs), ctx, exit_code_up_to(1))?;
        parse_location_lines(&output.stdout, code_and_text).into_messages(output.exit_code != 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args() {
        let options = Flake8Options {
            config: Some("setup.cfg".to_string()),
        };
        let args = options.args(&["a.py".to_string()], 4);
        assert_eq!(args, vec!["--jobs=4", "--config=setup.cfg", "--", "a.py"]);
    }

    #[test]
    fn test_unknown_option_rejected() {
        let err = serde_yaml::from_str::<Flake8Options>("max_line: 100").unwrap_err();
        assert!(err.to_string().contains("unknown field"));
    }
}
