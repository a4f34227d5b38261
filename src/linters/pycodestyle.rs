//! pycodestyle adapter.

use super::colon::{code_and_text, parse_location_lines};
use super::{Adapter, AdapterFailure, RunContext, exit_code_up_to, push_files, run_tool};
use crate::message::LintMessage;
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PycodestyleOptions {
    #[serde(default)]
    pub config: Option<String>,
}

impl Adapter for PycodestyleOptions {
    fn run(&self, files: &[String], ctx: &RunContext) -> Result<Vec<LintMessage>, AdapterFailure> {
        let mut args = Vec::new();
        if let Some(config) = &self.config {
            args.push(format!("--config={}", config));
        }
        push_files(&mut args, files);

        let output = run_tool("pycodestyle", &args, ctx, exit_code_up_to(1))?;
        parse_location_lines(&output.stdout, code_and_text).into_messages(output.exit_code != 0)
    }
}
