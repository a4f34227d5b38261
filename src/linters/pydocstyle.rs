//! pydocstyle adapter.
//!
//! pydocstyle prints each problem on two lines: the location, then the
//! indented `CODE: text`.

use super::colon::Parsed;
use super::{Adapter, AdapterFailure, RunContext, exit_code_up_to, push_files, run_tool};
use crate::message::LintMessage;
use regex::Regex;
use serde::Deserialize;
use std::sync::LazyLock;

static LOCATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<path>[^:\s][^:]*):(?P<line>\d+)(?:\s|:|$)")
        .expect("pydocstyle location regex is valid")
});

/// Options for `pydocstyle`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PydocstyleOptions {
    /// Path to a pydocstyle config file, passed as `--config`.
    #[serde(default)]
    pub config: Option<String>,
}

impl PydocstyleOptions {
    fn args(&self, files: &[String]) -> Vec<String> {
        let mut args = Vec::new();
        if let Some(config) = &self.config {
            args.push(format!("--config={}", config));
        }
        push_files(&mut args, files);
        args
    }
}

impl Adapter for PydocstyleOptions {
    fn run(&self, files: &[String], ctx: &RunContext) -> Result<Vec<LintMessage>, AdapterFailure> {
        let output = run_tool("pydocstyle", &self.args(files), ctx, exit_code_up_to(1))?;
        parse_output(&output.stdout).into_messages(output.exit_code != 0)
    }
}

fn parse_output(output: &str) -> Parsed<'_> {
    let mut parsed = Parsed::default();
    let mut lines = output
        .lines()
        .filter(|line| !line.trim().is_empty() && !line.contains("WARNING: "));

    while let Some(line) = lines.next() {
        let Some(caps) = LOCATION_RE.captures(line) else {
            parsed.unmatched.push(line);
            continue;
        };
        let Some(detail) = lines.next() else {
            parsed.unmatched.push(line);
            break;
        };

        let line_no = caps["line"].parse::<u32>().ok();
        let message = match detail.trim().split_once(':') {
            Some((code, text)) => {
                LintMessage::new(&caps["path"], line_no, text.trim()).with_code(code.trim())
            }
            None => LintMessage::new(&caps["path"], line_no, detail.trim()),
        };
        parsed.messages.push(message);
    }

    parsed
}
