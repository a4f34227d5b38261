//! restructuredtext-lint adapter, reading `--format json`.

use super::{Adapter, AdapterFailure, RunContext, push_files, run_tool};
use crate::message::{LintMessage, Severity};
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RstLintOptions {}

#[derive(Debug, Deserialize)]
struct RstRecord {
    source: String,
    #[serde(default)]
    line: Option<u32>,
    #[serde(rename = "type")]
    kind: String,
    message: String,
}

impl Adapter for RstLintOptions {
    fn run(&self, files: &[String], ctx: &RunContext) -> Result<Vec<LintMessage>, AdapterFailure> {
        let mut args = vec!["--format".to_string(), "json".to_string()];
        push_files(&mut args, files);

        // 2 means problems were found; 1 is a usage error.
        let output = run_tool("rst-lint", &args, ctx, |code| code == 0 || code == 2)?;
        parse_json(&output.stdout)
    }
}

fn parse_json(stdout: &str) -> Result<Vec<LintMessage>, AdapterFailure> {
    if stdout.trim().is_empty() {
        return Ok(Vec::new());
    }

    let records: Vec<RstRecord> =
        serde_json::from_str(stdout).map_err(|e| AdapterFailure::Unparsable(e.to_string()))?;

    Ok(records
        .into_iter()
        .map(|record| {
            LintMessage::new(record.source, record.line, record.message)
                .with_severity(Severity::from_label(&record.kind))
        })
        .collect())
}
