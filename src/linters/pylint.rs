//! pylint adapter, reading `--output-format=json`.

use super::{Adapter, AdapterFailure, RunContext, exit_code_up_to, push_files, run_tool};
use crate::message::{LintMessage, Severity};
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PylintOptions {
    /// Path to a pylintrc, passed as `--rcfile`.
    #[serde(default)]
    pub rcfile: Option<String>,
}

/// One entry of pylint's JSON report.
#[derive(Debug, Deserialize)]
struct PylintRecord {
    #[serde(rename = "type")]
    kind: String,
    path: String,
    line: u32,
    column: u32,
    #[serde(rename = "endLine", default)]
    end_line: Option<u32>,
    symbol: String,
    message: String,
    #[serde(rename = "message-id")]
    message_id: String,
}

impl Adapter for PylintOptions {
    fn run(&self, files: &[String], ctx: &RunContext) -> Result<Vec<LintMessage>, AdapterFailure> {
        let mut args = vec!["--output-format=json".to_string(), format!("--jobs={}", ctx.jobs)];
        if let Some(rcfile) = &self.rcfile {
            args.push(format!("--rcfile={}", rcfile));
        }
        push_files(&mut args, files);

        // pylint's exit status is a bit mask of message categories (1..=16);
        // 32 means usage error.
        let output = run_tool("pylint", &args, ctx, exit_code_up_to(31))?;
        parse_json(&output.stdout)
    }
}

fn parse_json(stdout: &str) -> Result<Vec<LintMessage>, AdapterFailure> {
    if stdout.trim().is_empty() {
        return Ok(Vec::new());
    }

    let records: Vec<PylintRecord> =
        serde_json::from_str(stdout).map_err(|e| AdapterFailure::Unparsable(e.to_string()))?;

    Ok(records
        .into_iter()
        .map(|record| {
            // pylint columns are 0-based.
            LintMessage::new(record.path, Some(record.line), record.message)
                .with_column(Some(record.column + 1))
                .with_line_end(record.end_line)
                .with_severity(Severity::from_label(&record.kind))
                .with_code(format!("{}({})", record.message_id, record.symbol))
        })
        .collect())
}
