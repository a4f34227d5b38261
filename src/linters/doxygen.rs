//! doxygen adapter: reports undocumented C/C++ declarations.
//!
//! The Doxyfile is written to doxygen's stdin. Warnings go to stderr with a
//! marker prefix so they can be told apart from progress output.

use super::colon::parse_location_lines;
use super::{Adapter, AdapterFailure, RunContext, run_tool_with_input};
use crate::message::{LintMessage, Severity};
use serde::Deserialize;
use std::path::Path;

const WARN_MARKER: &str = "~~WARN~~ ";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DoxygenOptions {}

fn doxyfile(files: &[String]) -> String {
    let input: Vec<String> = files
        .iter()
        .map(|file| format!("\"{}\"", file.replace('"', "\\\"")))
        .collect();

    format!(
        "INPUT                  = {}\n\
         DOXYFILE_ENCODING      = UTF-8\n\
         PROJECT_NAME           = difflint\n\
         GENERATE_HTML          = NO\n\
         GENERATE_LATEX         = NO\n\
         WARNINGS               = YES\n\
         WARN_IF_UNDOCUMENTED   = YES\n\
         WARN_IF_DOC_ERROR      = YES\n\
         WARN_FORMAT            = \"{}$file:$line: $text\"\n\
         GENERATE_AUTOGEN_DEF   = NO\n",
        input.join(" "),
        WARN_MARKER
    )
}

impl Adapter for DoxygenOptions {
    fn run(&self, files: &[String], ctx: &RunContext) -> Result<Vec<LintMessage>, AdapterFailure> {
        let args = vec!["-".to_string()];
        let output = run_tool_with_input("doxygen", &args, Some(&doxyfile(files)), ctx, |code| {
            code == 0
        })?;
        Ok(parse_warnings(&output.stderr, &ctx.root))
    }
}

/// Parse marked warnings, making absolute paths under `root` relative.
fn parse_warnings(stderr: &str, root: &Path) -> Vec<LintMessage> {
    let prefix = format!("{}/", root.display());
    let marked: String = stderr
        .lines()
        .filter_map(|line| line.strip_prefix(WARN_MARKER))
        .map(|line| format!("{}\n", line.strip_prefix(prefix.as_str()).unwrap_or(line)))
        .collect();

    parse_location_lines(&marked, |message, rest| {
        let (severity, text) = match rest.split_once(": ") {
            Some(("error", text)) => (Severity::Error, text),
            Some(("warning", text)) => (Severity::Warning, text),
            _ => (Severity::Warning, rest),
        };
        LintMessage {
            text: text.trim().to_string(),
            ..message
        }
        .with_severity(severity)
    })
    .messages
}
