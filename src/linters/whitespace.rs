//! In-process whitespace checks.
//!
//! Reports tabs, carriage returns, trailing whitespace, a trailing empty line
//! and a missing newline at the end of the file. Columns are 1-based character
//! positions.

use super::{Adapter, AdapterFailure, RunContext};
use crate::message::LintMessage;
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WhitespaceOptions {
    /// Tab width for expanding tabs when fixing files. Accepted so existing
    /// configs load; difflint only reports.
    #[serde(default)]
    pub tabwidth: Option<u32>,
}

impl Adapter for WhitespaceOptions {
    fn run(&self, files: &[String], ctx: &RunContext) -> Result<Vec<LintMessage>, AdapterFailure> {
        let mut messages = Vec::new();
        for file in files {
            if ctx.cancel.is_cancelled() {
                return Err(AdapterFailure::Cancelled);
            }
            match std::fs::read(ctx.root.join(file)) {
                Ok(bytes) => match String::from_utf8(bytes) {
                    Ok(content) => messages.extend(check_content(file, &content)),
                    Err(e) => messages.push(LintMessage::new(
                        file.as_str(),
                        None,
                        format!("not valid UTF-8: {}", e.utf8_error()),
                    )),
                },
                Err(e) => messages.push(LintMessage::new(
                    file.as_str(),
                    None,
                    format!("cannot read file: {}", e),
                )),
            }
        }
        Ok(messages)
    }
}

/// Check one file's content.
pub(super) fn check_content(path: &str, content: &str) -> Vec<LintMessage> {
    let lines: Vec<&str> = content.split_inclusive('\n').collect();
    let mut messages = Vec::new();

    for (index, line) in lines.iter().enumerate() {
        let line_no = index as u32 + 1;
        let at = |column: usize, text: &str| {
            LintMessage::new(path, Some(line_no), text).with_column(Some(column as u32 + 1))
        };
        let is_last = index + 1 == lines.len();

        if is_last && index > 0 && line.trim().is_empty() {
            messages.push(LintMessage::new(path, Some(line_no), "trailing empty line"));
        }
        if is_last && !line.ends_with('\n') {
            messages.push(at(line.chars().count(), "missing newline at end of file"));
        }
        if let Some(column) = char_position(line, '\t') {
            messages.push(at(column, "tab"));
        }
        if let Some(column) = char_position(line, '\r') {
            messages.push(at(column, "carriage return"));
        }

        let body: String = line.strip_suffix('\n').unwrap_or(line).replace('\r', "");
        let kept = body.trim_end();
        if kept.len() < body.len() {
            messages.push(at(kept.chars().count(), "trailing whitespace"));
        }
    }

    messages
}

fn char_position(line: &str, needle: char) -> Option<usize> {
    line.chars().position(|c| c == needle)
}
