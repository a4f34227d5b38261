//! yamllint adapter, using its `parsable` output format.

use super::colon::parse_location_lines;
use super::{Adapter, AdapterFailure, RunContext, exit_code_up_to, push_files, run_tool};
use crate::message::{LintMessage, Severity};
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct YamllintOptions {
    /// Path to a yamllint config file, passed as `-c`.
    #[serde(default)]
    pub config: Option<String>,
}

impl Adapter for YamllintOptions {
    fn run(&self, files: &[String], ctx: &RunContext) -> Result<Vec<LintMessage>, AdapterFailure> {
        let mut args = vec!["-f".to_string(), "parsable".to_string()];
        if let Some(config) = &self.config {
            args.push("-c".to_string());
            args.push(config.clone());
        }
        push_files(&mut args, files);

        let output = run_tool("yamllint", &args, ctx, exit_code_up_to(1))?;
        parse_location_lines(&output.stdout, level_text_rule).into_messages(output.exit_code != 0)
    }
}

/// Split `[level] text (rule)`.
fn level_text_rule(message: LintMessage, rest: &str) -> LintMessage {
    let mut severity = Severity::Warning;
    let mut text = rest;

    if let Some(after) = rest.strip_prefix('[') {
        if let Some((level, remainder)) = after.split_once(']') {
            severity = Severity::from_label(level);
            text = remainder.trim();
        }
    }

    let mut code = "";
    if text.ends_with(')') {
        if let Some(open) = text.rfind(" (") {
            code = &text[open + 2..text.len() - 1];
            text = text[..open].trim_end();
        }
    }

    LintMessage {
        text: text.to_string(),
        ..message
    }
    .with_severity(severity)
    .with_code(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_parsable_format() {
        let output = "config/a.yml:3:1: [error] too many blank lines (3 > 0) (empty-lines)\n\
                      config/a.yml:1:1: [warning] missing document start \"---\" (document-start)\n";
        let messages = parse_location_lines(output, level_text_rule)
            .into_messages(true)
            .unwrap();

        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].severity, Severity::Error);
        assert_eq!(messages[0].code.as_deref(), Some("empty-lines"));
        assert_eq!(messages[0].text, "too many blank lines (3 > 0)");
        assert_eq!(messages[0].line, Some(3));

        assert_eq!(messages[1].severity, Severity::Warning);
        assert_eq!(messages[1].code.as_deref(), Some("document-start"));
    }

    #[test]
    fn test_message_without_rule() {
        let messages = parse_location_lines("a.yml:2:5: [error] syntax error", level_text_rule)
            .into_messages(true)
            .unwrap();
        assert_eq!(messages[0].code, None);
        assert_eq!(messages[0].text, "syntax error");
    }
}
