//! Adapter for arbitrary commands.
//!
//! The command is split with shell-words (no shell is involved), the selected
//! files are appended, and every output line matching `pattern` becomes a
//! message. The pattern uses named groups: `path` and `text` are required;
//! `line`, `line_end`, `column`, `severity` and `code` are optional.

use super::process::split_command;
use super::{Adapter, AdapterFailure, Language, RunContext, Style, run_tool};
use crate::message::{LintMessage, Severity};
use regex::{Captures, Regex};
use serde::{Deserialize, Deserializer};

const REQUIRED_GROUPS: &[&str] = &["path", "text"];

/// A compiled output pattern.
#[derive(Debug, Clone)]
pub struct OutputPattern(Regex);

impl OutputPattern {
    pub fn new(pattern: &str) -> Result<Self, String> {
        let regex =
            Regex::new(pattern).map_err(|e| format!("invalid pattern '{}': {}", pattern, e))?;

        let names: Vec<&str> = regex.capture_names().flatten().collect();
        for group in REQUIRED_GROUPS {
            if !names.contains(group) {
                return Err(format!(
                    "pattern '{}' has no named group '{}'",
                    pattern, group
                ));
            }
        }

        Ok(Self(regex))
    }

    fn parse_line(&self, line: &str) -> Option<LintMessage> {
        let caps = self.0.captures(line)?;
        let path = caps.name("path")?.as_str().trim();
        if path.is_empty() {
            return None;
        }

        let mut message = LintMessage::new(path, number(&caps, "line"), text(&caps, "text"))
            .with_line_end(number(&caps, "line_end"))
            .with_column(number(&caps, "column"))
            .with_code(text(&caps, "code"));
        if let Some(severity) = caps.name("severity") {
            message = message.with_severity(Severity::from_label(severity.as_str()));
        }
        Some(message)
    }
}

fn number(caps: &Captures<'_>, group: &str) -> Option<u32> {
    caps.name(group).and_then(|m| m.as_str().trim().parse().ok())
}

fn text(caps: &Captures<'_>, group: &str) -> String {
    caps.name(group)
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default()
}

impl<'de> Deserialize<'de> for OutputPattern {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let pattern = String::deserialize(deserializer)?;
        OutputPattern::new(&pattern).map_err(serde::de::Error::custom)
    }
}

/// Which output stream carries the diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputStream {
    Stdout,
    Stderr,
    #[default]
    Both,
}

fn default_ok_exit_codes() -> Vec<i32> {
    vec![0, 1]
}

fn default_language() -> Language {
    Language::Generic
}

fn default_style() -> Style {
    Style::Static
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CustomOptions {
    /// Linter id used in reports and on the command line.
    pub name: String,

    /// Command line; selected files are appended.
    pub command: String,

    pub pattern: OutputPattern,

    #[serde(default = "default_ok_exit_codes")]
    pub ok_exit_codes: Vec<i32>,

    #[serde(default)]
    pub stream: OutputStream,

    #[serde(default = "default_language")]
    pub language: Language,

    #[serde(default = "default_style")]
    pub style: Style,
}

impl CustomOptions {
    /// Checks serde cannot express: a usable name and a parsable command.
    pub fn validate(&self) -> Result<(), String> {
        let name = self.name.trim();
        if name.is_empty() || name.contains(char::is_whitespace) {
            return Err(format!(
                "custom linter name '{}' must be a non-empty word",
                self.name
            ));
        }
        if super::find_spec(name).is_some() {
            return Err(format!(
                "custom linter name '{}' clashes with a built-in linter",
                name
            ));
        }
        split_command(&self.command).map_err(|e| e.to_string())?;
        Ok(())
    }

    fn parse_output(&self, stdout: &str, stderr: &str) -> (Vec<LintMessage>, Option<String>) {
        let text = match self.stream {
            OutputStream::Stdout => stdout.to_string(),
            OutputStream::Stderr => stderr.to_string(),
            OutputStream::Both => format!("{}\n{}", stdout, stderr),
        };

        let mut messages = Vec::new();
        let mut first_unmatched = None;
        for line in text.lines().filter(|l| !l.trim().is_empty()) {
            match self.pattern.parse_line(line) {
                Some(message) => messages.push(message),
                None => {
                    if first_unmatched.is_none() {
                        first_unmatched = Some(line.to_string());
                    }
                }
            }
        }
        (messages, first_unmatched)
    }
}

impl Adapter for CustomOptions {
    fn run(&self, files: &[String], ctx: &RunContext) -> Result<Vec<LintMessage>, AdapterFailure> {
        let (program, mut args) = split_command(&self.command)?;
        args.extend(files.iter().cloned());

        let output = run_tool(&program, &args, ctx, |code| {
            self.ok_exit_codes.contains(&code)
        })?;

        let (messages, first_unmatched) = self.parse_output(&output.stdout, &output.stderr);
        if output.exit_code != 0 && messages.is_empty() {
            if let Some(line) = first_unmatched {
                return Err(AdapterFailure::Unparsable(line));
            }
        }
        Ok(messages)
    }
}
