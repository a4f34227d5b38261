//! Linter messages in the common format produced by every adapter.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Message severity, ordered from least to most severe.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    #[default]
    Warning,
    Error,
}

impl Severity {
    /// Map a linter's own severity word onto the common scale.
    ///
    /// Unknown words map to `Warning`.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "info" | "information" | "note" | "style" | "convention" | "refactor"
            | "performance" | "portability" => Severity::Info,
            "error" | "fatal" | "severe" => Severity::Error,
            _ => Severity::Warning,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// A single diagnostic reported by a linter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LintMessage {
    /// Repo-relative path. `None` for linter-level messages.
    pub path: Option<String>,
    /// 1-based line number. `None` for file-level messages.
    pub line: Option<u32>,
    /// Last line of a ranged message (inclusive).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_end: Option<u32>,
    /// 1-based column.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<u32>,
    pub severity: Severity,
    /// Linter-specific rule code, e.g. `E501`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    pub text: String,
}

impl LintMessage {
    /// A message on one line of a file.
    pub fn new(path: impl Into<String>, line: Option<u32>, text: impl Into<String>) -> Self {
        Self {
            path: Some(crate::filter::normalize_path(&path.into())),
            line: line.filter(|&l| l > 0),
            line_end: None,
            column: None,
            severity: Severity::Warning,
            code: None,
            text: text.into(),
        }
    }

    /// A message about the linter run itself rather than a file.
    pub fn linter_level(severity: Severity, text: impl Into<String>) -> Self {
        Self {
            path: None,
            line: None,
            line_end: None,
            column: None,
            severity,
            code: None,
            text: text.into(),
        }
    }

    pub fn with_column(mut self, column: Option<u32>) -> Self {
        self.column = column.filter(|&c| c > 0);
        self
    }

    pub fn with_line_end(mut self, line_end: Option<u32>) -> Self {
        self.line_end = line_end;
        self
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        let code = code.into();
        self.code = if code.is_empty() { None } else { Some(code) };
        self
    }

    /// Inclusive line range covered by the message, if it has a line.
    pub fn line_range(&self) -> Option<(u32, u32)> {
        let start = self.line?;
        let end = self.line_end.unwrap_or(start).max(start);
        Some((start, end))
    }
}
