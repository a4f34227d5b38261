//! Run report: ordered entries plus rendering and exit status.

use crate::classify::FilteredResult;
use crate::error::{LintError, Result};
use crate::exit_codes;
use crate::message::{LintMessage, Severity};
use serde::Serialize;
use std::fmt::Write as _;

/// How the run decided which messages are in scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportMode {
    /// Every message is in scope.
    Full,
    /// Only messages on changed lines are in scope.
    ChangedLines,
}

/// One message attributed to the linter that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportEntry {
    pub linter: String,
    pub in_scope: bool,
    #[serde(flatten)]
    pub message: LintMessage,
}

impl ReportEntry {
    fn sort_key(&self) -> (&str, u32, &str, u32, &str, &str) {
        (
            self.message.path.as_deref().unwrap_or(""),
            self.message.line.unwrap_or(0),
            self.linter.as_str(),
            self.message.column.unwrap_or(0),
            self.message.code.as_deref().unwrap_or(""),
            self.message.text.as_str(),
        )
    }

    fn is_blocking(&self, fail_on: Severity) -> bool {
        self.in_scope && self.message.severity >= fail_on
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub mode: ReportMode,
    pub fail_on: Severity,
    /// Linters that were dispatched, in configuration order.
    pub linters: Vec<String>,
    /// Run-level warnings, such as a diff fallback.
    pub warnings: Vec<String>,
    /// Messages dropped because they concern deleted files or unselected paths.
    pub dropped: usize,
    pub entries: Vec<ReportEntry>,
}

impl Report {
    pub fn new(mode: ReportMode, fail_on: Severity) -> Self {
        Self {
            mode,
            fail_on,
            linters: Vec::new(),
            warnings: Vec::new(),
            dropped: 0,
            entries: Vec::new(),
        }
    }

    pub fn push(&mut self, linter: &str, result: FilteredResult) {
        self.entries.push(ReportEntry {
            linter: linter.to_string(),
            in_scope: result.in_scope,
            message: result.message,
        });
    }

    /// Order entries by (path, line, linter, column, code, text).
    ///
    /// Linter-level messages have no path and sort first.
    pub fn sort(&mut self) {
        self.entries.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
    }

    pub fn in_scope(&self) -> impl Iterator<Item = &ReportEntry> {
        self.entries.iter().filter(|e| e.in_scope)
    }

    pub fn suppressed_count(&self) -> usize {
        self.entries.iter().filter(|e| !e.in_scope).count()
    }

    pub fn blocking_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.is_blocking(self.fail_on))
            .count()
    }

    /// Process exit code: findings if any in-scope message reaches `fail_on`.
    pub fn exit_code(&self) -> i32 {
        if self.blocking_count() > 0 {
            exit_codes::FINDINGS
        } else {
            exit_codes::SUCCESS
        }
    }

    /// Human-readable report of the in-scope messages.
    pub fn render_text(&self) -> String {
        let mut out = String::new();

        for warning in &self.warnings {
            let _ = writeln!(out, "warning: {}", warning);
        }

        let mut current: Option<Option<&str>> = None;
        for entry in self.in_scope() {
            let path = entry.message.path.as_deref();
            if current != Some(path) {
                if current.is_some() {
                    out.push('\n');
                }
                let _ = writeln!(out, "{}", path.unwrap_or("(linter)"));
                current = Some(path);
            }

            let location = match (entry.message.line, entry.message.column) {
                (Some(line), Some(column)) => format!("{}:{}", line, column),
                (Some(line), None) => line.to_string(),
                (None, _) => "-".to_string(),
            };
            let code = entry
                .message
                .code
                .as_deref()
                .map(|c| format!("{} ", c))
                .unwrap_or_default();
            let _ = writeln!(
                out,
                "  {:<8} {:<12} {:<7} {}{}",
                location, entry.linter, entry.message.severity, code, entry.message.text
            );
        }

        if !self.entries.is_empty() {
            out.push('\n');
        }

        let in_scope = self.entries.len() - self.suppressed_count();
        let _ = write!(
            out,
            "{} linter(s), {} message(s) in scope, {} blocking at '{}' or above",
            self.linters.len(),
            in_scope,
            self.blocking_count(),
            self.fail_on
        );
        if self.mode == ReportMode::ChangedLines {
            let _ = write!(out, ", {} on unchanged lines suppressed", self.suppressed_count());
        }
        out.push('\n');

        out
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| LintError::UserError(format!("failed to serialize report: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(message: LintMessage, in_scope: bool) -> FilteredResult {
        FilteredResult { message, in_scope }
    }

    fn sample() -> Report {
        let mut report = Report::new(ReportMode::ChangedLines, Severity::Warning);
        report.linters = vec!["flake8".to_string(), "whitespace".to_string()];
        report.push(
            "whitespace",
            result(LintMessage::new("b.py", Some(3), "tab").with_column(Some(1)), true),
        );
        report.push(
            "flake8",
            result(
                LintMessage::new("b.py", Some(3), "unused").with_code("F401"),
                true,
            ),
        );
        report.push("flake8", result(LintMessage::new("a.py", Some(9), "old"), false));
        report.push(
            "flake8",
            result(
                LintMessage::linter_level(Severity::Error, "flake8 failed: timed out after 5s"),
                true,
            ),
        );
        report.sort();
        report
    }

    #[test]
    fn test_sort_order() {
        let report = sample();
        let order: Vec<(Option<&str>, &str)> = report
            .entries
            .iter()
            .map(|e| (e.message.path.as_deref(), e.linter.as_str()))
            .collect();

        assert_eq!(
            order,
            vec![
                (None, "flake8"),
                (Some("a.py"), "flake8"),
                (Some("b.py"), "flake8"),
                (Some("b.py"), "whitespace"),
            ]
        );
    }

    #[test]
    fn test_counts() {
        let report = sample();
        assert_eq!(report.in_scope().count(), 3);
        assert_eq!(report.suppressed_count(), 1);
        assert_eq!(report.blocking_count(), 3);
        assert_eq!(report.exit_code(), exit_codes::FINDINGS);
    }

    #[test]
    fn test_only_out_of_scope_messages_pass() {
        let mut report = Report::new(ReportMode::ChangedLines, Severity::Warning);
        report.push("flake8", result(LintMessage::new("a.py", Some(9), "old"), false));
        assert_eq!(report.exit_code(), exit_codes::SUCCESS);
    }

    #[test]
    fn test_fail_on_threshold() {
        let mut report = Report::new(ReportMode::Full, Severity::Error);
        report.push(
            "pylint",
            result(
                LintMessage::new("a.py", Some(1), "docstring").with_severity(Severity::Info),
                true,
            ),
        );
        report.push("pylint", result(LintMessage::new("a.py", Some(2), "style"), true));
        assert_eq!(report.exit_code(), exit_codes::SUCCESS);

        report.push(
            "pylint",
            result(
                LintMessage::new("a.py", Some(3), "undefined").with_severity(Severity::Error),
                true,
            ),
        );
        assert_eq!(report.exit_code(), exit_codes::FINDINGS);
    }

    #[test]
    fn test_render_text() {
        let mut report = sample();
        report.warnings.push("diff unavailable, reporting all messages".to_string());
        let text = report.render_text();

        assert!(text.starts_with("warning: diff unavailable"));
        assert!(text.contains("(linter)\n"));
        assert!(text.contains("b.py\n"));
        assert!(text.contains("F401 unused"));
        // Out-of-scope messages are not listed.
        assert!(!text.contains("a.py"));
        assert!(text.contains("3 message(s) in scope"));
        assert!(text.contains("1 on unchanged lines suppressed"));
    }

    #[test]
    fn test_json_contains_flattened_messages() {
        let json = sample().to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["mode"], "changed_lines");
        assert_eq!(value["entries"].as_array().unwrap().len(), 4);
        assert_eq!(value["entries"][2]["path"], "b.py");
        assert_eq!(value["entries"][2]["code"], "F401");
        assert_eq!(value["entries"][2]["linter"], "flake8");
        assert_eq!(value["entries"][0]["path"], serde_json::Value::Null);
    }
}
