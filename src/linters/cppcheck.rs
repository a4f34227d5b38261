//! cppcheck adapter.
//!
//! cppcheck writes diagnostics to stderr; a fixed `--template` makes them
//! line-oriented.

use super::{Adapter, AdapterFailure, RunContext, exit_code_up_to, run_tool};
use crate::message::{LintMessage, Severity};
use regex::Regex;
use serde::Deserialize;
use std::sync::LazyLock;

const TEMPLATE: &str = "{file}:{line}:{severity}:{id}:{message}";

static TEMPLATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<path>[^:]+):(?P<line>\d+):(?P<severity>\w+):(?P<id>\w+):(?P<text>.*)$")
        .expect("Invalid cppcheck template regex")
});

fn default_language() -> String {
    "c++".to_string()
}

fn default_standard() -> String {
    "c++11".to_string()
}

fn default_suppress() -> Vec<String> {
    vec![
        "missingIncludeSystem".to_string(),
        "unusedFunction".to_string(),
    ]
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CppcheckOptions {
    #[serde(default = "default_language")]
    pub language: String,

    #[serde(default = "default_standard")]
    pub standard: String,

    /// Check ids passed as `--suppress`.
    #[serde(default = "default_suppress")]
    pub suppress: Vec<String>,

    /// Include directories passed as `-I`.
    #[serde(default)]
    pub include: Vec<String>,
}

impl Default for CppcheckOptions {
    fn default() -> Self {
        Self {
            language: default_language(),
            standard: default_standard(),
            suppress: default_suppress(),
            include: Vec::new(),
        }
    }
}

impl CppcheckOptions {
    fn args(&self, files: &[String], jobs: usize) -> Vec<String> {
        let mut args = vec![
            "-q".to_string(),
            "--enable=all".to_string(),
            format!("-j{}", jobs),
            format!("--language={}", self.language),
            format!("--std={}", self.standard),
            format!("--template={}", TEMPLATE),
        ];
        args.extend(self.suppress.iter().map(|id| format!("--suppress={}", id)));
        args.extend(self.include.iter().map(|dir| format!("-I{}", dir)));
        args.extend(files.iter().cloned());
        args
    }
}

impl Adapter for CppcheckOptions {
    fn run(&self, files: &[String], ctx: &RunContext) -> Result<Vec<LintMessage>, AdapterFailure> {
        let output = run_tool("cppcheck", &self.args(files, ctx.jobs), ctx, exit_code_up_to(0))?;
        Ok(parse_template_output(&output.stderr))
    }
}

/// Parse template lines; anything else on stderr (progress, notes) is skipped.
fn parse_template_output(stderr: &str) -> Vec<LintMessage> {
    stderr
        .lines()
        .filter_map(|line| TEMPLATE_RE.captures(line))
        .map(|caps| {
            LintMessage::new(&caps["path"], caps["line"].parse().ok(), caps["text"].trim())
                .with_severity(Severity::from_label(&caps["severity"]))
                .with_code(&caps["id"])
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_template_output() {
        let stderr = "src/a.cpp:12:style:variableScope:The scope of the variable 'i' can be reduced.\n\
                      src/b.h:0:information:missingInclude:Include file not found\n\
                      Checking src/a.cpp ...\n\
                      src/a.cpp:30:error:nullPointer:Null pointer dereference: p\n";
        let messages = parse_template_output(stderr);

        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0].path.as_deref(), Some("src/a.cpp"));
        assert_eq!(messages[0].line, Some(12));
        assert_eq!(messages[0].severity, Severity::Info);
        assert_eq!(messages[0].code.as_deref(), Some("variableScope"));

        // Line 0 is a file-level message.
        assert_eq!(messages[1].line, None);

        assert_eq!(messages[2].severity, Severity::Error);
        assert_eq!(messages[2].text, "Null pointer dereference: p");
    }

    #[test]
    fn test_default_options() {
        let options: CppcheckOptions = serde_yaml::from_str("{}").unwrap();
        let args = options.args(&["a.cpp".to_string()], 2);
        assert!(args.contains(&"--std=c++11".to_string()));
        assert!(args.contains(&"--suppress=missingIncludeSystem".to_string()));
        assert_eq!(args.last().map(String::as_str), Some("a.cpp"));
    }
}
