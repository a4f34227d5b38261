//! cpplint adapter.
//!
//! cpplint reports on stderr as `path:line:  text  [category] [confidence]`;
//! line 0 means the whole file.

use super::colon::parse_location_lines;
use super::{
    Adapter, AdapterFailure, RunContext, exit_code_up_to, push_files, run_tool, split_command,
};
use crate::message::LintMessage;
use regex::Regex;
use serde::Deserialize;
use std::sync::LazyLock;

static CATEGORY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<text>.*?)\s+\[(?P<category>[^\]]+)\]\s+\[(?P<confidence>\d)\]$")
        .expect("cpplint category regex is valid")
});

fn default_script() -> String {
    "cpplint".to_string()
}

fn default_linelength() -> u32 {
    100
}

fn default_filter() -> Vec<String> {
    vec!["-runtime/int".to_string()]
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CpplintOptions {
    /// Command that runs cpplint, e.g. `./tools/cpplint.py`.
    #[serde(default = "default_script")]
    pub script: String,

    #[serde(default = "default_linelength")]
    pub linelength: u32,

    /// Category filters joined into `--filter`.
    #[serde(default = "default_filter")]
    pub filter: Vec<String>,
}

impl Default for CpplintOptions {
    fn default() -> Self {
        Self {
            script: default_script(),
            linelength: default_linelength(),
            filter: default_filter(),
        }
    }
}

impl CpplintOptions {
    fn command(&self, files: &[String]) -> Result<(String, Vec<String>), AdapterFailure> {
        let (program, mut args) = split_command(&self.script)?;
        args.push(format!("--linelength={}", self.linelength));
        if !self.filter.is_empty() {
            args.push(format!("--filter={}", self.filter.join(",")));
        }
        push_files(&mut args, files);
        Ok((program, args))
    }
}

impl Adapter for CpplintOptions {
    fn run(&self, files: &[String], ctx: &RunContext) -> Result<Vec<LintMessage>, AdapterFailure> {
        let (program, args) = self.command(files)?;
        // 0: clean, 1: problems found.
        let output = run_tool(&program, &args, ctx, exit_code_up_to(1))?;
        if output.stdout.contains("FATAL") {
            return Err(AdapterFailure::Crashed {
                exit_code: Some(output.exit_code),
                output: output.stdout.trim().to_string(),
            });
        }
        parse_location_lines(&output.stderr, category_and_text)
            .into_messages(output.exit_code != 0)
    }
}

fn category_and_text(message: LintMessage, rest: &str) -> LintMessage {
    match CATEGORY_RE.captures(rest) {
        Some(caps) => LintMessage {
            text: caps["text"].trim().to_string(),
            ..message
        }
        .with_code(&caps["category"]),
        None => LintMessage {
            text: rest.to_string(),
            ..message
        },
    }
}
