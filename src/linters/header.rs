//! In-process check that source files start with the project header.
//!
//! The expected header is an optional shebang (only when the file has one),
//! the `extra` lines, then every line of the header file, each prefixed with
//! `comment`, and finally a `comment--` terminator line.

use super::{Adapter, AdapterFailure, RunContext};
use crate::message::LintMessage;
use serde::Deserialize;

fn default_header() -> String {
    "HEADER".to_string()
}

fn default_comment() -> String {
    "# ".to_string()
}

fn default_shebang() -> Option<String> {
    Some("#!/usr/bin/env python3".to_string())
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HeaderOptions {
    /// Path of the header file, relative to the repository root.
    #[serde(default = "default_header")]
    pub header: String,

    /// Comment prefix put in front of every header line.
    #[serde(default = "default_comment")]
    pub comment: String,

    /// Expected shebang; only checked when a file starts with `#!`.
    #[serde(default = "default_shebang")]
    pub shebang: Option<String>,

    /// Lines expected above the header, below the shebang.
    #[serde(default)]
    pub extra: Vec<String>,
}

impl Default for HeaderOptions {
    fn default() -> Self {
        Self {
            header: default_header(),
            comment: default_comment(),
            shebang: default_shebang(),
            extra: Vec::new(),
        }
    }
}

impl HeaderOptions {
    fn expected_lines(&self, header: &str, has_shebang: bool) -> Vec<String> {
        let mut expected = Vec::new();
        if has_shebang {
            if let Some(shebang) = &self.shebang {
                expected.push(shebang.clone());
            }
        }
        for line in self.extra.iter().map(String::as_str).chain(header.lines()) {
            expected.push(format!("{}{}", self.comment, line).trim_end().to_string());
        }
        expected.push(format!("{}--", self.comment));
        expected
    }

    fn check_content(&self, path: &str, header: &str, content: &str) -> Vec<LintMessage> {
        // Empty files such as package `__init__.py` markers carry no header.
        if content.is_empty() {
            return Vec::new();
        }

        let actual: Vec<&str> = content.lines().collect();
        let has_shebang = actual.first().is_some_and(|line| line.starts_with("#!"));
        let expected = self.expected_lines(header, has_shebang);

        let mut messages: Vec<LintMessage> = expected
            .iter()
            .zip(&actual)
            .enumerate()
            .filter(|(_, (want, got))| want.as_str() != **got)
            .map(|(index, (want, _))| {
                LintMessage::new(path, Some(index as u32 + 1), format!("Line should be: {}", want))
            })
            .collect();

        if actual.len() < expected.len() {
            messages.push(LintMessage::new(
                path,
                None,
                format!(
                    "file ends inside the header: expected {} header lines, found {}",
                    expected.len(),
                    actual.len()
                ),
            ));
        }

        messages
    }
}

impl Adapter for HeaderOptions {
    fn run(&self, files: &[String], ctx: &RunContext) -> Result<Vec<LintMessage>, AdapterFailure> {
        let header_path = ctx.root.join(&self.header);
        let header = std::fs::read_to_string(&header_path).map_err(|e| {
            AdapterFailure::Config(format!(
                "cannot read header file '{}': {}",
                header_path.display(),
                e
            ))
        })?;

        let mut messages = Vec::new();
        for file in files {
            if ctx.cancel.is_cancelled() {
                return Err(AdapterFailure::Cancelled);
            }
            match std::fs::read(ctx.root.join(file)) {
                Ok(bytes) => match String::from_utf8(bytes) {
                    Ok(content) => messages.extend(self.check_content(file, &header, &content)),
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
