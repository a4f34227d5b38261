//! In-process check for imports of a package from inside itself.
//!
//! Modules of a package should use relative imports; `from pkg import x`
//! inside `pkg` is reported. `from pkg import __version__` is allowed and
//! package `__init__.py` files are skipped.

use super::{Adapter, AdapterFailure, RunContext};
use crate::message::LintMessage;
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ImportOptions {
    /// Names of the project's Python packages.
    #[serde(default)]
    pub packages: Vec<String>,
}

impl ImportOptions {
    fn check_content(&self, path: &str, content: &str) -> Vec<LintMessage> {
        let mut messages = Vec::new();
        for (index, line) in content.lines().enumerate() {
            let statement = line.trim();
            for package in &self.packages {
                if statement == format!("from {} import __version__", package) {
                    continue;
                }
                if statement.starts_with(&format!("from {} import ", package)) {
                    messages.push(LintMessage::new(
                        path,
                        Some(index as u32 + 1),
                        format!("Wrong import from {}", package),
                    ));
                }
            }
        }
        messages
    }
}

fn is_package_init(path: &str) -> bool {
    path == "__init__.py" || path.ends_with("/__init__.py")
}

impl Adapter for ImportOptions {
    fn run(&self, files: &[String], ctx: &RunContext) -> Result<Vec<LintMessage>, AdapterFailure> {
        let mut messages = Vec::new();
        if self.packages.is_empty() {
            return Ok(messages);
        }

        for file in files.iter().filter(|f| !is_package_init(f)) {
            if ctx.cancel.is_cancelled() {
                return Err(AdapterFailure::Cancelled);
            }
            match std::fs::read_to_string(ctx.root.join(file)) {
                Ok(content) => messages.extend(self.check_content(file, &content)),
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
