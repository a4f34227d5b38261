//! Choosing which configured linters run.

use super::model::Config;
use crate::error::{LintError, Result};
use crate::linters::{Language, LinterEntry, Style};
use std::str::FromStr;
use tracing::info;

/// A `N/M` slice of the linter list: every M-th linter starting at the N-th.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Part {
    index: usize,
    count: usize,
}

impl Part {
    pub fn new(index: usize, count: usize) -> Result<Self> {
        if count == 0 || index == 0 || index > count {
            return Err(LintError::UserError(format!(
                "invalid part {}/{}: the first number must be in the range [1, {}]",
                index,
                count,
                count.max(1)
            )));
        }
        Ok(Self { index, count })
    }

    fn keeps(&self, position: usize) -> bool {
        position % self.count == self.index - 1
    }
}

impl FromStr for Part {
    type Err = LintError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || {
            LintError::UserError(format!(
                "invalid part '{}': expected N/M, e.g. 1/3",
                s
            ))
        };
        let (index, count) = s.split_once('/').ok_or_else(invalid)?;
        let index = index.trim().parse().map_err(|_| invalid())?;
        let count = count.trim().parse().map_err(|_| invalid())?;
        Part::new(index, count)
    }
}

/// Command-line narrowing of the configured linters.
#[derive(Debug, Clone, Default)]
pub struct LinterSelection {
    /// Linter ids; empty means all.
    pub names: Vec<String>,
    pub language: Option<Language>,
    pub style: Option<Style>,
    pub part: Option<Part>,
}

impl Config {
    /// Apply `selection` to the configured linters, keeping config order.
    ///
    /// Names are checked against the configuration first, so a typo is an
    /// error rather than an empty run. The part is taken last.
    pub fn select_linters(&self, selection: &LinterSelection) -> Result<Vec<&LinterEntry>> {
        for name in &selection.names {
            if !self.linters.iter().any(|entry| &entry.id == name) {
                return Err(LintError::ConfigError(format!(
                    "linter '{}' is not configured (configured: {})",
                    name,
                    self.linters
                        .iter()
                        .map(|e| e.id.as_str())
                        .collect::<Vec<_>>()
                        .join(", ")
                )));
            }
        }

        let selected: Vec<&LinterEntry> = self
            .linters
            .iter()
            .filter(|e| selection.names.is_empty() || selection.names.contains(&e.id))
            .filter(|e| selection.language.is_none_or(|lang| e.language() == lang))
            .filter(|e| selection.style.is_none_or(|style| e.style() == style))
            .collect();

        let selected: Vec<&LinterEntry> = match selection.part {
            Some(part) => selected
                .into_iter()
                .enumerate()
                .filter(|(position, _)| part.keeps(*position))
                .map(|(_, entry)| entry)
                .collect(),
            None => selected,
        };

        info!(
            "selected linters: {}",
            selected
                .iter()
                .map(|e| e.id.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );
        Ok(selected)
    }
}
