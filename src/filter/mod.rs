//! Ordered include/exclude path filtering.
//!
//! A filter is a list of rules written as `"+ pattern"` (include) or
//! `"- pattern"` (exclude). Rules are tested in order and the first rule whose
//! glob matches decides the verdict. When no rule matches, the path is
//! excluded.
//!
//! Globs are matched against the whole repo-relative path with `/` treated as
//! an ordinary character, so `*.py` also matches `pkg/sub/mod.py`. Patterns
//! follow shell `fnmatch` rules: `*`, `?` and `[...]` classes are special;
//! braces and a `[` without a closing `]` match themselves.

use crate::error::{LintError, Result};
use globset::{GlobBuilder, GlobMatcher};
use serde::{Deserialize, Deserializer};
use std::fmt;

/// Outcome of a matching rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Include,
    Exclude,
}

/// A single compiled filter rule.
#[derive(Debug, Clone)]
pub struct FilterRule {
    verdict: Verdict,
    pattern: String,
    matcher: GlobMatcher,
}

impl FilterRule {
    /// Build a rule from a verdict and a glob pattern.
    pub fn new(verdict: Verdict, pattern: &str) -> Result<Self> {
        let pattern = normalize_path(pattern.trim());
        if pattern.is_empty() {
            return Err(LintError::ConfigError(
                "filter rule has an empty pattern".to_string(),
            ));
        }

        let glob = GlobBuilder::new(&fnmatch_to_glob(&pattern))
            .literal_separator(false)
            .build()
            .map_err(|e| {
                LintError::ConfigError(format!("invalid glob pattern '{}': {}", pattern, e))
            })?;

        Ok(Self {
            verdict,
            matcher: glob.compile_matcher(),
            pattern,
        })
    }

    /// Parse a rule written as `"+ pattern"` or `"- pattern"`.
    pub fn parse(rule: &str) -> Result<Self> {
        let rule = rule.trim_start();
        let mut chars = rule.chars();
        let verdict = match chars.next() {
            Some('+') => Verdict::Include,
            Some('-') => Verdict::Exclude,
            Some(other) => {
                return Err(LintError::ConfigError(format!(
                    "unexpected first character '{}' in filter rule '{}' (expected '+' or '-')",
                    other, rule
                )));
            }
            None => {
                return Err(LintError::ConfigError(
                    "filter rule is empty".to_string(),
                ));
            }
        };

        Self::new(verdict, chars.as_str())
    }

    pub fn verdict(&self) -> Verdict {
        self.verdict
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    fn is_match(&self, canonical_path: &str) -> bool {
        self.matcher.is_match(canonical_path)
    }
}

/// Rewrite an `fnmatch` pattern into globset syntax.
fn fnmatch_to_glob(pattern: &str) -> String {
    let chars: Vec<char> = pattern.chars().collect();
    let mut glob = String::with_capacity(pattern.len());
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            '{' | '}' => {
                glob.push('[');
                glob.push(chars[i]);
                glob.push(']');
            }
            '[' => match class_end(&chars, i) {
                Some(end) => {
                    glob.extend(&chars[i..=end]);
                    i = end;
                }
                None => glob.push_str("[[]"),
            },
            c => glob.push(c),
        }
        i += 1;
    }

    glob
}

/// Index of the `]` closing the class opened at `start`, if any.
fn class_end(chars: &[char], start: usize) -> Option<usize> {
    let mut i = start + 1;
    if chars.get(i) == Some(&'!') {
        i += 1;
    }
    // A `]` right after the opening bracket is part of the class.
    if chars.get(i) == Some(&']') {
        i += 1;
    }
    (i..chars.len()).find(|&j| chars[j] == ']')
}

/// Ordered, first-match-wins list of filter rules.
#[derive(Debug, Clone, Default)]
pub struct FilterRuleList {
    rules: Vec<FilterRule>,
}

impl FilterRuleList {
    pub fn new(rules: Vec<FilterRule>) -> Self {
        Self { rules }
    }

    /// Parse a list of rule strings.
    pub fn parse<S: AsRef<str>>(rules: &[S]) -> Result<Self> {
        let rules = rules
            .iter()
            .map(|r| FilterRule::parse(r.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { rules })
    }

    /// A list that includes every path.
    pub fn include_all() -> Self {
        Self::new(vec![
            FilterRule::new(Verdict::Include, "*").expect("'*' is a valid glob"),
        ])
    }

    /// Evaluate the rules against `path`.
    ///
    /// Returns the verdict of the first matching rule, or `Exclude` when no
    /// rule matches.
    pub fn evaluate(&self, path: &str) -> Verdict {
        let canonical = normalize_path(path);
        self.rules
            .iter()
            .find(|rule| rule.is_match(&canonical))
            .map(FilterRule::verdict)
            .unwrap_or(Verdict::Exclude)
    }

    /// Returns true if `path` is included by this list.
    pub fn matches(&self, path: &str) -> bool {
        self.evaluate(path) == Verdict::Include
    }

    pub fn rules(&self) -> &[FilterRule] {
        &self.rules
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl fmt::Display for FilterRuleList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rules: Vec<String> = self
            .rules()
            .iter()
            .map(|rule| match rule.verdict() {
                Verdict::Include => format!("+ {}", rule.pattern()),
                Verdict::Exclude => format!("- {}", rule.pattern()),
            })
            .collect();
        write!(f, "[{}]", rules.join(", "))
    }
}

impl<'de> Deserialize<'de> for FilterRuleList {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Vec::<String>::deserialize(deserializer)?;
        FilterRuleList::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// Normalize a path to the canonical form used for glob matching.
///
/// Backslashes become forward slashes and leading `./` segments are removed.
pub fn normalize_path(path: &str) -> String {
    let mut normalized = path.replace('\\', "/");
    while let Some(rest) = normalized.strip_prefix("./") {
        normalized = rest.to_string();
    }
    normalized
}
