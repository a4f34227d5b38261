//! Parser for the `path:line:col: rest` output shared by several tools.

use super::AdapterFailure;
use crate::message::LintMessage;
use regex::Regex;
use std::sync::LazyLock;

static LOCATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<path>[^:]+):(?P<line>\d+):(?:(?P<column>\d+):)?\s*(?P<rest>.*)$")
        .expect("location regex is valid")
});

static CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]+\d+$").expect("code regex is valid"));

/// Messages parsed from tool output plus the lines that did not match.
#[derive(Debug, Default)]
pub(super) struct Parsed<'a> {
    pub messages: Vec<LintMessage>,
    pub unmatched: Vec<&'a str>,
}

/// Parse every `path:line[:col]: rest` line of `output`.
///
/// `finish` turns the base message (location only) and the remainder of the
/// line into the final message.
pub(super) fn parse_location_lines<'a>(
    output: &'a str,
    finish: impl Fn(LintMessage, &str) -> LintMessage,
) -> Parsed<'a> {
    let mut parsed = Parsed::default();

    for line in output.lines() {
        if line.trim().is_empty() {
            continue;
        }
        let Some(caps) = LOCATION_RE.captures(line) else {
            parsed.unmatched.push(line);
            continue;
        };

        let line_no = caps["line"].parse::<u32>().ok();
        let column = caps
            .name("column")
            .and_then(|m| m.as_str().parse::<u32>().ok());

        let base = LintMessage::new(&caps["path"], line_no, "").with_column(column);
        parsed.messages.push(finish(base, caps["rest"].trim()));
    }

    parsed
}

impl Parsed<'_> {
    /// Accept the parse unless the tool reported problems we could not read.
    ///
    /// `reported_problems` is the tool's own "found something" signal, usually
    /// a non-zero exit code.
    pub fn into_messages(
        self,
        reported_problems: bool,
    ) -> Result<Vec<LintMessage>, AdapterFailure> {
        if reported_problems && self.messages.is_empty() {
            if let Some(line) = self.unmatched.first() {
                return Err(AdapterFailure::Unparsable((*line).to_string()));
            }
        }
        Ok(self.messages)
    }
}

/// Split `CODE text` as printed by flake8 and pycodestyle.
pub(super) fn code_and_text(message: LintMessage, rest: &str) -> LintMessage {
    let (first, remainder) = rest.split_once(' ').unwrap_or((rest, ""));
    let mut message = if CODE_RE.is_match(first) {
        LintMessage {
            text: remainder.trim().to_string(),
            ..message
        }
        .with_code(first)
    } else {
        LintMessage {
            text: rest.to_string(),
            ..message
        }
    };
    if message.text.is_empty() {
        message.text = rest.to_string();
    }
    message
}
