//! Config struct definition and default implementation.

use crate::filter::FilterRuleList;
use crate::linters::LinterEntry;
use crate::message::Severity;
use serde::Deserialize;

/// Default config file name, looked up at the repository root.
pub const CONFIG_FILE_NAME: &str = ".difflint.yml";

/// Configuration for a difflint run.
///
/// This struct represents the contents of `.difflint.yml`.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Rules applied to every tracked file before any linter filter.
    #[serde(default = "default_pre_filefilter")]
    pub pre_filefilter: FilterRuleList,

    /// Lowest severity of an in-scope message that fails the run.
    #[serde(default)]
    pub fail_on: Severity,

    /// Default worker count when `--jobs` is not given.
    #[serde(default)]
    pub jobs: Option<usize>,

    /// Configured linters, in run order.
    #[serde(default)]
    pub linters: Vec<LinterEntry>,
}

fn default_pre_filefilter() -> FilterRuleList {
    FilterRuleList::include_all()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            pre_filefilter: default_pre_filefilter(),
            fail_on: Severity::default(),
            jobs: None,
            linters: Vec::new(),
        }
    }
}
