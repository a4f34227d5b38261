//! Linter registry and adapters.
//!
//! Every supported linter has a static [`LinterSpec`] in [`REGISTRY`]. A
//! configuration entry names one of them and is validated at load time into a
//! [`LinterEntry`]: the common keys (`filefilter`, `timeout_seconds`) are taken
//! out and the remaining keys are parsed into that adapter's typed options.
//!
//! Adapters turn a list of repo-relative files into [`LintMessage`]s. External
//! adapters run a tool in the repository root; in-process adapters read the
//! files themselves.

mod colon;
mod cppcheck;
mod cpplint;
mod custom;
mod doxygen;
mod flake8;
mod formatter;
mod header;
mod import;
mod process;
mod pycodestyle;
mod pydocstyle;
mod pylint;
mod rst_lint;
mod whitespace;
mod yamllint;

pub use cppcheck::CppcheckOptions;
pub use cpplint::CpplintOptions;
pub use custom::CustomOptions;
pub use doxygen::DoxygenOptions;
pub use flake8::Flake8Options;
pub use formatter::{Autopep8Options, BlackOptions};
pub use header::HeaderOptions;
pub use import::ImportOptions;
pub use process::{ToolOutput, run_tool, run_tool_with_input, split_command};
pub use pycodestyle::PycodestyleOptions;
pub use pydocstyle::PydocstyleOptions;
pub use pylint::PylintOptions;
pub use rst_lint::RstLintOptions;
pub use whitespace::WhitespaceOptions;
pub use yamllint::YamllintOptions;

use crate::cancel::CancelToken;
use crate::error::{LintError, Result};
use crate::filter::FilterRuleList;
use crate::message::LintMessage;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_yaml::{Mapping, Value};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Why an adapter produced no usable output.
///
/// Failures are recovered per linter: the run coordinator turns them into an
/// error-severity message for that linter.
#[derive(Error, Debug)]
pub enum AdapterFailure {
    #[error("failed to start '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("timed out after {}s", .0.as_secs_f64())]
    TimedOut(Duration),

    #[error("exited with {}{}", fmt_exit(.exit_code), fmt_output(.output))]
    Crashed {
        exit_code: Option<i32>,
        output: String,
    },

    #[error("could not parse output: {0}")]
    Unparsable(String),

    #[error("{0}")]
    Config(String),

    #[error("cancelled")]
    Cancelled,
}

fn fmt_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("unexpected status {}", code),
        None => "a signal".to_string(),
    }
}

fn fmt_output(output: &str) -> String {
    if output.is_empty() {
        String::new()
    } else {
        format!(":\n{}", output)
    }
}

/// Everything an adapter needs besides its file list.
#[derive(Debug, Clone)]
pub struct RunContext {
    /// Repository root; tools run here and paths are relative to it.
    pub root: PathBuf,
    /// Job count for tools with their own parallelism.
    pub jobs: usize,
    pub timeout: Option<Duration>,
    pub cancel: CancelToken,
}

/// A linter implementation.
pub trait Adapter: Send + Sync {
    fn run(
        &self,
        files: &[String],
        ctx: &RunContext,
    ) -> std::result::Result<Vec<LintMessage>, AdapterFailure>;
}

/// Language a linter is meant for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Generic,
    Python,
    Cpp,
    Yaml,
    Rst,
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Language::Generic => write!(f, "generic"),
            Language::Python => write!(f, "python"),
            Language::Cpp => write!(f, "cpp"),
            Language::Yaml => write!(f, "yaml"),
            Language::Rst => write!(f, "rst"),
        }
    }
}

/// Static linters read sources only; dynamic ones need a built project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Style {
    Static,
    Dynamic,
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Style::Static => write!(f, "static"),
            Style::Dynamic => write!(f, "dynamic"),
        }
    }
}

/// Registry entry for one supported linter.
pub struct LinterSpec {
    pub id: &'static str,
    pub language: Language,
    pub style: Style,
    pub default_filefilter: &'static [&'static str],
    pub description: &'static str,
    parse: fn(Value) -> Result<LinterConfig>,
}

impl fmt::Debug for LinterSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LinterSpec").field("id", &self.id).finish()
    }
}

const PYTHON_FILES: &[&str] = &["+ *.py", "+ *.pyx", "+ *.pxd", "+ bin/*"];
const FORMATTED_PYTHON_FILES: &[&str] = &["+ *.py", "+ bin/*"];
const CPP_FILES: &[&str] = &["+ *.h", "+ *.h.in", "+ *.cpp", "+ *.c", "+ *.hpp", "+ *.cc"];

/// All linters difflint knows about.
pub static REGISTRY: &[LinterSpec] = &[
    LinterSpec {
        id: "flake8",
        language: Language::Python,
        style: Style::Static,
        default_filefilter: PYTHON_FILES,
        description: "Python style and error checks (flake8)",
        parse: parse_options::<Flake8Options>,
    },
    LinterSpec {
        id: "pycodestyle",
        language: Language::Python,
        style: Style::Static,
        default_filefilter: PYTHON_FILES,
        description: "PEP 8 style checks (pycodestyle)",
        parse: parse_options::<PycodestyleOptions>,
    },
    LinterSpec {
        id: "pydocstyle",
        language: Language::Python,
        style: Style::Static,
        default_filefilter: PYTHON_FILES,
        description: "Docstring conventions (pydocstyle)",
        parse: parse_options::<PydocstyleOptions>,
    },
    LinterSpec {
        id: "pylint",
        language: Language::Python,
        style: Style::Static,
        default_filefilter: PYTHON_FILES,
        description: "Python static analysis (pylint, JSON output)",
        parse: parse_options::<PylintOptions>,
    },
    LinterSpec {
        id: "black",
        language: Language::Python,
        style: Style::Static,
        default_filefilter: FORMATTED_PYTHON_FILES,
        description: "Code black would reformat (check only)",
        parse: parse_options::<BlackOptions>,
    },
    LinterSpec {
        id: "autopep8",
        language: Language::Python,
        style: Style::Static,
        default_filefilter: FORMATTED_PYTHON_FILES,
        description: "Code autopep8 would reformat (check only)",
        parse: parse_options::<Autopep8Options>,
    },
    LinterSpec {
        id: "import",
        language: Language::Python,
        style: Style::Static,
        default_filefilter: &["- test_*.py", "- */test_*.py", "+ *.py", "+ *.pyx"],
        description: "Absolute imports of a package from inside itself",
        parse: parse_options::<ImportOptions>,
    },
    LinterSpec {
        id: "yamllint",
        language: Language::Yaml,
        style: Style::Static,
        default_filefilter: &["+ *.yml", "+ *.yaml"],
        description: "YAML checks (yamllint)",
        parse: parse_options::<YamllintOptions>,
    },
    LinterSpec {
        id: "cppcheck",
        language: Language::Cpp,
        style: Style::Static,
        default_filefilter: CPP_FILES,
        description: "C/C++ static analysis (cppcheck)",
        parse: parse_options::<CppcheckOptions>,
    },
    LinterSpec {
        id: "cpplint",
        language: Language::Cpp,
        style: Style::Static,
        default_filefilter: CPP_FILES,
        description: "Google C++ style checks (cpplint)",
        parse: parse_options::<CpplintOptions>,
    },
    LinterSpec {
        id: "doxygen",
        language: Language::Cpp,
        style: Style::Static,
        default_filefilter: &["+ *.h", "+ *.hpp"],
        description: "Undocumented C/C++ declarations (doxygen)",
        parse: parse_options::<DoxygenOptions>,
    },
    LinterSpec {
        id: "rst-lint",
        language: Language::Rst,
        style: Style::Static,
        default_filefilter: &["+ *.rst"],
        description: "reStructuredText checks (restructuredtext-lint)",
        parse: parse_options::<RstLintOptions>,
    },
    LinterSpec {
        id: "whitespace",
        language: Language::Generic,
        style: Style::Static,
        default_filefilter: &["+ *"],
        description: "Tabs, trailing whitespace, CR characters and file endings",
        parse: parse_options::<WhitespaceOptions>,
    },
    LinterSpec {
        id: "header",
        language: Language::Generic,
        style: Style::Static,
        default_filefilter: &["+ *.py", "+ *.pyx", "+ *.pxd"],
        description: "Checks that files start with the project's comment header",
        parse: parse_options::<HeaderOptions>,
    },
    LinterSpec {
        id: "custom",
        language: Language::Generic,
        style: Style::Static,
        default_filefilter: &["+ *"],
        description: "Any command whose output a regex can parse",
        parse: parse_options::<CustomOptions>,
    },
];

/// Look up a registry entry by id.
pub fn find_spec(id: &str) -> Option<&'static LinterSpec> {
    REGISTRY.iter().find(|spec| spec.id == id)
}

fn parse_options<T>(value: Value) -> Result<LinterConfig>
where
    T: DeserializeOwned + Into<LinterConfig>,
{
    serde_yaml::from_value::<T>(value)
        .map(Into::into)
        .map_err(|e| LintError::ConfigError(e.to_string()))
}

/// Validated, adapter-specific options.
#[derive(Debug, Clone)]
pub enum LinterConfig {
    Flake8(Flake8Options),
    Pycodestyle(PycodestyleOptions),
    Pydocstyle(PydocstyleOptions),
    Pylint(PylintOptions),
    Black(BlackOptions),
    Autopep8(Autopep8Options),
    Import(ImportOptions),
    Yamllint(YamllintOptions),
    Cppcheck(CppcheckOptions),
    Cpplint(CpplintOptions),
    Doxygen(DoxygenOptions),
    RstLint(RstLintOptions),
    Whitespace(WhitespaceOptions),
    Header(HeaderOptions),
    Custom(CustomOptions),
}

impl LinterConfig {
    pub fn adapter(&self) -> &dyn Adapter {
        match self {
            LinterConfig::Flake8(o) => o,
            LinterConfig::Pycodestyle(o) => o,
            LinterConfig::Pydocstyle(o) => o,
            LinterConfig::Pylint(o) => o,
            LinterConfig::Black(o) => o,
            LinterConfig::Autopep8(o) => o,
            LinterConfig::Import(o) => o,
            LinterConfig::Yamllint(o) => o,
            LinterConfig::Cppcheck(o) => o,
            LinterConfig::Cpplint(o) => o,
            LinterConfig::Doxygen(o) => o,
            LinterConfig::RstLint(o) => o,
            LinterConfig::Whitespace(o) => o,
            LinterConfig::Header(o) => o,
            LinterConfig::Custom(o) => o,
        }
    }
}

macro_rules! into_config {
    ($($options:ident => $variant:ident),* $(,)?) => {
        $(
            impl From<$options> for LinterConfig {
                fn from(options: $options) -> Self {
                    LinterConfig::$variant(options)
                }
            }
        )*
    };
}

into_config! {
    Flake8Options => Flake8,
    PycodestyleOptions => Pycodestyle,
    PydocstyleOptions => Pydocstyle,
    PylintOptions => Pylint,
    BlackOptions => Black,
    Autopep8Options => Autopep8,
    ImportOptions => Import,
    YamllintOptions => Yamllint,
    CppcheckOptions => Cppcheck,
    CpplintOptions => Cpplint,
    DoxygenOptions => Doxygen,
    RstLintOptions => RstLint,
    WhitespaceOptions => Whitespace,
    HeaderOptions => Header,
    CustomOptions => Custom,
}

/// One configured linter.
#[derive(Debug, Clone)]
pub struct LinterEntry {
    /// Unique id: the registry id, or the `name` of a custom linter.
    pub id: String,
    pub spec: &'static LinterSpec,
    pub filefilter: FilterRuleList,
    pub timeout: Option<Duration>,
    pub config: LinterConfig,
}

impl LinterEntry {
    /// Build an entry from one item of the `linters` list.
    ///
    /// The item is either a bare id (`- whitespace`) or a single-key mapping
    /// from id to options; a null value means all defaults.
    pub fn from_value(item: Value) -> Result<Self> {
        let (id, options) = match item {
            Value::String(id) => (id, Value::Null),
            Value::Mapping(map) if map.len() == 1 => {
                let (key, options) = map.into_iter().next().ok_or_else(|| {
                    LintError::ConfigError("empty linter entry".to_string())
                })?;
                let id = key.as_str().map(str::to_string).ok_or_else(|| {
                    LintError::ConfigError("linter id must be a string".to_string())
                })?;
                (id, options)
            }
            _ => {
                return Err(LintError::ConfigError(
                    "each item of `linters` must name exactly one linter, e.g. `- flake8:`"
                        .to_string(),
                ));
            }
        };

        let spec = find_spec(&id)
            .ok_or_else(|| LintError::ConfigError(format!("unknown linter: {}", id)))?;

        let mut options = match options {
            Value::Null => Mapping::new(),
            Value::Mapping(map) => map,
            _ => {
                return Err(LintError::ConfigError(format!(
                    "options for linter '{}' must be a mapping",
                    id
                )));
            }
        };

        let filefilter = match options.remove("filefilter") {
            Some(rules) => serde_yaml::from_value::<FilterRuleList>(rules).map_err(|e| {
                LintError::ConfigError(format!("linter '{}': filefilter: {}", id, e))
            })?,
            None => FilterRuleList::parse(spec.default_filefilter)?,
        };

        let timeout = match options.remove("timeout_seconds") {
            Some(Value::Null) | None => None,
            Some(value) => {
                let secs = serde_yaml::from_value::<u64>(value).map_err(|e| {
                    LintError::ConfigError(format!("linter '{}': timeout_seconds: {}", id, e))
                })?;
                if secs == 0 {
                    return Err(LintError::ConfigError(format!(
                        "linter '{}': timeout_seconds must be greater than zero",
                        id
                    )));
                }
                Some(Duration::from_secs(secs))
            }
        };

        let config = (spec.parse)(Value::Mapping(options)).map_err(|e| match e {
            LintError::ConfigError(msg) => {
                LintError::ConfigError(format!("linter '{}': {}", id, msg))
            }
            other => other,
        })?;

        let id = match &config {
            LinterConfig::Custom(custom) => {
                custom.validate().map_err(|e| {
                    LintError::ConfigError(format!("linter '{}': {}", id, e))
                })?;
                custom.name.trim().to_string()
            }
            _ => id,
        };

        Ok(Self {
            id,
            spec,
            filefilter,
            timeout,
            config,
        })
    }

    pub fn language(&self) -> Language {
        match &self.config {
            LinterConfig::Custom(custom) => custom.language,
            _ => self.spec.language,
        }
    }

    pub fn style(&self) -> Style {
        match &self.config {
            LinterConfig::Custom(custom) => custom.style,
            _ => self.spec.style,
        }
    }

    pub fn adapter(&self) -> &dyn Adapter {
        self.config.adapter()
    }
}

impl<'de> Deserialize<'de> for LinterEntry {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let item = Value::deserialize(deserializer)?;
        LinterEntry::from_value(item).map_err(serde::de::Error::custom)
    }
}

/// Accept exit codes in `0..=max`.
pub(crate) fn exit_code_up_to(max: i32) -> impl Fn(i32) -> bool {
    move |code| (0..=max).contains(&code)
}

/// Prefix each path with `--` so tool options can't be injected by file names.
pub(crate) fn push_files(args: &mut Vec<String>, files: &[String]) {
    args.push("--".to_string());
    args.extend(files.iter().cloned());
}
