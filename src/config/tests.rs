//! Tests for config functionality.

use crate::config::{Config, LinterSelection, Part};
use crate::error::LintError;
use crate::linters::{Language, LinterConfig, Style};
use crate::message::Severity;
use std::time::Duration;
use tempfile::TempDir;

const SHELLCHECK: &str = r#"
  - custom:
      name: shellcheck
      command: shellcheck -f gcc
      pattern: '^(?P<path>[^:]+):(?P<line>\d+):(?P<column>\d+): (?P<severity>\w+): (?P<text>.*)$'
"#;

fn ids(config: &Config, selection: &LinterSelection) -> Vec<String> {
    config
        .select_linters(selection)
        .unwrap()
        .into_iter()
        .map(|e| e.id.clone())
        .collect()
}

fn six_linters() -> Config {
    let yaml = format!(
        "linters:\n  - flake8:\n  - pycodestyle:\n  - pylint:\n  - yamllint:\n  - whitespace:\n{}",
        SHELLCHECK
    );
    Config::from_yaml(&yaml).unwrap()
}

#[test]
fn test_default_config() {
    let config = Config::default();

    assert!(config.pre_filefilter.matches("anything/at/all.txt"));
    assert_eq!(config.fail_on, Severity::Warning);
    assert_eq!(config.jobs, None);
    assert!(config.linters.is_empty());
}

#[test]
fn test_parse_minimal_yaml() {
    let config = Config::from_yaml("linters:\n  - whitespace:\n").unwrap();

    assert_eq!(config.linters.len(), 1);
    assert_eq!(config.fail_on, Severity::Warning);
    assert!(config.pre_filefilter.matches("src/a.py"));
}

#[test]
fn test_parse_full_yaml() {
    let yaml = r#"
pre_filefilter: ['- vendor/*', '+ *']
fail_on: error
jobs: 4
linters:
  - flake8:
      config: setup.cfg
  - whitespace:
      filefilter: ['- *.md', '+ *']
      timeout_seconds: 60
  - header:
      header: tools/HEADER
      shebang: null
"#;
    let config = Config::from_yaml(yaml).unwrap();

    assert!(!config.pre_filefilter.matches("vendor/lib.py"));
    assert!(config.pre_filefilter.matches("src/lib.py"));
    assert_eq!(config.fail_on, Severity::Error);
    assert_eq!(config.jobs, Some(4));

    let ids: Vec<&str> = config.linters.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec!["flake8", "whitespace", "header"]);

    match &config.linters[0].config {
        LinterConfig::Flake8(options) => assert_eq!(options.config.as_deref(), Some("setup.cfg")),
        other => panic!("unexpected config {:?}", other),
    }
    assert_eq!(config.linters[1].timeout, Some(Duration::from_secs(60)));
    match &config.linters[2].config {
        LinterConfig::Header(options) => {
            assert_eq!(options.header, "tools/HEADER");
            assert_eq!(options.shebang, None);
        }
        other => panic!("unexpected config {:?}", other),
    }
}

#[test]
fn test_parse_yaml_with_unknown_top_level_fields() {
    let yaml = "future_option: 1\nlinters:\n  - whitespace:\n";
    assert!(Config::from_yaml(yaml).is_ok());
}

#[test]
fn test_unknown_linter_is_config_error() {
    let err = Config::from_yaml("linters:\n  - rubocop:\n").unwrap_err();
    assert!(matches!(err, LintError::ConfigError(_)));
    assert!(err.to_string().contains("unknown linter: rubocop"));
}

#[test]
fn test_bad_pre_filefilter_is_config_error() {
    let err = Config::from_yaml("pre_filefilter: ['vendor/*']\nlinters:\n  - whitespace:\n")
        .unwrap_err();
    assert!(matches!(err, LintError::ConfigError(_)));
}

#[test]
fn test_bad_fail_on_is_config_error() {
    let err = Config::from_yaml("fail_on: sometimes\nlinters:\n  - whitespace:\n").unwrap_err();
    assert!(matches!(err, LintError::ConfigError(_)));
}

#[test]
fn test_validate_zero_jobs() {
    let err = Config::from_yaml("jobs: 0\nlinters:\n  - whitespace:\n").unwrap_err();
    assert!(err.to_string().contains("jobs must be greater than 0"));
}

#[test]
fn test_validate_requires_a_linter() {
    let err = Config::from_yaml("fail_on: error\n").unwrap_err();
    assert!(err.to_string().contains("no linters configured"));
}

#[test]
fn test_validate_duplicate_linter() {
    let err = Config::from_yaml("linters:\n  - whitespace:\n  - whitespace:\n").unwrap_err();
    assert!(err.to_string().contains("'whitespace' is configured more than once"));
}

#[test]
fn test_config_load_from_file() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join(".difflint.yml");
    std::fs::write(&path, "linters:\n  - whitespace:\n").unwrap();

    let config = Config::load(&path).unwrap();
    assert_eq!(config.linters[0].id, "whitespace");
}

#[test]
fn test_config_load_missing_file() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join(".difflint.yml");

    let err = Config::load(&path).unwrap_err();
    assert!(matches!(err, LintError::ConfigError(_)));
    assert!(err.to_string().contains(".difflint.yml"));
}

#[test]
fn test_select_all_by_default() {
    let config = six_linters();
    assert_eq!(ids(&config, &LinterSelection::default()).len(), 6);
}

#[test]
fn test_select_by_name_keeps_config_order() {
    let config = six_linters();
    let selection = LinterSelection {
        names: vec!["whitespace".to_string(), "flake8".to_string()],
        ..LinterSelection::default()
    };
    assert_eq!(ids(&config, &selection), vec!["flake8", "whitespace"]);
}

#[test]
fn test_select_unconfigured_name_is_error() {
    let config = six_linters();
    let selection = LinterSelection {
        names: vec!["cppcheck".to_string()],
        ..LinterSelection::default()
    };
    let err = config.select_linters(&selection).unwrap_err();
    assert!(matches!(err, LintError::ConfigError(_)));
}

#[test]
fn test_select_by_language_and_style() {
    let config = six_linters();

    let python = LinterSelection {
        language: Some(Language::Python),
        ..LinterSelection::default()
    };
    assert_eq!(ids(&config, &python), vec!["flake8", "pycodestyle", "pylint"]);

    let generic = LinterSelection {
        language: Some(Language::Generic),
        ..LinterSelection::default()
    };
    assert_eq!(ids(&config, &generic), vec!["whitespace", "shellcheck"]);

    let dynamic = LinterSelection {
        style: Some(Style::Dynamic),
        ..LinterSelection::default()
    };
    assert!(ids(&config, &dynamic).is_empty());
}

#[test]
fn test_select_part() {
    let config = six_linters();

    let second_of_three = LinterSelection {
        part: Some("2/3".parse().unwrap()),
        ..LinterSelection::default()
    };
    assert_eq!(ids(&config, &second_of_three), vec!["pycodestyle", "whitespace"]);

    let first_of_two = LinterSelection {
        part: Some(Part::new(1, 2).unwrap()),
        ..LinterSelection::default()
    };
    assert_eq!(ids(&config, &first_of_two), vec!["flake8", "pylint", "whitespace"]);
}

#[test]
fn test_part_parsing() {
    assert_eq!("1/1".parse::<Part>().unwrap(), Part::new(1, 1).unwrap());
    assert!("3/2".parse::<Part>().is_err());
    assert!("0/2".parse::<Part>().is_err());
    assert!("1/0".parse::<Part>().is_err());
    assert!("1-2".parse::<Part>().is_err());
    assert!("a/b".parse::<Part>().is_err());

    let err = "3/2".parse::<Part>().unwrap_err();
    assert!(matches!(err, LintError::UserError(_)));
}
