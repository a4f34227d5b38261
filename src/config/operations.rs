//! Config loading and validation.

use super::model::Config;
use crate::error::{LintError, Result};
use std::collections::BTreeSet;
use std::path::Path;
use tracing::{debug, warn};

impl Config {
    /// Load config from a YAML file.
    ///
    /// # Returns
    ///
    /// * `Ok(Config)` - Successfully loaded and validated config
    /// * `Err(LintError::ConfigError)` - Missing file, parse error or validation failure
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path).map_err(|e| {
            LintError::ConfigError(format!(
                "failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        let config = Self::from_yaml(&content)?;
        debug!(
            "loaded {} with {} linter(s)",
            path.display(),
            config.linters.len()
        );
        Ok(config)
    }

    /// Parse config from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(yaml)
            .map_err(|e| LintError::ConfigError(format!("failed to parse config YAML: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate config values and return error on invalid values.
    ///
    /// Validation rules:
    /// - `jobs` must be positive when set
    /// - at least one linter must be configured
    /// - linter ids must be unique
    pub fn validate(&self) -> Result<()> {
        if self.jobs == Some(0) {
            return Err(LintError::ConfigError(
                "config validation failed: jobs must be greater than 0".to_string(),
            ));
        }

        if self.linters.is_empty() {
            return Err(LintError::ConfigError(
                "config validation failed: no linters configured".to_string(),
            ));
        }

        if self.pre_filefilter.is_empty() {
            warn!("pre_filefilter has no rules; no file will be linted");
        }

        let mut seen = BTreeSet::new();
        for entry in &self.linters {
            if !seen.insert(entry.id.as_str()) {
                return Err(LintError::ConfigError(format!(
                    "config validation failed: linter '{}' is configured more than once",
                    entry.id
                )));
            }
        }

        Ok(())
    }
}
