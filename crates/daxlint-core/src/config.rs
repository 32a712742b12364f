//! Configuration types for daxlint.

use crate::types::Severity;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Top-level configuration for daxlint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Severity threshold for [`AnalysisReport::has_violations_at`](crate::AnalysisReport::has_violations_at)
    /// checks done by callers (default: warning).
    #[serde(default)]
    pub fail_on: Option<Severity>,

    /// Per-rule configurations, keyed by rule id.
    #[serde(default)]
    pub rules: HashMap<String, RuleConfig>,
}

impl Config {
    /// Creates a new default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })
    }

    /// Effective failure threshold.
    #[must_use]
    pub fn fail_on(&self) -> Severity {
        self.fail_on.unwrap_or(Severity::Warning)
    }

    /// Checks if a rule is enabled.
    #[must_use]
    pub fn is_rule_enabled(&self, rule_id: &str) -> bool {
        self.rules
            .get(rule_id)
            .map_or(true, |c| c.enabled.unwrap_or(true))
    }

    /// Gets the severity override for a rule.
    #[must_use]
    pub fn rule_severity(&self, rule_id: &str) -> Option<Severity> {
        self.rules.get(rule_id).and_then(|c| c.severity)
    }

    /// Gets the configuration of one rule.
    #[must_use]
    pub fn rule(&self, rule_id: &str) -> Option<&RuleConfig> {
        self.rules.get(rule_id)
    }
}

/// Per-rule configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuleConfig {
    /// Whether this rule is enabled.
    #[serde(default)]
    pub enabled: Option<bool>,

    /// Severity override for this rule.
    #[serde(default)]
    pub severity: Option<Severity>,

    /// Rule-specific options as key-value pairs.
    #[serde(flatten)]
    pub options: HashMap<String, toml::Value>,
}

impl RuleConfig {
    /// Gets an integer option with a default value.
    #[must_use]
    pub fn get_int(&self, key: &str, default: i64) -> i64 {
        self.options
            .get(key)
            .and_then(toml::Value::as_integer)
            .unwrap_or(default)
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error reading config file.
    #[error("Failed to read config file {path}: {source}")]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Parse error in config file.
    #[error("Failed to parse config: {message}")]
    Parse {
        /// Parse error message.
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.fail_on(), Severity::Warning);
        assert!(config.rules.is_empty());
        assert!(config.is_rule_enabled("UNUSED_VARIABLES"));
    }

    #[test]
    fn test_parse_config() {
        let toml = r#"
fail_on = "error"

[rules.UNUSED_VARIABLES]
enabled = false

[rules."AVOID_USING_'1-(X/Y)'_SYNTAX"]
severity = "info"
lookahead = 6
kinds = ["plus", "minus"]
"#;

        let config = Config::parse(toml).expect("Failed to parse");
        assert_eq!(config.fail_on(), Severity::Error);
        assert!(!config.is_rule_enabled("UNUSED_VARIABLES"));
        assert_eq!(
            config.rule_severity("AVOID_USING_'1-(X/Y)'_SYNTAX"),
            Some(Severity::Info)
        );

        let rule_config = config.rule("AVOID_USING_'1-(X/Y)'_SYNTAX").unwrap();
        assert_eq!(rule_config.get_int("lookahead", 10), 6);
        assert_eq!(rule_config.get_int("missing", 10), 10);
        assert_eq!(rule_config.get_int("kinds", 10), 10);
        assert!(rule_config.options.contains_key("kinds"));
    }

    #[test]
    fn test_parse_error() {
        let err = Config::parse("fail_on = 3").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("daxlint.toml");
        std::fs::write(&path, "[rules.UNUSED_VARIABLES]\nseverity = \"error\"\n").unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.rule_severity("UNUSED_VARIABLES"), Some(Severity::Error));
    }

    #[test]
    fn test_missing_file() {
        let err = Config::from_file(std::path::Path::new("/nonexistent/daxlint.toml")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/daxlint.toml"));
    }
}
