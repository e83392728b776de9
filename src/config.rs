//! Engine configuration.
//!
//! Loaded from TOML so behavior can change without code changes:
//!
//! ```
//! use u_assign::config::{AvailabilityBaseline, EngineConfig, ManualEditPolicy};
//!
//! let config = EngineConfig::from_toml_str(r#"
//!     baseline = "accumulate"
//!     manual_edit_policy = "enforce"
//!     max_tasks_per_run = 100
//! "#).unwrap();
//!
//! assert_eq!(config.baseline, AvailabilityBaseline::Accumulate);
//! assert_eq!(config.manual_edit_policy, ManualEditPolicy::Enforce);
//! assert_eq!(config.max_tasks_per_run, Some(100));
//! ```
//!
//! A missing file falls back to defaults:
//!
//! ```
//! use u_assign::config::EngineConfig;
//!
//! let config = EngineConfig::load("assign.toml").unwrap_or_default();
//! assert!(config.max_tasks_per_run.is_none());
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Where worker availability starts when an engine run begins.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AvailabilityBaseline {
    /// Every worker is free at the start of the run.
    #[default]
    Fresh,
    /// Assignments retained from earlier runs (tasks outside the visible
    /// set) occupy their workers before the run starts.
    Accumulate,
}

/// How manual single-slot edits interact with availability.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ManualEditPolicy {
    /// The edit always wins; overlaps are reported by validation only.
    #[default]
    Override,
    /// Reject edits placing an unknown, ineligible or busy worker.
    Enforce,
}

/// Assignment engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct EngineConfig {
    /// Availability baseline for engine runs.
    #[serde(default)]
    pub baseline: AvailabilityBaseline,

    /// Manual edit policy.
    #[serde(default)]
    pub manual_edit_policy: ManualEditPolicy,

    /// Upper bound on tasks processed per run; the rest are skipped.
    #[serde(default)]
    pub max_tasks_per_run: Option<usize>,
}

impl EngineConfig {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns error if file doesn't exist or contains invalid TOML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Sets the availability baseline.
    pub fn with_baseline(mut self, baseline: AvailabilityBaseline) -> Self {
        self.baseline = baseline;
        self
    }

    /// Sets the manual edit policy.
    pub fn with_manual_edit_policy(mut self, policy: ManualEditPolicy) -> Self {
        self.manual_edit_policy = policy;
        self
    }

    /// Caps the number of tasks processed per run.
    pub fn with_max_tasks_per_run(mut self, limit: usize) -> Self {
        self.max_tasks_per_run = Some(limit);
        self
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_tasks_per_run == Some(0) {
            return Err(ConfigError::Invalid(
                "max_tasks_per_run must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.baseline, AvailabilityBaseline::Fresh);
        assert_eq!(config.manual_edit_policy, ManualEditPolicy::Override);
        assert!(config.max_tasks_per_run.is_none());
    }

    #[test]
    fn test_empty_toml_is_default() {
        let config = EngineConfig::from_toml_str("").unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn test_zero_limit_rejected() {
        let err = EngineConfig::from_toml_str("max_tasks_per_run = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_unknown_baseline_rejected() {
        let err = EngineConfig::from_toml_str(r#"baseline = "sometimes""#).unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = EngineConfig::load("/nonexistent/assign.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_builder() {
        let config = EngineConfig::new()
            .with_baseline(AvailabilityBaseline::Accumulate)
            .with_manual_edit_policy(ManualEditPolicy::Enforce)
            .with_max_tasks_per_run(10);
        assert_eq!(config.baseline, AvailabilityBaseline::Accumulate);
        assert_eq!(config.max_tasks_per_run, Some(10));
    }
}
