//! Configuration module for the exit simulator.
//!
//! Loads YAML with environment variable interpolation and validates it.
//!
//! # Usage
//!
//! ```rust,ignore
//! use exit_simulator::config::load_config;
//!
//! // Load from $EXIT_SIM_CONFIG, falling back to config.yaml
//! let config = load_config(None)?;
//!
//! // Load from custom path
//! let config = load_config(Some("custom/config.yaml"))?;
//!
//! println!("policy: {:?}", config.simulation.same_tick_policy);
//! ```

mod dataset;
mod observability;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use crate::batch::BatchConfig;
pub use crate::domain::simulation::{SameTickPolicy, SimulationConfig};
pub use dataset::DatasetConfig;
pub use observability::{LogFormat, LoggingConfig, ObservabilityConfig};

/// Environment variable naming the config file.
pub const CONFIG_PATH_ENV: &str = "EXIT_SIM_CONFIG";

/// Config file used when neither an explicit path nor the env var is given.
pub const DEFAULT_CONFIG_PATH: &str = "config.yaml";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        /// Path to the config file.
        path: String,
        /// The underlying IO error.
        source: std::io::Error,
    },

    /// Failed to parse YAML configuration.
    #[error("Failed to parse config YAML: {0}")]
    ParseError(#[from] serde_yaml_bw::Error),

    /// Configuration validation failed.
    #[error("Config validation failed: {0}")]
    ValidationError(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Simulation behaviour.
    #[serde(default)]
    pub simulation: SimulationConfig,
    /// Batch analysis.
    #[serde(default)]
    pub batch: BatchConfig,
    /// Observability configuration.
    #[serde(default)]
    pub observability: ObservabilityConfig,
    /// Dataset used by the binary.
    #[serde(default)]
    pub dataset: DatasetConfig,
}

// ============================================
// Configuration Loading
// ============================================

/// Resolve the config path: explicit argument, then `EXIT_SIM_CONFIG`, then
/// `config.yaml`.
#[must_use]
pub fn resolve_config_path(path: Option<&str>) -> String {
    path.map(str::to_string)
        .or_else(|| std::env::var(CONFIG_PATH_ENV).ok().filter(|p| !p.is_empty()))
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string())
}

/// Load configuration from a YAML file with environment variable interpolation.
///
/// # Errors
///
/// Returns a `ConfigError` if the file cannot be read, parsed, or validated.
pub fn load_config(path: Option<&str>) -> Result<Config, ConfigError> {
    let path = resolve_config_path(path);

    let contents = std::fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
        path: path.clone(),
        source: e,
    })?;

    load_config_from_string(&contents)
}

/// Load configuration from a YAML string.
///
/// # Errors
///
/// Returns a `ConfigError` if the YAML cannot be parsed or validated.
pub fn load_config_from_string(yaml: &str) -> Result<Config, ConfigError> {
    let interpolated = interpolate_env_vars(yaml);
    let config: Config = serde_yaml_bw::from_str(&interpolated)?;
    validate_config(&config)?;
    Ok(config)
}

/// Interpolate environment variables in a string.
///
/// Supports both `${VAR}` and `${VAR:-default}` syntax.
#[allow(clippy::expect_used)] // Regex is compile-time constant
fn interpolate_env_vars(input: &str) -> String {
    use std::sync::OnceLock;

    static ENV_VAR_REGEX: OnceLock<regex::Regex> = OnceLock::new();

    let re = ENV_VAR_REGEX.get_or_init(|| {
        regex::Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(?::-([^}]*))?\}")
            .expect("env var regex is valid")
    });

    re.replace_all(input, |cap: &regex::Captures<'_>| {
        let default_value = cap.get(2).map(|m| m.as_str());
        match std::env::var(&cap[1]) {
            Ok(v) if !v.is_empty() => v,
            _ => default_value.map_or_else(String::new, str::to_string),
        }
    })
    .into_owned()
}

/// Validate configuration values.
fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.batch.min_parallel_jobs == 0 {
        return Err(ConfigError::ValidationError(
            "batch.min_parallel_jobs must be at least 1".to_string(),
        ));
    }

    if config.observability.logging.level.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "observability.logging.level must not be empty".to_string(),
        ));
    }

    if config.dataset.path.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "dataset.path must not be empty".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.simulation.same_tick_policy, SameTickPolicy::FirstTrigger);
        assert_eq!(config.batch.min_parallel_jobs, 4);
        assert_eq!(config.observability.logging.format, LogFormat::Json);
        assert_eq!(config.dataset.path, "dataset.json");
    }

    #[test]
    fn test_load_empty_config_uses_defaults() {
        let config = match load_config_from_string("{}") {
            Ok(c) => c,
            Err(e) => panic!("should load empty config: {e}"),
        };
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_full_config() {
        let yaml = r"
simulation:
  same_tick_policy: cascade
batch:
  max_threads: 2
  min_parallel_jobs: 8
  cache_ttl_secs: 60
  track_progress: false
observability:
  logging:
    level: debug
    format: pretty
    include_spans: false
dataset:
  path: data/positions.json
";

        let config = load_config_from_string(yaml).unwrap();
        assert_eq!(config.simulation.same_tick_policy, SameTickPolicy::Cascade);
        assert_eq!(config.batch.max_threads, 2);
        assert_eq!(config.batch.cache_ttl_secs, 60);
        assert!(!config.batch.track_progress);
        assert_eq!(config.observability.logging.format, LogFormat::Pretty);
        assert_eq!(config.dataset.path, "data/positions.json");
    }

    #[test]
    fn test_env_var_with_default_when_missing() {
        let input = "path: ${EXIT_SIM_CONFIG_TEST_NONEXISTENT_VAR:-dataset.json}";
        assert_eq!(interpolate_env_vars(input), "path: dataset.json");
    }

    #[test]
    #[expect(clippy::literal_string_with_formatting_args)] // ${...} is env var syntax, not format args
    fn test_env_var_with_default_uses_existing() {
        let input = "path: ${PATH:-default}";
        let result = interpolate_env_vars(input);

        assert_ne!(result, "path: default");
        assert!(result.starts_with("path: "));
    }

    #[test]
    fn test_env_var_without_default_becomes_empty() {
        let input = "level: ${EXIT_SIM_CONFIG_TEST_UNLIKELY_TO_EXIST}";
        assert_eq!(interpolate_env_vars(input), "level: ");
    }

    #[test]
    fn test_validation_zero_min_parallel_jobs() {
        let yaml = r"
batch:
  min_parallel_jobs: 0
";
        let Err(err) = load_config_from_string(yaml) else {
            panic!("expected error for min_parallel_jobs");
        };
        assert!(err.to_string().contains("min_parallel_jobs"));
    }

    #[test]
    fn test_validation_empty_dataset_path() {
        let yaml = r#"
dataset:
  path: ""
"#;
        let Err(err) = load_config_from_string(yaml) else {
            panic!("expected error for dataset path");
        };
        assert!(err.to_string().contains("dataset.path"));
    }

    #[test]
    fn test_unknown_log_format_is_rejected() {
        let yaml = r"
observability:
  logging:
    format: xml
";
        assert!(matches!(
            load_config_from_string(yaml),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_unknown_same_tick_policy_is_rejected() {
        let yaml = r"
simulation:
  same_tick_policy: all_at_once
";
        assert!(load_config_from_string(yaml).is_err());
    }

    #[test]
    fn test_explicit_path_wins() {
        assert_eq!(resolve_config_path(Some("other.yaml")), "other.yaml");
    }
}
