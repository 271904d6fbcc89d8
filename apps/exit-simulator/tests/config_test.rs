//! Configuration file loading.

#![allow(clippy::unwrap_used, clippy::literal_string_with_formatting_args)]

use std::io::Write;

use exit_simulator::config::{ConfigError, LogFormat, SameTickPolicy, load_config};
use tempfile::NamedTempFile;

fn write_config(yaml: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(yaml.as_bytes()).unwrap();
    file
}

#[test]
fn shipped_config_loads() {
    let path = format!("{}/config.yaml", env!("CARGO_MANIFEST_DIR"));

    let config = load_config(Some(&path)).unwrap();

    assert_eq!(config.batch.min_parallel_jobs, 4);
    assert_eq!(config.batch.cache_ttl_secs, 300);
    assert!(!config.dataset.path.is_empty());
}

#[test]
fn config_file_with_defaults_interpolated() {
    let file = write_config(
        r"
simulation:
  same_tick_policy: ${EXIT_SIM_TEST_POLICY_UNSET:-cascade}
observability:
  logging:
    format: ${EXIT_SIM_TEST_FORMAT_UNSET:-pretty}
dataset:
  path: ${EXIT_SIM_TEST_DATASET_UNSET:-/data/positions.json}
",
    );

    let config = load_config(file.path().to_str()).unwrap();

    assert_eq!(config.simulation.same_tick_policy, SameTickPolicy::Cascade);
    assert_eq!(config.observability.logging.format, LogFormat::Pretty);
    assert_eq!(config.observability.logging.level, "info");
    assert_eq!(config.dataset.path, "/data/positions.json");
}

#[test]
fn missing_config_file_is_read_error() {
    let err = load_config(Some("/nonexistent/exit-sim.yaml")).unwrap_err();

    assert!(matches!(err, ConfigError::ReadError { .. }));
    assert!(err.to_string().contains("/nonexistent/exit-sim.yaml"));
}

#[test]
fn malformed_yaml_is_parse_error() {
    let file = write_config("simulation: [unterminated");

    let err = load_config(file.path().to_str()).unwrap_err();

    assert!(matches!(err, ConfigError::ParseError(_)));
}

#[test]
fn invalid_policy_is_rejected() {
    let file = write_config("simulation:\n  same_tick_policy: all_at_once\n");

    assert!(load_config(file.path().to_str()).is_err());
}
