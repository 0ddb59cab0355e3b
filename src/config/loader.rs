// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::config::consts::{DEFAULT_LOG_LEVEL, DEFAULT_TOKEN_WIDTH, DEFAULT_WORKERS};
use crate::config::NumberingScheme;
use crate::errors::ConfigError;
use crate::observability::messages::config::{ConfigLoaded, ConfigRejected};
use crate::observability::messages::StructuredLog;
use crate::partition::RemainderPolicy;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Main configuration structure for a distributed addition run.
///
/// Every section is optional; an empty document yields the defaults.
///
/// # Fields
/// * `workers` - Number of worker ranks (the process group has `workers + 1` ranks)
/// * `numbering` - Token width shared by every component
/// * `partition` - What to do with tokens that do not divide evenly across workers
/// * `transport` - Receive timeout for the point-to-point channels
/// * `logging` - Default tracing level
///
/// # Example
/// ```yaml
/// workers: 4
/// numbering:
///   token_width: 9
/// partition:
///   remainder: reject
/// transport:
///   receive_timeout_ms: 5000
/// logging:
///   level: debug
/// ```
#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default = "default_workers")]
    pub workers: usize,
    #[serde(default)]
    pub numbering: NumberingConfig,
    #[serde(default)]
    pub partition: PartitionConfig,
    #[serde(default)]
    pub transport: TransportConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_workers() -> usize {
    DEFAULT_WORKERS
}

impl Default for Config {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            numbering: NumberingConfig::default(),
            partition: PartitionConfig::default(),
            transport: TransportConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Config {
    /// Build the immutable numbering scheme described by this configuration.
    pub fn scheme(&self) -> Result<NumberingScheme, ConfigError> {
        NumberingScheme::new(self.numbering.token_width)
    }

    /// Replace the configured worker count, as the `--workers` flag does.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }
}

#[derive(Debug, Deserialize)]
pub struct NumberingConfig {
    #[serde(default = "default_token_width")]
    pub token_width: usize,
}

fn default_token_width() -> usize {
    DEFAULT_TOKEN_WIDTH
}

impl Default for NumberingConfig {
    fn default() -> Self {
        Self {
            token_width: DEFAULT_TOKEN_WIDTH,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct PartitionConfig {
    #[serde(default)]
    pub remainder: RemainderPolicy,
}

/// Channel settings for the process group.
///
/// Without `receive_timeout_ms` every blocking receive waits indefinitely, so a
/// stalled rank stalls the whole run.
#[derive(Debug, Default, Deserialize)]
pub struct TransportConfig {
    pub receive_timeout_ms: Option<u64>,
}

impl TransportConfig {
    pub fn receive_timeout(&self) -> Option<Duration> {
        self.receive_timeout_ms.map(Duration::from_millis)
    }
}

#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Load a config from a YAML file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let load_error = |reason: String| ConfigError::Load {
        path: path.display().to_string(),
        reason,
    };
    let content = fs::read_to_string(path).map_err(|e| load_error(e.to_string()))?;
    let cfg: Config = serde_yaml::from_str(&content).map_err(|e| load_error(e.to_string()))?;
    Ok(cfg)
}

/// Load and validate a config from a YAML file
///
/// Every validation problem is logged; the first one is returned.
pub fn load_and_validate_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let path_display = path.as_ref().display().to_string();
    let cfg = load_config(path)?;

    if let Err(mut errors) = crate::config::validate_config(&cfg) {
        for error in &errors {
            ConfigRejected {
                path: &path_display,
                error,
            }
            .log();
        }
        return Err(errors.remove(0));
    }

    ConfigLoaded {
        path: &path_display,
        workers: cfg.workers,
        token_width: cfg.numbering.token_width,
    }
    .log();
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn parse_basic_config() {
        let yaml = r#"
workers: 4
numbering:
  token_width: 9
partition:
  remainder: truncate
transport:
  receive_timeout_ms: 250
"#;

        let cfg: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(cfg.workers, 4);
        assert_eq!(cfg.numbering.token_width, 9);
        assert_eq!(cfg.partition.remainder, RemainderPolicy::Truncate);
        assert_eq!(
            cfg.transport.receive_timeout(),
            Some(Duration::from_millis(250))
        );
    }

    #[test]
    fn test_empty_document_uses_defaults() {
        let cfg: Config = serde_yaml::from_str("{}").unwrap();

        assert_eq!(cfg.workers, DEFAULT_WORKERS);
        assert_eq!(cfg.numbering.token_width, DEFAULT_TOKEN_WIDTH);
        assert_eq!(cfg.partition.remainder, RemainderPolicy::Reject);
        assert_eq!(cfg.transport.receive_timeout(), None);
        assert_eq!(cfg.logging.level, "info");
    }

    #[test]
    fn test_unknown_remainder_policy_is_rejected() {
        let yaml = r#"
partition:
  remainder: spread
"#;
        let result: Result<Config, _> = serde_yaml::from_str(yaml);
        assert!(result.is_err());
    }

    #[test]
    fn test_load_and_validate_valid_config() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "workers: 3\nnumbering:\n  token_width: 4").unwrap();

        let cfg = load_and_validate_config(file.path()).unwrap();
        assert_eq!(cfg.workers, 3);
        assert_eq!(cfg.scheme().unwrap().base(), 10_000);
    }

    #[test]
    fn test_load_and_validate_rejects_zero_workers() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "workers: 0").unwrap();

        let result = load_and_validate_config(file.path());
        assert_eq!(result.unwrap_err(), ConfigError::ZeroWorkers);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.yaml");

        let err = load_config(&missing).unwrap_err();
        assert!(matches!(err, ConfigError::Load { .. }));
        assert!(err.to_string().contains("absent.yaml"));
    }

    #[test]
    fn test_with_workers_overrides_config() {
        let cfg = Config::default().with_workers(7);
        assert_eq!(cfg.workers, 7);
    }
}
