//! Configuration structures for the probe coordinator
//!
//! Everything a run needs is carried in one explicit [`CoordinatorConfig`],
//! so tests can run small ranges against scripted transports without any
//! process-wide state.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::app::client::ClientConfig;
use crate::app::probe::ProbeTarget;
use crate::app::queue::IdRange;
use crate::app::sink::SinkConfig;
use crate::app::worker::WorkerConfig;
use crate::constants::{output, target};
use crate::errors::{ConfigError, ConfigResult};

/// Output file locations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// CSV receiving valid results
    pub results_path: PathBuf,
    /// Append-only audit log
    pub log_path: PathBuf,
    /// fsync the log after every line
    pub sync_log: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            results_path: PathBuf::from(output::RESULTS_FILE),
            log_path: PathBuf::from(output::LOG_FILE),
            sync_log: true,
        }
    }
}

/// Configuration for one probe run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoordinatorConfig {
    /// URL template and homepage signature
    pub target: ProbeTarget,
    /// IDs to probe
    pub range: IdRange,
    /// Output files
    pub output: OutputConfig,
    /// HTTP client settings
    pub client: ClientConfig,
    /// Worker pool settings
    pub workers: WorkerConfig,
    /// Progress reporting settings
    pub sink: SinkConfig,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            target: ProbeTarget::default(),
            range: IdRange::new(target::START_ID, target::COUNT),
            output: OutputConfig::default(),
            client: ClientConfig::default(),
            workers: WorkerConfig::default(),
            sink: SinkConfig::default(),
        }
    }
}

impl CoordinatorConfig {
    /// Set the URL template and homepage
    pub fn with_target(mut self, target: ProbeTarget) -> Self {
        self.target = target;
        self
    }

    /// Set the ID range
    pub fn with_range(mut self, start_id: i64, count: u64) -> Self {
        self.range = IdRange::new(start_id, count);
        self
    }

    /// Set output file paths
    pub fn with_outputs(mut self, results_path: impl Into<PathBuf>, log_path: impl Into<PathBuf>) -> Self {
        self.output.results_path = results_path.into();
        self.output.log_path = log_path.into();
        self
    }

    /// Set the number of workers
    pub fn with_worker_count(mut self, count: usize) -> Self {
        self.workers.worker_count = count;
        self
    }

    /// Enable or disable console output from the sink
    pub fn with_console_output(mut self, enabled: bool) -> Self {
        self.sink.console_output = enabled;
        self
    }

    /// Validate the configuration, reporting every problem at once
    pub fn validate(&self) -> ConfigResult<()> {
        let mut errors = Vec::new();

        if self.target.base_url.is_empty() {
            errors.push("target.base_url cannot be empty".to_string());
        }
        if let Err(e) = url::Url::parse(&self.target.homepage_url) {
            errors.push(format!(
                "target.homepage_url '{}' is not a valid URL: {}",
                self.target.homepage_url, e
            ));
        }
        if !self.range.is_representable() {
            errors.push(format!(
                "range of {} IDs below {} underflows",
                self.range.count, self.range.start_id
            ));
        }
        if self.output.results_path == self.output.log_path {
            errors.push("output.results_path and output.log_path must differ".to_string());
        }
        if let Err(e) = self.client.validate() {
            errors.push(format!("client: {}", e));
        }
        if let Err(e) = self.workers.validate() {
            errors.push(format!("workers: {}", e));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::ValidationFailed { errors })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::workers;

    /// Test that default configuration is valid
    #[test]
    fn test_default_config_is_valid() {
        let config = CoordinatorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.range.start_id, 31106);
        assert_eq!(config.range.count, 15_000);
        assert_eq!(config.workers.worker_count, workers::DEFAULT_WORKER_COUNT);
        assert_eq!(config.output.results_path, PathBuf::from("valid_catalogs.csv"));
    }

    /// Test configuration builder methods
    #[test]
    fn test_config_builder_methods() {
        let config = CoordinatorConfig::default()
            .with_target(ProbeTarget::new("https://x/", "https://x/"))
            .with_range(10, 3)
            .with_outputs("/tmp/a.csv", "/tmp/a.log")
            .with_worker_count(1)
            .with_console_output(false);

        assert_eq!(config.target.base_url, "https://x/");
        assert_eq!(config.range, IdRange::new(10, 3));
        assert_eq!(config.workers.worker_count, 1);
        assert!(!config.sink.console_output);
        assert!(config.validate().is_ok());
    }

    /// Test validation collects every error
    #[test]
    fn test_config_validation() {
        let config = CoordinatorConfig::default()
            .with_target(ProbeTarget::new("", "not a url"))
            .with_range(i64::MIN, 10)
            .with_outputs("same.txt", "same.txt")
            .with_worker_count(0);

        match config.validate() {
            Err(ConfigError::ValidationFailed { errors }) => assert_eq!(errors.len(), 5),
            other => panic!("expected validation failure, got {:?}", other),
        }
    }
}
