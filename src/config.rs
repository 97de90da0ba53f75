//! Configuration management for URL Radar
//!
//! Settings come from three layers, later ones winning:
//! 1. Built-in defaults
//! 2. A TOML file (`--config FILE`, or `url_radar.toml` in the working
//!    directory when present)
//! 3. Command-line overrides on `run`
//!
//! Durations are written in humantime form (`"10s"`, `"1m 30s"`).

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::app::{
    ClientConfig, CoordinatorConfig, IdRange, OutputConfig, ProbeTarget, SinkConfig, WorkerConfig,
};
use crate::constants::{config as config_consts, http, output, progress, target, workers};
use crate::errors::{ConfigError, ConfigResult};

/// Unified application configuration for TOML serialization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// What to probe
    pub target: TargetConfigToml,
    /// Where results go
    pub output: OutputConfigToml,
    /// HTTP client settings
    pub client: ClientConfigToml,
    /// Worker pool settings
    pub workers: WorkersConfigToml,
    /// Progress reporting settings
    pub progress: ProgressConfigToml,
}

/// TOML-friendly target configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetConfigToml {
    /// URL prefix each ID is appended to
    pub base_url: String,
    /// Homepage that marks a missing ID
    pub homepage_url: String,
    /// Highest ID probed
    pub start_id: i64,
    /// Number of IDs probed, descending from `start_id`
    pub count: u64,
}

impl Default for TargetConfigToml {
    fn default() -> Self {
        Self {
            base_url: target::BASE_URL.to_string(),
            homepage_url: target::HOMEPAGE_URL.to_string(),
            start_id: target::START_ID,
            count: target::COUNT,
        }
    }
}

/// TOML-friendly output configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfigToml {
    /// CSV of valid results
    pub results_file: PathBuf,
    /// Audit log of every result
    pub log_file: PathBuf,
    /// fsync the log after every line
    pub sync_log: bool,
}

impl Default for OutputConfigToml {
    fn default() -> Self {
        Self {
            results_file: PathBuf::from(output::RESULTS_FILE),
            log_file: PathBuf::from(output::LOG_FILE),
            sync_log: true,
        }
    }
}

/// TOML-friendly client configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfigToml {
    /// User agent header
    pub user_agent: String,
    /// Overall per-request timeout
    #[serde(with = "humantime_serde")]
    pub request_timeout: Duration,
    /// Connect timeout
    #[serde(with = "humantime_serde")]
    pub connect_timeout: Duration,
    /// Connection pool idle timeout
    #[serde(with = "humantime_serde")]
    pub pool_idle_timeout: Duration,
    /// Maximum idle connections per host
    pub pool_max_per_host: usize,
    /// Redirect hops followed
    pub max_redirects: usize,
    /// TCP nodelay setting
    pub tcp_nodelay: bool,
}

impl Default for ClientConfigToml {
    fn default() -> Self {
        Self {
            user_agent: http::USER_AGENT.to_string(),
            request_timeout: http::REQUEST_TIMEOUT,
            connect_timeout: http::CONNECT_TIMEOUT,
            pool_idle_timeout: http::POOL_IDLE_TIMEOUT,
            pool_max_per_host: http::POOL_MAX_PER_HOST,
            max_redirects: http::MAX_REDIRECTS,
            tcp_nodelay: true,
        }
    }
}

/// TOML-friendly worker configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkersConfigToml {
    /// Number of concurrent probe workers
    pub worker_count: usize,
    /// Job and result channel capacity (omit to size by ID count)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel_capacity: Option<usize>,
}

impl Default for WorkersConfigToml {
    fn default() -> Self {
        Self {
            worker_count: workers::DEFAULT_WORKER_COUNT,
            channel_capacity: None,
        }
    }
}

/// TOML-friendly progress configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressConfigToml {
    /// Progress line every this many results (0 disables)
    pub report_every: u64,
    /// Show a progress bar instead of plain progress lines
    pub progress_bar: bool,
}

impl Default for ProgressConfigToml {
    fn default() -> Self {
        Self {
            report_every: progress::REPORT_EVERY,
            progress_bar: false,
        }
    }
}

impl AppConfig {
    /// Load configuration
    ///
    /// An explicit path must exist. Without one, `url_radar.toml` in the
    /// working directory is used if present, otherwise defaults.
    pub async fn load(config_file_override: Option<PathBuf>) -> ConfigResult<Self> {
        let config_path = match config_file_override {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::NotFound { path });
                }
                Some(path)
            }
            None => Self::find_config_file(),
        };

        match config_path {
            Some(path) => Self::load_from_file(&path).await,
            None => {
                debug!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Default config file location, if one exists
    fn find_config_file() -> Option<PathBuf> {
        let path = Self::default_config_path();
        if path.exists() {
            debug!("Found config file: {}", path.display());
            Some(path)
        } else {
            None
        }
    }

    /// Path of the config file picked up without `--config`
    pub fn default_config_path() -> PathBuf {
        PathBuf::from(config_consts::DEFAULT_CONFIG_FILE)
    }

    /// Load configuration from a TOML file
    async fn load_from_file(path: &Path) -> ConfigResult<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })?;

        let config = Self::from_toml(&content)?;
        info!("Loaded configuration from: {}", path.display());
        Ok(config)
    }

    /// Parse configuration from TOML text; missing keys take defaults
    pub fn from_toml(content: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Render the configuration as TOML
    pub fn to_toml(&self) -> ConfigResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Write the configuration to `path`, with a short header
    pub async fn save(&self, path: &Path) -> ConfigResult<()> {
        let content = format!(
            "# URL Radar configuration\n# Durations use humantime syntax, e.g. \"10s\" or \"1m 30s\".\n\n{}",
            self.to_toml()?
        );

        tokio::fs::write(path, content)
            .await
            .map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })?;

        info!("Wrote configuration to: {}", path.display());
        Ok(())
    }

    /// Convert to the runtime coordinator configuration
    pub fn to_coordinator_config(&self) -> CoordinatorConfig {
        CoordinatorConfig {
            target: ProbeTarget::new(&self.target.base_url, &self.target.homepage_url),
            range: IdRange::new(self.target.start_id, self.target.count),
            output: self.output.to_runtime_config(),
            client: self.client.to_runtime_config(),
            workers: self.workers.to_runtime_config(),
            sink: self.progress.to_runtime_config(),
        }
    }
}

impl OutputConfigToml {
    /// Convert to runtime OutputConfig
    pub fn to_runtime_config(&self) -> OutputConfig {
        OutputConfig {
            results_path: self.results_file.clone(),
            log_path: self.log_file.clone(),
            sync_log: self.sync_log,
        }
    }
}

impl ClientConfigToml {
    /// Convert to runtime ClientConfig
    pub fn to_runtime_config(&self) -> ClientConfig {
        ClientConfig {
            user_agent: self.user_agent.clone(),
            request_timeout: self.request_timeout,
            connect_timeout: self.connect_timeout,
            pool_idle_timeout: self.pool_idle_timeout,
            pool_max_per_host: self.pool_max_per_host,
            max_redirects: self.max_redirects,
            tcp_nodelay: self.tcp_nodelay,
        }
    }
}

impl WorkersConfigToml {
    /// Convert to runtime WorkerConfig
    pub fn to_runtime_config(&self) -> WorkerConfig {
        WorkerConfig {
            worker_count: self.worker_count,
            channel_capacity: self.channel_capacity,
        }
    }
}

impl ProgressConfigToml {
    /// Convert to runtime SinkConfig
    pub fn to_runtime_config(&self) -> SinkConfig {
        SinkConfig {
            report_every: self.report_every,
            console_output: true,
            progress_bar: self.progress_bar,
        }
    }
}
