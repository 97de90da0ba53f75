//! Worker configuration management
//!
//! Worker count and channel sizing for the probe pool, with validation.

use serde::{Deserialize, Serialize};

use crate::constants::workers;
use crate::errors::{ConfigError, ConfigResult};

/// Configuration for probe workers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Number of concurrent workers to spawn
    pub worker_count: usize,
    /// Capacity of the job and result channels; `None` sizes them to the
    /// number of IDs so producers never wait
    pub channel_capacity: Option<usize>,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            worker_count: workers::DEFAULT_WORKER_COUNT,
            channel_capacity: None,
        }
    }
}

impl WorkerConfig {
    /// Validate configuration values and return errors for invalid settings
    pub fn validate(&self) -> ConfigResult<()> {
        if self.worker_count == 0 {
            return Err(ConfigError::InvalidValue {
                field: "worker_count".to_string(),
                value: "0".to_string(),
                reason: "Worker count cannot be zero".to_string(),
            });
        }

        if self.worker_count > workers::MAX_WORKER_COUNT {
            return Err(ConfigError::InvalidValue {
                field: "worker_count".to_string(),
                value: self.worker_count.to_string(),
                reason: format!("Worker count exceeds maximum ({})", workers::MAX_WORKER_COUNT),
            });
        }

        match self.channel_capacity {
            Some(0) => {
                return Err(ConfigError::InvalidValue {
                    field: "channel_capacity".to_string(),
                    value: "0".to_string(),
                    reason: "Channel capacity must be at least 1 when set".to_string(),
                });
            }
            Some(capacity) if capacity > workers::MAX_CHANNEL_CAPACITY => {
                return Err(ConfigError::InvalidValue {
                    field: "channel_capacity".to_string(),
                    value: capacity.to_string(),
                    reason: format!(
                        "Channel capacity exceeds maximum ({})",
                        workers::MAX_CHANNEL_CAPACITY
                    ),
                });
            }
            _ => {}
        }

        Ok(())
    }

    /// Channel capacity for a run of `count` IDs
    ///
    /// Always within `MIN_CHANNEL_CAPACITY..=MAX_CHANNEL_CAPACITY`, so huge
    /// ranges get a bounded channel instead of one sized to the run.
    pub fn effective_capacity(&self, count: u64) -> usize {
        let capacity = match self.channel_capacity {
            Some(capacity) => capacity,
            None => usize::try_from(count).unwrap_or(usize::MAX),
        };
        capacity.clamp(workers::MIN_CHANNEL_CAPACITY, workers::MAX_CHANNEL_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Test WorkerConfig default values match constants
    #[test]
    fn test_worker_config_default() {
        let config = WorkerConfig::default();
        assert_eq!(config.worker_count, workers::DEFAULT_WORKER_COUNT);
        assert_eq!(config.channel_capacity, None);
        assert!(config.validate().is_ok());
    }

    /// Test configuration validation catches invalid values
    #[test]
    fn test_config_validation() {
        let config = WorkerConfig {
            worker_count: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = WorkerConfig {
            worker_count: workers::MAX_WORKER_COUNT + 1,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = WorkerConfig {
            channel_capacity: Some(0),
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = WorkerConfig {
            channel_capacity: Some(workers::MAX_CHANNEL_CAPACITY + 1),
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = WorkerConfig {
            channel_capacity: Some(workers::MAX_CHANNEL_CAPACITY),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    /// Test capacity derivation
    ///
    /// Unset capacity follows the run size; zero-sized runs still get a
    /// usable channel.
    #[test]
    fn test_effective_capacity() {
        let config = WorkerConfig::default();
        assert_eq!(config.effective_capacity(15_000), 15_000);
        assert_eq!(config.effective_capacity(0), 1);

        let config = WorkerConfig {
            worker_count: 4,
            channel_capacity: Some(64),
        };
        assert_eq!(config.effective_capacity(15_000), 64);
    }

    /// Test runs far larger than any channel get a bounded capacity
    #[test]
    fn test_effective_capacity_is_bounded() {
        let config = WorkerConfig::default();
        assert_eq!(
            config.effective_capacity(1 << 62),
            workers::MAX_CHANNEL_CAPACITY
        );
        assert_eq!(
            config.effective_capacity(u64::MAX),
            workers::MAX_CHANNEL_CAPACITY
        );

        let config = WorkerConfig {
            worker_count: 1,
            channel_capacity: Some(usize::MAX),
        };
        assert_eq!(
            config.effective_capacity(10),
            workers::MAX_CHANNEL_CAPACITY
        );
    }
}
