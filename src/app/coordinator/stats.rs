//! Session result of a probe run
//!
//! Collects the sink counters, the worker pool report and any problems seen
//! during shutdown into one serializable value.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::app::sink::SinkStats;
use crate::app::worker::PoolReport;

/// Final result of a probe session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResult {
    /// Final sink counters
    pub stats: SinkStats,
    /// Per-worker outcome
    pub pool: PoolReport,
    /// IDs submitted by the job source
    pub submitted: u64,
    /// Whether the session completed without pipeline or shutdown errors
    pub success: bool,
    /// Problems encountered after probing started
    pub errors: Vec<String>,
    /// Time taken for the entire session
    #[serde(with = "humantime_serde")]
    pub total_duration: Duration,
    /// CSV of valid results
    pub results_path: PathBuf,
    /// Audit log
    pub log_path: PathBuf,
}

impl SessionResult {
    /// Check if the session had any errors
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Whether every submitted ID reached the sink
    pub fn is_complete(&self) -> bool {
        self.stats.processed == self.submitted && self.submitted == self.stats.total
    }

    /// Get a summary of the session result
    pub fn summary(&self) -> String {
        if self.success && self.is_complete() {
            format!(
                "Check complete: {} of {} IDs valid in {:.1?}",
                self.stats.valid, self.stats.processed, self.total_duration
            )
        } else {
            format!(
                "Check finished with problems: {}/{} IDs processed, {} errors",
                self.stats.processed,
                self.stats.total,
                self.errors.len()
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(processed: u64, total: u64, errors: Vec<String>) -> SessionResult {
        SessionResult {
            stats: SinkStats {
                total,
                processed,
                valid: 1,
                ..Default::default()
            },
            pool: PoolReport::default(),
            submitted: processed,
            success: errors.is_empty(),
            errors,
            total_duration: Duration::from_millis(1500),
            results_path: PathBuf::from("valid.csv"),
            log_path: PathBuf::from("log.txt"),
        }
    }

    #[test]
    fn test_summary_success() {
        let result = session(3, 3, Vec::new());
        assert!(result.is_complete());
        assert!(!result.has_errors());
        assert!(result.summary().starts_with("Check complete: 1 of 3 IDs valid"));
    }

    #[test]
    fn test_summary_with_errors() {
        let result = session(2, 3, vec!["Worker 1 panicked".to_string()]);
        assert!(!result.is_complete());
        assert_eq!(
            result.summary(),
            "Check finished with problems: 2/3 IDs processed, 1 errors"
        );
    }

    #[test]
    fn test_session_serializes() {
        let json = serde_json::to_value(session(3, 3, Vec::new())).unwrap();
        assert_eq!(json["stats"]["processed"], 3);
        assert_eq!(json["total_duration"], "1s 500ms");
    }
}
