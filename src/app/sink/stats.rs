//! Sink counters, throughput and ETA
//!
//! Counters are owned by the sink task alone; the coordinator only sees a
//! copy after the sink has terminated.

use std::time::Duration;

use humantime_serde::re::humantime;
use serde::{Deserialize, Serialize};

use crate::app::models::{ProbeResult, ProbeStatus};

/// Running counters of the result sink
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SinkStats {
    /// Declared number of IDs in the run
    pub total: u64,
    /// Results consumed
    pub processed: u64,
    /// Results classified valid
    pub valid: u64,
    /// Results classified as homepage redirects
    pub redirected: u64,
    /// Results classified as errors
    pub errors: u64,
    /// Log or CSV appends that failed
    pub write_errors: u64,
    /// Time since the sink started
    #[serde(with = "humantime_serde")]
    pub elapsed: Duration,
}

impl SinkStats {
    /// Fresh counters for a run of `total` IDs
    pub fn new(total: u64) -> Self {
        Self {
            total,
            ..Default::default()
        }
    }

    /// Count one consumed result
    pub fn record(&mut self, result: &ProbeResult) {
        self.processed += 1;
        match result.status {
            ProbeStatus::Valid => self.valid += 1,
            ProbeStatus::Redirected | ProbeStatus::MetaRedirected => self.redirected += 1,
            ProbeStatus::Error => self.errors += 1,
        }
    }

    /// IDs not yet processed
    pub fn remaining(&self) -> u64 {
        self.total.saturating_sub(self.processed)
    }

    /// Results per second over the elapsed time; 0.0 when no time has passed
    pub fn rate(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.processed as f64 / secs
        } else {
            0.0
        }
    }

    /// Estimated time to finish, `None` when the rate is unknown
    pub fn eta(&self) -> Option<Duration> {
        let rate = self.rate();
        if rate > 0.0 && rate.is_finite() {
            let secs = self.remaining() as f64 / rate;
            Some(Duration::from_secs(secs.round() as u64))
        } else {
            None
        }
    }

    /// ETA as text, `unknown` when it cannot be computed
    pub fn format_eta(&self) -> String {
        match self.eta() {
            Some(eta) => humantime::format_duration(eta).to_string(),
            None => "unknown".to_string(),
        }
    }

    /// Elapsed time rounded to milliseconds
    pub fn format_elapsed(&self) -> String {
        let millis = Duration::from_millis(self.elapsed.as_millis() as u64);
        humantime::format_duration(millis).to_string()
    }

    /// Periodic progress line
    pub fn progress_line(&self) -> String {
        format!(
            "Processed: {}/{}, Valid: {}, Rate: {:.1} req/s, ETA: {}",
            self.processed,
            self.total,
            self.valid,
            self.rate(),
            self.format_eta()
        )
    }

    /// Final summary lines
    pub fn summary_lines(&self) -> Vec<String> {
        vec![
            format!(
                "Completed! Processed {} URLs in {}",
                self.processed,
                self.format_elapsed()
            ),
            format!("Found {} valid catalogs", self.valid),
            format!("Average rate: {:.1} requests/second", self.rate()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(status: ProbeStatus) -> ProbeResult {
        ProbeResult::from_response(1, "https://x/1".into(), status, "https://x/1".into(), 200)
    }

    #[test]
    fn test_record_counts_by_status() {
        let mut stats = SinkStats::new(4);
        stats.record(&result(ProbeStatus::Valid));
        stats.record(&result(ProbeStatus::Redirected));
        stats.record(&result(ProbeStatus::Error));
        stats.record(&result(ProbeStatus::Valid));

        assert_eq!(stats.processed, 4);
        assert_eq!(stats.valid, 2);
        assert_eq!(stats.redirected, 1);
        assert_eq!(stats.errors, 1);
        assert_eq!(stats.remaining(), 0);
    }

    #[test]
    fn test_rate_and_eta() {
        let stats = SinkStats {
            total: 15_000,
            processed: 1000,
            valid: 3,
            elapsed: Duration::from_secs(50),
            ..Default::default()
        };

        assert!((stats.rate() - 20.0).abs() < f64::EPSILON);
        assert_eq!(stats.eta(), Some(Duration::from_secs(700)));
        assert_eq!(
            stats.progress_line(),
            "Processed: 1000/15000, Valid: 3, Rate: 20.0 req/s, ETA: 11m 40s"
        );
    }

    #[test]
    fn test_zero_elapsed_is_tolerated() {
        let stats = SinkStats {
            total: 10,
            processed: 5,
            elapsed: Duration::ZERO,
            ..Default::default()
        };
        assert_eq!(stats.rate(), 0.0);
        assert_eq!(stats.eta(), None);
        assert_eq!(stats.format_eta(), "unknown");
        assert!(stats.summary_lines()[2].contains("0.0 requests/second"));
    }

    #[test]
    fn test_empty_run_summary() {
        let stats = SinkStats::new(0);
        let lines = stats.summary_lines();
        assert_eq!(lines[0], "Completed! Processed 0 URLs in 0s");
        assert_eq!(lines[1], "Found 0 valid catalogs");
        assert_eq!(lines[2], "Average rate: 0.0 requests/second");
    }
}
