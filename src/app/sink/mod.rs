//! Result sink: the single consumer of probe results
//!
//! The sink drains the results channel until it is closed and empty. For each
//! result, in order, it appends the log line, appends the CSV row when the
//! result is valid, then updates the counters. A progress line is emitted on
//! every exact multiple of the report interval, and a summary when the
//! channel closes.
//!
//! The sink does not stop at a count: channel closure is its only
//! termination condition.
//!
//! Output writes are blocking file I/O (and an fsync per log line when
//! `sync_log` is set), so the sink loop runs on tokio's blocking pool rather
//! than on an executor thread.
//!
//! # Module Organization
//!
//! - [`writers`] - The two output files, each behind its own lock
//! - [`stats`] - Counters, rate and ETA
//! - [`reporter`] - Console and progress bar output

pub mod reporter;
pub mod stats;
pub mod writers;

use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::app::models::ProbeResult;
use crate::constants::progress;

pub use reporter::ProgressReporter;
pub use stats::SinkStats;
pub use writers::{format_log_line, timestamp, RecordWriter, ResultLog};

/// Reporting settings for the sink
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SinkConfig {
    /// Emit a progress line every this many results (0 disables)
    pub report_every: u64,
    /// Print progress to stdout
    pub console_output: bool,
    /// Show an indicatif progress bar (requires console output)
    pub progress_bar: bool,
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self {
            report_every: progress::REPORT_EVERY,
            console_output: true,
            progress_bar: false,
        }
    }
}

/// Single consumer writing results to both outputs
#[derive(Debug)]
pub struct ResultSink {
    log: Arc<ResultLog>,
    records: Arc<RecordWriter>,
    config: SinkConfig,
    total: u64,
}

impl ResultSink {
    /// Create a sink for a run of `total` IDs
    pub fn new(
        log: Arc<ResultLog>,
        records: Arc<RecordWriter>,
        config: SinkConfig,
        total: u64,
    ) -> Self {
        Self {
            log,
            records,
            config,
            total,
        }
    }

    /// Spawn the sink on a blocking thread; it resolves to the final counters
    pub fn spawn(self, results_rx: mpsc::Receiver<ProbeResult>) -> JoinHandle<SinkStats> {
        tokio::task::spawn_blocking(move || self.run(results_rx))
    }

    /// Drain `results_rx` to exhaustion
    ///
    /// Blocks the calling thread; must not be called from async code.
    pub fn run(self, mut results_rx: mpsc::Receiver<ProbeResult>) -> SinkStats {
        let reporter = ProgressReporter::new(
            self.total,
            self.config.console_output,
            self.config.progress_bar,
        );
        let start = Instant::now();
        let mut stats = SinkStats::new(self.total);

        while let Some(result) = results_rx.blocking_recv() {
            self.handle(&result, &mut stats, &reporter);
            stats.elapsed = start.elapsed();

            if self.config.report_every > 0 && stats.processed % self.config.report_every == 0 {
                reporter.line(&stats.progress_line());
            }
        }

        stats.elapsed = start.elapsed();
        reporter.finish();
        debug!("Results channel closed after {} results", stats.processed);
        for line in stats.summary_lines() {
            reporter.line(&line);
        }
        if stats.write_errors > 0 {
            warn!("{} output writes failed during the run", stats.write_errors);
        }
        stats
    }

    /// Write one result and count it
    fn handle(&self, result: &ProbeResult, stats: &mut SinkStats, reporter: &ProgressReporter) {
        if let Err(e) = self.log.append(result) {
            warn!("Failed to write log line for ID {}: {}", result.id, e);
            stats.write_errors += 1;
        }

        if result.is_valid() {
            if let Err(e) = self.records.append(result) {
                warn!("Failed to write CSV record for ID {}: {}", result.id, e);
                stats.write_errors += 1;
            }
        }

        stats.record(result);
        reporter.tick();

        if result.is_valid() {
            info!("Valid catalog at {}", result.final_url);
            if self.config.console_output {
                reporter.line(&format!("Found valid catalog: ID {}", result.id));
            }
        }
    }
}
