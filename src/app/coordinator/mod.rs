//! Probe run orchestration
//!
//! The coordinator wires job source, worker pool and result sink together and
//! owns the output files for the whole run. Shutdown follows a strict barrier
//! sequence:
//!
//! 1. the job source submits every ID and closes the job channel
//! 2. all workers drain the job channel and terminate
//! 3. the results channel is closed
//! 4. the sink drains the results channel and terminates
//! 5. the outputs are flushed and synced
//!
//! Skipping a step risks losing buffered results or writing to a closed file.
//!
//! # Examples
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use url_radar::app::client::ScriptedTransport;
//! use url_radar::app::coordinator::{Coordinator, CoordinatorConfig};
//! use url_radar::app::probe::ProbeTarget;
//!
//! # async fn example() -> url_radar::Result<()> {
//! let config = CoordinatorConfig::default()
//!     .with_target(ProbeTarget::new("https://x/", "https://x/"))
//!     .with_range(10, 3)
//!     .with_outputs("valid.csv", "log.txt");
//!
//! let transport = Arc::new(ScriptedTransport::always_homepage("https://x/"));
//! let result = Coordinator::new(config, transport).run().await?;
//! println!("{}", result.summary());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod stats;

use std::sync::Arc;
use std::time::Instant;

use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::app::client::{HttpTransport, Transport};
use crate::app::probe::Prober;
use crate::app::queue::JobSource;
use crate::app::sink::{timestamp, RecordWriter, ResultLog, ResultSink};
use crate::app::worker::WorkerPool;
use crate::errors::{OutputError, OutputResult, PipelineError, Result};

pub use config::{CoordinatorConfig, OutputConfig};
pub use stats::SessionResult;

/// Main coordinator for a probe run
pub struct Coordinator {
    config: CoordinatorConfig,
    transport: Arc<dyn Transport>,
}

impl std::fmt::Debug for Coordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Coordinator")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Coordinator {
    /// Create a coordinator probing through `transport`
    pub fn new(config: CoordinatorConfig, transport: Arc<dyn Transport>) -> Self {
        Self { config, transport }
    }

    /// Create a coordinator probing through a reqwest client built from the
    /// configuration
    ///
    /// # Errors
    ///
    /// Returns `ClientError` if the HTTP client cannot be built
    pub fn with_http(config: CoordinatorConfig) -> Result<Self> {
        let transport = HttpTransport::new(&config.client)?;
        Ok(Self::new(config, Arc::new(transport)))
    }

    /// Run configuration
    pub fn config(&self) -> &CoordinatorConfig {
        &self.config
    }

    /// Run the complete probe pipeline
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid, an output file
    /// cannot be created, or the sink task dies. Per-ID failures are never
    /// errors here; they are recorded in the outputs.
    pub async fn run(&self) -> Result<SessionResult> {
        let session_start = Instant::now();
        self.config.validate()?;

        let range = self.config.range;
        info!(
            "Starting check of {} IDs from {} with {} workers",
            range.count, range.start_id, self.config.workers.worker_count
        );

        let (log, records) = open_outputs(self.config.output.clone()).await?;

        let prober = Prober::new(self.transport.clone(), self.config.target.clone());
        let pool = WorkerPool::new(self.config.workers.clone(), prober);
        self.execute(pool, log, records, session_start).await
    }

    /// Drive the pipeline over open outputs, closing them on every path
    async fn execute(
        &self,
        mut pool: WorkerPool,
        log: Arc<ResultLog>,
        records: Arc<RecordWriter>,
        session_start: Instant,
    ) -> Result<SessionResult> {
        let range = self.config.range;
        let capacity = self.config.workers.effective_capacity(range.count);
        let mut errors = Vec::new();

        // Sink first, so results always have a consumer
        let (results_tx, results_rx) = mpsc::channel(capacity);
        let sink = ResultSink::new(
            log.clone(),
            records.clone(),
            self.config.sink.clone(),
            range.count,
        );
        let sink_handle = sink.spawn(results_rx);

        let source = JobSource::new(range, capacity);
        debug!("Job and result channels hold {} entries", source.capacity());
        let (jobs, producer) = source.spawn();

        if let Err(e) = pool.start(&jobs, &results_tx) {
            error!("Worker pool failed to start: {}", e);
            // Same barrier order with no workers; dropping the queue stops the producer
            drop(jobs);
            let _ = producer.await;
            pool.wait().await;
            drop(results_tx);
            let _ = sink_handle.await;
            let _ = close_outputs(log, records).await;
            return Err(e.into());
        }
        drop(jobs);
        debug!("{} workers running", pool.worker_count());

        // 1. job source exhausted and job channel closed
        let submitted = match producer.await {
            Ok(submitted) => submitted,
            Err(e) => {
                let err = PipelineError::ProducerPanic {
                    reason: e.to_string(),
                };
                error!("{}", err);
                errors.push(err.to_string());
                0
            }
        };

        // 2. every worker terminated
        let pool_report = pool.wait().await;
        for worker_id in pool_report.panicked_workers() {
            errors.push(PipelineError::WorkerPanic { worker_id }.to_string());
        }

        // 3. close the results channel
        drop(results_tx);

        // 4. sink drained
        let stats = match sink_handle.await {
            Ok(stats) => stats,
            Err(e) => {
                let err = PipelineError::SinkPanic {
                    reason: e.to_string(),
                };
                error!("{}", err);
                let _ = close_outputs(log, records).await;
                return Err(err.into());
            }
        };

        // 5. outputs closed last
        errors.extend(close_outputs(log, records).await);

        if stats.processed != submitted {
            warn!(
                "Submitted {} IDs but the sink processed {}",
                submitted, stats.processed
            );
        }

        let total_duration = session_start.elapsed();
        info!(
            "Probe session completed in {:?}: {} processed, {} valid",
            total_duration, stats.processed, stats.valid
        );

        Ok(SessionResult {
            stats,
            pool: pool_report,
            submitted,
            success: errors.is_empty(),
            errors,
            total_duration,
            results_path: self.config.output.results_path.clone(),
            log_path: self.config.output.log_path.clone(),
        })
    }
}

/// Open both outputs off the executor; either failing aborts the run before
/// any probe
async fn open_outputs(output: OutputConfig) -> Result<(Arc<ResultLog>, Arc<RecordWriter>)> {
    let opened = tokio::task::spawn_blocking(move || -> OutputResult<_> {
        let records = RecordWriter::create(&output.results_path)?;
        let log = ResultLog::create(&output.log_path, output.sync_log)?;
        log.write_line(&format!("Starting catalog check at {}", timestamp()))?;
        Ok((Arc::new(log), Arc::new(records)))
    })
    .await
    .map_err(|e| OutputError::Io(std::io::Error::other(e)))??;
    Ok(opened)
}

/// Write the closing banner and flush both outputs off the executor
///
/// Returns one message per failed step.
async fn close_outputs(log: Arc<ResultLog>, records: Arc<RecordWriter>) -> Vec<String> {
    tokio::task::spawn_blocking(move || {
        let mut errors = Vec::new();
        if let Err(e) = log.write_line(&format!("Finished catalog check at {}", timestamp())) {
            warn!("Failed to write closing banner: {}", e);
            errors.push(format!("log banner: {}", e));
        }
        if let Err(e) = log.finish() {
            warn!("Failed to close log {}: {}", log.path().display(), e);
            errors.push(format!("log close: {}", e));
        }
        if let Err(e) = records.finish() {
            warn!("Failed to close results {}: {}", records.path().display(), e);
            errors.push(format!("results close: {}", e));
        }
        errors
    })
    .await
    .unwrap_or_else(|e| {
        warn!("Output close task failed: {}", e);
        vec![format!("output close: {}", e)]
    })
}
