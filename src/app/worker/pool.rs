//! Worker pool management and coordination
//!
//! The pool spawns a fixed number of identical probe workers and offers a
//! single wait point that resolves once every one of them has terminated.
//! That wait point is the barrier the coordinator crosses before it closes
//! the results channel.

use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use super::config::WorkerConfig;
use super::core::ProbeWorker;
use crate::app::models::ProbeResult;
use crate::app::probe::Prober;
use crate::app::queue::JobQueue;
use crate::errors::{ConfigError, ConfigResult};

/// Current state of the worker pool
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolState {
    /// Pool has been created but not started
    Created,
    /// Pool is running with active workers
    Running,
    /// All workers have terminated
    Finished,
}

/// Per-worker outcome
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerReport {
    /// Worker identifier
    pub worker_id: usize,
    /// Probes completed, or `None` if the worker panicked
    pub probes: Option<u64>,
}

/// Outcome of the whole pool once every worker has stopped
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolReport {
    /// One entry per worker, ordered by worker ID
    pub workers: Vec<WorkerReport>,
}

impl PoolReport {
    /// Total probes across workers that finished normally
    pub fn total_probes(&self) -> u64 {
        self.workers.iter().filter_map(|w| w.probes).sum()
    }

    /// IDs of workers that panicked
    pub fn panicked_workers(&self) -> Vec<usize> {
        self.workers
            .iter()
            .filter(|w| w.probes.is_none())
            .map(|w| w.worker_id)
            .collect()
    }
}

/// Pool of probe workers
#[derive(Debug)]
pub struct WorkerPool {
    /// Worker configuration
    config: WorkerConfig,
    /// Prober shared by all workers
    prober: Prober,
    /// Worker task handles
    worker_handles: Vec<JoinHandle<u64>>,
    /// Pool state
    state: PoolState,
}

impl WorkerPool {
    /// Create a new worker pool
    pub fn new(config: WorkerConfig, prober: Prober) -> Self {
        Self {
            config,
            prober,
            worker_handles: Vec::new(),
            state: PoolState::Created,
        }
    }

    /// Spawn all workers
    ///
    /// Each worker gets its own clone of `results_tx`; the caller keeps the
    /// original and drops it after [`WorkerPool::wait`] returns.
    pub fn start(
        &mut self,
        jobs: &JobQueue,
        results_tx: &mpsc::Sender<ProbeResult>,
    ) -> ConfigResult<()> {
        if self.state != PoolState::Created {
            return Err(ConfigError::InvalidValue {
                field: "pool_state".to_string(),
                value: format!("{:?}", self.state),
                reason: "Pool can only be started once".to_string(),
            });
        }
        self.config.validate()?;

        info!("Starting {} workers", self.config.worker_count);

        for worker_id in 0..self.config.worker_count {
            let worker = ProbeWorker::new(
                worker_id,
                self.prober.clone(),
                jobs.clone(),
                results_tx.clone(),
            );
            self.worker_handles
                .push(tokio::spawn(async move { worker.run().await }));
        }

        self.state = PoolState::Running;
        Ok(())
    }

    /// Wait for every worker to terminate
    ///
    /// Worker panics are reported in the returned [`PoolReport`], they do
    /// not abort the wait.
    pub async fn wait(mut self) -> PoolReport {
        let handles = std::mem::take(&mut self.worker_handles);
        let outcomes = join_all(handles).await;

        let workers: Vec<WorkerReport> = outcomes
            .into_iter()
            .enumerate()
            .map(|(worker_id, outcome)| match outcome {
                Ok(probes) => WorkerReport {
                    worker_id,
                    probes: Some(probes),
                },
                Err(e) => {
                    error!("Worker {} terminated abnormally: {}", worker_id, e);
                    WorkerReport {
                        worker_id,
                        probes: None,
                    }
                }
            })
            .collect();

        let report = PoolReport { workers };
        let panicked = report.panicked_workers();
        if !panicked.is_empty() {
            warn!("{} workers terminated abnormally", panicked.len());
        }

        self.state = PoolState::Finished;
        info!(
            "Worker pool finished: {} probes across {} workers",
            report.total_probes(),
            report.workers.len()
        );
        report
    }

    /// Get the current pool state
    pub fn state(&self) -> PoolState {
        self.state
    }

    /// Get number of spawned workers
    pub fn worker_count(&self) -> usize {
        self.worker_handles.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::client::{ScriptedOutcome, ScriptedTransport};
    use crate::app::probe::ProbeTarget;
    use crate::app::queue::{IdRange, JobSource};
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::time::Duration;

    fn two_workers() -> WorkerConfig {
        WorkerConfig {
            worker_count: 2,
            channel_capacity: Some(4),
        }
    }

    fn test_prober(transport: Arc<ScriptedTransport>) -> Prober {
        Prober::new(transport, ProbeTarget::new("https://x/", "https://x/"))
    }

    /// Test WorkerPool creation and basic properties
    #[tokio::test]
    async fn test_pool_creation() {
        let transport = Arc::new(ScriptedTransport::new(ScriptedOutcome::status(200)));
        let pool = WorkerPool::new(two_workers(), test_prober(transport));

        assert_eq!(pool.state(), PoolState::Created);
        assert_eq!(pool.worker_count(), 0);
    }

    /// Test that every job is probed exactly once
    ///
    /// Uneven delays make workers finish out of order; the set of results
    /// must still match the range exactly.
    #[tokio::test]
    async fn test_pool_processes_every_job_once() {
        let mut transport = ScriptedTransport::new(ScriptedOutcome::status(200));
        for id in (1..=50).step_by(3) {
            transport = transport.with_delayed_outcome(
                format!("https://x/{}", id),
                ScriptedOutcome::status(404),
                Duration::from_millis(5),
            );
        }
        let transport = Arc::new(transport);

        let config = WorkerConfig {
            worker_count: 4,
            channel_capacity: Some(2),
        };
        let mut pool = WorkerPool::new(config, test_prober(transport.clone()));

        let (jobs, producer) = JobSource::new(IdRange::new(50, 50), 2).spawn();
        let (results_tx, mut results_rx) = mpsc::channel(2);

        pool.start(&jobs, &results_tx).unwrap();
        assert_eq!(pool.state(), PoolState::Running);
        assert_eq!(pool.worker_count(), 4);

        let collector = tokio::spawn(async move {
            let mut ids = Vec::new();
            while let Some(result) = results_rx.recv().await {
                ids.push(result.id);
            }
            ids
        });

        assert_eq!(producer.await.unwrap(), 50);
        let report = pool.wait().await;
        drop(results_tx);

        let ids = collector.await.unwrap();
        assert_eq!(ids.len(), 50);
        let unique: HashSet<i64> = ids.into_iter().collect();
        assert_eq!(unique.len(), 50);

        assert_eq!(report.total_probes(), 50);
        assert!(report.panicked_workers().is_empty());
        assert_eq!(transport.call_count(), 50);
    }

    /// Test pool cannot be started twice
    #[tokio::test]
    async fn test_pool_double_start_rejected() {
        let transport = Arc::new(ScriptedTransport::new(ScriptedOutcome::status(200)));
        let mut pool = WorkerPool::new(two_workers(), test_prober(transport));

        let (jobs, _producer) = JobSource::new(IdRange::new(1, 0), 1).spawn();
        let (results_tx, _results_rx) = mpsc::channel(1);

        pool.start(&jobs, &results_tx).unwrap();
        assert!(pool.start(&jobs, &results_tx).is_err());

        let report = pool.wait().await;
        assert_eq!(report.total_probes(), 0);
        assert_eq!(report.workers.len(), 2);
    }

    /// Test invalid configuration is refused at start
    #[tokio::test]
    async fn test_pool_rejects_zero_workers() {
        let transport = Arc::new(ScriptedTransport::new(ScriptedOutcome::status(200)));
        let config = WorkerConfig {
            worker_count: 0,
            channel_capacity: None,
        };
        let mut pool = WorkerPool::new(config, test_prober(transport));
        let (jobs, _producer) = JobSource::new(IdRange::new(1, 1), 1).spawn();
        let (results_tx, _results_rx) = mpsc::channel(1);

        assert!(pool.start(&jobs, &results_tx).is_err());
        assert_eq!(pool.state(), PoolState::Created);
    }
}
