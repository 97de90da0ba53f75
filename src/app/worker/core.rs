//! Core probe worker implementation
//!
//! A worker pulls IDs from the shared job queue until it is closed and empty,
//! probes each one and forwards the result to the sink. Probe failures are
//! values, not errors, so the loop has no failure path of its own. A panic
//! inside a single probe is caught and recorded as an error result for that
//! ID; the worker then moves on to its next job.

use std::any::Any;
use std::panic::AssertUnwindSafe;

use futures::FutureExt;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::app::models::ProbeResult;
use crate::app::probe::Prober;
use crate::app::queue::JobQueue;

/// Individual probe worker
#[derive(Debug)]
pub struct ProbeWorker {
    /// Worker identifier, for logs
    id: usize,
    /// Shared prober
    prober: Prober,
    /// Shared job queue
    jobs: JobQueue,
    /// Results channel to the sink
    results_tx: mpsc::Sender<ProbeResult>,
}

impl ProbeWorker {
    /// Create a new probe worker
    pub fn new(
        id: usize,
        prober: Prober,
        jobs: JobQueue,
        results_tx: mpsc::Sender<ProbeResult>,
    ) -> Self {
        Self {
            id,
            prober,
            jobs,
            results_tx,
        }
    }

    /// Run until the job queue is exhausted; returns the number of probes made
    pub async fn run(self) -> u64 {
        debug!("Worker {} starting", self.id);
        let mut probes = 0u64;

        while let Some(id) = self.jobs.next_job().await {
            let result = self.check_id(id).await;
            probes += 1;

            // Waits when the sink falls behind
            if self.results_tx.send(result).await.is_err() {
                warn!(
                    "Worker {} found the results channel closed; dropping result for ID {}",
                    self.id, id
                );
                break;
            }
        }

        debug!("Worker {} finished after {} probes", self.id, probes);
        probes
    }

    /// Probe `id`, turning a panic into an error result
    async fn check_id(&self, id: i64) -> ProbeResult {
        match AssertUnwindSafe(self.prober.probe(id)).catch_unwind().await {
            Ok(result) => result,
            Err(panic) => {
                let reason = panic_message(panic.as_ref());
                warn!("Worker {} caught a panic on ID {}: {}", self.id, id, reason);
                ProbeResult::transport_failure(
                    id,
                    self.prober.target().url_for(id),
                    format!("request panicked: {}", reason),
                )
            }
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
