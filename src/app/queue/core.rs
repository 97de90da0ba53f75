//! Job source and shared job queue
//!
//! The job source submits every ID of an [`IdRange`] onto a bounded channel
//! and then drops its sender. Closing the channel is the only completion
//! signal. Workers share the receiving half through [`JobQueue`].

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::constants::workers;

/// Descending, dense range of IDs: `start_id, start_id - 1, ...`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdRange {
    /// Highest ID, submitted first
    pub start_id: i64,
    /// Number of IDs in the range
    pub count: u64,
}

impl IdRange {
    /// Create a range of `count` IDs ending at `start_id`
    pub fn new(start_id: i64, count: u64) -> Self {
        Self { start_id, count }
    }

    /// Lowest ID in the range, or `None` if the range is empty or underflows
    pub fn lowest(&self) -> Option<i64> {
        if self.count == 0 {
            return None;
        }
        let span = i64::try_from(self.count - 1).ok()?;
        self.start_id.checked_sub(span)
    }

    /// Whether every ID in the range is representable
    pub fn is_representable(&self) -> bool {
        self.count == 0 || self.lowest().is_some()
    }

    /// IDs in submission order
    pub fn ids(&self) -> impl Iterator<Item = i64> {
        let start = self.start_id;
        let count = if self.is_representable() { self.count } else { 0 };
        (0..count).map(move |offset| start - offset as i64)
    }
}

/// Multi-consumer handle on the job channel
#[derive(Debug, Clone)]
pub struct JobQueue {
    receiver: Arc<Mutex<mpsc::Receiver<i64>>>,
}

impl JobQueue {
    /// Wrap the receiving half of a job channel
    pub fn new(receiver: mpsc::Receiver<i64>) -> Self {
        Self {
            receiver: Arc::new(Mutex::new(receiver)),
        }
    }

    /// Next ID to probe
    ///
    /// Waits while the channel is empty; returns `None` once the channel is
    /// closed and drained.
    pub async fn next_job(&self) -> Option<i64> {
        let mut receiver = self.receiver.lock().await;
        receiver.recv().await
    }
}

/// Producer of the ID stream
#[derive(Debug)]
pub struct JobSource {
    range: IdRange,
    capacity: usize,
}

impl JobSource {
    /// Create a source for `range` using a channel of `capacity` slots
    pub fn new(range: IdRange, capacity: usize) -> Self {
        Self {
            range,
            capacity: capacity.clamp(
                workers::MIN_CHANNEL_CAPACITY,
                workers::MAX_CHANNEL_CAPACITY,
            ),
        }
    }

    /// Channel capacity actually used (never zero, never above the maximum)
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Spawn the producer task
    ///
    /// Returns the shared queue for workers and a handle resolving to the
    /// number of IDs submitted. The channel closes when the task ends.
    pub fn spawn(self) -> (JobQueue, JoinHandle<u64>) {
        let (job_tx, job_rx) = mpsc::channel(self.capacity);
        let range = self.range;

        let handle = tokio::spawn(async move {
            info!(
                "Submitting {} IDs starting at {}",
                range.count, range.start_id
            );
            let mut submitted = 0u64;
            for id in range.ids() {
                if job_tx.send(id).await.is_err() {
                    debug!("Job channel closed by consumers after {} IDs", submitted);
                    break;
                }
                submitted += 1;
            }
            debug!("Job source exhausted after {} IDs, closing", submitted);
            submitted
        });

        (JobQueue::new(job_rx), handle)
    }
}
