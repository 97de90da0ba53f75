//! Probe worker system for concurrent ID checks
//!
//! A fixed number of identical workers consume the shared job queue, probe
//! each ID and push the result onto the results channel. Pushing waits when
//! the sink is slower than the workers, which gives natural backpressure.
//!
//! # Module Organization
//!
//! - [`config`] - Worker count and channel sizing with validation
//! - [`core`] - Individual worker loop
//! - [`pool`] - Spawning workers and waiting for all of them
//!
//! # Basic Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use tokio::sync::mpsc;
//! use url_radar::app::client::ScriptedTransport;
//! use url_radar::app::probe::{Prober, ProbeTarget};
//! use url_radar::app::queue::{IdRange, JobSource};
//! use url_radar::app::worker::{WorkerConfig, WorkerPool};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let transport = Arc::new(ScriptedTransport::always_homepage("https://x/"));
//! let prober = Prober::new(transport, ProbeTarget::new("https://x/", "https://x/"));
//!
//! let (jobs, _producer) = JobSource::new(IdRange::new(100, 10), 10).spawn();
//! let (results_tx, mut results_rx) = mpsc::channel(10);
//!
//! let config = WorkerConfig {
//!     worker_count: 2,
//!     channel_capacity: Some(4),
//! };
//! let mut pool = WorkerPool::new(config, prober);
//! pool.start(&jobs, &results_tx)?;
//!
//! let report = pool.wait().await;
//! drop(results_tx);
//! while let Some(result) = results_rx.recv().await {
//!     println!("{}", result.log_message());
//! }
//! println!("{} probes", report.total_probes());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod core;
pub mod pool;

// Re-export main public API
pub use self::core::ProbeWorker;
pub use config::WorkerConfig;
pub use pool::{PoolReport, PoolState, WorkerPool, WorkerReport};
