//! Core application logic for URL Radar
//!
//! This module contains the probe pipeline: the transport seam, result
//! classification, the job source, the worker pool, the result sink and the
//! coordinator that runs them in order.
//!
//! # Examples
//!
//! ```rust,no_run
//! use url_radar::app::{Coordinator, CoordinatorConfig};
//!
//! # async fn example() -> url_radar::Result<()> {
//! let config = CoordinatorConfig::default().with_range(31106, 100);
//! let result = Coordinator::with_http(config)?.run().await?;
//! println!("Found {} valid catalogs", result.stats.valid);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod coordinator;
pub mod models;
pub mod probe;
pub mod queue;
pub mod sink;
pub mod worker;

// Re-export main public API
pub use client::{
    ClientConfig, HttpTransport, ScriptedOutcome, ScriptedTransport, Transport, TransportResponse,
};
pub use coordinator::{Coordinator, CoordinatorConfig, OutputConfig, SessionResult};
pub use models::{build_url, ProbeResult, ProbeStatus};
pub use probe::{classify, ProbeTarget, Prober};
pub use queue::{IdRange, JobQueue, JobSource};
pub use sink::{RecordWriter, ResultLog, ResultSink, SinkConfig, SinkStats};
pub use worker::{PoolReport, WorkerConfig, WorkerPool};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_structure() {
        // Ensure public API is accessible
        let config = ClientConfig::default();
        assert!(config.tcp_nodelay);
        assert_eq!(ProbeStatus::Valid.as_str(), "valid");
    }
}
