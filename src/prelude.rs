//! Prelude module for URL Radar
//!
//! Re-exports the items needed to drive a probe run from library code with a
//! single `use url_radar::prelude::*;` statement.
//!
//! # Usage
//!
//! ```rust,no_run
//! use url_radar::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = CoordinatorConfig::default()
//!         .with_range(31106, 100)
//!         .with_worker_count(8);
//!     let result = Coordinator::with_http(config)?.run().await?;
//!     println!("{}", result.summary());
//!     Ok(())
//! }
//! ```

// Core result types
pub use crate::errors::{AppError, Result};

// Pipeline components
pub use crate::app::{
    classify, ClientConfig, Coordinator, CoordinatorConfig, HttpTransport, IdRange, ProbeResult,
    ProbeStatus, ProbeTarget, Prober, ScriptedOutcome, ScriptedTransport, SessionResult,
    SinkStats, Transport, TransportResponse, WorkerConfig,
};

// Configuration file
pub use crate::config::AppConfig;

// Commonly used constants
pub use crate::constants::{DEFAULT_WORKER_COUNT, REPORT_EVERY, USER_AGENT};

pub use std::path::{Path, PathBuf};
pub use std::sync::Arc;

pub use tokio;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prelude_imports() {
        let _client_config = ClientConfig::default();
        let _worker_config = WorkerConfig::default();
        let coordinator_config = CoordinatorConfig::default();

        assert_eq!(
            coordinator_config.workers.worker_count,
            DEFAULT_WORKER_COUNT
        );
        assert_eq!(
            AppConfig::default().to_coordinator_config(),
            coordinator_config
        );
    }

    #[tokio::test]
    async fn test_prelude_integration_pattern() {
        use tempfile::TempDir;

        let dir = TempDir::new().unwrap();
        let config = CoordinatorConfig::default()
            .with_target(ProbeTarget::new("https://x/", "https://x/"))
            .with_range(5, 5)
            .with_outputs(dir.path().join("valid.csv"), dir.path().join("log.txt"))
            .with_console_output(false);

        let transport: Arc<dyn Transport> = Arc::new(ScriptedTransport::always_homepage("https://x/"));
        let result = Coordinator::new(config, transport).run().await.unwrap();

        assert_eq!(result.stats.processed, 5);
        assert_eq!(result.stats.redirected, 5);
        assert_eq!(result.stats.valid, 0);
    }
}
