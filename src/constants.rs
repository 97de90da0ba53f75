//! Application constants for URL Radar
//!
//! This module centralizes the defaults used throughout the application,
//! organized by functional domain. Everything here can be overridden through
//! the configuration file or the command line.

use std::time::Duration;

/// Probe target defaults
pub mod target {
    /// URL prefix every probed ID is appended to
    pub const BASE_URL: &str = "https://katalozi-bg.info/catalogs/promo-katalog-BulMag/";

    /// Site homepage; landing here after redirects means the ID does not exist
    pub const HOMEPAGE_URL: &str = "https://katalozi-bg.info/";

    /// Highest ID probed (the range descends from here)
    pub const START_ID: i64 = 31106;

    /// Number of IDs to probe
    pub const COUNT: u64 = 15_000;
}

/// HTTP client configuration constants
pub mod http {
    use super::Duration;

    /// User agent sent with every probe
    pub const USER_AGENT: &str = "Mozilla/5.0 (compatible; catalog-checker/1.0)";

    /// Overall per-request timeout, redirects and body included
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

    /// Connection establishment timeout
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Connection pool idle timeout
    pub const POOL_IDLE_TIMEOUT: Duration = Duration::from_secs(90);

    /// Maximum idle connections kept per host
    pub const POOL_MAX_PER_HOST: usize = 32;

    /// Redirect hops followed before the transport gives up (reqwest default)
    pub const MAX_REDIRECTS: usize = 10;
}

/// Worker and channel configuration
pub mod workers {
    /// Default number of probe workers
    pub const DEFAULT_WORKER_COUNT: usize = 20;

    /// Upper bound accepted by config validation
    pub const MAX_WORKER_COUNT: usize = 512;

    /// Smallest usable channel capacity (tokio rejects zero)
    pub const MIN_CHANNEL_CAPACITY: usize = 1;

    /// Largest channel capacity; unset capacities derived from the run size
    /// are clamped to this (tokio panics above `usize::MAX >> 3`)
    pub const MAX_CHANNEL_CAPACITY: usize = 1 << 20;
}

/// Output file defaults
pub mod output {
    /// CSV file receiving valid hits
    pub const RESULTS_FILE: &str = "valid_catalogs.csv";

    /// Append-only audit log
    pub const LOG_FILE: &str = "curl_log.txt";

    /// CSV header row
    pub const CSV_HEADER: [&str; 5] = ["catalog_id", "url", "status", "final_url", "http_code"];

    /// Timestamp format used in the audit log
    pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
}

/// Progress reporting
pub mod progress {
    /// Emit a progress line every this many processed results
    pub const REPORT_EVERY: u64 = 1000;

    /// indicatif template for the optional progress bar
    pub const BAR_TEMPLATE: &str =
        "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} (ETA: {eta}) {per_sec:.0}";
}

/// Configuration file handling
pub mod config {
    /// Config file picked up from the working directory when present
    pub const DEFAULT_CONFIG_FILE: &str = "url_radar.toml";
}

// Re-export commonly used constants for convenience
pub use http::{REQUEST_TIMEOUT, USER_AGENT};
pub use progress::REPORT_EVERY;
pub use workers::DEFAULT_WORKER_COUNT;
