//! URL Radar Library
//!
//! Probes a descending range of numeric IDs against a URL template with a
//! pool of concurrent workers. Each response is classified as a valid page,
//! a redirect to the site homepage, or an error. Every result is appended to
//! an audit log and valid results are collected in a CSV file.

pub mod app;
pub mod cli;
pub mod config;
pub mod constants;
pub mod errors;
pub mod prelude;

// Re-export commonly used types for convenience
pub use errors::{AppError, Result};
