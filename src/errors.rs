//! Error types for URL Radar
//!
//! Per-ID failures never leave the probe: they are folded into the
//! [`ProbeResult`](crate::app::models::ProbeResult) as text. The types in this
//! module cover the failures that do propagate: bad configuration, output
//! files that cannot be created, an HTTP client that cannot be built, and
//! pipeline tasks that died.

use std::path::PathBuf;
use thiserror::Error;

/// Transport-level failure of a single probe
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// Request exceeded the configured timeout
    #[error("request timed out: {0}")]
    Timeout(String),

    /// Connection could not be established (DNS, refused, TLS)
    #[error("{0}")]
    Connect(String),

    /// Redirect loop or redirect limit exceeded
    #[error("too many redirects: {0}")]
    Redirect(String),

    /// Request could not be built or failed for another reason
    #[error("{0}")]
    Request(String),
}

impl TransportError {
    /// Classify a reqwest error, keeping the full source chain in the message
    pub fn from_reqwest(error: &reqwest::Error) -> Self {
        let message = error_chain(error);
        if error.is_timeout() {
            TransportError::Timeout(message)
        } else if error.is_redirect() {
            TransportError::Redirect(message)
        } else if error.is_connect() {
            TransportError::Connect(message)
        } else {
            TransportError::Request(message)
        }
    }
}

/// Join an error and all of its sources into one line
pub fn error_chain(error: &(dyn std::error::Error + 'static)) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}

/// Output file errors (fatal before probing starts)
#[derive(Error, Debug)]
pub enum OutputError {
    /// Output file could not be created
    #[error("Failed to create output file {path}: {source}")]
    Create {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// CSV serialization failed
    #[error("CSV write failed")]
    Csv(#[from] csv::Error),

    /// Generic I/O failure on an output file
    #[error("Output I/O error")]
    Io(#[from] std::io::Error),

    /// A lock guarding an output was poisoned by a panicking writer
    #[error("Output lock poisoned: {resource}")]
    LockPoisoned { resource: &'static str },
}

/// HTTP client construction errors
#[derive(Error, Debug)]
pub enum ClientError {
    /// reqwest refused the client configuration
    #[error("Failed to build HTTP client")]
    Build(#[from] reqwest::Error),
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    NotFound { path: PathBuf },

    /// Configuration file could not be read or written
    #[error("Configuration file I/O error for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid configuration format
    #[error("Invalid configuration format")]
    InvalidFormat(#[from] toml::de::Error),

    /// Configuration could not be rendered as TOML
    #[error("Failed to serialize configuration")]
    Serialize(#[from] toml::ser::Error),

    /// Invalid configuration value
    #[error("Invalid configuration value for {field}: {value}. {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    /// Configuration validation failed
    #[error("Configuration validation failed: {errors:?}")]
    ValidationFailed { errors: Vec<String> },
}

/// Failures of the pipeline tasks themselves
#[derive(Error, Debug)]
pub enum PipelineError {
    /// A probe worker panicked
    #[error("Worker {worker_id} panicked or terminated unexpectedly")]
    WorkerPanic { worker_id: usize },

    /// The result sink panicked; counters are lost
    #[error("Result sink terminated unexpectedly: {reason}")]
    SinkPanic { reason: String },

    /// The job producer panicked before closing the job stream
    #[error("Job producer terminated unexpectedly: {reason}")]
    ProducerPanic { reason: String },
}

/// Top-level application error that can represent any error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Output error
    #[error(transparent)]
    Output(#[from] OutputError),

    /// HTTP client error
    #[error(transparent)]
    Client(#[from] ClientError),

    /// Configuration error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Pipeline error
    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    /// Generic I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON rendering error
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl AppError {
    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            AppError::Output(_) => "output",
            AppError::Client(_) => "client",
            AppError::Config(_) => "config",
            AppError::Pipeline(_) => "pipeline",
            AppError::Io(_) => "io",
            AppError::Json(_) => "json",
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, AppError>;

/// Output result type alias
pub type OutputResult<T> = std::result::Result<T, OutputError>;

/// Configuration result type alias
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Transport result type alias
pub type TransportResult<T> = std::result::Result<T, TransportError>;
