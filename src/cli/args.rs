//! Command-line argument parsing for URL Radar
//!
//! This module defines the CLI structure using clap derive macros. Every
//! `run` flag is an optional override on top of the configuration file.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};

use crate::config::AppConfig;

/// URL Radar - find live catalog pages in an ID range
#[derive(Parser, Debug)]
#[command(
    name = "url_radar",
    version,
    about = "Probe a descending range of catalog IDs and record which ones exist",
    long_about = "Probes <base-url><id> for a range of IDs with a pool of concurrent workers.
Every result is written to an audit log; valid pages are collected in a CSV."
)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all subcommands
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Very verbose logging (debug level)
    #[arg(long, global = true)]
    pub very_verbose: bool,

    /// Quiet mode - suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Configuration file path
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Probe the configured ID range
    Run(RunArgs),

    /// Show or create the configuration file
    Config(ConfigArgs),
}

/// Arguments for the run command
#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// URL prefix each ID is appended to
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,

    /// Homepage URL that marks a missing ID
    #[arg(long, value_name = "URL")]
    pub homepage: Option<String>,

    /// Highest ID to probe
    #[arg(long, allow_negative_numbers = true)]
    pub start_id: Option<i64>,

    /// Number of IDs to probe, descending from the start ID
    #[arg(long)]
    pub count: Option<u64>,

    /// Number of concurrent probe workers
    #[arg(short = 'w', long)]
    pub workers: Option<usize>,

    /// CSV file receiving valid results
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Audit log receiving every result
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Per-request timeout (e.g. "10s", "1m")
    #[arg(long, value_parser = humantime_serde::re::humantime::parse_duration)]
    pub timeout: Option<Duration>,

    /// Capacity of the job and result channels
    #[arg(long)]
    pub channel_capacity: Option<usize>,

    /// Print a progress line every N results (0 disables)
    #[arg(long, value_name = "N")]
    pub report_every: Option<u64>,

    /// Show a progress bar
    #[arg(long)]
    pub progress_bar: bool,

    /// Print the session result as JSON when done
    #[arg(long)]
    pub json: bool,

    /// Run the pipeline without network, every ID redirecting to the homepage
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for configuration management
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Configuration management actions
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Print the effective configuration as TOML
    Show,

    /// Write the default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,

        /// Destination (defaults to url_radar.toml)
        #[arg(value_name = "PATH")]
        path: Option<PathBuf>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the logging level based on global arguments
    pub fn log_level(&self) -> tracing::Level {
        if self.global.quiet {
            tracing::Level::ERROR
        } else if self.global.very_verbose {
            tracing::Level::DEBUG
        } else if self.global.verbose {
            tracing::Level::INFO
        } else {
            tracing::Level::WARN
        }
    }
}

impl RunArgs {
    /// Reject overrides that can never produce a valid run
    pub fn validate(&self) -> Result<(), String> {
        if self.workers == Some(0) {
            return Err("Worker count must be greater than 0".to_string());
        }
        if self.channel_capacity == Some(0) {
            return Err("Channel capacity must be greater than 0".to_string());
        }
        if self.timeout.is_some_and(|t| t.is_zero()) {
            return Err("Timeout must be greater than 0".to_string());
        }
        Ok(())
    }

    /// Apply the overrides given on the command line
    pub fn apply_to(&self, config: &mut AppConfig) {
        if let Some(base_url) = &self.base_url {
            config.target.base_url = base_url.clone();
        }
        if let Some(homepage) = &self.homepage {
            config.target.homepage_url = homepage.clone();
        }
        if let Some(start_id) = self.start_id {
            config.target.start_id = start_id;
        }
        if let Some(count) = self.count {
            config.target.count = count;
        }
        if let Some(workers) = self.workers {
            config.workers.worker_count = workers;
        }
        if let Some(output) = &self.output {
            config.output.results_file = output.clone();
        }
        if let Some(log_file) = &self.log_file {
            config.output.log_file = log_file.clone();
        }
        if let Some(timeout) = self.timeout {
            config.client.request_timeout = timeout;
        }
        if let Some(capacity) = self.channel_capacity {
            config.workers.channel_capacity = Some(capacity);
        }
        if let Some(report_every) = self.report_every {
            config.progress.report_every = report_every;
        }
        if self.progress_bar {
            config.progress.progress_bar = true;
        }
    }
}
