//! URL Radar CLI application
//!
//! Command-line interface for probing a range of catalog IDs and recording
//! which ones resolve to a real page.

use std::process;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::{fmt, EnvFilter};

use url_radar::cli::{handle_config, handle_run, Cli, Commands};

#[tokio::main]
async fn main() {
    // Initialize program
    let result = run().await;

    // Handle any errors that occurred
    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

/// Main application logic
async fn run() -> anyhow::Result<()> {
    // Load environment variables from .env file if it exists
    dotenv::dotenv().ok();

    let cli = Cli::parse_args();
    init_logging(&cli)?;

    info!("URL Radar v{} starting", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Run(args) => {
            info!("Executing run command");
            handle_run(args, &cli.global)
                .await
                .context("probe run failed")
        }
        Commands::Config(args) => {
            info!("Executing config command");
            handle_config(args, &cli.global)
                .await
                .context("config command failed")
        }
    }
}

/// Initialize logging based on CLI verbosity settings
fn init_logging(cli: &Cli) -> anyhow::Result<()> {
    let log_level = cli.log_level();

    let directive: Directive = format!("url_radar={}", log_level)
        .parse()
        .context("invalid log directive")?;
    let filter = EnvFilter::from_default_env().add_directive(directive);

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(cli.global.very_verbose) // Show levels only in very verbose mode
        .with_writer(std::io::stderr)
        .init();

    if cli.global.very_verbose {
        info!("Very verbose logging enabled");
    } else if cli.global.verbose {
        info!("Verbose logging enabled");
    }
    Ok(())
}
