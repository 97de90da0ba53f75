//! Command handlers for URL Radar CLI
//!
//! This module implements the command handlers that turn CLI arguments and
//! the configuration file into a coordinator run.

use std::sync::Arc;

use tracing::{info, warn};

use crate::app::{Coordinator, CoordinatorConfig, ScriptedTransport, SessionResult};
use crate::cli::{ConfigAction, ConfigArgs, GlobalArgs, RunArgs};
use crate::config::AppConfig;
use crate::errors::{ConfigError, Result};

/// Handle the run command
///
/// Loads the configuration, applies the command-line overrides and runs the
/// probe pipeline to completion.
pub async fn handle_run(args: RunArgs, global: &GlobalArgs) -> Result<()> {
    args.validate()
        .map_err(|e| ConfigError::ValidationFailed { errors: vec![e] })?;

    let mut app_config = AppConfig::load(global.config.clone()).await?;
    args.apply_to(&mut app_config);

    let console = !global.quiet && !args.json;
    let config = app_config.to_coordinator_config().with_console_output(console);

    let coordinator = if args.dry_run {
        info!("Dry run: every ID answers with the homepage redirect");
        let transport = ScriptedTransport::always_homepage(config.target.homepage_url.clone());
        Coordinator::new(config, Arc::new(transport))
    } else {
        Coordinator::with_http(config)?
    };

    if console {
        print_startup(coordinator.config(), args.dry_run);
    }

    let result = coordinator.run().await?;
    report_result(&result, &args, global)?;
    Ok(())
}

/// Print the run parameters before probing starts
fn print_startup(config: &CoordinatorConfig, dry_run: bool) {
    println!(
        "Starting to check {} URLs from ID {}",
        config.range.count, config.range.start_id
    );
    println!("Using {} parallel workers", config.workers.worker_count);
    println!(
        "Valid catalogs will be saved to: {}",
        config.output.results_path.display()
    );
    println!("Logs will be saved to: {}", config.output.log_path.display());
    if dry_run {
        println!("Dry run: no network requests will be made");
    }
    println!();
}

/// Print the outcome of a finished run
fn report_result(result: &SessionResult, args: &RunArgs, global: &GlobalArgs) -> Result<()> {
    if result.has_errors() {
        for error in &result.errors {
            warn!("{}", error);
        }
        eprintln!("{}", result.summary());
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(result)?);
    } else if !global.quiet {
        println!(
            "Check complete! Results saved to {}",
            result.results_path.display()
        );
    }

    info!("{}", result.summary());
    Ok(())
}

/// Handle the config command
pub async fn handle_config(args: ConfigArgs, global: &GlobalArgs) -> Result<()> {
    match args.action {
        ConfigAction::Show => {
            let config = AppConfig::load(global.config.clone()).await?;
            print!("{}", config.to_toml()?);
        }
        ConfigAction::Init { force, path } => {
            let path = path.unwrap_or_else(AppConfig::default_config_path);
            if path.exists() && !force {
                return Err(ConfigError::InvalidValue {
                    field: "path".to_string(),
                    value: path.display().to_string(),
                    reason: "File already exists; use --force to overwrite".to_string(),
                }
                .into());
            }

            AppConfig::default().save(&path).await?;
            if !global.quiet {
                println!("Created configuration file: {}", path.display());
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AppError;
    use tempfile::TempDir;

    fn quiet() -> GlobalArgs {
        GlobalArgs {
            quiet: true,
            ..Default::default()
        }
    }

    /// Test a dry run writes outputs without touching the network
    #[tokio::test]
    async fn test_dry_run_writes_outputs() {
        let dir = TempDir::new().unwrap();
        let args = RunArgs {
            start_id: Some(50),
            count: Some(10),
            workers: Some(3),
            output: Some(dir.path().join("valid.csv")),
            log_file: Some(dir.path().join("log.txt")),
            dry_run: true,
            ..Default::default()
        };

        // Explicit config path keeps a stray url_radar.toml in the cwd out of the test
        let config_path = dir.path().join("url_radar.toml");
        AppConfig::default().save(&config_path).await.unwrap();
        let global = GlobalArgs {
            config: Some(config_path),
            ..quiet()
        };

        handle_run(args, &global).await.unwrap();

        let csv = std::fs::read_to_string(dir.path().join("valid.csv")).unwrap();
        assert_eq!(csv.lines().count(), 1);

        let log = std::fs::read_to_string(dir.path().join("log.txt")).unwrap();
        assert_eq!(
            log.lines()
                .filter(|l| l.contains("HTTP redirected to homepage"))
                .count(),
            10
        );
    }

    /// Test a dry run with console output prints the startup banner and runs
    #[tokio::test]
    async fn test_dry_run_with_console_output() {
        let dir = TempDir::new().unwrap();
        let args = RunArgs {
            start_id: Some(5),
            count: Some(2),
            workers: Some(1),
            output: Some(dir.path().join("valid.csv")),
            log_file: Some(dir.path().join("log.txt")),
            dry_run: true,
            ..Default::default()
        };

        let config_path = dir.path().join("url_radar.toml");
        AppConfig::default().save(&config_path).await.unwrap();
        let global = GlobalArgs {
            config: Some(config_path),
            ..Default::default()
        };

        handle_run(args, &global).await.unwrap();

        let log = std::fs::read_to_string(dir.path().join("log.txt")).unwrap();
        assert!(log.contains("ID 5: HTTP redirected to homepage"));
        assert!(log.contains("ID 4: HTTP redirected to homepage"));
    }

    /// Test invalid overrides are rejected before anything runs
    #[tokio::test]
    async fn test_run_rejects_zero_workers() {
        let args = RunArgs {
            workers: Some(0),
            ..Default::default()
        };
        let result = handle_run(args, &quiet()).await;
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    /// Test config init refuses to overwrite without --force
    #[tokio::test]
    async fn test_config_init_respects_force() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("radar.toml");

        let init = |force| ConfigArgs {
            action: ConfigAction::Init {
                force,
                path: Some(path.clone()),
            },
        };

        handle_config(init(false), &quiet()).await.unwrap();
        assert!(path.exists());

        assert!(handle_config(init(false), &quiet()).await.is_err());
        assert!(handle_config(init(true), &quiet()).await.is_ok());

        let loaded = AppConfig::load(Some(path.clone())).await.unwrap();
        assert_eq!(loaded, AppConfig::default());
    }
}
