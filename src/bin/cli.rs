//! rankwatch CLI
//!
//! Local entry point: one-off lookups, a console-backed watch loop, and
//! configuration validation.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use rankwatch::{
    config::{load_config, read_config},
    error::{AppError, Result},
    models::{Config, RecipientId},
    pipeline::MonitorService,
    services::ConsoleNotifier,
};

/// rankwatch - Admission ranking list watcher
#[derive(Parser, Debug)]
#[command(
    name = "rankwatch",
    version,
    about = "Watches a published admission ranking list"
)]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "data/config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Look up an applicant's position once
    Lookup {
        /// Applicant code as printed in the list
        code: String,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Watch the list and print notifications until interrupted
    Watch {
        /// Subscriptions as RECIPIENT=CODE (repeatable)
        #[arg(short, long = "subscribe", value_parser = parse_subscription, required = true)]
        subscriptions: Vec<(RecipientId, String)>,
    },

    /// Validate the configuration file
    Validate,
}

fn parse_subscription(raw: &str) -> std::result::Result<(RecipientId, String), String> {
    let (recipient, code) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected RECIPIENT=CODE, got {raw:?}"))?;
    let recipient = recipient
        .trim()
        .parse()
        .map_err(|e| format!("invalid recipient {recipient:?}: {e}"))?;
    let code = code.trim();
    if code.is_empty() {
        return Err(format!("empty code in {raw:?}"));
    }
    Ok((recipient, code.to_string()))
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool, default_level: &str) {
    let level = if verbose { "debug" } else { default_level };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Lookup { code, json } => {
            let config = load(&cli.config, cli.verbose)?;
            let service = MonitorService::from_config(&config, Arc::new(ConsoleNotifier))?;
            if json {
                let report = service.parse_position(&code).await?;
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("{}", service.lookup_reply(&code).await);
            }
        }

        Command::Watch { subscriptions } => {
            let config = load(&cli.config, cli.verbose)?;
            let service = MonitorService::from_config(&config, Arc::new(ConsoleNotifier))?;

            // Establish the baseline now instead of one interval later.
            service.check_for_updates().await;

            for (recipient, code) in &subscriptions {
                println!("{}", service.subscribe_reply(*recipient, code));
            }
            log::info!(
                "Watching {} for {} subscriber(s); press Ctrl-C to stop",
                config.source.url,
                subscriptions.len()
            );

            tokio::signal::ctrl_c().await?;
            service.stop_monitoring();

            let status = service.status();
            log::info!(
                "Stopped. Last publication: {}",
                status
                    .last_key
                    .map(|k| k.to_string())
                    .unwrap_or_else(|| "unknown".to_string())
            );
        }

        Command::Validate => {
            init_logging(cli.verbose, "info");
            validate(&cli.config)?;
        }
    }

    Ok(())
}

/// Load the validated configuration and initialize logging from it.
fn load(path: &Path, verbose: bool) -> Result<Config> {
    let config = match load_config(path) {
        Ok(config) => config,
        Err(e) => {
            init_logging(verbose, "info");
            log::error!("{}", e);
            return Err(e);
        }
    };
    init_logging(verbose, &config.logging.level);
    log::debug!("Loaded configuration from {}", path.display());
    Ok(config)
}

/// Check the configuration file as written, without falling back to defaults.
fn validate(path: &Path) -> Result<()> {
    log::info!("Validating configuration {}...", path.display());
    let config = read_config(path).inspect_err(|e| log::error!("Config load failed: {}", e))?;
    if let Err(e) = config.validate() {
        log::error!("Config validation failed: {}", e);
        return Err(AppError::config(e.to_string()));
    }
    log::info!("✓ Source: {}", config.source.url);
    log::info!(
        "✓ Interval: {}s, timeout: {}s, default seats: {}",
        config.monitor.interval_secs,
        config.http.timeout_secs,
        config.source.default_seats
    );
    log::info!("All validations passed!");
    Ok(())
}
