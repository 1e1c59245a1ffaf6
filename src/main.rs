//! Met-Harvest main entry point
//!
//! This is the command-line interface for the Met-Harvest collection fetcher.

use anyhow::Context;
use clap::Parser;
use met_harvest::config::{load_config_with_hash, validate, Config, LogRotation};
use met_harvest::fetcher::Orchestrator;
use met_harvest::output::print_statistics;
use met_harvest::HarvestError;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Met-Harvest: a polite museum collection fetcher
///
/// Discovers the objects of a collection API, fetches their metadata in
/// rate-limited batches, enriches each record from its public detail page,
/// and writes the results to one JSON document.
#[derive(Parser, Debug)]
#[command(name = "met-harvest")]
#[command(version = "1.0.0")]
#[command(about = "A polite museum collection fetcher", long_about = None)]
struct Cli {
    /// Path to an optional TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Maximum simultaneous in-flight fetches
    #[arg(long, value_name = "N")]
    max_concurrent: Option<u32>,

    /// Number of objects per batch
    #[arg(long, value_name = "N")]
    batch_size: Option<usize>,

    /// Seconds to wait between batches
    #[arg(long, value_name = "SECS")]
    batch_delay: Option<u64>,

    /// Connect timeout in seconds
    #[arg(long, value_name = "SECS")]
    connect_timeout: Option<u64>,

    /// Total per-request timeout in seconds
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Department id filter for the listing call (repeatable)
    #[arg(long = "department", value_name = "ID")]
    departments: Vec<u32>,

    /// Path of the JSON results document
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Process only the first N discovered objects
    #[arg(long, value_name = "N")]
    limit: Option<usize>,

    /// Show the resolved configuration without fetching anything
    #[arg(long)]
    dry_run: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

impl Cli {
    /// Applies command-line overrides on top of the loaded configuration
    fn apply_overrides(&self, config: &mut Config) {
        if let Some(n) = self.max_concurrent {
            config.fetcher.max_concurrent_requests = n;
        }
        if let Some(n) = self.batch_size {
            config.fetcher.batch_size = n;
        }
        if let Some(secs) = self.batch_delay {
            config.fetcher.batch_delay_secs = secs;
        }
        if let Some(secs) = self.connect_timeout {
            config.http.connect_timeout_secs = secs;
        }
        if let Some(secs) = self.timeout {
            config.http.request_timeout_secs = secs;
        }
        if !self.departments.is_empty() {
            config.api.department_ids = self.departments.clone();
        }
        if let Some(path) = &self.output {
            config.output.results_path = path.display().to_string();
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let (config, config_hash) = match resolve_config(&cli) {
        Ok(resolved) => resolved,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            return ExitCode::from(e.exit_code() as u8);
        }
    };

    // Keep the guard alive so buffered log lines are flushed on exit
    let _log_guard = match setup_logging(cli.verbose, cli.quiet, &config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to set up logging: {:#}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Some(hash) = &config_hash {
        tracing::info!("Configuration loaded (hash: {})", hash);
    }

    if cli.dry_run {
        handle_dry_run(&config, cli.limit);
        return ExitCode::SUCCESS;
    }

    match handle_harvest(config, cli.limit).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Harvest failed: {}", e);
            ExitCode::from(e.exit_code() as u8)
        }
    }
}

/// Loads the config file (if any), applies overrides and validates the result
fn resolve_config(cli: &Cli) -> Result<(Config, Option<String>), HarvestError> {
    let (mut config, hash) = match &cli.config {
        Some(path) => {
            let (config, hash) = load_config_with_hash(path)?;
            (config, Some(hash))
        }
        None => (Config::default(), None),
    };

    cli.apply_overrides(&mut config);
    validate(&config)?;

    Ok((config, hash))
}

/// Sets up stdout and log file output based on verbosity level
fn setup_logging(verbose: u8, quiet: bool, config: &Config) -> anyhow::Result<WorkerGuard> {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("met_harvest=info,warn"),
            1 => EnvFilter::new("met_harvest=debug,info"),
            2 => EnvFilter::new("met_harvest=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    let log_path = Path::new(&config.output.log_path);
    let directory = log_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = log_path
        .file_name()
        .with_context(|| format!("log path '{}' has no file name", log_path.display()))?;

    std::fs::create_dir_all(directory)
        .with_context(|| format!("failed to create log directory '{}'", directory.display()))?;

    let appender = match config.output.log_rotation {
        LogRotation::Never => rolling::never(directory, file_name),
        LogRotation::Hourly => rolling::hourly(directory, file_name),
        LogRotation::Daily => rolling::daily(directory, file_name),
    };
    let (file_writer, guard) = tracing_appender::non_blocking(appender);

    let stdout_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false);

    let file_layer = fmt::layer()
        .with_writer(file_writer)
        .with_ansi(false)
        .with_target(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(stdout_layer)
        .with(file_layer)
        .try_init()
        .context("failed to install tracing subscriber")?;

    Ok(guard)
}

/// Handles the --dry-run mode: shows what would be fetched
fn handle_dry_run(config: &Config, limit: Option<usize>) {
    println!("=== Met-Harvest Dry Run ===\n");

    println!("API:");
    println!("  Base URL: {}", config.api.base_url);
    println!("  Departments: {:?}", config.api.department_ids);

    println!("\nFetcher:");
    println!(
        "  Max concurrent requests: {}",
        config.fetcher.max_concurrent_requests
    );
    println!("  Batch size: {}", config.fetcher.batch_size);
    println!("  Delay between batches: {}s", config.fetcher.batch_delay_secs);
    if let Some(limit) = limit {
        println!("  Object limit: {}", limit);
    }

    println!("\nHTTP:");
    println!("  Connect timeout: {}s", config.http.connect_timeout_secs);
    println!("  Request timeout: {}s", config.http.request_timeout_secs);
    println!("  Max idle connections: {}", config.http.max_idle_connections);
    println!("  HTTP/2: {}", config.http.http2);
    println!("  User agent: {}", config.user_agent.header_value());

    println!("\nOutput:");
    println!("  Results: {}", config.output.results_path);
    println!(
        "  Log: {} (rotation: {:?})",
        config.output.log_path, config.output.log_rotation
    );

    println!("\n✓ Configuration is valid");
}

/// Handles the main harvest operation
async fn handle_harvest(config: Config, limit: Option<usize>) -> Result<(), HarvestError> {
    tracing::info!("Starting harvest from {}", config.api.base_url);

    let summary = Orchestrator::new(config).with_limit(limit).run().await?;

    print_statistics(&summary.stats);
    println!();
    println!("Fetched {} objects", summary.fetched());

    Ok(())
}
