//! Gleaner main entry point
//!
//! Command-line interface for the paginated listing harvester.

use clap::Parser;
use gleaner::config::{load_config_with_hash, Config};
use gleaner::crawler::crawl;
use gleaner::output::write_artifact;
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Gleaner: a paginated listing harvester
///
/// Crawls a paginated listing of records, enriches each record from its
/// detail page, downloads linked attachments, and writes the aggregate to a
/// single artifact. Everything site-specific comes from the config file.
#[derive(Parser, Debug)]
#[command(name = "gleaner")]
#[command(version = "1.0.0")]
#[command(about = "A paginated listing harvester", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without fetching anything
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // One log file per run, alongside console output
    let run_id = chrono::Utc::now().format("%Y%m%dT%H%M%SZ").to_string();
    setup_logging(cli.verbose, cli.quiet, &run_id)?;

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let config = match load_config_with_hash(&cli.config) {
        Ok((config, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    // Crawl and output failures are logged, never turned into a non-zero
    // exit; the run is complete once pagination reaches a terminal state.
    if let Err(e) = handle_crawl(config).await {
        tracing::error!("Run failed: {}", e);
    }

    Ok(())
}

/// Sets up run-scoped logging: console plus an append-only per-run log file
fn setup_logging(verbose: u8, quiet: bool, run_id: &str) -> std::io::Result<()> {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("gleaner=info,warn"),
            1 => EnvFilter::new("gleaner=debug,info"),
            2 => EnvFilter::new("gleaner=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    std::fs::create_dir_all("logs")?;
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(format!("logs/{}.log", run_id))?;

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_file(false),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(std::sync::Arc::new(log_file)),
        )
        .init();

    Ok(())
}

/// Handles the --dry-run mode: validates config and shows what would be crawled
fn handle_dry_run(config: &Config) {
    println!("=== Gleaner Dry Run ===\n");

    println!("Listing:");
    println!("  URL: {}", config.listing.url);
    println!(
        "  Pagination: {}={} onward",
        config.listing.page_param, config.listing.start_page
    );
    println!("  Results container: {}", config.listing.results_selector);

    println!("\nSchema ({} columns):", config.schema.columns.len());
    for (index, column) in config.schema.columns.iter().enumerate() {
        let mut notes = Vec::new();
        if index == config.schema.key_column {
            notes.push("key");
        }
        if index == config.schema.link_column {
            notes.push("link");
        }
        if notes.is_empty() {
            println!("  {}. {}", index, column);
        } else {
            println!("  {}. {} ({})", index, column, notes.join(", "));
        }
    }

    println!("\nDetail section:");
    println!("  Section: {}", config.detail.section);
    println!("  Sentinel: {}", config.detail.sentinel);

    println!("\nAttachments:");
    println!("  Link selector: {}", config.attachments.link_selector);
    println!("  Download endpoint: {}", config.attachments.download_url);

    println!("\nOutput:");
    println!(
        "  Artifact: {}/{} ({:?})",
        config.output.folder, config.output.file_name, config.output.format
    );

    println!("\n✓ Configuration is valid");
}

/// Runs the crawl and writes the aggregate artifact
async fn handle_crawl(config: Config) -> gleaner::Result<()> {
    let report = crawl(config.clone()).await?;

    if !report.end.is_clean() {
        tracing::warn!("crawl stopped early: {}", report.end);
    }

    let path = write_artifact(&config.output, &report.accumulated)?;
    tracing::info!(
        "Run complete: {} records across {} pages, {} attachments, artifact at {}",
        report.accumulated.len(),
        report.pages_fetched,
        report.attachments_saved,
        path.display()
    );

    Ok(())
}
