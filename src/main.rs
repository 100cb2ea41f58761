//! Koi-Skimmer main entry point
//!
//! This is the command-line interface for the Koi-Skimmer listing crawler.

use anyhow::Context;
use clap::Parser;
use koi_skimmer::config::{load_config_with_hash, validate};
use koi_skimmer::crawler::crawl;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Exit code reserved for configuration errors that prevent the run from
/// starting at all
const EXIT_CONFIG_ERROR: i32 = 2;

/// Koi-Skimmer: a bounded listing-page skimmer
///
/// Koi-Skimmer fetches rendered listing pages, extracts structured records
/// from each entry, and follows "next page" links up to a configured page
/// budget. Individual blocked or failed pages never abort the run.
#[derive(Parser, Debug)]
#[command(name = "koi-skimmer")]
#[command(version = "1.0.0")]
#[command(about = "A bounded listing-page skimmer", long_about = None)]
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

    /// Override the configured page budget for this run
    #[arg(long, value_name = "N")]
    max_pages: Option<u32>,

    /// Replace the configured seed URLs (repeatable)
    #[arg(long, value_name = "URL")]
    seed: Vec<String>,

    /// Validate config and show what would be crawled without fetching
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration; any problem here is fatal before
    // a single worker starts
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (mut config, config_hash) = match load_config_with_hash(&cli.config) {
        Ok((cfg, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            (cfg, hash)
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            std::process::exit(EXIT_CONFIG_ERROR);
        }
    };

    // Apply command-line overrides, then re-validate the merged result
    if let Some(max_pages) = cli.max_pages {
        config.crawler.max_pages = max_pages;
    }
    if !cli.seed.is_empty() {
        config.seeds = cli.seed.clone();
    }
    if let Err(e) = validate(&config) {
        tracing::error!("Invalid configuration after overrides: {}", e);
        std::process::exit(EXIT_CONFIG_ERROR);
    }

    if cli.dry_run {
        handle_dry_run(&config, &config_hash);
        return Ok(());
    }

    // A run that drains the frontier succeeds even when individual pages
    // failed or were skipped; the summary carries their counts
    let summary = crawl(config).await.context("crawl run failed")?;

    if summary.pages_failed > 0 || summary.pages_blocked > 0 {
        tracing::warn!(
            "Run finished with {} failed and {} blocked pages",
            summary.pages_failed,
            summary.pages_blocked
        );
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("koi_skimmer=info,warn"),
            1 => EnvFilter::new("koi_skimmer=debug,info"),
            2 => EnvFilter::new("koi_skimmer=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: validates config and shows the crawl plan
fn handle_dry_run(config: &koi_skimmer::config::Config, config_hash: &str) {
    println!("=== Koi-Skimmer Dry Run ===\n");

    println!("Configuration hash: {}", config_hash);

    println!("\nCrawler:");
    println!("  Page budget: {}", config.crawler.max_pages);
    println!("  Concurrency: {}", config.crawler.max_concurrency);
    println!(
        "  Request timeout: {}s",
        config.crawler.request_timeout_seconds
    );
    println!("  Max retries: {}", config.crawler.max_retries);
    println!(
        "  Structure wait: {}s",
        config.crawler.structure_wait_seconds
    );
    println!("  Debug mode: {}", config.crawler.debug_mode);

    println!("\nOutput:");
    match &config.output.database_path {
        Some(db) => println!("  SQLite database: {}", db),
        None => println!("  JSONL records: {}", config.output.records_path),
    }

    println!("\nSelectors:");
    println!("  Item container: {}", config.selectors.item_container);
    println!("  Title chain: {:?}", config.selectors.title);
    println!("  Price chain: {:?}", config.selectors.price);
    println!("  Rating chain: {:?}", config.selectors.rating);
    println!("  Id attribute: {}", config.selectors.id_attribute);
    println!("  Blocked marker: {}", config.selectors.blocked_marker);
    println!("  Next page: {}", config.selectors.next_page);

    println!("\nSeeds ({}):", config.seeds.len());
    for seed in &config.seeds {
        println!("  - {}", seed);
    }

    println!("\n✓ Configuration is valid");
    println!(
        "✓ Would crawl up to {} pages from {} seed URLs",
        config.crawler.max_pages,
        config.seeds.len()
    );
}
