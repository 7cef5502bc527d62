//! Spire-Harvest main entry point
//!
//! This is the command-line interface for the contact-email harvest pipeline.

use anyhow::Context;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use spire_harvest::config::{load_config_with_hash, Config};
use spire_harvest::crawler::{
    build_http_client, BatchRunner, FetchCache, Fetcher, LogProgress, Progress,
};
use spire_harvest::directory::resolve_seeds;
use spire_harvest::report::{build_rows, write_csv};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Spire-Harvest: collect contact emails from organization websites
///
/// Spire-Harvest reads an organization directory, visits each listed
/// website, follows links that look like contact pages, and writes the
/// email addresses found there to a CSV spreadsheet.
#[derive(Parser, Debug)]
#[command(name = "spire-harvest")]
#[command(version)]
#[command(about = "Collect contact emails from organization websites", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Write the CSV report here instead of the configured path
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config, resolve the seed list, and exit without crawling
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    // One client (one connection pool) for the directory feed and the batch
    let client = build_http_client(&config.crawler)?;

    let seeds = resolve_seeds(&client, &config).await?;
    tracing::info!("Resolved {} seed URLs", seeds.len());

    if cli.dry_run {
        handle_dry_run(&config, seeds.len());
        return Ok(());
    }

    let email_pattern = config.extraction.compile()?;

    let cache = FetchCache::new(
        config.crawler.cache_max_entries,
        Duration::from_secs(config.crawler.cache_ttl),
    );
    let fetcher = Arc::new(Fetcher::new(client, cache));

    let runner = BatchRunner::new(
        fetcher,
        config.keywords.terms.clone(),
        email_pattern.clone(),
        config.crawler.max_concurrent_seeds as usize,
    );

    let bar = BarProgress::new(seeds.len() as u64);
    let log = LogProgress;
    let progress: &dyn Progress = if cli.quiet { &log } else { &bar };

    let results = runner.run(&seeds, progress).await;
    bar.finish();

    let rows = build_rows(&seeds, &results, &email_pattern);

    let report_path = cli
        .output
        .unwrap_or_else(|| PathBuf::from(&config.output.report_path));
    write_csv(&rows, &report_path)?;

    let emails_written = rows.iter().filter(|row| row.email.is_some()).count();
    println!("✓ {} seeds processed", seeds.len());
    println!(
        "✓ {} unique emails written to {}",
        emails_written,
        report_path.display()
    );

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("spire_harvest=info,warn"),
            1 => EnvFilter::new("spire_harvest=debug,info"),
            2 => EnvFilter::new("spire_harvest=trace,debug"),
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

/// Handles the --dry-run mode: validates config and shows what would be crawled
fn handle_dry_run(config: &Config, seed_count: usize) {
    println!("=== Spire-Harvest Dry Run ===\n");

    println!("Crawler Configuration:");
    println!(
        "  Max concurrent seeds: {}",
        config.crawler.max_concurrent_seeds
    );
    match config.crawler.request_timeout {
        Some(seconds) => println!("  Request timeout: {}s", seconds),
        None => println!("  Request timeout: none"),
    }
    println!(
        "  Fetch cache: {} entries, {}s TTL",
        config.crawler.cache_max_entries, config.crawler.cache_ttl
    );

    println!("\nSeed Source:");
    if !config.seeds.is_empty() {
        println!("  Inline seeds: {}", config.seeds.len());
    } else if let Some(directory) = &config.directory {
        println!("  Directory feed: {}", directory.feed_url);
        println!("  Records field: {}", directory.records_field);
    }

    println!("\nKeywords ({}):", config.keywords.terms.len());
    for term in &config.keywords.terms {
        println!("  - {}", term);
    }

    println!("\nOutput:");
    println!("  Report: {}", config.output.report_path);

    println!("\n✓ Configuration is valid");
    println!("✓ Would crawl {} seed URLs", seed_count);
}

/// Progress bar shown while the batch runs
struct BarProgress {
    bar: ProgressBar,
}

impl BarProgress {
    fn new(total: u64) -> Self {
        let bar = ProgressBar::new(total);

        bar.set_style(
            ProgressStyle::with_template("{bar:40} {pos}/{len} [{elapsed_precise}] {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );

        Self { bar }
    }

    fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl Progress for BarProgress {
    fn seed_completed(&self, _completed: usize, _total: usize, seed: &str) {
        self.bar.set_message(seed.to_string());
        self.bar.inc(1);
    }
}
