//! Site-Sweep main entry point
//!
//! This is the command-line interface for the Site-Sweep same-origin crawler.

use anyhow::Context;
use clap::Parser;
use site_sweep::config::{compute_config_hash, parse_config, validate, Config};
use site_sweep::service::{CrawlService, ServiceObserver};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Site-Sweep: a same-origin site mapper
///
/// Site-Sweep crawls every page reachable from a starting URL without leaving
/// its origin, then writes a plain-text report of each page's title and links.
#[derive(Parser, Debug)]
#[command(name = "site-sweep")]
#[command(version)]
#[command(about = "A same-origin site mapper", long_about = None)]
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

    /// Override the starting URL from the configuration
    #[arg(long, value_name = "URL")]
    url: Option<String>,

    /// Override the number of concurrent workers
    #[arg(long, value_name = "N")]
    threads: Option<i64>,

    /// Validate config and show the effective settings without crawling
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let config = load_with_overrides(&cli)?;

    if cli.dry_run {
        handle_dry_run(config)
    } else {
        handle_crawl(config).await
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("site_sweep=info,warn"),
            1 => EnvFilter::new("site_sweep=debug,info"),
            2 => EnvFilter::new("site_sweep=trace,debug"),
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

/// Reads the configuration and applies command-line overrides
///
/// Validation is left to the caller so overrides are validated too.
fn load_with_overrides(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = parse_config(&cli.config)
        .with_context(|| format!("Failed to load {}", cli.config.display()))?;

    let hash = compute_config_hash(&cli.config)?;
    tracing::info!("Configuration loaded (hash: {})", hash);

    if let Some(url) = &cli.url {
        config.crawler.starting_url = url.clone();
    }
    if let Some(threads) = cli.threads {
        config.crawler.num_threads = threads;
    }

    Ok(config)
}

/// Handles the --dry-run mode: validates config and shows the effective settings
fn handle_dry_run(mut config: Config) -> anyhow::Result<()> {
    if let Err(e) = validate(&mut config) {
        ConsoleObserver.on_error(&e.messages());
        return Err(e.into());
    }

    println!("=== Site-Sweep Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Starting URL: {}", config.crawler.starting_url);
    println!("  Workers: {}", config.crawler.workers());
    println!(
        "  Progress interval: {}ms",
        config.crawler.progress_interval().as_millis()
    );
    match config.crawler.parse_timeout() {
        Some(timeout) => println!("  Page timeout: {}ms", timeout.as_millis()),
        None => println!("  Page timeout: none"),
    }
    println!(
        "  Crawl timeout: {}s",
        config.crawler.crawl_timeout().as_secs()
    );

    println!("\nUser Agent:");
    println!("  {}", config.user_agent.user_agent_string());

    println!("\nOutput:");
    println!("  Report: {}", config.output.report_path().display());

    println!("\n✓ Configuration is valid");

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config) -> anyhow::Result<()> {
    let service = CrawlService::new(config);

    match service.run(Arc::new(ConsoleObserver)).await {
        Ok(summary) => {
            tracing::info!(
                "Crawl finished: {} processed, {} discovered in {:.2}s",
                summary.processed,
                summary.discovered,
                summary.duration.as_secs_f64()
            );
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}

/// Prints crawl progress to the terminal
struct ConsoleObserver;

impl ServiceObserver for ConsoleObserver {
    fn on_start(&self, starting_url: &str) {
        println!("Crawling URL: {}", starting_url);
    }

    fn on_error(&self, errors: &[String]) {
        eprintln!("Configuration errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
    }

    fn on_progress(&self, _processed: usize) {
        print!(".");
        let _ = std::io::stdout().flush();
    }

    fn on_complete(&self, processed: usize, canceled: bool, report_path: &Path) {
        println!();
        println!(
            "Pages Processed: {} ==> {}",
            processed,
            if canceled { "CANCELED" } else { "COMPLETE" }
        );
        println!("Report: {}", report_path.display());
    }
}
