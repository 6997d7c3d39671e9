//! WebIndex main entry point
//!
//! This is the command-line interface for the WebIndex crawler and keyword index.

use anyhow::Context;
use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use webindex::config::{load_config_with_hash, Config};
use webindex::crawler::{CrawlControl, Coordinator};
use webindex::output::{
    load_statistics, print_report, print_search_results, print_statistics, search,
    DEFAULT_SEARCH_LIMIT,
};
use webindex::storage::{open_storage, SqliteStorage};

/// WebIndex: a single-worker web crawler and keyword indexer
///
/// WebIndex starts from a seed URL, always fetches the pending URL with the
/// most inbound links, and builds a searchable keyword index of every titled
/// page it reaches.
#[derive(Parser, Debug)]
#[command(name = "webindex")]
#[command(version = "1.0.0")]
#[command(about = "A web crawler and keyword indexer", long_about = None)]
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

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long, conflicts_with_all = ["stats", "search"])]
    dry_run: bool,

    /// Show statistics from the index database and exit
    #[arg(long, conflicts_with_all = ["dry_run", "search"])]
    stats: bool,

    /// Search the existing index for pages containing every word of QUERY
    #[arg(long, value_name = "QUERY", conflicts_with_all = ["dry_run", "stats"])]
    search: Option<String>,

    /// Maximum number of search results
    #[arg(long, default_value_t = DEFAULT_SEARCH_LIMIT, requires = "search")]
    limit: usize,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let config = match load_config_with_hash(&cli.config) {
        Ok((cfg, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            cfg
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    if cli.dry_run {
        handle_dry_run(&config);
    } else if cli.stats {
        handle_stats(&config)?;
    } else if let Some(query) = &cli.search {
        handle_search(&config, query, cli.limit)?;
    } else {
        handle_crawl(&config).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("webindex=info,warn"),
            1 => EnvFilter::new("webindex=debug,info"),
            2 => EnvFilter::new("webindex=trace,debug"),
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

/// Handles the --dry-run mode: shows the effective configuration
fn handle_dry_run(config: &Config) {
    println!("=== WebIndex Dry Run ===\n");

    println!("Crawler:");
    println!("  Seed URL: {}", config.crawler.seed_url);
    match config.crawler.max_pages {
        0 => println!("  Page limit: none"),
        n => println!("  Page limit: {}", n),
    }
    println!("  Max URL length: {}", config.crawler.max_url_length);
    match config.crawler.fetch_timeout() {
        Some(timeout) => println!("  Fetch timeout: {}s", timeout.as_secs()),
        None => println!("  Fetch timeout: none"),
    }

    println!("\nUser Agent:");
    println!("  Name: {}", config.user_agent.crawler_name);
    println!("  Version: {}", config.user_agent.crawler_version);
    println!("  Contact URL: {}", config.user_agent.contact_url);
    println!("  Contact Email: {}", config.user_agent.contact_email);

    println!("\nStorage:");
    println!("  Database: {}", config.storage.database_path);
    println!("  Reconnect backoff: {}ms", config.storage.reconnect_backoff_ms);
    match config.storage.max_reconnect_attempts {
        0 => println!("  Reconnect attempts: unbounded"),
        n => println!("  Reconnect attempts: {}", n),
    }

    println!("\nRelevance:");
    println!("  Batch interval: {} pages", config.relevance.batch_interval);
    println!("  Flush on drain: {}", config.relevance.flush_on_drain);

    println!("\n✓ Configuration is valid");
    println!("✓ Would reset {} and crawl from {}", config.storage.database_path, config.crawler.seed_url);
}

/// Handles the --stats mode: shows statistics from the database
fn handle_stats(config: &Config) -> anyhow::Result<()> {
    println!("Database: {}\n", config.storage.database_path);

    let storage = open_existing(&config.storage.database_path)?;
    let stats = load_statistics(&storage)?;
    print_statistics(&stats);

    Ok(())
}

/// Handles the --search mode: ranks indexed pages for a query
fn handle_search(config: &Config, query: &str, limit: usize) -> anyhow::Result<()> {
    let storage = open_existing(&config.storage.database_path)?;
    let hits = search(&storage, query, limit)?;
    print_search_results(query, &hits);

    Ok(())
}

fn open_existing(path: &str) -> anyhow::Result<SqliteStorage> {
    open_storage(Path::new(path))
        .with_context(|| format!("Failed to open index database {}", path))
}

/// Handles the main crawl operation
async fn handle_crawl(config: &Config) -> anyhow::Result<()> {
    tracing::info!("Starting crawl from {}", config.crawler.seed_url);
    tracing::info!("Index database: {}", config.storage.database_path);

    let control = Arc::new(CrawlControl::new());

    let stopper = Arc::clone(&control);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, finishing the current page");
            stopper.request_stop();
        }
    });

    let mut coordinator = Coordinator::new(config, control)?;
    match coordinator.run().await {
        Ok(report) => {
            tracing::info!("Crawl finished: {}", report.stop_reason);
            print_report(&report);
            Ok(())
        }
        Err(e) if e.is_fatal_storage() => {
            tracing::error!("Index database failed, crawl aborted: {}", e);
            print_report(coordinator.report());
            Err(e.into())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}
