//! pagemeta main entry point
//!
//! This is the command-line interface for the pagemeta crawl service.

use clap::Parser;
use pagemeta::config::{load_config_with_hash, Config};
use pagemeta::service::CrawlService;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// pagemeta: structural metadata for web pages
///
/// pagemeta fetches a page and reports its HTML version, title, heading
/// counts, internal and external link counts, a sample of broken links and
/// whether it carries a login form. Results are kept in SQLite and served
/// over a small REST API.
#[derive(Parser, Debug)]
#[command(name = "pagemeta")]
#[command(version)]
#[command(about = "Page metadata extraction service", long_about = None)]
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

    /// Crawl one URL, store the result and print it
    #[arg(long, value_name = "URL", group = "mode")]
    crawl: Option<String>,

    /// List stored records and exit
    #[arg(long, group = "mode")]
    list: bool,

    /// Crawl a stored record again
    #[arg(long, value_name = "ID", group = "mode")]
    recrawl: Option<i64>,

    /// Delete one stored record
    #[arg(long, value_name = "ID", group = "mode")]
    delete: Option<i64>,

    /// Delete every stored record
    #[arg(long, group = "mode")]
    delete_all: bool,

    /// Serve the HTTP API (default behavior)
    #[arg(long, group = "mode")]
    serve: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
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

    // Handle different modes
    if let Some(url) = &cli.crawl {
        handle_crawl(&config, url).await?;
    } else if cli.list {
        handle_list(&config)?;
    } else if let Some(id) = cli.recrawl {
        handle_recrawl(&config, id).await?;
    } else if let Some(id) = cli.delete {
        handle_delete(&config, id)?;
    } else if cli.delete_all {
        handle_delete_all(&config)?;
    } else {
        handle_serve(&config).await?;
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
            0 => EnvFilter::new("pagemeta=info,warn"),
            1 => EnvFilter::new("pagemeta=debug,tower_http=debug,info"),
            2 => EnvFilter::new("pagemeta=trace,debug"),
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

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Handles --crawl: crawls one URL and prints the stored record
async fn handle_crawl(config: &Config, url: &str) -> Result<(), Box<dyn std::error::Error>> {
    let service = CrawlService::from_config(config)?;
    let outcome = service.crawl_and_store(url).await?;

    print_json(&outcome.record)?;
    match outcome.failure {
        Some(e) => Err(e.into()),
        None => Ok(()),
    }
}

/// Handles --recrawl: crawls a stored record again
async fn handle_recrawl(config: &Config, id: i64) -> Result<(), Box<dyn std::error::Error>> {
    let service = CrawlService::from_config(config)?;
    let outcome = service.recrawl(id).await?;

    print_json(&outcome.record)?;
    match outcome.failure {
        Some(e) => Err(e.into()),
        None => Ok(()),
    }
}

/// Handles --list: prints every stored record
fn handle_list(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let service = CrawlService::from_config(config)?;
    let records = service.list()?;

    println!("Database: {}\n", config.storage.database_path);
    if records.is_empty() {
        println!("No records");
        return Ok(());
    }

    for record in &records {
        match &record.metadata {
            Some(metadata) => println!(
                "{:>5}  {:<6}  {:<7}  {}  ({} broken)  {}",
                record.id,
                "done",
                metadata.html_version,
                record.url,
                metadata.broken_links.len(),
                record.last_crawled_at
            ),
            None => println!(
                "{:>5}  {:<6}  {:<7}  {}  {}",
                record.id, "failed", "-", record.url, record.last_crawled_at
            ),
        }
    }
    println!("\n{} records", records.len());

    Ok(())
}

/// Handles --delete: removes one stored record
fn handle_delete(config: &Config, id: i64) -> Result<(), Box<dyn std::error::Error>> {
    let service = CrawlService::from_config(config)?;
    service.delete(id)?;
    println!("✓ Deleted record {}", id);
    Ok(())
}

/// Handles --delete-all: removes every stored record
fn handle_delete_all(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let service = CrawlService::from_config(config)?;
    let deleted = service.delete_all()?;
    println!("✓ Deleted {} records", deleted);
    Ok(())
}

/// Handles the main serve operation
async fn handle_serve(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!("Database: {}", config.storage.database_path);

    match pagemeta::server::serve(config).await {
        Ok(()) => {
            tracing::info!("Server stopped");
            Ok(())
        }
        Err(e) => {
            tracing::error!("Server failed: {}", e);
            Err(e.into())
        }
    }
}
