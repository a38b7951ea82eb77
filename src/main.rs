//! Garimpo main entry point
//!
//! This is the command-line interface for the Garimpo listing harvester.

use clap::Parser;
use garimpo::config::load_config;
use garimpo::crawler::run_scrape;
use garimpo::export::{save_records, ExportError};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Garimpo: a classifieds listing harvester
///
/// Garimpo walks the paginated result pages of a classifieds site, visits
/// each ad's detail page, extracts structured fields through the selector
/// tables in the configuration file, and exports the batch to CSV and
/// XLSX tables.
#[derive(Parser, Debug)]
#[command(name = "garimpo")]
#[command(version)]
#[command(about = "A classifieds listing harvester", long_about = None)]
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

    /// Validate config and show what would be scraped without fetching
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration; this is the one failure that exits
    // non-zero, there is no run to degrade into without it
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let config = match load_config(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {e}");
            return Err(e.into());
        }
    };

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    // Everything past this point is best-effort: failures are logged, the
    // finish banner is always reached, and the process exits 0
    tracing::info!("--- STARTING SCRAPE RUN ---");
    tracing::info!("Base URL: {}", config.scraper.base_url);

    let output = config.output.clone();
    match run_scrape(config).await {
        Ok(records) if records.is_empty() => {
            tracing::warn!("No ads were collected; check the logs and the selector tables");
        }
        Ok(records) => {
            tracing::info!("Collected {} ads in total", records.len());
            match save_records(&records, &output) {
                Ok(files) => {
                    tracing::info!(
                        "Data exported to '{}' and '{}'",
                        files.csv.display(),
                        files.xlsx.display()
                    );
                }
                Err(ExportError::Empty) => {
                    tracing::warn!("Nothing to export");
                }
                Err(e) => {
                    tracing::error!("Failed to export the collected data: {e}");
                }
            }
        }
        Err(e) => {
            tracing::error!("Critical failure during the scrape run: {e}");
        }
    }

    tracing::info!("--- SCRAPE RUN FINISHED ---");
    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("garimpo=info,warn"),
            1 => EnvFilter::new("garimpo=debug,info"),
            2 => EnvFilter::new("garimpo=trace,debug"),
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

/// Handles the --dry-run mode: validates config and shows what would be scraped
fn handle_dry_run(config: &garimpo::config::Config) {
    println!("=== Garimpo Dry Run ===\n");

    println!("Scrape:");
    println!("  Base URL: {}", config.scraper.base_url);
    match config.scraper.max_pages {
        Some(max) => println!("  Max pages: {max}"),
        None => println!("  Max pages: unbounded"),
    }
    println!("  Listing delay: {}ms", config.scraper.listing_delay_ms);
    println!("  Detail delay: {}ms", config.scraper.detail_delay_ms);
    println!("  Failure backoff: {}ms", config.scraper.failure_backoff_ms);

    println!("\nHTTP:");
    println!("  User agent: {}", config.http.user_agent);
    println!("  Timeout: {}s", config.http.timeout_secs);
    println!("  Extra headers: {}", config.http.headers.len());

    println!("\nPagination:");
    println!("  Offset parameter: {}", config.pagination.offset_param);
    println!(
        "  Second-page offset: {}",
        config.pagination.second_page_offset
    );

    println!("\nOutput:");
    println!("  Directory: {}", config.output.data_dir);
    println!("  Filename prefix: {}", config.output.filename_prefix);

    println!("\nListing selectors:");
    println!("  Ad card: {}", config.selectors.listing.ad_card);
    println!("  Ad link: {}", config.selectors.listing.ad_link);
    match &config.selectors.listing.next_page_link {
        Some(selector) => println!("  Next page: {selector}"),
        None => println!("  Next page: (offset-parameter fallback)"),
    }

    println!(
        "\nAd selectors: {} value selector(s) for detail items",
        config.selectors.ad.detail_item_value.len()
    );

    println!("\n✓ Configuration is valid");
}
