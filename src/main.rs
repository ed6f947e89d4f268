//! Rating-Harvest main entry point
//!
//! This is the command-line interface for the Rating-Harvest catalog
//! rating harvester.

use clap::Parser;
use rating_harvest::config::load_config_with_hash;
use rating_harvest::harvest::run_harvest;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Rating-Harvest: an incremental catalog rating harvester
///
/// Rating-Harvest walks a popularity-ranked catalog page by page, resolves
/// an external identifier for each item, and appends dated rating
/// observations to per-item record files. Runs are time-boxed and resume
/// from a stored page cursor.
#[derive(Parser, Debug)]
#[command(name = "rating-harvest")]
#[command(version = "1.0.0")]
#[command(about = "An incremental catalog rating harvester", long_about = None)]
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

    /// Resume from the stored page cursor (default behavior)
    #[arg(long, conflicts_with = "fresh")]
    resume: bool,

    /// Start from page 1, ignoring the stored cursor
    #[arg(long, conflicts_with = "resume")]
    fresh: bool,

    /// Validate config and show what would be harvested without fetching
    #[arg(long, conflicts_with = "stats")]
    dry_run: bool,

    /// Show record store statistics and exit
    #[arg(long, conflicts_with = "dry_run")]
    stats: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, _config_hash) = match load_config_with_hash(&cli.config) {
        Ok((cfg, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            (cfg, hash)
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    // Handle different modes
    if cli.dry_run {
        handle_dry_run(&config)?;
    } else if cli.stats {
        handle_stats(&config)?;
    } else {
        handle_harvest(config, cli.fresh).await?;
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
            0 => EnvFilter::new("rating_harvest=info,warn"),
            1 => EnvFilter::new("rating_harvest=debug,info"),
            2 => EnvFilter::new("rating_harvest=trace,debug"),
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

/// Handles the --dry-run mode: validates config and shows what a run would do
fn handle_dry_run(
    config: &rating_harvest::config::Config,
) -> Result<(), Box<dyn std::error::Error>> {
    use rating_harvest::store::Checkpoint;

    println!("=== Rating-Harvest Dry Run ===\n");

    println!("Source:");
    println!("  Listing base: {}", config.source.listing_base);
    println!("  Item base: {}", config.source.item_base);
    println!("  Stats base: {}", config.source.stats_base);

    println!("\nFetch:");
    println!("  Max attempts: {}", config.fetch.max_attempts);
    println!("  Retry delay: {}ms", config.fetch.retry_delay_ms);
    println!("  Blocked delay: {}ms", config.fetch.blocked_delay_ms);
    println!("  Timeout: {}s", config.fetch.timeout_secs);
    println!("  Identity pool: {} agents", config.fetch.user_agents.len());

    println!("\nPacing:");
    println!(
        "  Between requests: {}-{}ms",
        config.pacing.request.min_ms, config.pacing.request.max_ms
    );
    println!(
        "  Between items: {}-{}ms",
        config.pacing.item.min_ms, config.pacing.item.max_ms
    );
    println!(
        "  Between pages: {}-{}ms",
        config.pacing.page.min_ms, config.pacing.page.max_ms
    );

    println!("\nRun:");
    println!("  Time budget: {}s", config.run.time_budget_secs);
    println!("  Popularity floor: {} viewers", config.run.popularity_floor);

    println!("\nStore:");
    println!("  Record root: {}", config.store.root);
    println!("  Checkpoint: {}", config.store.checkpoint);

    let next_page = Checkpoint::new(&config.store.checkpoint).load();

    println!("\n✓ Configuration is valid");
    println!("✓ Would resume from page {}", next_page);

    Ok(())
}

/// Handles the --stats mode: shows statistics for the record store
fn handle_stats(
    config: &rating_harvest::config::Config,
) -> Result<(), Box<dyn std::error::Error>> {
    use rating_harvest::output::{load_statistics, print_statistics};
    use rating_harvest::store::RecordStore;

    println!("Record store: {}\n", config.store.root);

    let store = RecordStore::new(&config.store.root);
    let stats = load_statistics(&store)?;
    print_statistics(&stats);

    Ok(())
}

/// Handles the main harvest operation
async fn handle_harvest(
    config: rating_harvest::config::Config,
    fresh: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if fresh {
        tracing::info!("Starting fresh harvest from page 1");
    } else {
        tracing::info!("Starting harvest (will resume from stored cursor)");
    }

    match run_harvest(config, fresh).await {
        Ok(summary) => {
            tracing::info!(
                "Harvest completed: {} pages, {} items saved, {} removed",
                summary.pages_processed,
                summary.items_saved,
                summary.items_removed
            );
            Ok(())
        }
        Err(e) => {
            tracing::error!("Harvest failed: {}", e);
            Err(e.into())
        }
    }
}
