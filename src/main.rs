//! Card Reshuffle - command line entry point
//!
//! Reads collection definitions and a card snapshot, runs the reshuffle and
//! writes the classified card list as CSV or JSON.

use card_reshuffle::enrichment::DEFAULT_MAX_CONCURRENT_LOOKUPS;
use card_reshuffle::{
    enrich_report, render, Collection, OutputFormat, Report, Result, ShuffleManager,
    SnapshotFetcher, StaticStatsProvider,
};
use clap::Parser;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

/// Reallocate cards from source collections to target decks by priority
#[derive(Parser, Debug)]
#[command(name = "reshuffle")]
#[command(version, about, long_about = None)]
struct Args {
    /// JSON file with the list of collections
    #[arg(short, long)]
    collections: PathBuf,

    /// JSON snapshot of every collection's cards, keyed by collection id
    #[arg(short, long)]
    snapshot: PathBuf,

    /// Write the report here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Report format
    #[arg(long, value_enum, default_value_t = OutputFormat::Csv)]
    format: OutputFormat,

    /// JSON file with per-card inclusion statistics (enables enrichment)
    #[arg(long)]
    stats: Option<PathBuf>,

    /// Maximum number of statistics lookups in flight
    #[arg(long, default_value_t = DEFAULT_MAX_CONCURRENT_LOOKUPS)]
    max_concurrent_lookups: usize,
}

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    if let Err(e) = run(args).await {
        if e.is_internal() {
            log::error!("Reshuffle aborted, internal consistency check failed: {}", e);
        } else {
            log::error!("Reshuffle failed: {}", e);
        }
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<()> {
    log::info!("Starting reshuffle...");
    log::info!("Collections: {}", args.collections.display());
    log::info!("Snapshot: {}", args.snapshot.display());

    let collections: Vec<Collection> =
        serde_json::from_reader(io::BufReader::new(File::open(&args.collections)?))?;
    let fetcher = SnapshotFetcher::from_path(&args.snapshot).map_err(|source| {
        card_reshuffle::ReshuffleError::Fetch {
            collection: args.snapshot.display().to_string(),
            source,
        }
    })?;

    let allocation = ShuffleManager::new(&collections, &fetcher)?.reshuffle()?;
    let mut report = Report::assemble(&allocation);

    if let Some(stats_path) = &args.stats {
        let provider = StaticStatsProvider::from_path(stats_path)?;
        enrich_report(&mut report, &provider, args.max_concurrent_lookups).await;
    }

    let summary = report.summary();
    log::info!(
        "{} cards reshuffled, {} to buy (${:.2}), {} to ditch",
        summary.reshuffled,
        summary.buylist,
        summary.buylist_usd,
        summary.ditched
    );

    match &args.output {
        Some(path) => {
            let mut writer = BufWriter::new(File::create(path)?);
            render(&report, args.format, &mut writer)?;
            writer.flush()?;
            log::info!("Wrote {} rows to {}", report.len(), path.display());
        }
        None => {
            let stdout = io::stdout();
            render(&report, args.format, stdout.lock())?;
        }
    }

    Ok(())
}
