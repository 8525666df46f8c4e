//! Tag Crawler CLI
//!
//! Enumerates user pages `START..=END` and writes `tag:<user>:<tag>` lines
//! to a gzip file.

use std::path::PathBuf;

use clap::Parser;
use tag_crawler::{
    error::Result,
    models::Config,
    pipeline,
};

/// Tag Crawler - user/tag relation harvester
#[derive(Parser, Debug)]
#[command(
    name = "tag-crawler",
    version,
    about = "Find valid users and their tags by walking a numeric id range"
)]
struct Cli {
    /// First identifier to visit
    start: u64,

    /// Last identifier to visit (inclusive)
    end: u64,

    /// Output file, e.g. users.txt.gz
    output: PathBuf,

    /// Path to the configuration file
    #[arg(short, long, default_value = "tag-crawler.toml")]
    config: PathBuf,

    /// Write run statistics as JSON to this path
    #[arg(long)]
    stats: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = Config::load_or_default(&cli.config);

    // Range and config are checked before any request goes out
    let report = pipeline::run_discovery(&config, cli.start, cli.end, &cli.output).await?;

    // Saved for aborted runs too
    if let Some(path) = cli.stats {
        report.stats.save(&path)?;
        log::info!("Stats saved to {}", path.display());
    }

    report.into_result()?;

    log::info!("Done!");

    Ok(())
}
