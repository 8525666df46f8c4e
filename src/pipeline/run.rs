// src/pipeline/run.rs

//! Full discovery run: range -> fetch/retry -> extract -> gzip file.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::{AppError, Result};
use crate::models::{Config, IdRange, Identifier};
use crate::pipeline::enumerate::{ProgressSnapshot, RangeDriver};
use crate::pipeline::sink::GzipSink;
use crate::services::{Extractor, Fetcher, HttpFetcher, RetryPolicy, Sleeper, TokioSleeper};
use crate::utils::http;

/// Counters for a run, complete or cut short.
#[derive(Debug, Clone, Serialize)]
pub struct RunStats {
    pub start: u64,
    pub end: u64,
    pub completed: bool,
    pub identifiers_visited: u64,
    pub found: u64,
    pub absent: u64,
    pub attempts: u64,
    pub records_written: u64,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl RunStats {
    fn new(
        range: IdRange,
        progress: ProgressSnapshot,
        records_written: u64,
        completed: bool,
        started_at: DateTime<Utc>,
    ) -> Self {
        Self {
            start: range.start(),
            end: range.end(),
            completed,
            identifiers_visited: progress.visited,
            found: progress.found,
            absent: progress.absent,
            attempts: progress.attempts,
            records_written,
            started_at,
            finished_at: Utc::now(),
        }
    }

    /// Write the stats as pretty JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

/// Outcome of a run that got as far as opening its output.
#[derive(Debug)]
pub struct RunReport {
    pub stats: RunStats,
    /// Error that stopped the run early, if any
    pub abort: Option<AppError>,
}

impl RunReport {
    /// Stats on a clean finish, the abort error otherwise.
    pub fn into_result(self) -> Result<RunStats> {
        match self.abort {
            Some(e) => Err(e),
            None => Ok(self.stats),
        }
    }
}

/// Run discovery over `start..=end` against the configured site.
pub async fn run_discovery(
    config: &Config,
    start: Identifier,
    end: Identifier,
    output: &Path,
) -> Result<RunReport> {
    config.validate()?;

    let client = http::create_async_client(&config.crawler)?;
    run_with(config, HttpFetcher::new(client), TokioSleeper, start, end, output).await
}

/// Run discovery with an explicit fetcher and sleeper.
///
/// A reversed range fails before anything is fetched or created. Setup
/// failures are returned as `Err`; once output is open, a failure ends up in
/// [`RunReport::abort`] next to the partial stats.
pub async fn run_with<F, S>(
    config: &Config,
    fetcher: F,
    sleeper: S,
    start: Identifier,
    end: Identifier,
    output: &Path,
) -> Result<RunReport>
where
    F: Fetcher,
    S: Sleeper,
{
    let range = IdRange::new(start, end)?;
    let started_at = Utc::now();
    log::info!(
        "Starting {} ({} identifiers) -> {}",
        range,
        range.count(),
        output.display()
    );

    let policy = RetryPolicy::new(fetcher, sleeper, &config.retry);
    let extractor = Extractor::new(&config.extract)?;
    let driver = RangeDriver::new(policy, extractor, config.crawler.base_url()?);

    let sink = GzipSink::create(output)?;
    let persisted = sink.persist(driver.enumerate(range)).await;

    let progress = driver.progress();
    let report = match persisted {
        Ok(written) => {
            let stats = RunStats::new(range, progress, written, true, started_at);
            log::info!(
                "Done: {} identifiers ({} found, {} absent), {} attempts, {} records",
                stats.identifiers_visited,
                stats.found,
                stats.absent,
                stats.attempts,
                stats.records_written
            );
            RunReport { stats, abort: None }
        }
        Err(e) => {
            log::error!(
                "Run aborted after {} identifiers with {} records kept: {}",
                progress.visited,
                progress.records,
                e
            );
            RunReport {
                stats: RunStats::new(range, progress, progress.records, false, started_at),
                abort: Some(e),
            }
        }
    };

    Ok(report)
}
