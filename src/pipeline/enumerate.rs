// src/pipeline/enumerate.rs

//! Identifier range enumeration.
//!
//! [`RangeDriver::enumerate`] is a lazy, single-pass stream: an identifier is
//! only fetched when the consumer asks for more records, and nothing beyond
//! one page's records is buffered.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};

use futures::stream::{self, Stream};
use url::Url;

use crate::error::Result;
use crate::models::{IdRange, Identifier, Resolved, ResultRecord};
use crate::services::{Extractor, Fetcher, RetryPolicy, Sleeper};
use crate::utils::http::user_page_url;

/// Running counters for a single enumeration.
#[derive(Debug, Default)]
pub struct Progress {
    visited: AtomicU64,
    found: AtomicU64,
    absent: AtomicU64,
    attempts: AtomicU64,
    records: AtomicU64,
}

/// Point-in-time copy of [`Progress`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProgressSnapshot {
    pub visited: u64,
    pub found: u64,
    pub absent: u64,
    pub attempts: u64,
    pub records: u64,
}

impl Progress {
    pub fn snapshot(&self) -> ProgressSnapshot {
        ProgressSnapshot {
            visited: self.visited.load(Ordering::Relaxed),
            found: self.found.load(Ordering::Relaxed),
            absent: self.absent.load(Ordering::Relaxed),
            attempts: self.attempts.load(Ordering::Relaxed),
            records: self.records.load(Ordering::Relaxed),
        }
    }

    fn bump(counter: &AtomicU64, by: u64) {
        counter.fetch_add(by, Ordering::Relaxed);
    }
}

/// Stream state between pulls.
struct Cursor {
    next: Option<Identifier>,
    end: Identifier,
    pending: VecDeque<ResultRecord>,
}

/// Drives retry and extraction over an identifier range.
pub struct RangeDriver<F, S> {
    policy: RetryPolicy<F, S>,
    extractor: Extractor,
    base_url: Url,
    progress: Progress,
}

impl<F: Fetcher, S: Sleeper> RangeDriver<F, S> {
    pub fn new(policy: RetryPolicy<F, S>, extractor: Extractor, base_url: Url) -> Self {
        Self {
            policy,
            extractor,
            base_url,
            progress: Progress::default(),
        }
    }

    pub fn progress(&self) -> ProgressSnapshot {
        self.progress.snapshot()
    }

    /// Records for every identifier in `range`, in increasing identifier order.
    ///
    /// A fatal error is yielded once and ends the stream; identifiers after
    /// it are never fetched.
    pub fn enumerate(&self, range: IdRange) -> impl Stream<Item = Result<ResultRecord>> + '_ {
        let cursor = Cursor {
            next: Some(range.start()),
            end: range.end(),
            pending: VecDeque::new(),
        };

        stream::unfold(cursor, move |mut cursor| async move {
            loop {
                if let Some(record) = cursor.pending.pop_front() {
                    return Some((Ok(record), cursor));
                }

                let identifier = cursor.next?;
                cursor.next = (identifier < cursor.end).then(|| identifier + 1);

                match self.records_for(identifier).await {
                    Ok(records) => cursor.pending.extend(records),
                    Err(e) => {
                        cursor.next = None;
                        return Some((Err(e), cursor));
                    }
                }
            }
        })
    }

    /// Resolve one identifier and format whatever it yields.
    async fn records_for(&self, identifier: Identifier) -> Result<Vec<ResultRecord>> {
        let url = user_page_url(&self.base_url, identifier)?;
        Progress::bump(&self.progress.visited, 1);

        let resolution = match self.policy.resolve(identifier, &url).await {
            Ok(resolution) => resolution,
            Err(e) => {
                Progress::bump(&self.progress.attempts, u64::from(self.policy.max_attempts()));
                return Err(e);
            }
        };
        Progress::bump(&self.progress.attempts, u64::from(resolution.attempts));

        let records: Vec<ResultRecord> = match resolution.outcome {
            Resolved::Found(body) => {
                Progress::bump(&self.progress.found, 1);
                self.extractor
                    .extract(&body)
                    .iter()
                    .map(ResultRecord::from)
                    .collect()
            }
            Resolved::Absent => {
                Progress::bump(&self.progress.absent, 1);
                Vec::new()
            }
        };

        log::debug!("Identifier {} yielded {} records", identifier, records.len());
        Progress::bump(&self.progress.records, records.len() as u64);
        Ok(records)
    }
}
