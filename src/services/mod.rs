//! Service layer for the tag crawler.
//!
//! This module contains the per-identifier building blocks:
//! - Page fetching and outcome classification (`Fetcher`, `HttpFetcher`)
//! - Fixed-delay retries (`RetryPolicy`, `Sleeper`)
//! - Relation extraction (`Extractor`)

mod extractor;
mod fetcher;
mod retry;

pub use extractor::Extractor;
pub use fetcher::{Fetcher, HttpFetcher, classify};
pub use retry::{RetryPolicy, Sleeper, TokioSleeper};

#[cfg(test)]
pub(crate) use retry::testing;
