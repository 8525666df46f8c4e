// src/models/mod.rs

//! Domain models for the tag crawler.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod config;
mod outcome;
mod range;
mod relation;

// Re-export all public types
pub use config::{Config, CrawlerConfig, ExtractConfig, RetryConfig};
pub use outcome::{FetchOutcome, Resolution, Resolved, TransientReason};
pub use range::{IdRange, Identifier};
pub use relation::{Relation, ResultRecord};
