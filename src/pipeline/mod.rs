//! Pipeline entry points for discovery runs.
//!
//! - `enumerate`: lazy record stream over an identifier range
//! - `sink`: gzip line output
//! - `run_discovery`: wires both to the HTTP fetcher

pub mod enumerate;
pub mod run;
pub mod sink;

pub use enumerate::{ProgressSnapshot, RangeDriver};
pub use run::{RunReport, RunStats, run_discovery, run_with};
pub use sink::GzipSink;
