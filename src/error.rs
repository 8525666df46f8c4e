// src/error.rs

//! Unified error handling for the tag crawler.
//!
//! Only fatal conditions live here. A missing page or a flaky response is an
//! ordinary [`FetchOutcome`](crate::models::FetchOutcome), never an error.

use thiserror::Error;

/// Result type alias for crawler operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP client could not be built
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// Extraction pattern failed to compile
    #[error("Invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Identifier range with start past end
    #[error("Invalid range: start {start} is greater than end {end}")]
    InvalidRange { start: u64, end: u64 },

    /// Transient failures did not clear within the attempt cap
    #[error("Giving up on identifier {identifier} after {attempts} attempts")]
    RetryExhausted { identifier: u64, attempts: u32 },

    /// Record contains characters that cannot be written as ASCII
    #[error("Record is not ASCII: {record:?}")]
    NonAscii { record: String },
}

impl AppError {
    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}
