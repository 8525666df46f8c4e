//! Application configuration structures.

use std::fs;
use std::path::Path;
use std::time::Duration;

use regex::Regex;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// HTTP target and client settings
    #[serde(default)]
    pub crawler: CrawlerConfig,

    /// Transient failure handling
    #[serde(default)]
    pub retry: RetryConfig,

    /// Relation extraction patterns
    #[serde(default)]
    pub extract: ExtractConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.crawler.user_agent.trim().is_empty() {
            return Err(AppError::validation("crawler.user_agent is empty"));
        }
        if self.crawler.timeout_secs == 0 {
            return Err(AppError::validation("crawler.timeout_secs must be > 0"));
        }
        let base = self.crawler.base_url()?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(AppError::validation(format!(
                "crawler.base_url must be http(s), got {}",
                base.scheme()
            )));
        }
        if self.retry.max_attempts == 0 {
            return Err(AppError::validation("retry.max_attempts must be > 0"));
        }
        check_pattern("extract.user_pattern", &self.extract.user_pattern)?;
        check_pattern("extract.tag_pattern", &self.extract.tag_pattern)?;
        Ok(())
    }
}

/// A pattern must compile and capture exactly one token.
fn check_pattern(name: &str, pattern: &str) -> Result<()> {
    let re = Regex::new(pattern)?;
    // captures_len counts the implicit whole-match group
    if re.captures_len() != 2 {
        return Err(AppError::validation(format!(
            "{name} must have exactly one capture group"
        )));
    }
    Ok(())
}

/// HTTP client and target settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlerConfig {
    /// Site root; pages live at `{base_url}/user/{id}`
    #[serde(default = "defaults::base_url")]
    pub base_url: String,

    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,
}

impl CrawlerConfig {
    /// Parse the configured base URL.
    pub fn base_url(&self) -> Result<Url> {
        Ok(Url::parse(&self.base_url)?)
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::base_url(),
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
        }
    }
}

/// Fixed-delay retry settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Total attempts per identifier, the first one included
    #[serde(default = "defaults::max_attempts")]
    pub max_attempts: u32,

    /// Pause after a transient failure, in seconds
    #[serde(default = "defaults::delay")]
    pub delay_secs: u64,
}

impl RetryConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_secs(self.delay_secs)
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: defaults::max_attempts(),
            delay_secs: defaults::delay(),
        }
    }
}

/// Patterns scanned independently over each page body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractConfig {
    /// Captures a user id
    #[serde(default = "defaults::user_pattern")]
    pub user_pattern: String,

    /// Captures a tag
    #[serde(default = "defaults::tag_pattern")]
    pub tag_pattern: String,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            user_pattern: defaults::user_pattern(),
            tag_pattern: defaults::tag_pattern(),
        }
    }
}

mod defaults {
    // Crawler defaults
    pub fn base_url() -> String {
        "http://www.panoramio.com/".into()
    }
    pub fn user_agent() -> String {
        "ArchiveTeam".into()
    }
    pub fn timeout() -> u64 {
        60
    }

    // Retry defaults
    pub fn max_attempts() -> u32 {
        21
    }
    pub fn delay() -> u64 {
        10
    }

    // Anchors look like <a href="/user/1707816/tags/Bell%27Italia">
    pub fn user_pattern() -> String {
        r#""/user/([^/]+)/tags/"#.into()
    }
    pub fn tag_pattern() -> String {
        r#""/user/[0-9]+/tags/([^"]+)""#.into()
    }
}
