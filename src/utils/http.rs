// src/utils/http.rs

//! HTTP client utilities.

use std::time::Duration;

use url::Url;

use crate::error::{AppError, Result};
use crate::models::{CrawlerConfig, Identifier};

/// Create a configured asynchronous HTTP client.
pub fn create_async_client(config: &CrawlerConfig) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .user_agent(&config.user_agent)
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?;
    Ok(client)
}

/// Page URL for one identifier: `{base}/user/{id}`.
///
/// Segments are appended to the base path whether or not it ends in `/`.
pub fn user_page_url(base: &Url, identifier: Identifier) -> Result<Url> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| AppError::validation(format!("base URL {base} cannot hold a path")))?
        .pop_if_empty()
        .extend(["user", &identifier.to_string()]);
    Ok(url)
}
