//! HTTP document fetcher
//!
//! One blocking-style GET per call, driven sequentially by the coordinator.
//! No retry and no timeout override: a hang or error is surfaced to the
//! caller as a failure value, never thrown past this boundary.

use crate::FetchError;
use reqwest::Client;
use scraper::Html;

/// Builds the HTTP client shared by one run
///
/// The listing endpoints this pipeline targets are public, so no custom
/// headers are sent.
pub fn build_http_client() -> Result<Client, reqwest::Error> {
    Client::builder().gzip(true).brotli(true).build()
}

/// Fetches a URL and returns the parsed document tree
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `url` - Absolute URL to retrieve
///
/// # Returns
///
/// * `Ok(Html)` - Parsed document
/// * `Err(FetchError)` - Network error, non-success status, or unreadable body
pub async fn fetch_document(client: &Client, url: &str) -> Result<Html, FetchError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|source| FetchError::Request {
            url: url.to_string(),
            source,
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let body = response.text().await.map_err(|source| FetchError::Body {
        url: url.to_string(),
        source,
    })?;

    Ok(Html::parse_document(&body))
}
