//! HTTP fetcher
//!
//! This module handles all HTTP requests for the scraper, including:
//! - Building the HTTP client with a proper user agent string
//! - GET requests to fetch page HTML
//! - Error classification (timeout, unreachable, bad status, not HTML)
//!
//! There is no retry logic: a failed fetch surfaces as a [`FetchError`] and
//! the driver decides whether to skip the page or abort.

use crate::config::FetchConfig;
use crate::{FetchError, FetchResult};
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Builds the HTTP client used for every request in a run
///
/// # Arguments
///
/// * `config` - The fetch configuration (user agent, timeouts)
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(FetchError)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use docstitch::config::FetchConfig;
/// use docstitch::fetch::build_http_client;
///
/// let client = build_http_client(&FetchConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &FetchConfig) -> FetchResult<Client> {
    Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()
        .map_err(FetchError::Client)
}

/// Fetches a single page and returns its raw HTML
///
/// One GET request, no retries. Fails on network errors, timeouts,
/// non-success status codes, and non-HTML Content-Type.
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `url` - The URL to fetch
///
/// # Returns
///
/// * `Ok(String)` - The raw HTML body
/// * `Err(FetchError)` - The classified failure
pub async fn fetch_page(client: &Client, url: &Url) -> FetchResult<String> {
    tracing::debug!("Fetching {}", url);

    let response = client
        .get(url.as_str())
        .send()
        .await
        .map_err(|e| classify_request_error(url, e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    // An empty Content-Type is tolerated; anything explicit must be HTML
    if !content_type.is_empty()
        && !content_type.contains("text/html")
        && !content_type.contains("application/xhtml")
    {
        return Err(FetchError::NotHtml {
            url: url.to_string(),
            content_type,
        });
    }

    response
        .text()
        .await
        .map_err(|e| classify_request_error(url, e))
}

/// Classifies a reqwest error into the fetch error taxonomy
fn classify_request_error(url: &Url, error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else if error.is_connect() {
        FetchError::Unreachable {
            url: url.to_string(),
            message: "Connection refused".to_string(),
        }
    } else {
        FetchError::Http {
            url: url.to_string(),
            source: error,
        }
    }
}
