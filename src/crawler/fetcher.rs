//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the scraper, including:
//! - Building the HTTP client with the configured identity headers
//! - GET requests for listing and detail pages
//! - Detection of anti-bot challenge pages
//! - Error classification
//!
//! Every failure class is consumed here or by the coordinator; fetch
//! problems are logged and collapse to "no document", they never abort
//! a run.

use crate::config::HttpConfig;
use crate::{ConfigError, HarvestError};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Client;
use std::time::Duration;

/// Body markers of an anti-bot challenge or block page. A response carrying
/// one of these is a block, not a document, whatever its status code.
const CHALLENGE_MARKERS: &[&str] = &[
    "Sorry, you have been blocked",
    "Attention Required! | Cloudflare",
    "Checking your browser before accessing",
];

/// Result of a fetch operation
#[derive(Debug)]
pub enum FetchOutcome {
    /// Successfully fetched an HTML page
    Success {
        /// Final URL after redirects
        final_url: String,
        /// HTTP status code
        status_code: u16,
        /// Page body content
        body: String,
    },

    /// The response body is an anti-bot challenge or block page
    Blocked {
        /// The marker that identified the block
        marker: &'static str,
    },

    /// Page is not HTML (Content-Type mismatch)
    ContentMismatch {
        /// The actual Content-Type received
        content_type: String,
    },

    /// HTTP error status (4xx or 5xx)
    HttpError {
        /// The HTTP status code
        status_code: u16,
    },

    /// Network error (connection refused, timeout, etc.)
    NetworkError {
        /// Error description
        error: String,
        /// Whether the request timed out
        timed_out: bool,
    },
}

/// Builds an HTTP client with the configured browser-mimicking identity
///
/// The client applies the configured User-Agent, the additional request
/// headers, and the per-request timeout to every request it sends.
///
/// # Arguments
///
/// * `config` - The HTTP configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(HarvestError)` - A header was invalid or the builder failed
pub fn build_http_client(config: &HttpConfig) -> Result<Client, HarvestError> {
    let mut headers = HeaderMap::new();
    for (name, value) in &config.headers {
        let name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
            ConfigError::Validation(format!("invalid header name '{name}': {e}"))
        })?;
        let value = HeaderValue::from_str(value).map_err(|e| {
            ConfigError::Validation(format!("invalid value for header '{name:?}': {e}"))
        })?;
        headers.insert(name, value);
    }

    let client = Client::builder()
        .user_agent(&config.user_agent)
        .default_headers(headers)
        .timeout(Duration::from_secs(config.timeout_secs))
        .cookie_store(true)
        .gzip(true)
        .brotli(true)
        .build()?;

    Ok(client)
}

/// Fetches a URL and classifies the outcome
///
/// # Request Flow
///
/// 1. Send GET request (redirects followed by the client)
/// 2. Read the body
/// 3. Check the body for challenge-page markers -> `Blocked`
/// 4. Check the status code -> `HttpError` for 4xx/5xx
/// 5. Check Content-Type -> `ContentMismatch` for non-HTML
/// 6. Otherwise `Success`
///
/// Challenge markers are checked before the status code: block pages are
/// served with 200 and 403 alike, and either way they are not documents.
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `url` - The URL to fetch
pub async fn fetch_page(client: &Client, url: &str) -> FetchOutcome {
    let response = match client.get(url).send().await {
        Ok(response) => response,
        Err(e) => {
            return FetchOutcome::NetworkError {
                error: e.to_string(),
                timed_out: e.is_timeout(),
            };
        }
    };

    let status_code = response.status().as_u16();
    let final_url = response.url().to_string();
    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    let body = match response.text().await {
        Ok(body) => body,
        Err(e) => {
            return FetchOutcome::NetworkError {
                error: e.to_string(),
                timed_out: e.is_timeout(),
            };
        }
    };

    if let Some(marker) = challenge_marker(&body) {
        return FetchOutcome::Blocked { marker };
    }

    if status_code >= 400 {
        return FetchOutcome::HttpError { status_code };
    }

    if !content_type.is_empty() && !content_type.contains("text/html") {
        return FetchOutcome::ContentMismatch { content_type };
    }

    FetchOutcome::Success {
        final_url,
        status_code,
        body,
    }
}

/// Fetches a URL and collapses the outcome to an HTML body
///
/// Every failure class is logged and becomes `None`; the caller decides how
/// to degrade. This is the fetch boundary the coordinator works against.
pub async fn fetch_html(client: &Client, url: &str) -> Option<String> {
    match fetch_page(client, url).await {
        FetchOutcome::Success {
            status_code, body, ..
        } => {
            tracing::info!("Fetched page: {url} (status: {status_code})");
            Some(body)
        }
        FetchOutcome::Blocked { marker } => {
            tracing::error!("Challenge/block page received at {url} (marker: {marker:?})");
            None
        }
        FetchOutcome::ContentMismatch { content_type } => {
            tracing::error!("Expected HTML at {url}, got Content-Type '{content_type}'");
            None
        }
        FetchOutcome::HttpError { status_code } => {
            tracing::error!("HTTP error {status_code} fetching {url}");
            None
        }
        FetchOutcome::NetworkError { error, timed_out } => {
            if timed_out {
                tracing::error!("Timeout fetching {url}: {error}");
            } else {
                tracing::error!("Network error fetching {url}: {error}");
            }
            None
        }
    }
}

/// Returns the challenge marker contained in the body, if any
fn challenge_marker(body: &str) -> Option<&'static str> {
    CHALLENGE_MARKERS
        .iter()
        .find(|marker| body.contains(*marker))
        .copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn test_config() -> HttpConfig {
        let mut headers = BTreeMap::new();
        headers.insert(
            "Accept".to_string(),
            "text/html,application/xhtml+xml".to_string(),
        );
        headers.insert("Accept-Language".to_string(), "pt-BR,pt;q=0.9".to_string());
        HttpConfig {
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64)".to_string(),
            timeout_secs: 30,
            headers,
        }
    }

    #[test]
    fn test_build_http_client() {
        let config = test_config();
        assert!(build_http_client(&config).is_ok());
    }

    #[test]
    fn test_build_http_client_rejects_bad_header() {
        let mut config = test_config();
        config
            .headers
            .insert("bad header name".to_string(), "x".to_string());
        assert!(build_http_client(&config).is_err());
    }

    #[test]
    fn test_challenge_marker_detection() {
        assert_eq!(
            challenge_marker("<html>Sorry, you have been blocked</html>"),
            Some("Sorry, you have been blocked")
        );
        assert_eq!(
            challenge_marker("<title>Attention Required! | Cloudflare</title>"),
            Some("Attention Required! | Cloudflare")
        );
        assert_eq!(challenge_marker("<html>Casa para alugar</html>"), None);
    }

    // Network behavior is covered by the wiremock integration tests
}
