//! HTTP-based fetcher implementation.

use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

use crate::error::{FetchError, FetchResult};
use crate::traits::fetcher::{FetchedPage, Fetcher};

/// Default request timeout. Legacy CMS hosts are slow; anything beyond
/// this is treated as a transient failure and retried by the job layer.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Fetcher backed by `reqwest`.
///
/// Sends a browser-like identity so pages served conditionally to
/// non-browser clients still resolve correctly.
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Create a fetcher with the default timeout.
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    /// Create a fetcher with a custom timeout.
    pub fn with_timeout(timeout: Duration) -> Self {
        let user_agent = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::ACCEPT,
            "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"
                .parse()
                .unwrap(),
        );
        headers.insert(
            reqwest::header::ACCEPT_LANGUAGE,
            "en-US,en;q=0.5".parse().unwrap(),
        );

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .default_headers(headers)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .expect("Failed to create HTTP client");

        Self { client }
    }

    /// Use a pre-built HTTP client.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> FetchResult<FetchedPage> {
        Url::parse(url).map_err(|_| FetchError::InvalidUrl {
            url: url.to_string(),
        })?;

        debug!(url = %url, "fetch starting");

        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                return FetchError::Timeout {
                    url: url.to_string(),
                };
            }
            warn!(url = %url, error = %e, "HTTP request failed");
            FetchError::Transport(Box::new(e))
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        // Capture final URL after redirects
        let final_url = response.url().to_string();

        let html = response.text().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout {
                    url: url.to_string(),
                }
            } else {
                FetchError::Transport(Box::new(e))
            }
        })?;

        if html.trim().is_empty() {
            return Err(FetchError::EmptyBody {
                url: url.to_string(),
            });
        }

        debug!(url = %url, final_url = %final_url, bytes = html.len(), "fetch completed");

        Ok(FetchedPage {
            url: final_url,
            html,
        })
    }
}
