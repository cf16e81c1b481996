//! Fetcher trait - retrieving raw markup for a URL.

use async_trait::async_trait;

use crate::error::FetchResult;

/// Raw markup retrieved for one URL.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Final URL after redirects
    pub url: String,

    /// Raw HTML body
    pub html: String,
}

impl FetchedPage {
    /// Create a fetched page.
    pub fn new(url: impl Into<String>, html: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            html: html.into(),
        }
    }
}

/// Retrieves raw markup for a URL.
///
/// Implementations are purely functional from the pipeline's point of
/// view: no side effects beyond the network call itself. Transport
/// failures, timeouts and empty bodies surface as `FetchError`.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetch the markup behind `url`, following redirects.
    async fn fetch(&self, url: &str) -> FetchResult<FetchedPage>;
}
