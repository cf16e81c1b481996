//! Mock implementations for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::error::{FetchError, FetchResult};
use crate::traits::fetcher::{FetchedPage, Fetcher};

/// Scripted failure modes for the mock fetcher.
#[derive(Debug, Clone, Copy)]
pub enum MockFailure {
    /// Request times out
    Timeout,
    /// Server answers with the given status
    Status(u16),
    /// Response body is empty
    EmptyBody,
}

/// Mock fetcher with canned responses, for deterministic pipeline tests.
///
/// URLs without a canned page or scripted failure answer 404.
///
/// # Example
///
/// ```rust
/// use mining::testing::MockFetcher;
///
/// let fetcher = MockFetcher::new()
///     .with_page("https://example.com/", "<body><p>Hi</p></body>");
/// ```
#[derive(Default)]
pub struct MockFetcher {
    pages: Arc<RwLock<HashMap<String, String>>>,
    failures: Arc<RwLock<HashMap<String, MockFailure>>>,
    fetch_calls: Arc<RwLock<Vec<String>>>,
}

impl MockFetcher {
    /// Create an empty mock fetcher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a page that will be returned for a URL.
    pub fn add_page(&self, url: impl Into<String>, html: impl Into<String>) {
        self.pages.write().unwrap().insert(url.into(), html.into());
    }

    /// Script a failure for a URL, overriding any canned page.
    pub fn add_failure(&self, url: impl Into<String>, failure: MockFailure) {
        self.failures.write().unwrap().insert(url.into(), failure);
    }

    /// Remove a scripted failure (a later re-run may then succeed).
    pub fn clear_failure(&self, url: &str) {
        self.failures.write().unwrap().remove(url);
    }

    /// Builder form of [`add_page`](Self::add_page).
    pub fn with_page(self, url: impl Into<String>, html: impl Into<String>) -> Self {
        self.add_page(url, html);
        self
    }

    /// Builder form of [`add_failure`](Self::add_failure).
    pub fn with_failure(self, url: impl Into<String>, failure: MockFailure) -> Self {
        self.add_failure(url, failure);
        self
    }

    /// URLs fetched so far, in call order.
    pub fn fetch_calls(&self) -> Vec<String> {
        self.fetch_calls.read().unwrap().clone()
    }

    /// Number of fetches performed.
    pub fn fetch_call_count(&self) -> usize {
        self.fetch_calls.read().unwrap().len()
    }
}

impl Clone for MockFetcher {
    fn clone(&self) -> Self {
        Self {
            pages: Arc::clone(&self.pages),
            failures: Arc::clone(&self.failures),
            fetch_calls: Arc::clone(&self.fetch_calls),
        }
    }
}

#[async_trait]
impl Fetcher for MockFetcher {
    async fn fetch(&self, url: &str) -> FetchResult<FetchedPage> {
        self.fetch_calls.write().unwrap().push(url.to_string());

        if let Some(failure) = self.failures.read().unwrap().get(url) {
            return Err(match failure {
                MockFailure::Timeout => FetchError::Timeout {
                    url: url.to_string(),
                },
                MockFailure::Status(status) => FetchError::Status {
                    url: url.to_string(),
                    status: *status,
                },
                MockFailure::EmptyBody => FetchError::EmptyBody {
                    url: url.to_string(),
                },
            });
        }

        match self.pages.read().unwrap().get(url) {
            Some(html) => Ok(FetchedPage::new(url, html.clone())),
            None => Err(FetchError::Status {
                url: url.to_string(),
                status: 404,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_canned_page() {
        let fetcher = MockFetcher::new().with_page("https://a.test/", "<p>hi</p>");
        let page = fetcher.fetch("https://a.test/").await.unwrap();

        assert_eq!(page.html, "<p>hi</p>");
        assert_eq!(fetcher.fetch_call_count(), 1);
    }

    #[tokio::test]
    async fn test_unknown_url_is_404() {
        let fetcher = MockFetcher::new();
        let err = fetcher.fetch("https://a.test/missing").await.unwrap_err();

        assert!(matches!(err, FetchError::Status { status: 404, .. }));
    }

    #[tokio::test]
    async fn test_scripted_failure_then_recovery() {
        let fetcher = MockFetcher::new()
            .with_page("https://a.test/", "<p>hi</p>")
            .with_failure("https://a.test/", MockFailure::Timeout);

        let err = fetcher.fetch("https://a.test/").await.unwrap_err();
        assert!(matches!(err, FetchError::Timeout { .. }));

        fetcher.clear_failure("https://a.test/");
        assert!(fetcher.fetch("https://a.test/").await.is_ok());
    }
}
