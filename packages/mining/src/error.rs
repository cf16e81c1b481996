//! Typed errors for the mining library.
//!
//! Uses `thiserror` for library errors (not `anyhow`) to provide
//! strongly-typed, composable error handling.

use thiserror::Error;
use uuid::Uuid;

use crate::types::page::PageStatus;

/// Errors that can occur while analyzing a single page.
///
/// All variants are page-local: callers convert them into a page-level
/// `ERROR` status at the job boundary, and one page's failure never
/// affects another in-flight job.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Fetching the page markup failed
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),

    /// Storage operation failed
    #[error("storage error: {0}")]
    Store(#[from] StoreError),
}

/// Errors that can occur while fetching page markup.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Server answered with a non-success status
    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    /// Connection-level failure
    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Request exceeded the configured timeout
    #[error("timeout fetching {url}")]
    Timeout { url: String },

    /// Response body was empty or not text
    #[error("empty body from {url}")]
    EmptyBody { url: String },

    /// Invalid URL format
    #[error("invalid URL: {url}")]
    InvalidUrl { url: String },
}

/// Errors raised by page and pattern stores.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Backend failure (connection, constraint, serialization)
    #[error("storage backend error: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Pattern not found by id
    #[error("pattern not found: {id}")]
    PatternNotFound { id: Uuid },

    /// Page not found by id
    #[error("page not found: {id}")]
    PageNotFound { id: Uuid },

    /// Requested page status change is not allowed
    #[error("invalid status transition: {from} -> {to}")]
    InvalidTransition { from: PageStatus, to: PageStatus },
}

/// Result type alias for analysis operations.
pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Result type alias for fetch operations.
pub type FetchResult<T> = std::result::Result<T, FetchError>;

/// Result type alias for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;
