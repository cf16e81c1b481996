//! Fetcher implementations.
//!
//! - `HttpFetcher` - reqwest-backed fetcher (always available)
//! - `mining::testing::MockFetcher` - canned responses for tests

pub mod http;

pub use http::HttpFetcher;
