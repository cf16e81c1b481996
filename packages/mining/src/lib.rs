//! Structural Pattern Mining Library
//!
//! Mines inventories of legacy web pages for recurring structural
//! patterns (repeated markup shapes) so an operator can classify each
//! shape once and reuse that decision across an entire site migration.
//!
//! The analysis of one page is a straight pipeline:
//!
//! ```text
//! fetch -> normalize -> segment -> fingerprint -> fold into pattern library
//! ```
//!
//! Blocks are immediate children of the page's content root; two blocks
//! with the same tag and the same ordered child-tag list share a
//! fingerprint and collapse into one pattern per project, however much
//! their copy differs.
//!
//! # Usage
//!
//! ```rust,ignore
//! use mining::{analyze_page, HttpFetcher, MemoryStore};
//!
//! let fetcher = HttpFetcher::new();
//! let store = MemoryStore::new();
//! let analysis = analyze_page(project_id, "https://old.example.com/about", &fetcher, &store).await?;
//! println!("{} blocks folded", analysis.blocks_folded);
//! ```
//!
//! # Modules
//!
//! - [`traits`] - Core trait abstractions (Fetcher, PageStore, PatternStore)
//! - [`types`] - Pages, patterns and canonical component types
//! - [`pipeline`] - Normalization, segmentation, fingerprinting, analysis
//! - [`classify`] - Heuristic component classifier
//! - [`stores`] - Storage implementations (MemoryStore, PostgresStore)
//! - [`fetchers`] - Fetcher implementations (HttpFetcher)
//! - [`testing`] - Mock implementations for testing

pub mod classify;
pub mod error;
pub mod fetchers;
pub mod pipeline;
pub mod stores;
pub mod testing;
pub mod traits;
pub mod types;

// Re-export core types at crate root
pub use error::{AnalysisError, FetchError, StoreError};
pub use traits::{
    fetcher::{FetchedPage, Fetcher},
    store::{PageStore, PatternStore},
};
pub use types::{
    page::{Page, PageStatus},
    pattern::{BlockFingerprint, CanonicalType, ContentBlockPattern},
};

// Re-export pipeline entry points
pub use pipeline::{
    analyze_page, extract_block_fingerprints, extract_title, normalize_markup, PageAnalysis,
};

// Re-export the classifier
pub use classify::{classify, CLASSIFICATION_RULES};

// Re-export fetchers and stores
pub use fetchers::HttpFetcher;
pub use stores::MemoryStore;

#[cfg(feature = "postgres")]
pub use stores::PostgresStore;
