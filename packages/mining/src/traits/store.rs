//! Storage traits for pages and patterns.
//!
//! The storage layer is split into two focused traits:
//! - `PageStore`: inventoried pages and their status state machine
//! - `PatternStore`: the shared, concurrently-updated pattern library
//!
//! Both are object-safe so the pipeline and the API layer can be wired
//! against any transactional backend without changing pipeline code.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::StoreResult;
use crate::types::{
    page::Page,
    pattern::{BlockFingerprint, CanonicalType, ContentBlockPattern},
};

/// Store for inventoried pages.
///
/// Status writes go through the `mark_*` methods so the `PageStatus`
/// transition table is enforced in one place. Writing the status a page
/// already has is a no-op, not an error.
#[async_trait]
pub trait PageStore: Send + Sync {
    /// Insert a page (import step).
    async fn create_page(&self, page: &Page) -> StoreResult<()>;

    /// Get a page by id.
    async fn get_page(&self, page_id: Uuid) -> StoreResult<Option<Page>>;

    /// All pages of a project, in import order.
    async fn list_pages(&self, project_id: Uuid) -> StoreResult<Vec<Page>>;

    /// Pages of a project eligible for analysis (`PENDING` or `ERROR`).
    async fn pages_to_analyze(&self, project_id: Uuid) -> StoreResult<Vec<Page>>;

    /// Reset a page to `PENDING` (re-queue).
    async fn mark_pending(&self, page_id: Uuid) -> StoreResult<()>;

    /// Record a successful analysis, optionally filling in the title
    /// discovered in the fetched document.
    async fn mark_analyzed(&self, page_id: Uuid, title: Option<&str>) -> StoreResult<()>;

    /// Record a failed analysis.
    async fn mark_error(&self, page_id: Uuid) -> StoreResult<()>;
}

/// The shared pattern library, keyed by `(project, fingerprint)`.
#[async_trait]
pub trait PatternStore: Send + Sync {
    /// Fold one observed block into the library.
    ///
    /// First observation creates the record with `frequency = 1` and the
    /// given signature/preview; later observations atomically increment
    /// `frequency` and leave the first-seen example untouched. Safe under
    /// concurrent invocation for the same key: the increment must be a
    /// single atomic operation at the storage layer, not a
    /// read-modify-write.
    async fn upsert_pattern(
        &self,
        project_id: Uuid,
        fingerprint: &BlockFingerprint,
    ) -> StoreResult<ContentBlockPattern>;

    /// Get a pattern by id.
    async fn get_pattern(&self, pattern_id: Uuid) -> StoreResult<Option<ContentBlockPattern>>;

    /// All patterns of a project, ordered by frequency descending.
    async fn list_patterns(&self, project_id: Uuid) -> StoreResult<Vec<ContentBlockPattern>>;

    /// Operator-driven reclassification. Idempotent; fails with
    /// `StoreError::PatternNotFound` for an unknown id.
    async fn reclassify(
        &self,
        pattern_id: Uuid,
        canonical_type: CanonicalType,
    ) -> StoreResult<ContentBlockPattern>;
}
