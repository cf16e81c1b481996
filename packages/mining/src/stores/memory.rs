//! In-memory storage implementation for testing and development.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::RwLock;
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};
use crate::traits::store::{PageStore, PatternStore};
use crate::types::{
    page::{Page, PageStatus},
    pattern::{BlockFingerprint, CanonicalType, ContentBlockPattern},
};

/// In-memory store for pages and patterns.
///
/// Useful for testing and development. Not suitable for production
/// as data is lost on restart. Pattern upserts take the write lock for
/// the whole create-or-increment, so concurrent folds of the same
/// fingerprint never race.
pub struct MemoryStore {
    pages: RwLock<HashMap<Uuid, Page>>,
    patterns: RwLock<HashMap<(Uuid, String), ContentBlockPattern>>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Create a new empty memory store.
    pub fn new() -> Self {
        Self {
            pages: RwLock::new(HashMap::new()),
            patterns: RwLock::new(HashMap::new()),
        }
    }

    /// Clear all stored data.
    pub fn clear(&self) {
        self.pages.write().unwrap().clear();
        self.patterns.write().unwrap().clear();
    }

    /// Get the number of stored pages.
    pub fn page_count(&self) -> usize {
        self.pages.read().unwrap().len()
    }

    /// Get the number of stored patterns.
    pub fn pattern_count(&self) -> usize {
        self.patterns.read().unwrap().len()
    }

    fn set_status(
        &self,
        page_id: Uuid,
        status: PageStatus,
        title: Option<&str>,
    ) -> StoreResult<()> {
        let mut pages = self.pages.write().unwrap();
        let page = pages
            .get_mut(&page_id)
            .ok_or(StoreError::PageNotFound { id: page_id })?;

        if page.status != status {
            if !page.status.can_transition(status) {
                return Err(StoreError::InvalidTransition {
                    from: page.status,
                    to: status,
                });
            }
            page.status = status;
        }

        if let Some(title) = title {
            page.title = Some(title.to_string());
        }
        page.updated_at = Utc::now();

        Ok(())
    }
}

#[async_trait]
impl PageStore for MemoryStore {
    async fn create_page(&self, page: &Page) -> StoreResult<()> {
        self.pages.write().unwrap().insert(page.id, page.clone());
        Ok(())
    }

    async fn get_page(&self, page_id: Uuid) -> StoreResult<Option<Page>> {
        Ok(self.pages.read().unwrap().get(&page_id).cloned())
    }

    async fn list_pages(&self, project_id: Uuid) -> StoreResult<Vec<Page>> {
        let mut pages: Vec<Page> = self
            .pages
            .read()
            .unwrap()
            .values()
            .filter(|p| p.project_id == project_id)
            .cloned()
            .collect();

        pages.sort_by_key(|p| p.created_at);
        Ok(pages)
    }

    async fn pages_to_analyze(&self, project_id: Uuid) -> StoreResult<Vec<Page>> {
        let mut pages: Vec<Page> = self
            .pages
            .read()
            .unwrap()
            .values()
            .filter(|p| p.project_id == project_id && p.needs_analysis())
            .cloned()
            .collect();

        pages.sort_by_key(|p| p.created_at);
        Ok(pages)
    }

    async fn mark_pending(&self, page_id: Uuid) -> StoreResult<()> {
        self.set_status(page_id, PageStatus::Pending, None)
    }

    async fn mark_analyzed(&self, page_id: Uuid, title: Option<&str>) -> StoreResult<()> {
        self.set_status(page_id, PageStatus::Analyzed, title)
    }

    async fn mark_error(&self, page_id: Uuid) -> StoreResult<()> {
        self.set_status(page_id, PageStatus::Error, None)
    }
}

#[async_trait]
impl PatternStore for MemoryStore {
    async fn upsert_pattern(
        &self,
        project_id: Uuid,
        fingerprint: &BlockFingerprint,
    ) -> StoreResult<ContentBlockPattern> {
        let mut patterns = self.patterns.write().unwrap();

        let record = patterns
            .entry((project_id, fingerprint.key.clone()))
            .and_modify(|existing| {
                // First-seen signature/example retained; only the counter moves
                existing.frequency += 1;
                existing.updated_at = Utc::now();
            })
            .or_insert_with(|| ContentBlockPattern::from_fingerprint(project_id, fingerprint));

        Ok(record.clone())
    }

    async fn get_pattern(&self, pattern_id: Uuid) -> StoreResult<Option<ContentBlockPattern>> {
        Ok(self
            .patterns
            .read()
            .unwrap()
            .values()
            .find(|p| p.id == pattern_id)
            .cloned())
    }

    async fn list_patterns(&self, project_id: Uuid) -> StoreResult<Vec<ContentBlockPattern>> {
        let mut patterns: Vec<ContentBlockPattern> = self
            .patterns
            .read()
            .unwrap()
            .values()
            .filter(|p| p.project_id == project_id)
            .cloned()
            .collect();

        patterns.sort_by(|a, b| {
            b.frequency
                .cmp(&a.frequency)
                .then(a.first_seen_at.cmp(&b.first_seen_at))
        });
        Ok(patterns)
    }

    async fn reclassify(
        &self,
        pattern_id: Uuid,
        canonical_type: CanonicalType,
    ) -> StoreResult<ContentBlockPattern> {
        let mut patterns = self.patterns.write().unwrap();

        let record = patterns
            .values_mut()
            .find(|p| p.id == pattern_id)
            .ok_or(StoreError::PatternNotFound { id: pattern_id })?;

        record.canonical_type = canonical_type;
        record.updated_at = Utc::now();
        Ok(record.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fingerprint(signature: &str, preview: &str) -> BlockFingerprint {
        BlockFingerprint {
            signature: signature.to_string(),
            key: crate::pipeline::signature_key(signature),
            preview: preview.to_string(),
        }
    }

    #[tokio::test]
    async fn test_upsert_creates_then_increments() {
        let store = MemoryStore::new();
        let project_id = Uuid::new_v4();
        let fp = fingerprint("DIV > [H1, P]", "<h1>a</h1><p>b</p>");

        let first = store.upsert_pattern(project_id, &fp).await.unwrap();
        assert_eq!(first.frequency, 1);
        assert_eq!(first.canonical_type, CanonicalType::Unknown);

        let second = store.upsert_pattern(project_id, &fp).await.unwrap();
        assert_eq!(second.frequency, 2);
        assert_eq!(second.id, first.id);
        assert_eq!(store.pattern_count(), 1);
    }

    #[tokio::test]
    async fn test_first_seen_example_is_retained() {
        let store = MemoryStore::new();
        let project_id = Uuid::new_v4();

        let original = fingerprint("DIV > [H1]", "<h1>original</h1>");
        store.upsert_pattern(project_id, &original).await.unwrap();

        let later = BlockFingerprint {
            preview: "<h1>different copy</h1>".to_string(),
            ..original.clone()
        };
        let record = store.upsert_pattern(project_id, &later).await.unwrap();

        assert_eq!(record.example_html, "<h1>original</h1>");
        assert_eq!(record.frequency, 2);
    }

    #[tokio::test]
    async fn test_frequency_is_monotonic() {
        let store = MemoryStore::new();
        let project_id = Uuid::new_v4();
        let fp = fingerprint("UL > [LI, LI, LI]", "<li>x</li>");

        for expected in 1..=5 {
            let record = store.upsert_pattern(project_id, &fp).await.unwrap();
            assert_eq!(record.frequency, expected);
        }
    }

    #[tokio::test]
    async fn test_projects_do_not_share_patterns() {
        let store = MemoryStore::new();
        let fp = fingerprint("DIV > [IMG]", "<img>");

        store.upsert_pattern(Uuid::new_v4(), &fp).await.unwrap();
        let other = store.upsert_pattern(Uuid::new_v4(), &fp).await.unwrap();

        assert_eq!(other.frequency, 1);
        assert_eq!(store.pattern_count(), 2);
    }

    #[tokio::test]
    async fn test_list_is_frequency_descending() {
        let store = MemoryStore::new();
        let project_id = Uuid::new_v4();

        let rare = fingerprint("ASIDE > [UL]", "<ul></ul>");
        let common = fingerprint("DIV > [H1, P]", "<h1>t</h1>");

        store.upsert_pattern(project_id, &rare).await.unwrap();
        for _ in 0..3 {
            store.upsert_pattern(project_id, &common).await.unwrap();
        }

        let listed = store.list_patterns(project_id).await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].signature, "DIV > [H1, P]");
        assert_eq!(listed[0].frequency, 3);
        assert_eq!(listed[1].frequency, 1);
    }

    #[tokio::test]
    async fn test_reclassify() {
        let store = MemoryStore::new();
        let project_id = Uuid::new_v4();
        let fp = fingerprint("DIV > [H1, P]", "<h1>t</h1>");

        let pattern = store.upsert_pattern(project_id, &fp).await.unwrap();
        let updated = store
            .reclassify(pattern.id, CanonicalType::HeroBanner)
            .await
            .unwrap();
        assert_eq!(updated.canonical_type, CanonicalType::HeroBanner);

        let fetched = store.get_pattern(pattern.id).await.unwrap().unwrap();
        assert_eq!(fetched.canonical_type, CanonicalType::HeroBanner);

        // Idempotent
        let again = store
            .reclassify(pattern.id, CanonicalType::HeroBanner)
            .await
            .unwrap();
        assert_eq!(again.canonical_type, CanonicalType::HeroBanner);
    }

    #[tokio::test]
    async fn test_reclassify_unknown_id() {
        let store = MemoryStore::new();
        let err = store
            .reclassify(Uuid::new_v4(), CanonicalType::Footer)
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::PatternNotFound { .. }));
    }

    #[tokio::test]
    async fn test_page_status_state_machine() {
        let store = MemoryStore::new();
        let project_id = Uuid::new_v4();
        let page = Page::new(project_id, "https://example.com/");
        store.create_page(&page).await.unwrap();

        store.mark_analyzed(page.id, Some("Home")).await.unwrap();
        let stored = store.get_page(page.id).await.unwrap().unwrap();
        assert_eq!(stored.status, PageStatus::Analyzed);
        assert_eq!(stored.title.as_deref(), Some("Home"));

        // ANALYZED -> ERROR is not a legal transition
        let err = store.mark_error(page.id).await.unwrap_err();
        assert!(matches!(err, StoreError::InvalidTransition { .. }));

        // Re-queue and fail the second run
        store.mark_pending(page.id).await.unwrap();
        store.mark_error(page.id).await.unwrap();
        let stored = store.get_page(page.id).await.unwrap().unwrap();
        assert_eq!(stored.status, PageStatus::Error);
    }

    #[tokio::test]
    async fn test_pages_to_analyze_selects_pending_and_error() {
        let store = MemoryStore::new();
        let project_id = Uuid::new_v4();

        let pending = Page::new(project_id, "https://example.com/a");
        let failed = Page::new(project_id, "https://example.com/b");
        let done = Page::new(project_id, "https://example.com/c");

        store.create_page(&pending).await.unwrap();
        store.create_page(&failed).await.unwrap();
        store.create_page(&done).await.unwrap();

        store.mark_error(failed.id).await.unwrap();
        store.mark_analyzed(done.id, None).await.unwrap();

        let eligible = store.pages_to_analyze(project_id).await.unwrap();
        let urls: Vec<_> = eligible.iter().map(|p| p.url.as_str()).collect();

        assert_eq!(eligible.len(), 2);
        assert!(urls.contains(&"https://example.com/a"));
        assert!(urls.contains(&"https://example.com/b"));
    }
}
