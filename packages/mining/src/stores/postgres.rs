//! PostgreSQL storage implementation.
//!
//! A production storage backend. The pattern upsert is a single
//! `INSERT ... ON CONFLICT DO UPDATE` statement, so concurrent jobs
//! folding the same fingerprint increment the counter atomically at the
//! database rather than racing through read-modify-write.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::FromRow;
use tracing::debug;
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};
use crate::traits::store::{PageStore, PatternStore};
use crate::types::{
    page::{Page, PageStatus},
    pattern::{BlockFingerprint, CanonicalType, ContentBlockPattern},
};

/// PostgreSQL-based page and pattern store.
pub struct PostgresStore {
    pool: PgPool,
}

#[derive(FromRow)]
struct PageRow {
    id: Uuid,
    project_id: Uuid,
    url: String,
    title: Option<String>,
    language: Option<String>,
    target_url: Option<String>,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl PageRow {
    fn into_page(self) -> StoreResult<Page> {
        let status = PageStatus::parse(&self.status).ok_or_else(|| {
            StoreError::Backend(format!("unknown page status: {}", self.status).into())
        })?;

        Ok(Page {
            id: self.id,
            project_id: self.project_id,
            url: self.url,
            title: self.title,
            language: self.language,
            target_url: self.target_url,
            status,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(FromRow)]
struct PatternRow {
    id: Uuid,
    project_id: Uuid,
    fingerprint: String,
    signature: String,
    example_html: String,
    frequency: i64,
    canonical_type: String,
    first_seen_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl PatternRow {
    fn into_pattern(self) -> StoreResult<ContentBlockPattern> {
        let canonical_type = CanonicalType::parse(&self.canonical_type).ok_or_else(|| {
            StoreError::Backend(format!("unknown canonical type: {}", self.canonical_type).into())
        })?;

        Ok(ContentBlockPattern {
            id: self.id,
            project_id: self.project_id,
            fingerprint: self.fingerprint,
            signature: self.signature,
            example_html: self.example_html,
            frequency: self.frequency,
            canonical_type,
            first_seen_at: self.first_seen_at,
            updated_at: self.updated_at,
        })
    }
}

impl PostgresStore {
    /// Create a new PostgreSQL store with the given connection URL.
    pub async fn new(database_url: &str) -> StoreResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await
            .map_err(|e| StoreError::Backend(e.to_string().into()))?;

        Self::from_pool(pool).await
    }

    /// Create a PostgreSQL store from an existing connection pool.
    ///
    /// Use this when the application already has a pool (e.g., the
    /// server's `PgPool`); it avoids opening duplicate connections.
    pub async fn from_pool(pool: PgPool) -> StoreResult<Self> {
        let store = Self { pool };
        store.run_migrations().await?;
        Ok(store)
    }

    /// Get the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Run idempotent schema migrations.
    async fn run_migrations(&self) -> StoreResult<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS pages (
                id UUID PRIMARY KEY,
                project_id UUID NOT NULL,
                url TEXT NOT NULL,
                title TEXT,
                language TEXT,
                target_url TEXT,
                status TEXT NOT NULL DEFAULT 'PENDING',
                created_at TIMESTAMPTZ NOT NULL,
                updated_at TIMESTAMPTZ NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::Backend(e.to_string().into()))?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_pages_project_status ON pages(project_id, status)",
        )
        .execute(&self.pool)
        .await
        .ok();

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS content_block_patterns (
                id UUID PRIMARY KEY,
                project_id UUID NOT NULL,
                fingerprint TEXT NOT NULL,
                signature TEXT NOT NULL,
                example_html TEXT NOT NULL,
                frequency BIGINT NOT NULL DEFAULT 1,
                canonical_type TEXT NOT NULL DEFAULT 'UNKNOWN',
                first_seen_at TIMESTAMPTZ NOT NULL,
                updated_at TIMESTAMPTZ NOT NULL,
                UNIQUE (project_id, fingerprint)
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::Backend(e.to_string().into()))?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_patterns_project_frequency ON content_block_patterns(project_id, frequency DESC)",
        )
        .execute(&self.pool)
        .await
        .ok();

        debug!("pattern store migrations applied");
        Ok(())
    }

    async fn set_status(
        &self,
        page_id: Uuid,
        status: PageStatus,
        title: Option<&str>,
    ) -> StoreResult<()> {
        let current = self
            .get_page(page_id)
            .await?
            .ok_or(StoreError::PageNotFound { id: page_id })?;

        if current.status != status && !current.status.can_transition(status) {
            return Err(StoreError::InvalidTransition {
                from: current.status,
                to: status,
            });
        }

        sqlx::query(
            r#"
            UPDATE pages
            SET status = $2,
                title = COALESCE($3, title),
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(page_id)
        .bind(status.as_str())
        .bind(title)
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::Backend(e.to_string().into()))?;

        Ok(())
    }
}

#[async_trait]
impl PageStore for PostgresStore {
    async fn create_page(&self, page: &Page) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO pages (id, project_id, url, title, language, target_url, status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(page.id)
        .bind(page.project_id)
        .bind(&page.url)
        .bind(&page.title)
        .bind(&page.language)
        .bind(&page.target_url)
        .bind(page.status.as_str())
        .bind(page.created_at)
        .bind(page.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::Backend(e.to_string().into()))?;

        Ok(())
    }

    async fn get_page(&self, page_id: Uuid) -> StoreResult<Option<Page>> {
        let row = sqlx::query_as::<_, PageRow>("SELECT * FROM pages WHERE id = $1")
            .bind(page_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::Backend(e.to_string().into()))?;

        row.map(PageRow::into_page).transpose()
    }

    async fn list_pages(&self, project_id: Uuid) -> StoreResult<Vec<Page>> {
        let rows = sqlx::query_as::<_, PageRow>(
            "SELECT * FROM pages WHERE project_id = $1 ORDER BY created_at",
        )
        .bind(project_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::Backend(e.to_string().into()))?;

        rows.into_iter().map(PageRow::into_page).collect()
    }

    async fn pages_to_analyze(&self, project_id: Uuid) -> StoreResult<Vec<Page>> {
        let rows = sqlx::query_as::<_, PageRow>(
            r#"
            SELECT * FROM pages
            WHERE project_id = $1 AND status IN ('PENDING', 'ERROR')
            ORDER BY created_at
            "#,
        )
        .bind(project_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::Backend(e.to_string().into()))?;

        rows.into_iter().map(PageRow::into_page).collect()
    }

    async fn mark_pending(&self, page_id: Uuid) -> StoreResult<()> {
        self.set_status(page_id, PageStatus::Pending, None).await
    }

    async fn mark_analyzed(&self, page_id: Uuid, title: Option<&str>) -> StoreResult<()> {
        self.set_status(page_id, PageStatus::Analyzed, title).await
    }

    async fn mark_error(&self, page_id: Uuid) -> StoreResult<()> {
        self.set_status(page_id, PageStatus::Error, None).await
    }
}

#[async_trait]
impl PatternStore for PostgresStore {
    async fn upsert_pattern(
        &self,
        project_id: Uuid,
        fingerprint: &BlockFingerprint,
    ) -> StoreResult<ContentBlockPattern> {
        // Single atomic create-or-increment; the first-seen signature and
        // example survive every later fold.
        let row = sqlx::query_as::<_, PatternRow>(
            r#"
            INSERT INTO content_block_patterns
                (id, project_id, fingerprint, signature, example_html, frequency, canonical_type, first_seen_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, 1, 'UNKNOWN', NOW(), NOW())
            ON CONFLICT (project_id, fingerprint)
            DO UPDATE SET
                frequency = content_block_patterns.frequency + 1,
                updated_at = NOW()
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(project_id)
        .bind(&fingerprint.key)
        .bind(&fingerprint.signature)
        .bind(&fingerprint.preview)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| StoreError::Backend(e.to_string().into()))?;

        row.into_pattern()
    }

    async fn get_pattern(&self, pattern_id: Uuid) -> StoreResult<Option<ContentBlockPattern>> {
        let row = sqlx::query_as::<_, PatternRow>(
            "SELECT * FROM content_block_patterns WHERE id = $1",
        )
        .bind(pattern_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::Backend(e.to_string().into()))?;

        row.map(PatternRow::into_pattern).transpose()
    }

    async fn list_patterns(&self, project_id: Uuid) -> StoreResult<Vec<ContentBlockPattern>> {
        let rows = sqlx::query_as::<_, PatternRow>(
            r#"
            SELECT * FROM content_block_patterns
            WHERE project_id = $1
            ORDER BY frequency DESC, first_seen_at
            "#,
        )
        .bind(project_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::Backend(e.to_string().into()))?;

        rows.into_iter().map(PatternRow::into_pattern).collect()
    }

    async fn reclassify(
        &self,
        pattern_id: Uuid,
        canonical_type: CanonicalType,
    ) -> StoreResult<ContentBlockPattern> {
        let row = sqlx::query_as::<_, PatternRow>(
            r#"
            UPDATE content_block_patterns
            SET canonical_type = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(pattern_id)
        .bind(canonical_type.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::Backend(e.to_string().into()))?;

        row.ok_or(StoreError::PatternNotFound { id: pattern_id })?
            .into_pattern()
    }
}
