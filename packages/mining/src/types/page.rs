//! Page types - inventoried URLs and their analysis status.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Analysis status of an inventoried page.
///
/// The lifecycle is a small state machine:
///
/// ```text
/// PENDING ──► ANALYZED ──┐
///    ▲  └───► ERROR ──┐  │
///    └────────────────┴──┘  (re-schedule resets to PENDING)
/// ```
///
/// Neither terminal state is permanent; re-queuing a page moves it back
/// to `Pending` and a later run may land on either outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PageStatus {
    Pending,
    Analyzed,
    Error,
}

impl PageStatus {
    /// Check whether a transition from `self` to `to` is allowed.
    ///
    /// Same-state writes are not transitions; stores treat them as no-ops.
    pub fn can_transition(self, to: PageStatus) -> bool {
        matches!(
            (self, to),
            (PageStatus::Pending, PageStatus::Analyzed)
                | (PageStatus::Pending, PageStatus::Error)
                | (PageStatus::Analyzed, PageStatus::Pending)
                | (PageStatus::Error, PageStatus::Pending)
        )
    }

    /// Stable string form used by storage backends.
    pub fn as_str(self) -> &'static str {
        match self {
            PageStatus::Pending => "PENDING",
            PageStatus::Analyzed => "ANALYZED",
            PageStatus::Error => "ERROR",
        }
    }

    /// Parse the storage string form.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "PENDING" => Some(PageStatus::Pending),
            "ANALYZED" => Some(PageStatus::Analyzed),
            "ERROR" => Some(PageStatus::Error),
            _ => None,
        }
    }
}

impl std::fmt::Display for PageStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One inventoried URL belonging to a project.
///
/// Pages are created by the inventory import in `Pending` state and
/// mutated only by the analysis pipeline afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    /// Page identifier
    pub id: Uuid,

    /// Owning project
    pub project_id: Uuid,

    /// Source URL to analyze
    pub url: String,

    /// Page title (from the import, or filled in during analysis)
    pub title: Option<String>,

    /// Content language from the import, if known
    pub language: Option<String>,

    /// Migration target URL from the import, if known
    pub target_url: Option<String>,

    /// Analysis status
    pub status: PageStatus,

    /// When the page was imported
    pub created_at: DateTime<Utc>,

    /// Last mutation timestamp
    pub updated_at: DateTime<Utc>,
}

impl Page {
    /// Create a new pending page for a project.
    pub fn new(project_id: Uuid, url: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            project_id,
            url: url.into(),
            title: None,
            language: None,
            target_url: None,
            status: PageStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    /// Set the imported title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the imported language.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Set the migration target URL.
    pub fn with_target_url(mut self, target_url: impl Into<String>) -> Self {
        self.target_url = Some(target_url.into());
        self
    }

    /// Whether this page should be picked up by the next analysis run.
    pub fn needs_analysis(&self) -> bool {
        matches!(self.status, PageStatus::Pending | PageStatus::Error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_transitions() {
        assert!(PageStatus::Pending.can_transition(PageStatus::Analyzed));
        assert!(PageStatus::Pending.can_transition(PageStatus::Error));
        assert!(PageStatus::Analyzed.can_transition(PageStatus::Pending));
        assert!(PageStatus::Error.can_transition(PageStatus::Pending));

        // Terminal states never flip directly into each other
        assert!(!PageStatus::Analyzed.can_transition(PageStatus::Error));
        assert!(!PageStatus::Error.can_transition(PageStatus::Analyzed));
        assert!(!PageStatus::Pending.can_transition(PageStatus::Pending));
    }

    #[test]
    fn test_status_round_trip() {
        for status in [PageStatus::Pending, PageStatus::Analyzed, PageStatus::Error] {
            assert_eq!(PageStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(PageStatus::parse("DONE"), None);
    }

    #[test]
    fn test_import_builders() {
        let page = Page::new(Uuid::new_v4(), "https://example.com/o-nas")
            .with_title("O nas")
            .with_language("pl")
            .with_target_url("https://new.example.com/about");

        assert_eq!(page.title.as_deref(), Some("O nas"));
        assert_eq!(page.language.as_deref(), Some("pl"));
        assert_eq!(
            page.target_url.as_deref(),
            Some("https://new.example.com/about")
        );
        assert_eq!(page.status, PageStatus::Pending);
    }

    #[test]
    fn test_needs_analysis() {
        let project_id = Uuid::new_v4();
        let mut page = Page::new(project_id, "https://example.com/about");
        assert!(page.needs_analysis());

        page.status = PageStatus::Analyzed;
        assert!(!page.needs_analysis());

        page.status = PageStatus::Error;
        assert!(page.needs_analysis());
    }
}
