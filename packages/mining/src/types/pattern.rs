//! Pattern types - deduplicated structural shapes and their classification.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Canonical component categories an operator can map a pattern to.
///
/// The set is closed: migration tooling downstream switches on these
/// variants, so free-form labels are deliberately not representable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CanonicalType {
    Unknown,
    HeroBanner,
    ArticleTitle,
    ArticleBody,
    SidebarWidget,
    Navigation,
    Footer,
    ImageGallery,
    AuthorBox,
}

impl CanonicalType {
    /// Operator-facing label, as shown in the pattern library view.
    pub fn label(self) -> &'static str {
        match self {
            CanonicalType::Unknown => "Unknown",
            CanonicalType::HeroBanner => "Hero Banner",
            CanonicalType::ArticleTitle => "Article Title",
            CanonicalType::ArticleBody => "Article Body",
            CanonicalType::SidebarWidget => "Sidebar Widget",
            CanonicalType::Navigation => "Navigation",
            CanonicalType::Footer => "Footer",
            CanonicalType::ImageGallery => "Image Gallery",
            CanonicalType::AuthorBox => "Author Box",
        }
    }

    /// Stable string form used by storage backends.
    pub fn as_str(self) -> &'static str {
        match self {
            CanonicalType::Unknown => "UNKNOWN",
            CanonicalType::HeroBanner => "HERO_BANNER",
            CanonicalType::ArticleTitle => "ARTICLE_TITLE",
            CanonicalType::ArticleBody => "ARTICLE_BODY",
            CanonicalType::SidebarWidget => "SIDEBAR_WIDGET",
            CanonicalType::Navigation => "NAVIGATION",
            CanonicalType::Footer => "FOOTER",
            CanonicalType::ImageGallery => "IMAGE_GALLERY",
            CanonicalType::AuthorBox => "AUTHOR_BOX",
        }
    }

    /// Parse the storage string form.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "UNKNOWN" => Some(CanonicalType::Unknown),
            "HERO_BANNER" => Some(CanonicalType::HeroBanner),
            "ARTICLE_TITLE" => Some(CanonicalType::ArticleTitle),
            "ARTICLE_BODY" => Some(CanonicalType::ArticleBody),
            "SIDEBAR_WIDGET" => Some(CanonicalType::SidebarWidget),
            "NAVIGATION" => Some(CanonicalType::Navigation),
            "FOOTER" => Some(CanonicalType::Footer),
            "IMAGE_GALLERY" => Some(CanonicalType::ImageGallery),
            "AUTHOR_BOX" => Some(CanonicalType::AuthorBox),
            _ => None,
        }
    }
}

impl std::fmt::Display for CanonicalType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Structural fingerprint of one content block.
///
/// This is the value that crosses from the synchronous DOM stage into
/// the storage stage: plain owned strings, no parser handles attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockFingerprint {
    /// Human-readable structure signature, e.g. `DIV > [H1, P, IMG]`
    pub signature: String,

    /// Hex SHA-256 of the signature - the content address
    pub key: String,

    /// Whitespace-collapsed, truncated inner markup kept for inspection.
    /// Never participates in the key.
    pub preview: String,
}

/// A deduplicated structural shape observed across pages of one project.
///
/// At most one record exists per `(project_id, fingerprint)`. The
/// signature and example are the first-seen values; only `frequency`
/// and `canonical_type` change afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentBlockPattern {
    /// Pattern identifier
    pub id: Uuid,

    /// Owning project
    pub project_id: Uuid,

    /// Content-addressed key (hex SHA-256 of the signature)
    pub fingerprint: String,

    /// Human-readable structure signature
    pub signature: String,

    /// Truncated example fragment from the first observation
    pub example_html: String,

    /// How many blocks have folded into this pattern. Only increases.
    pub frequency: i64,

    /// Operator- or heuristic-assigned category
    pub canonical_type: CanonicalType,

    /// When the pattern was first observed
    pub first_seen_at: DateTime<Utc>,

    /// Last fold or reclassification timestamp
    pub updated_at: DateTime<Utc>,
}

impl ContentBlockPattern {
    /// Create a fresh pattern record from a first observation.
    pub fn from_fingerprint(project_id: Uuid, fingerprint: &BlockFingerprint) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            project_id,
            fingerprint: fingerprint.key.clone(),
            signature: fingerprint.signature.clone(),
            example_html: fingerprint.preview.clone(),
            frequency: 1,
            canonical_type: CanonicalType::Unknown,
            first_seen_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_type_round_trip() {
        for ty in [
            CanonicalType::Unknown,
            CanonicalType::HeroBanner,
            CanonicalType::ArticleTitle,
            CanonicalType::ArticleBody,
            CanonicalType::SidebarWidget,
            CanonicalType::Navigation,
            CanonicalType::Footer,
            CanonicalType::ImageGallery,
            CanonicalType::AuthorBox,
        ] {
            assert_eq!(CanonicalType::parse(ty.as_str()), Some(ty));
        }
        assert_eq!(CanonicalType::parse("Hero Banner"), None);
    }

    #[test]
    fn test_new_pattern_defaults() {
        let fp = BlockFingerprint {
            signature: "DIV > [H1, P]".to_string(),
            key: "ab".repeat(32),
            preview: "<h1>Hi</h1><p>There</p>".to_string(),
        };
        let pattern = ContentBlockPattern::from_fingerprint(Uuid::new_v4(), &fp);

        assert_eq!(pattern.frequency, 1);
        assert_eq!(pattern.canonical_type, CanonicalType::Unknown);
        assert_eq!(pattern.signature, fp.signature);
        assert_eq!(pattern.fingerprint, fp.key);
    }
}
