//! Heuristic component classifier.
//!
//! A stateless rule engine that proposes a canonical component type for
//! an element from its tag name, id and class tokens. The dictionary is
//! an explicit ordered slice, so priority is carried by the container
//! itself rather than by map iteration order. Pure function: safe to
//! call from any concurrency context, including inside a render loop.

use crate::types::pattern::CanonicalType;

/// Ordered rule chain: first matching type wins.
pub const CLASSIFICATION_RULES: &[(CanonicalType, &[&str])] = &[
    (
        CanonicalType::HeroBanner,
        &["hero", "banner", "jumbotron", "featured-image", "cover"],
    ),
    (
        CanonicalType::ArticleTitle,
        &["entry-title", "post-title", "page-title", "headline", "h1"],
    ),
    (
        CanonicalType::ArticleBody,
        &["entry-content", "post-content", "article-body", "rich-text"],
    ),
    (
        CanonicalType::SidebarWidget,
        &["widget", "sidebar", "aside", "module", "secondary"],
    ),
    (
        CanonicalType::Navigation,
        &["nav", "menu", "breadcrumbs", "header"],
    ),
    (CanonicalType::Footer, &["footer", "colophon", "site-info"]),
    (
        CanonicalType::ImageGallery,
        &["gallery", "slider", "carousel", "wp-block-gallery"],
    ),
    (CanonicalType::AuthorBox, &["author", "bio", "meta"]),
];

/// Fallbacks applied by tag name when no dictionary rule matched.
const TAG_FALLBACKS: &[(&str, CanonicalType)] = &[
    ("h1", CanonicalType::ArticleTitle),
    ("nav", CanonicalType::Navigation),
    ("aside", CanonicalType::SidebarWidget),
    ("footer", CanonicalType::Footer),
];

/// Tokens too generic for the substring rule; honored only through the
/// tag fallback table ("h1" would otherwise match any class containing it).
const TAG_ONLY_KEYWORDS: &[&str] = &["h1"];

/// Propose a canonical type for an element, or `None` if nothing matches.
///
/// A keyword matches when it is a substring of the lowercased class
/// attribute, a substring of the lowercased id, or exactly equal to the
/// lowercased tag name.
pub fn classify(tag_name: &str, id_attr: &str, class_attr: &str) -> Option<CanonicalType> {
    let tag = tag_name.to_lowercase();
    let id = id_attr.to_lowercase();
    let class = class_attr.to_lowercase();

    for (canonical_type, keywords) in CLASSIFICATION_RULES {
        let matched = keywords.iter().any(|keyword| {
            if TAG_ONLY_KEYWORDS.contains(keyword) {
                return false;
            }
            class.contains(keyword) || id.contains(keyword) || tag == *keyword
        });

        if matched {
            return Some(*canonical_type);
        }
    }

    TAG_FALLBACKS
        .iter()
        .find(|(fallback_tag, _)| tag == *fallback_tag)
        .map(|(_, canonical_type)| *canonical_type)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_substring_match() {
        assert_eq!(
            classify("div", "", "site-hero full-width"),
            Some(CanonicalType::HeroBanner)
        );
        assert_eq!(
            classify("div", "", "entry-content"),
            Some(CanonicalType::ArticleBody)
        );
    }

    #[test]
    fn test_id_substring_match() {
        assert_eq!(
            classify("div", "main-menu", ""),
            Some(CanonicalType::Navigation)
        );
    }

    #[test]
    fn test_dictionary_order_is_priority() {
        // "hero" (Hero Banner) and "menu" (Navigation) both appear;
        // Hero Banner is listed first and must win.
        assert_eq!(
            classify("div", "", "hero jumbotron menu"),
            Some(CanonicalType::HeroBanner)
        );
    }

    #[test]
    fn test_tag_name_exact_match() {
        assert_eq!(classify("nav", "", ""), Some(CanonicalType::Navigation));
        assert_eq!(classify("footer", "", ""), Some(CanonicalType::Footer));
    }

    #[test]
    fn test_h1_keyword_never_matches_by_substring() {
        // A class merely containing "h1" must not look like a title.
        assert_eq!(classify("div", "", "sh1mmer"), None);
        assert_eq!(classify("div", "mh1", ""), None);
    }

    #[test]
    fn test_tag_fallbacks() {
        assert_eq!(classify("h1", "", ""), Some(CanonicalType::ArticleTitle));
        assert_eq!(classify("aside", "", ""), Some(CanonicalType::SidebarWidget));
    }

    #[test]
    fn test_no_match_is_none() {
        assert_eq!(classify("div", "", ""), None);
        assert_eq!(classify("span", "x", "y z"), None);
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(
            classify("DIV", "", "Hero-Section"),
            Some(CanonicalType::HeroBanner)
        );
        assert_eq!(classify("NAV", "", ""), Some(CanonicalType::Navigation));
    }
}
