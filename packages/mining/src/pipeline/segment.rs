//! Block segmentation - locate the content root and enumerate its blocks.

use scraper::{ElementRef, Html, Selector};

/// Root-selection policy, in priority order. The narrowest
/// semantically-content-bearing container wins, which keeps
/// navigation/footer chrome out of the block list.
const ROOT_SELECTORS: &[&str] = &[
    r#"main, [role="main"]"#,
    r#"article, [role="article"]"#,
    "body",
];

/// Find the primary content root of a document.
///
/// Falls back to the document root element when not even a `body` is
/// resolvable (fragment input); an unresolvable root degrades to the
/// full document rather than failing.
pub fn content_root(document: &Html) -> ElementRef<'_> {
    for selector_str in ROOT_SELECTORS {
        if let Ok(selector) = Selector::parse(selector_str) {
            if let Some(root) = document.select(&selector).next() {
                return root;
            }
        }
    }

    document.root_element()
}

/// Immediate child elements of the root, in document order.
///
/// An empty root yields an empty sequence - not an error.
pub fn blocks(root: ElementRef<'_>) -> Vec<ElementRef<'_>> {
    root.children().filter_map(ElementRef::wrap).collect()
}
