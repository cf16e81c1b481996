//! DOM normalization - strip non-content nodes before structural analysis.

use regex::Regex;
use scraper::{Html, Selector};

/// Elements that carry scripting, styling or embed noise rather than
/// layout structure. Their subtrees never participate in a signature.
const NON_CONTENT_SELECTORS: &[&str] = &[
    "script",
    "style",
    "noscript",
    "template",
    "iframe",
    "embed",
    "object",
    "meta",
    "link",
];

/// Strip scripts, styles, comments, embeds and metadata from raw markup.
///
/// Structural signatures should reflect layout, not scripting/style
/// noise. Idempotent: normalizing an already-clean document returns it
/// unchanged.
pub fn normalize_markup(markup: &str) -> String {
    // Comments are not elements, so a selector cannot reach them
    let comment_pattern = Regex::new(r"(?s)<!--.*?-->").unwrap();
    let mut cleaned = comment_pattern.replace_all(markup, "").to_string();

    let document = Html::parse_document(&cleaned);
    for selector_str in NON_CONTENT_SELECTORS {
        if let Ok(selector) = Selector::parse(selector_str) {
            for element in document.select(&selector) {
                let element_html = element.html();
                if !element_html.is_empty() {
                    cleaned = cleaned.replace(&element_html, "");
                }
            }
        }
    }

    cleaned
}
