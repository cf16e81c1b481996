//! Per-page analysis - drives fetch -> normalize -> segment -> fingerprint -> fold.

use scraper::{Html, Selector};
use tracing::debug;
use uuid::Uuid;

use crate::error::Result;
use crate::pipeline::fingerprint::fingerprint_block;
use crate::pipeline::normalize::normalize_markup;
use crate::pipeline::segment::{blocks, content_root};
use crate::traits::{fetcher::Fetcher, store::PatternStore};
use crate::types::pattern::BlockFingerprint;

/// Outcome of one successful page analysis.
#[derive(Debug, Clone)]
pub struct PageAnalysis {
    /// Number of blocks folded into the pattern library
    pub blocks_folded: usize,

    /// Document title, when the page carried one
    pub title: Option<String>,
}

/// Extract the document title from raw markup.
pub fn extract_title(markup: &str) -> Option<String> {
    let document = Html::parse_document(markup);
    let selector = Selector::parse("title").ok()?;
    document
        .select(&selector)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|t| !t.is_empty())
}

/// Run the synchronous DOM stage: normalize, segment, fingerprint.
///
/// A page with an empty content root yields an empty list.
pub fn extract_block_fingerprints(markup: &str) -> Vec<BlockFingerprint> {
    let cleaned = normalize_markup(markup);
    let document = Html::parse_document(&cleaned);
    let root = content_root(&document);

    blocks(root).into_iter().map(fingerprint_block).collect()
}

/// Analyze one page and fold its blocks into the project's pattern library.
///
/// The full block list is computed before the first store write, so a
/// page that fails to fetch or parse folds nothing - a retried job
/// re-runs from scratch without having left partial counts behind.
pub async fn analyze_page(
    project_id: Uuid,
    url: &str,
    fetcher: &dyn Fetcher,
    patterns: &dyn PatternStore,
) -> Result<PageAnalysis> {
    let fetched = fetcher.fetch(url).await?;

    // Parser handles are not Send; the whole DOM stage completes before
    // the first suspension point.
    let title = extract_title(&fetched.html);
    let fingerprints = extract_block_fingerprints(&fetched.html);

    debug!(
        url = %url,
        final_url = %fetched.url,
        blocks = fingerprints.len(),
        "page segmented"
    );

    for fingerprint in &fingerprints {
        patterns.upsert_pattern(project_id, fingerprint).await?;
    }

    Ok(PageAnalysis {
        blocks_folded: fingerprints.len(),
        title,
    })
}
