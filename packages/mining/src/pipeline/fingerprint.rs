//! Structural fingerprinting - reduce a block to a content-addressed key.

use scraper::ElementRef;
use sha2::{Digest, Sha256};

use crate::types::pattern::BlockFingerprint;

/// Upper bound on the stored example fragment, in characters.
pub const PREVIEW_MAX_CHARS: usize = 1000;

/// Reduce a block element to its signature, key and preview.
pub fn fingerprint_block(block: ElementRef<'_>) -> BlockFingerprint {
    let signature = structure_signature(block);
    let key = signature_key(&signature);
    let preview = block_preview(block);

    BlockFingerprint {
        signature,
        key,
        preview,
    }
}

/// Textual encoding of a block's structure: its tag plus the ordered
/// tags of its immediate children, e.g. `DIV > [H1, P, IMG]`.
///
/// Only tag names participate. Text content, attributes and ids are
/// deliberately excluded so blocks differing only in copy collapse to
/// the same pattern. A childless block encodes as `P > []`.
pub fn structure_signature(block: ElementRef<'_>) -> String {
    let tag = block.value().name().to_uppercase();
    let child_tags: Vec<String> = block
        .children()
        .filter_map(ElementRef::wrap)
        .map(|child| child.value().name().to_uppercase())
        .collect();

    format!("{} > [{}]", tag, child_tags.join(", "))
}

/// SHA-256 of the signature string, as lowercase hex.
///
/// Identical signatures always produce the same key; collisions across
/// distinct signatures are accepted as a bounded risk of the digest.
pub fn signature_key(signature: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(signature.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Whitespace-collapsed inner markup, truncated for operator inspection.
/// Never used in the key computation.
fn block_preview(block: ElementRef<'_>) -> String {
    let collapsed = block
        .inner_html()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");

    collapsed.chars().take(PREVIEW_MAX_CHARS).collect()
}
