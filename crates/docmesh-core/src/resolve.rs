//! # Path Resolver
//!
//! Maps a raw reference string to a concrete corpus document.
//!
//! Resolution is deliberately permissive: it favors false positives over
//! false negatives, because downstream features ask "did this document
//! probably reference that one," not "is this link valid." The cascade, in
//! order, first match wins:
//!
//! 1. normalize the raw reference into a rooted `.md` path,
//! 2. exact path match,
//! 3. final-segment (filename) match,
//! 4. fuzzy fallback: case-insensitive containment of the reference's base
//!    name inside a document title.
//!
//! Corpus order breaks ties at every step. Unresolvable references return
//! `None`; resolution never fails.

use crate::extract::DOC_EXTENSION;
use crate::types::Document;

// =============================================================================
// NORMALIZATION
// =============================================================================

/// Normalize a raw reference into the corpus path form: same-directory and
/// parent-directory markers stripped, canonical extension appended when
/// absent, single leading separator ensured.
///
/// The extension check is case-sensitive, so `Readme.MD` normalizes to
/// `/Readme.MD.md`; the corpus side is produced by the same loader and is
/// consistently lowercase.
#[must_use]
pub fn normalize_reference(raw: &str) -> String {
    let mut rest = raw.trim();
    rest = rest.strip_prefix("./").unwrap_or(rest);
    while let Some(stripped) = rest.strip_prefix("../") {
        rest = stripped;
    }

    let mut path = rest.to_string();
    if !path.ends_with(DOC_EXTENSION) {
        path.push_str(DOC_EXTENSION);
    }
    if !path.starts_with('/') {
        path.insert(0, '/');
    }
    path
}

/// Final segment of a normalized path.
fn final_segment(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

// =============================================================================
// RESOLUTION
// =============================================================================

/// Resolve `raw` against the corpus, returning the target document.
///
/// `_source_path` is the referring document's identity. The current cascade
/// roots every reference at the corpus, not at the referring document, so
/// the parameter only anchors the contract; callers pass it for free.
#[must_use]
pub fn resolve_reference<'a>(
    raw: &str,
    _source_path: &str,
    corpus: &'a [Document],
) -> Option<&'a Document> {
    let normalized = normalize_reference(raw);
    let filename = final_segment(&normalized);

    if let Some(doc) = corpus.iter().find(|d| d.path == normalized) {
        return Some(doc);
    }

    if let Some(doc) = corpus.iter().find(|d| d.filename() == filename) {
        return Some(doc);
    }

    // Fuzzy fallback: base name contained in a title, case-insensitive.
    let base = filename.strip_suffix(DOC_EXTENSION).unwrap_or(filename);
    if base.is_empty() {
        return None;
    }
    let base_lower = base.to_lowercase();
    corpus
        .iter()
        .find(|d| d.meta.title.to_lowercase().contains(&base_lower))
}

// =============================================================================
// TESTS
// =============================================================================
