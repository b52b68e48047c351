//! # Link Extractor
//!
//! Pulls explicit cross-document references out of raw markdown text.
//!
//! Two reference forms are recognized:
//! - **structured**: `[[Target]]`, double-bracket delimited, target is the
//!   bracket interior,
//! - **inline**: `[label](target.md)`, a classic markdown link whose target
//!   ends in the canonical document extension (case-insensitive).
//!
//! Extraction is one left-to-right scan over the bytes. Malformed or
//! overlapping delimiters simply yield no reference at that position; the
//! scanner never fails. Incidental brackets and parentheses in prose fall
//! through harmlessly.
//!
//! The scan also yields every reference's byte span, pre-sorted, so callers
//! can answer "is this offset inside an explicit link" with a binary search
//! instead of re-scanning text (see [`LinkSpans`]).

use serde::{Deserialize, Serialize};

/// Canonical document extension, including the dot.
pub const DOC_EXTENSION: &str = ".md";

// =============================================================================
// REFERENCE TYPES
// =============================================================================

/// The form a reference was written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RefKind {
    /// `[[Target]]`
    Structured,
    /// `[label](target.md)`
    Inline,
}

impl RefKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            RefKind::Structured => "structured",
            RefKind::Inline => "inline",
        }
    }
}

impl std::fmt::Display for RefKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One extracted reference with its position in the source text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    /// Reference form.
    pub kind: RefKind,
    /// Raw target, trimmed. For structured references this is the bracket
    /// interior; for inline references, the parenthesized target.
    pub target: String,
    /// Link label for inline references, trimmed. `None` for structured.
    pub label: Option<String>,
    /// Byte offset of the reference's opening delimiter.
    pub start: usize,
    /// Byte offset one past the closing delimiter.
    pub end: usize,
}

impl Reference {
    /// The surface text a human reads: the label for inline references,
    /// the target for structured ones.
    #[must_use]
    pub fn display_text(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.target)
    }
}

/// The two ordered raw-target lists, in order of first appearance.
///
/// Neither list is deduplicated; dedup is the caller's responsibility.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedLinks {
    /// Targets of `[[...]]` references.
    pub structured: Vec<String>,
    /// Targets of `[label](target.md)` references.
    pub inline: Vec<String>,
}

// =============================================================================
// SCANNER
// =============================================================================

/// Scan `text` once, left to right, returning every well-formed reference
/// in positional order. Targets that trim to empty are dropped.
#[must_use]
pub fn scan_references(text: &str) -> Vec<Reference> {
    let bytes = text.as_bytes();
    let mut refs = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != b'[' {
            i += 1;
            continue;
        }

        // Structured attempt first: "[[" ... "]]" with no ']' inside.
        if bytes.get(i + 1) == Some(&b'[')
            && let Some((target, end)) = scan_structured(text, bytes, i)
        {
            if !target.is_empty() {
                refs.push(Reference {
                    kind: RefKind::Structured,
                    target,
                    label: None,
                    start: i,
                    end,
                });
            }
            i = end;
            continue;
        }

        // Inline attempt at the same '[' covers cases like "[[a](b.md)"
        // where the double bracket never closes as a structured reference.
        if let Some((label, target, end)) = scan_inline(text, bytes, i) {
            if !target.is_empty() {
                refs.push(Reference {
                    kind: RefKind::Inline,
                    target,
                    label: Some(label),
                    start: i,
                    end,
                });
            }
            i = end;
            continue;
        }

        i += 1;
    }

    refs
}

/// Parse `[[target]]` at `start`. Returns (trimmed target, end offset).
fn scan_structured(text: &str, bytes: &[u8], start: usize) -> Option<(String, usize)> {
    let interior_start = start + 2;
    let close = find_byte(bytes, interior_start, b']')?;
    // Interior must be non-empty and the ']' must be doubled.
    if close == interior_start || bytes.get(close + 1) != Some(&b']') {
        return None;
    }
    let target = text[interior_start..close].trim().to_string();
    Some((target, close + 2))
}

/// Parse `[label](target.md)` at `start`. Returns (trimmed label, trimmed
/// target, end offset). The raw target must end in the document extension
/// immediately before the closing parenthesis, compared case-insensitively.
fn scan_inline(text: &str, bytes: &[u8], start: usize) -> Option<(String, String, usize)> {
    let label_start = start + 1;
    let label_close = find_byte(bytes, label_start, b']')?;
    if label_close == label_start || bytes.get(label_close + 1) != Some(&b'(') {
        return None;
    }
    let target_start = label_close + 2;
    let target_close = find_byte(bytes, target_start, b')')?;
    if target_close == target_start {
        return None;
    }
    let raw_target = &text[target_start..target_close];
    if !ends_with_extension(raw_target) {
        return None;
    }
    let label = text[label_start..label_close].trim().to_string();
    let target = raw_target.trim().to_string();
    Some((label, target, target_close + 1))
}

/// First occurrence of `needle` at or after `from`.
fn find_byte(bytes: &[u8], from: usize, needle: u8) -> Option<usize> {
    bytes
        .get(from..)?
        .iter()
        .position(|&b| b == needle)
        .map(|p| from + p)
}

/// Case-insensitive check for the canonical extension suffix.
fn ends_with_extension(target: &str) -> bool {
    let len = target.len();
    len >= DOC_EXTENSION.len()
        && target
            .get(len - DOC_EXTENSION.len()..)
            .is_some_and(|tail| tail.eq_ignore_ascii_case(DOC_EXTENSION))
}

/// Convenience view of the scan as the two ordered raw-target lists.
#[must_use]
pub fn extract_links(text: &str) -> ExtractedLinks {
    let mut links = ExtractedLinks::default();
    for reference in scan_references(text) {
        match reference.kind {
            RefKind::Structured => links.structured.push(reference.target),
            RefKind::Inline => links.inline.push(reference.target),
        }
    }
    links
}

// =============================================================================
// SPAN COVERAGE
// =============================================================================

/// Sorted, non-overlapping explicit-link spans for one document's content.
///
/// Built once per document per call; answers coverage queries by binary
/// search. A span covers its opening delimiter through its closing
/// delimiter, label and target included.
#[derive(Debug, Clone, Default)]
pub struct LinkSpans {
    starts: Vec<usize>,
    ends: Vec<usize>,
}

impl LinkSpans {
    /// Collect spans from scanned references. The scanner emits references
    /// in positional order, so the span lists are already sorted.
    #[must_use]
    pub fn from_references(refs: &[Reference]) -> Self {
        Self {
            starts: refs.iter().map(|r| r.start).collect(),
            ends: refs.iter().map(|r| r.end).collect(),
        }
    }

    /// Scan `text` and collect its spans in one step.
    #[must_use]
    pub fn of(text: &str) -> Self {
        Self::from_references(&scan_references(text))
    }

    /// True if `offset` falls inside any explicit link span.
    #[must_use]
    pub fn covers(&self, offset: usize) -> bool {
        let idx = self.starts.partition_point(|&s| s <= offset);
        idx > 0 && offset < self.ends[idx - 1]
    }

    /// Number of spans.
    #[must_use]
    pub fn len(&self) -> usize {
        self.starts.len()
    }

    /// True if no spans were found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.starts.is_empty()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_structured_references_in_order() {
        let links = extract_links("See [[Alpha]] then [[Beta]] and [[Alpha]] again.");
        assert_eq!(links.structured, vec!["Alpha", "Beta", "Alpha"]);
        assert!(links.inline.is_empty());
    }

    #[test]
    fn extracts_inline_references() {
        let links = extract_links("Read [the guide](/docs/guide.md) and [api](api.MD).");
        assert_eq!(links.inline, vec!["/docs/guide.md", "api.MD"]);
        assert!(links.structured.is_empty());
    }

    #[test]
    fn inline_requires_document_extension() {
        let links = extract_links("An [external](https://example.com) link and [img](x.png).");
        assert!(links.inline.is_empty());
    }

    #[test]
    fn trims_targets_and_labels() {
        let refs = scan_references("[[  Spaced Title ]] and [ label ]( doc.md)");
        assert_eq!(refs[0].target, "Spaced Title");
        assert_eq!(refs[1].target, "doc.md");
        assert_eq!(refs[1].label.as_deref(), Some("label"));
    }

    #[test]
    fn trailing_space_in_target_defeats_inline_match() {
        // The extension must sit immediately before the closing parenthesis.
        let links = extract_links("[label](doc.md )");
        assert!(links.inline.is_empty());
    }

    #[test]
    fn malformed_delimiters_yield_nothing() {
        assert!(scan_references("[[unclosed").is_empty());
        assert!(scan_references("[[]]").is_empty());
        assert!(scan_references("no links here").is_empty());
        assert!(scan_references("[label] (spaced.md)").is_empty());
        assert!(scan_references("[label](unclosed.md").is_empty());
    }

    #[test]
    fn empty_trimmed_target_is_dropped() {
        assert!(scan_references("[[   ]]").is_empty());
    }

    #[test]
    fn unclosed_structured_falls_back_to_inline() {
        // "[[a](b.md)" never closes as a structured reference, but reads as
        // an inline link with a bracket in its label.
        let refs = scan_references("[[a](b.md)");
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].kind, RefKind::Inline);
        assert_eq!(refs[0].label.as_deref(), Some("[a"));
        assert_eq!(refs[0].target, "b.md");
    }

    #[test]
    fn structured_interior_may_span_lines() {
        let refs = scan_references("[[Multi\nLine]]");
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].target, "Multi\nLine");
    }

    #[test]
    fn prose_brackets_do_not_match() {
        let text = "array[0] and f(x) and [citation needed] stay plain text";
        assert!(scan_references(text).is_empty());
    }

    #[test]
    fn spans_cover_whole_reference() {
        let text = "See [[Gadgets]] for details.";
        let spans = LinkSpans::of(text);
        let open = text.find("[[").expect("open");
        let interior = text.find("Gadgets").expect("interior");
        assert!(spans.covers(open));
        assert!(spans.covers(interior));
        assert!(spans.covers(open + "[[Gadgets]]".len() - 1));
        assert!(!spans.covers(open + "[[Gadgets]]".len()));
        assert!(!spans.covers(0));
    }

    #[test]
    fn spans_cover_inline_label_region() {
        let text = "Read [Gadgets](/b.md) today.";
        let spans = LinkSpans::of(text);
        let label = text.find("Gadgets").expect("label");
        assert!(spans.covers(label));
        assert!(!spans.covers(text.len() - 1));
    }

    #[test]
    fn spans_are_queryable_past_text_end() {
        let spans = LinkSpans::of("[[a]]");
        assert!(!spans.covers(1_000_000));
    }

    #[test]
    fn mixed_references_keep_positional_order() {
        let refs = scan_references("[[first]] then [second](second.md) then [[third]]");
        let kinds: Vec<RefKind> = refs.iter().map(|r| r.kind).collect();
        assert_eq!(
            kinds,
            vec![RefKind::Structured, RefKind::Inline, RefKind::Structured]
        );
        assert!(refs.windows(2).all(|w| w[0].end <= w[1].start));
    }

    #[test]
    fn display_text_prefers_label() {
        let refs = scan_references("[[Alpha]] and [beta label](beta.md)");
        assert_eq!(refs[0].display_text(), "Alpha");
        assert_eq!(refs[1].display_text(), "beta label");
    }

    #[test]
    fn scanner_is_utf8_safe() {
        let text = "café [[Ünïcode Tïtle]] naïve [läbel](döc.md) ✓";
        let refs = scan_references(text);
        assert_eq!(refs.len(), 2);
        assert_eq!(refs[0].target, "Ünïcode Tïtle");
        assert_eq!(refs[1].target, "döc.md");
    }
}
