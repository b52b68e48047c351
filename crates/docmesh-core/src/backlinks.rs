//! # Backlink Engine
//!
//! For one target document, finds every reference to it across the corpus:
//!
//! - **linked mentions**: explicit references (structured or inline) that
//!   resolve to the target,
//! - **unlinked mentions**: plain-text occurrences of the target's title
//!   or derived terms, scored by confidence, excluding anything already
//!   inside an explicit link span.
//!
//! Both kinds carry a context snippet: a window centered on the match,
//! ellipsis-padded at truncated ends, with multi-newline runs collapsed to
//! a single space.
//!
//! The engine is side-effect-free and total: a corpus with no references
//! yields empty lists, never an error.

use crate::extract::{LinkSpans, RefKind, scan_references};
use crate::resolve::resolve_reference;
use crate::types::{Document, SourceRef};
use regex::RegexBuilder;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeSet;

// =============================================================================
// CONSTANTS
// =============================================================================

/// Default minimum confidence for unlinked mentions.
pub const DEFAULT_MIN_CONFIDENCE: f64 = 0.4;

/// Default cap on returned unlinked mentions.
pub const DEFAULT_MAX_UNLINKED: usize = 20;

/// Default context window, total characters around the match.
pub const DEFAULT_CONTEXT_WINDOW: usize = 150;

/// Confidence when the matched term equals the full title.
const CONFIDENCE_EXACT_TITLE: f64 = 1.0;

/// Confidence when the term is a whole word of the title.
const CONFIDENCE_TITLE_WORD: f64 = 0.7;

/// Confidence when the term is a substring of the title.
const CONFIDENCE_TITLE_SUBSTRING: f64 = 0.5;

/// Baseline confidence for any other generated term.
const CONFIDENCE_BASELINE: f64 = 0.3;

/// Bonus when the context contains a referential cue word.
const CUE_BONUS: f64 = 0.1;

/// Referential cue words, matched by containment in the lowercased context.
const CUE_WORDS: [&str; 7] = [
    "see",
    "refer",
    "reference",
    "according",
    "documented",
    "check",
    "details",
];

/// Minimum character length for individual title words used as terms.
const MIN_TERM_WORD_LEN: usize = 4;

// =============================================================================
// RESULT TYPES
// =============================================================================

/// An explicit reference to the target found in another document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkedMention {
    /// Referring document.
    pub source: SourceRef,
    /// Literal reference text a reader sees (label or bracket interior).
    pub text: String,
    /// Reference form.
    pub kind: RefKind,
    /// Context snippet around the reference.
    pub context: String,
    /// Byte offset of the reference in the source content.
    pub offset: usize,
}

/// An inferred plain-text reference to the target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnlinkedMention {
    /// Referring document.
    pub source: SourceRef,
    /// Matched surface text, original casing preserved.
    pub text: String,
    /// Context snippet around the match.
    pub context: String,
    /// Byte offset of the match in the source content.
    pub offset: usize,
    /// Score in `[0, 1]`.
    pub confidence: f64,
}

/// Combined backlink result for one target document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Backlinks {
    pub linked: Vec<LinkedMention>,
    pub unlinked: Vec<UnlinkedMention>,
    /// Linked count plus post-filter, post-cap unlinked count.
    pub total_count: usize,
}

/// Tunables for one backlink computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BacklinkOptions {
    /// Compute unlinked mentions at all.
    pub include_unlinked: bool,
    /// Drop unlinked mentions scoring below this.
    pub min_confidence: f64,
    /// Cap on unlinked mentions after sorting.
    pub max_unlinked: usize,
    /// Total context window width in characters.
    pub context_window: usize,
}

impl Default for BacklinkOptions {
    fn default() -> Self {
        Self {
            include_unlinked: true,
            min_confidence: DEFAULT_MIN_CONFIDENCE,
            max_unlinked: DEFAULT_MAX_UNLINKED,
            context_window: DEFAULT_CONTEXT_WINDOW,
        }
    }
}

// =============================================================================
// ENTRY POINTS
// =============================================================================

/// Compute linked and unlinked mentions of `target` across the corpus.
#[must_use]
pub fn backlinks(target: &Document, corpus: &[Document], opts: &BacklinkOptions) -> Backlinks {
    let linked = linked_mentions(target, corpus, opts);
    let unlinked = if opts.include_unlinked {
        unlinked_mentions(target, corpus, opts)
    } else {
        Vec::new()
    };
    let total_count = linked.len() + unlinked.len();
    Backlinks {
        linked,
        unlinked,
        total_count,
    }
}

/// Explicit references to `target`, sorted by source title (ascending,
/// case-insensitive).
#[must_use]
pub fn linked_mentions(
    target: &Document,
    corpus: &[Document],
    opts: &BacklinkOptions,
) -> Vec<LinkedMention> {
    let mut mentions = Vec::new();
    for doc in corpus {
        if doc.path == target.path {
            continue;
        }
        for reference in scan_references(&doc.content) {
            let resolved = resolve_reference(&reference.target, &doc.path, corpus);
            if resolved.is_none_or(|d| d.path != target.path) {
                continue;
            }
            mentions.push(LinkedMention {
                source: SourceRef::of(doc),
                text: reference.display_text().to_string(),
                kind: reference.kind,
                context: context_window(&doc.content, reference.start, opts.context_window),
                offset: reference.start,
            });
        }
    }
    mentions.sort_by(|a, b| {
        a.source
            .title
            .to_lowercase()
            .cmp(&b.source.title.to_lowercase())
    });
    mentions
}

/// Plain-text mentions of `target`'s title terms, confidence-scored,
/// deduplicated by (source, offset), sorted by confidence descending,
/// capped at `opts.max_unlinked`.
#[must_use]
pub fn unlinked_mentions(
    target: &Document,
    corpus: &[Document],
    opts: &BacklinkOptions,
) -> Vec<UnlinkedMention> {
    let terms = search_terms(&target.meta.title);
    let mut mentions: Vec<UnlinkedMention> = Vec::new();

    for doc in corpus {
        if doc.path == target.path {
            continue;
        }
        let spans = LinkSpans::of(&doc.content);
        // Dedup by offset within this document, first pushed wins. Term
        // order makes that the highest-priority term for the offset.
        let mut taken: BTreeSet<usize> = BTreeSet::new();

        for term in &terms {
            let pattern = format!(r"\b{}\b", regex::escape(term));
            let Ok(re) = RegexBuilder::new(&pattern).case_insensitive(true).build() else {
                continue;
            };
            for m in re.find_iter(&doc.content) {
                let offset = m.start();
                if spans.covers(offset) || taken.contains(&offset) {
                    continue;
                }
                let context = context_window(&doc.content, offset, opts.context_window);
                let confidence = confidence(term, &target.meta.title, &context);
                if confidence < opts.min_confidence {
                    continue;
                }
                taken.insert(offset);
                mentions.push(UnlinkedMention {
                    source: SourceRef::of(doc),
                    text: m.as_str().to_string(),
                    context,
                    offset,
                    confidence,
                });
            }
        }
    }

    // Stable sort: equal confidences keep discovery order.
    mentions.sort_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(Ordering::Equal)
    });
    mentions.truncate(opts.max_unlinked);
    mentions
}

// =============================================================================
// TERM GENERATION & CONFIDENCE
// =============================================================================

/// Candidate terms derived from a title: the full title, each word of
/// length ≥ 4, and each adjacent bigram over those words. Deduplicated,
/// first appearance order preserved.
#[must_use]
pub fn search_terms(title: &str) -> Vec<String> {
    let mut terms: Vec<String> = Vec::new();
    let mut push = |t: String| {
        if !t.is_empty() && !terms.contains(&t) {
            terms.push(t);
        }
    };

    push(title.trim().to_string());

    let words: Vec<&str> = title
        .split_whitespace()
        .filter(|w| w.chars().count() >= MIN_TERM_WORD_LEN)
        .collect();
    for word in &words {
        push((*word).to_string());
    }
    for pair in words.windows(2) {
        push(format!("{} {}", pair[0], pair[1]));
    }

    terms
}

/// Score one matched term against the target title and its context.
#[must_use]
pub fn confidence(term: &str, title: &str, context: &str) -> f64 {
    let term_lower = term.to_lowercase();
    let title_lower = title.to_lowercase();

    let base = if term_lower == title_lower {
        CONFIDENCE_EXACT_TITLE
    } else if title_lower.split_whitespace().any(|w| w == term_lower) {
        CONFIDENCE_TITLE_WORD
    } else if title_lower.contains(&term_lower) {
        CONFIDENCE_TITLE_SUBSTRING
    } else {
        CONFIDENCE_BASELINE
    };

    let context_lower = context.to_lowercase();
    if CUE_WORDS.iter().any(|cue| context_lower.contains(cue)) {
        (base + CUE_BONUS).min(1.0)
    } else {
        base
    }
}

// =============================================================================
// CONTEXT WINDOWS
// =============================================================================

/// Extract a window of `width` characters centered on `offset`, trimmed,
/// ellipsis-padded at truncated ends, multi-newline runs collapsed to one
/// space. Window edges are widened to UTF-8 boundaries.
#[must_use]
pub fn context_window(content: &str, offset: usize, width: usize) -> String {
    let half = width / 2;
    let mut start = offset.saturating_sub(half);
    let mut end = (offset + half).min(content.len());
    while start > 0 && !content.is_char_boundary(start) {
        start -= 1;
    }
    while end < content.len() && !content.is_char_boundary(end) {
        end += 1;
    }

    let mut context = content[start..end].trim().to_string();
    if start > 0 {
        context.insert_str(0, "...");
    }
    if end < content.len() {
        context.push_str("...");
    }
    collapse_newline_runs(&context)
}

/// Replace every run of two or more `\n` with a single space. Lone
/// newlines pass through.
fn collapse_newline_runs(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\n' {
            let mut run = 1usize;
            while chars.peek() == Some(&'\n') {
                chars.next();
                run += 1;
            }
            if run >= 2 {
                out.push(' ');
            } else {
                out.push('\n');
            }
        } else {
            out.push(c);
        }
    }
    out
}

// =============================================================================
// TESTS
// =============================================================================
