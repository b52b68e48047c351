//! # Search Index
//!
//! Weighted multi-field fuzzy search over a document corpus.
//!
//! [`SearchIndex::build`] snapshots a corpus into an immutable index with
//! precomputed lowercased field text. [`SearchIndex::search`] scores a
//! query against every document: each field gets a normalized
//! edit-distance score (see [`score`](self::score) internals), fields at
//! or under the fuzziness threshold count as matches, and a result's
//! relevance is the weighted geometric mean over its matched fields, so
//! lower is better and a title hit far outranks a content hit.
//!
//! [`SearchEngine`] is the stateful wrapper hosts hold on to: it owns the
//! current snapshot (if any), swaps it wholesale on [`SearchEngine::reindex`],
//! and answers "not ready" as empty results rather than an error.

mod score;

use crate::types::{Category, Document, DocumentMeta, Status};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

// =============================================================================
// CONSTANTS
// =============================================================================

/// Queries shorter than this (in characters, after trimming) return
/// nothing.
pub const MIN_QUERY_LEN: usize = 2;

/// Default per-field fuzziness threshold; a field matches iff its
/// normalized score is at or under it.
pub const DEFAULT_THRESHOLD: f64 = 0.3;

/// Default cap on returned results.
pub const DEFAULT_RESULT_LIMIT: usize = 50;

/// Default line count for fallback content previews.
pub const DEFAULT_CONTEXT_LINES: usize = 3;

/// Characters of context on each side of a literal query occurrence in a
/// content preview.
const PREVIEW_RADIUS: usize = 100;

/// Character cap on fallback previews.
const PREVIEW_FALLBACK_LEN: usize = 200;

// =============================================================================
// QUERY TYPES
// =============================================================================

/// A search request: query text plus tunables and post-filters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchQuery {
    /// Query text; trimmed before use.
    pub query: String,
    /// Metadata post-filters, applied after scoring.
    pub filters: SearchFilters,
    /// Maximum results returned.
    pub limit: usize,
    /// Per-field fuzziness threshold override; `None` uses
    /// [`DEFAULT_THRESHOLD`].
    pub threshold: Option<f64>,
    /// Attach a preview string to each result.
    pub include_preview: bool,
    /// Lines of content used when a fallback preview is needed.
    pub context_lines: usize,
}

impl SearchQuery {
    #[must_use]
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Self::default()
        }
    }
}

impl Default for SearchQuery {
    fn default() -> Self {
        Self {
            query: String::new(),
            filters: SearchFilters::default(),
            limit: DEFAULT_RESULT_LIMIT,
            threshold: None,
            include_preview: true,
            context_lines: DEFAULT_CONTEXT_LINES,
        }
    }
}

/// Metadata filters intersected with the fuzzy matches. Empty lists and
/// `None` bounds are no-ops, never "match nothing."
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchFilters {
    /// Allowed categories.
    pub categories: Vec<Category>,
    /// Tag intersection, any-of. Tags compare case-sensitively.
    pub tags: Vec<String>,
    /// Allowed statuses.
    pub statuses: Vec<Status>,
    /// Inclusive lower date bound.
    pub date_from: Option<NaiveDate>,
    /// Inclusive upper date bound.
    pub date_to: Option<NaiveDate>,
}

impl SearchFilters {
    /// True when no criterion is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
            && self.tags.is_empty()
            && self.statuses.is_empty()
            && self.date_from.is_none()
            && self.date_to.is_none()
    }

    /// Whether a document's metadata passes every set criterion.
    /// Documents without a date fail date-bounded filters.
    #[must_use]
    pub fn matches(&self, meta: &DocumentMeta) -> bool {
        if !self.categories.is_empty() && !self.categories.contains(&meta.category) {
            return false;
        }
        if !self.tags.is_empty() && !self.tags.iter().any(|t| meta.tags.contains(t)) {
            return false;
        }
        if !self.statuses.is_empty() && !self.statuses.contains(&meta.status) {
            return false;
        }
        if self.date_from.is_some() || self.date_to.is_some() {
            let Some(date) = meta.date else {
                return false;
            };
            if self.date_from.is_some_and(|from| date < from) {
                return false;
            }
            if self.date_to.is_some_and(|to| date > to) {
                return false;
            }
        }
        true
    }
}

// =============================================================================
// RESULT TYPES
// =============================================================================

/// Indexed document fields, ordered by descending match weight.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum MatchField {
    Title,
    Description,
    Tags,
    Category,
    Author,
    Content,
}

impl MatchField {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            MatchField::Title => "title",
            MatchField::Description => "description",
            MatchField::Tags => "tags",
            MatchField::Category => "category",
            MatchField::Author => "author",
            MatchField::Content => "content",
        }
    }
}

impl std::fmt::Display for MatchField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One field's normalized score within a result.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldMatch {
    pub field: MatchField,
    /// Normalized edit-distance score in `[0, 1]`, lower is closer.
    pub score: f64,
}

/// One ranked hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// The matched document snapshot.
    pub document: Document,
    /// Aggregated relevance, lower is better.
    pub score: f64,
    /// Principal match: the highest-weight matched field.
    pub match_field: MatchField,
    /// Every field that matched, strongest field first.
    pub field_matches: Vec<FieldMatch>,
    /// Preview text, present unless the query disabled it.
    pub preview: Option<String>,
}

// =============================================================================
// INDEX
// =============================================================================

/// Lowercased field text for one document.
#[derive(Debug, Clone)]
struct IndexedFields {
    title: String,
    description: Option<String>,
    tags: Vec<String>,
    category: String,
    author: Option<String>,
    content: String,
}

impl IndexedFields {
    fn of(doc: &Document) -> Self {
        Self {
            title: doc.meta.title.to_lowercase(),
            description: doc.meta.description.as_ref().map(|d| d.to_lowercase()),
            tags: doc.meta.tags.iter().map(|t| t.to_lowercase()).collect(),
            category: doc.meta.category.as_str().to_string(),
            author: doc.meta.author.as_ref().map(|a| a.to_lowercase()),
            content: doc.content.to_lowercase(),
        }
    }
}

/// Scored candidate before filtering/ranking.
struct Candidate {
    index: usize,
    score: f64,
    principal: MatchField,
    matches: Vec<FieldMatch>,
}

/// An immutable fuzzy-search snapshot over one corpus.
#[derive(Debug, Clone)]
pub struct SearchIndex {
    documents: Vec<Document>,
    fields: Vec<IndexedFields>,
}

impl SearchIndex {
    /// Snapshot a corpus, precomputing lowercased field text.
    #[must_use]
    pub fn build(corpus: &[Document]) -> Self {
        Self {
            documents: corpus.to_vec(),
            fields: corpus.iter().map(IndexedFields::of).collect(),
        }
    }

    /// Number of indexed documents.
    #[must_use]
    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    /// Ranked, filtered, capped results for one query.
    #[must_use]
    pub fn search(&self, query: &SearchQuery) -> Vec<SearchResult> {
        let needle = query.query.trim().to_lowercase();
        if needle.chars().count() < MIN_QUERY_LEN {
            return Vec::new();
        }
        let threshold = query.threshold.unwrap_or(DEFAULT_THRESHOLD);

        let mut candidates: Vec<Candidate> = Vec::new();
        for (index, fields) in self.fields.iter().enumerate() {
            if let Some(candidate) = score_document(index, fields, &needle, threshold) {
                candidates.push(candidate);
            }
        }

        candidates.retain(|c| query.filters.matches(&self.documents[c.index].meta));
        // Stable: equal scores keep corpus order.
        candidates.sort_by(|a, b| a.score.partial_cmp(&b.score).unwrap_or(Ordering::Equal));
        candidates.truncate(query.limit);

        candidates
            .into_iter()
            .map(|c| {
                let document = &self.documents[c.index];
                let preview = query
                    .include_preview
                    .then(|| build_preview(document, c.principal, &needle, query.context_lines));
                SearchResult {
                    document: document.clone(),
                    score: c.score,
                    match_field: c.principal,
                    field_matches: c.matches,
                    preview,
                }
            })
            .collect()
    }
}

/// Score every field of one document against the query; `None` when no
/// field comes in at or under the threshold. Fields are considered in
/// descending weight order, so the first match is the principal one.
fn score_document(
    index: usize,
    fields: &IndexedFields,
    needle: &str,
    threshold: f64,
) -> Option<Candidate> {
    let tag_score = fields
        .tags
        .iter()
        .map(|tag| score::normalized_score(needle, tag))
        .min_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

    let field_scores: [(MatchField, Option<f64>); 6] = [
        (
            MatchField::Title,
            Some(score::normalized_score(needle, &fields.title)),
        ),
        (
            MatchField::Description,
            fields
                .description
                .as_deref()
                .map(|d| score::normalized_score(needle, d)),
        ),
        (MatchField::Tags, tag_score),
        (
            MatchField::Category,
            Some(score::normalized_score(needle, &fields.category)),
        ),
        (
            MatchField::Author,
            fields
                .author
                .as_deref()
                .map(|a| score::normalized_score(needle, a)),
        ),
        (
            MatchField::Content,
            Some(score::normalized_score(needle, &fields.content)),
        ),
    ];

    let mut matches: Vec<FieldMatch> = Vec::new();
    for (field, maybe_score) in field_scores {
        let Some(score) = maybe_score else {
            continue;
        };
        if score <= threshold {
            matches.push(FieldMatch { field, score });
        }
    }

    let principal = matches.first()?.field;
    Some(Candidate {
        index,
        score: score::aggregate_score(&matches),
        principal,
        matches,
    })
}

// =============================================================================
// PREVIEWS
// =============================================================================

fn build_preview(doc: &Document, field: MatchField, needle: &str, context_lines: usize) -> String {
    match field {
        MatchField::Title => doc.meta.title.clone(),
        MatchField::Description => doc.meta.description.clone().unwrap_or_default(),
        MatchField::Tags => format!("Tags: {}", doc.meta.tags.join(", ")),
        MatchField::Category | MatchField::Author | MatchField::Content => {
            content_preview(&doc.content, needle, context_lines)
        }
    }
}

/// Window around the first case-insensitive literal occurrence of the
/// query; ellipsis-padded, whitespace runs collapsed. Falls back to the
/// document's leading lines when the fuzzy match has no literal anchor.
fn content_preview(content: &str, needle: &str, context_lines: usize) -> String {
    let lower = content.to_lowercase();
    let Some(found) = lower.find(needle) else {
        return fallback_preview(content, context_lines);
    };

    // Offsets come from the lowercased copy; clamp to boundaries of the
    // original before slicing (lowercasing can shift byte lengths).
    let mut start = found.saturating_sub(PREVIEW_RADIUS).min(content.len());
    let mut end = (found + needle.len() + PREVIEW_RADIUS).min(content.len());
    while start > 0 && !content.is_char_boundary(start) {
        start -= 1;
    }
    while end < content.len() && !content.is_char_boundary(end) {
        end += 1;
    }
    if start > end {
        start = end;
    }

    let mut preview = content[start..end].trim().to_string();
    if start > 0 {
        preview.insert_str(0, "...");
    }
    if end < content.len() {
        preview.push_str("...");
    }
    collapse_whitespace(&preview)
}

fn fallback_preview(content: &str, context_lines: usize) -> String {
    let head: Vec<&str> = content.lines().take(context_lines).collect();
    let mut preview: String = head.join("\n").chars().take(PREVIEW_FALLBACK_LEN).collect();
    preview.push_str("...");
    preview
}

/// Collapse every whitespace run to a single space.
fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

// =============================================================================
// ENGINE
// =============================================================================

/// Readiness / size snapshot of a [`SearchEngine`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexStats {
    pub ready: bool,
    pub document_count: usize,
}

/// Stateful index holder. `search` against a never-indexed engine is
/// "not ready": empty results, no error.
#[derive(Debug, Clone, Default)]
pub struct SearchEngine {
    current: Option<SearchIndex>,
}

impl SearchEngine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current snapshot with a freshly built one.
    pub fn reindex(&mut self, corpus: &[Document]) {
        self.current = Some(SearchIndex::build(corpus));
    }

    /// Search the current snapshot, or nothing when not ready.
    #[must_use]
    pub fn search(&self, query: &SearchQuery) -> Vec<SearchResult> {
        match &self.current {
            Some(index) => index.search(query),
            None => Vec::new(),
        }
    }

    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.current.is_some()
    }

    #[must_use]
    pub fn stats(&self) -> IndexStats {
        IndexStats {
            ready: self.current.is_some(),
            document_count: self.current.as_ref().map_or(0, SearchIndex::document_count),
        }
    }

    /// Drop the snapshot, returning to the not-ready state.
    pub fn clear(&mut self) {
        self.current = None;
    }
}

// =============================================================================
// TESTS
// =============================================================================
