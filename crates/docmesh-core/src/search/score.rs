//! # Fuzzy Scoring
//!
//! Normalized edit-distance scoring and the per-field weight table.
//!
//! A field score is the minimum edit distance from the query to *any*
//! substring of the field text (semi-global alignment), divided by the
//! query length in characters. `0.0` is an exact substring occurrence,
//! `1.0` means nothing of the query survives. A result's relevance score
//! aggregates matched field scores as a weighted geometric mean, so lower
//! is better and heavy fields dominate.

use super::{FieldMatch, MatchField};

/// Per-field match weights. Content is the largest text body but the
/// lightest signal.
const WEIGHT_TITLE: f64 = 10.0;
const WEIGHT_DESCRIPTION: f64 = 5.0;
const WEIGHT_TAGS: f64 = 3.0;
const WEIGHT_CATEGORY: f64 = 2.0;
const WEIGHT_AUTHOR: f64 = 1.0;
const WEIGHT_CONTENT: f64 = 1.0;

/// Sum of all field weights, the geometric-mean denominator.
pub(super) const TOTAL_WEIGHT: f64 = WEIGHT_TITLE
    + WEIGHT_DESCRIPTION
    + WEIGHT_TAGS
    + WEIGHT_CATEGORY
    + WEIGHT_AUTHOR
    + WEIGHT_CONTENT;

impl MatchField {
    /// Match weight of this field.
    #[must_use]
    pub fn weight(self) -> f64 {
        match self {
            MatchField::Title => WEIGHT_TITLE,
            MatchField::Description => WEIGHT_DESCRIPTION,
            MatchField::Tags => WEIGHT_TAGS,
            MatchField::Category => WEIGHT_CATEGORY,
            MatchField::Author => WEIGHT_AUTHOR,
            MatchField::Content => WEIGHT_CONTENT,
        }
    }
}

/// Minimum edit distance from `query` to any substring of `text`.
///
/// Sellers' semi-global variant of the Levenshtein recurrence: the match
/// may begin and end anywhere in `text` for free, so only edits *within*
/// the matched region count. Runs in O(|query| * |text|) time and
/// O(|query|) space over characters, not bytes.
#[must_use]
pub(super) fn min_edit_distance(query: &str, text: &str) -> usize {
    let pattern: Vec<char> = query.chars().collect();
    if pattern.is_empty() {
        return 0;
    }

    // col[i] = distance of pattern[..i] against a match ending at the
    // current text position. Column 0 models the empty text prefix.
    let mut col: Vec<usize> = (0..=pattern.len()).collect();
    let mut best = col[pattern.len()];

    for tc in text.chars() {
        let mut prev_diag = col[0];
        col[0] = 0;
        for (i, &pc) in pattern.iter().enumerate() {
            let substitution = prev_diag + usize::from(pc != tc);
            let deletion = col[i + 1] + 1;
            let insertion = col[i] + 1;
            prev_diag = col[i + 1];
            col[i + 1] = substitution.min(deletion).min(insertion);
        }
        best = best.min(col[pattern.len()]);
    }
    best
}

/// Edit distance from `query` to the closest substring of `text`,
/// normalized by the query's character count into `[0, 1]`.
///
/// Callers lowercase both sides first; this function is case-sensitive.
#[must_use]
pub(super) fn normalized_score(query: &str, text: &str) -> f64 {
    let query_len = query.chars().count();
    if query_len == 0 {
        return 1.0;
    }
    min_edit_distance(query, text) as f64 / query_len as f64
}

/// Weighted geometric mean over matched fields.
///
/// `∏ max(score_f, ε) ^ (weight_f / W)` with `W` the sum of all field
/// weights. Exact matches contribute ε instead of zero so an exact hit
/// in a heavy field outranks one in a light field instead of flattening
/// every product to zero.
#[must_use]
pub(super) fn aggregate_score(matches: &[FieldMatch]) -> f64 {
    let mut total = 1.0;
    for m in matches {
        let clamped = m.score.max(f64::EPSILON);
        total *= clamped.powf(m.field.weight() / TOTAL_WEIGHT);
    }
    total
}
