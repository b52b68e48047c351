//! # Graph Builder
//!
//! Builds the document relationship graph for one corpus snapshot.
//!
//! Nodes are created one per document. Edges come in two passes:
//! 1. **explicit**: every extracted reference that resolves to another
//!    corpus document adds a directed edge of strength 1.0 (structured and
//!    inline kinds are tracked separately, deduplicated per document),
//! 2. **shared-tag**: every unordered pair of documents sharing a tag,
//!    with no explicit edge between them in either direction, gets one weak
//!    edge of strength 0.3.
//!
//! Each added edge contributes its strength to both endpoints' accumulated
//! connection weight, which drives node size and the orphan flag. Given a
//! fixed corpus ordering the build is fully deterministic.
//!
//! The tag pass is O(n²) over the corpus. Corpora here are hundreds of
//! documents, not millions, so the quadratic pass stays the simplest
//! correct option.

use crate::extract::{RefKind, scan_references};
use crate::resolve::resolve_reference;
use crate::types::{Category, Document};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

// =============================================================================
// CONSTANTS
// =============================================================================

/// Strength of explicit (structured or inline) edges.
pub const EXPLICIT_STRENGTH: f64 = 1.0;

/// Strength of tag-inferred edges. Never re-scaled after creation.
pub const SHARED_TAG_STRENGTH: f64 = 0.3;

/// Node size scale factor applied to the square root of accumulated weight.
const SIZE_SCALE: f64 = 3.0;

// =============================================================================
// GRAPH TYPES
// =============================================================================

/// How an edge was derived.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum EdgeKind {
    /// From a `[[...]]` reference.
    Structured,
    /// From a `[label](target.md)` reference.
    Inline,
    /// Inferred from a shared tag.
    SharedTag,
}

impl EdgeKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            EdgeKind::Structured => "structured",
            EdgeKind::Inline => "inline",
            EdgeKind::SharedTag => "shared-tag",
        }
    }
}

impl std::fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One graph node. Created fresh on every build; identity is the document
/// path only, with no cross-call identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    /// Document path.
    pub id: String,
    /// Display name (document title).
    pub name: String,
    /// Document category.
    pub category: Category,
    /// Document tags.
    pub tags: Vec<String>,
    /// Render size, `max(1, sqrt(weight) * 3)`; monotonic in weight.
    pub size: f64,
    /// True iff accumulated incident edge weight is exactly zero.
    pub orphan: bool,
}

/// One directed graph edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
    /// Source document path.
    pub source: String,
    /// Target document path.
    pub target: String,
    /// Derivation kind.
    pub kind: EdgeKind,
    /// 1.0 for explicit kinds, 0.3 for shared-tag.
    pub strength: f64,
}

impl GraphEdge {
    /// True for structured/inline edges, false for shared-tag.
    #[must_use]
    pub fn is_explicit(&self) -> bool {
        matches!(self.kind, EdgeKind::Structured | EdgeKind::Inline)
    }
}

/// The built graph: plain node/edge data, no layout.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

impl DocumentGraph {
    /// Number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Look up a node by document path.
    #[must_use]
    pub fn node(&self, path: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.id == path)
    }
}

// =============================================================================
// BUILD
// =============================================================================

/// Build the relationship graph over `corpus`.
#[must_use]
pub fn build_graph(corpus: &[Document]) -> DocumentGraph {
    let mut weights: BTreeMap<&str, f64> =
        corpus.iter().map(|d| (d.path.as_str(), 0.0)).collect();
    let mut edges: Vec<GraphEdge> = Vec::new();

    // Pass 1: explicit references. Deduplicated per source document by
    // (kind, target), so a repeated [[X]] adds one edge while a structured
    // and an inline reference to the same target add one each.
    for doc in corpus {
        let mut seen: BTreeSet<(EdgeKind, String)> = BTreeSet::new();
        for reference in scan_references(&doc.content) {
            let Some(target) = resolve_reference(&reference.target, &doc.path, corpus) else {
                continue;
            };
            if target.path == doc.path {
                continue;
            }
            let kind = match reference.kind {
                RefKind::Structured => EdgeKind::Structured,
                RefKind::Inline => EdgeKind::Inline,
            };
            if !seen.insert((kind, target.path.clone())) {
                continue;
            }
            add_weight(&mut weights, &doc.path, EXPLICIT_STRENGTH);
            add_weight(&mut weights, &target.path, EXPLICIT_STRENGTH);
            edges.push(GraphEdge {
                source: doc.path.clone(),
                target: target.path.clone(),
                kind,
                strength: EXPLICIT_STRENGTH,
            });
        }
    }

    // Pass 2: shared-tag edges, only between pairs with no explicit edge in
    // either direction. Runs after all explicit edges exist so suppression
    // is complete regardless of corpus order.
    let explicit_pairs: BTreeSet<(String, String)> = edges
        .iter()
        .map(|e| {
            let (a, b) = ordered_pair(e.source.as_str(), e.target.as_str());
            (a.to_string(), b.to_string())
        })
        .collect();

    for (i, doc) in corpus.iter().enumerate() {
        for other in &corpus[i + 1..] {
            if doc.path == other.path || !doc.shares_tag_with(other) {
                continue;
            }
            let (a, b) = ordered_pair(&doc.path, &other.path);
            if explicit_pairs.contains(&(a.to_string(), b.to_string())) {
                continue;
            }
            add_weight(&mut weights, &doc.path, SHARED_TAG_STRENGTH);
            add_weight(&mut weights, &other.path, SHARED_TAG_STRENGTH);
            edges.push(GraphEdge {
                source: doc.path.clone(),
                target: other.path.clone(),
                kind: EdgeKind::SharedTag,
                strength: SHARED_TAG_STRENGTH,
            });
        }
    }

    let nodes = corpus
        .iter()
        .map(|doc| {
            let weight = weights.get(doc.path.as_str()).copied().unwrap_or(0.0);
            GraphNode {
                id: doc.path.clone(),
                name: doc.meta.title.clone(),
                category: doc.meta.category,
                tags: doc.meta.tags.clone(),
                size: node_size(weight),
                orphan: weight == 0.0,
            }
        })
        .collect();

    DocumentGraph { nodes, edges }
}

/// `max(1, sqrt(weight) * 3)`.
fn node_size(weight: f64) -> f64 {
    (weight.sqrt() * SIZE_SCALE).max(1.0)
}

fn add_weight(weights: &mut BTreeMap<&str, f64>, path: &str, amount: f64) {
    if let Some(w) = weights.get_mut(path) {
        *w += amount;
    }
}

/// Canonical unordered form of a pair.
fn ordered_pair<'a>(a: &'a str, b: &'a str) -> (&'a str, &'a str) {
    if a <= b { (a, b) } else { (b, a) }
}

// =============================================================================
// TESTS
// =============================================================================
