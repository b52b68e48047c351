//! # Graph Metrics
//!
//! Connectivity statistics and filtered views over a built graph.
//!
//! Everything here is a pure function of [`DocumentGraph`]; nothing touches
//! the corpus. "Cluster count" is the number of distinct categories present
//! among nodes, a documented naive stand-in rather than community
//! detection.

use crate::graph::{DocumentGraph, GraphNode};
use crate::types::Category;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// How many top nodes the connectivity ranking keeps.
const MOST_CONNECTED_LIMIT: usize = 10;

// =============================================================================
// METRICS
// =============================================================================

/// One entry of the connectivity ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MostConnected {
    /// Document path.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Incident edge count (each edge counts once per endpoint).
    pub connections: usize,
}

/// Aggregate connectivity statistics for one graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphMetrics {
    pub node_count: usize,
    pub edge_count: usize,
    pub orphan_count: usize,
    /// Number of distinct categories present among nodes.
    pub cluster_count: usize,
    /// Mean incident edge count per node, rounded to one decimal.
    pub avg_connections: f64,
    /// Top nodes by incident edge count, at most ten, ties broken by path.
    pub most_connected: Vec<MostConnected>,
}

impl GraphMetrics {
    /// Metrics of the empty graph.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            node_count: 0,
            edge_count: 0,
            orphan_count: 0,
            cluster_count: 0,
            avg_connections: 0.0,
            most_connected: Vec::new(),
        }
    }

    /// Compute metrics from a built graph.
    #[must_use]
    pub fn from_graph(graph: &DocumentGraph) -> Self {
        if graph.nodes.is_empty() {
            return Self::empty();
        }

        // Incident edge counts; nodes without edges simply never appear.
        let mut connections: BTreeMap<&str, usize> = BTreeMap::new();
        for edge in &graph.edges {
            *connections.entry(edge.source.as_str()).or_insert(0) += 1;
            *connections.entry(edge.target.as_str()).or_insert(0) += 1;
        }

        let total: usize = connections.values().sum();
        let avg = total as f64 / graph.nodes.len() as f64;

        let mut ranked: Vec<(&str, usize)> = connections.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        let most_connected = ranked
            .into_iter()
            .take(MOST_CONNECTED_LIMIT)
            .map(|(id, connections)| MostConnected {
                id: id.to_string(),
                name: graph
                    .node(id)
                    .map_or_else(|| id.to_string(), |n| n.name.clone()),
                connections,
            })
            .collect();

        let categories: BTreeSet<Category> =
            graph.nodes.iter().map(|n| n.category).collect();

        Self {
            node_count: graph.nodes.len(),
            edge_count: graph.edges.len(),
            orphan_count: graph.nodes.iter().filter(|n| n.orphan).count(),
            cluster_count: categories.len(),
            avg_connections: round_one_decimal(avg),
            most_connected,
        }
    }
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

// =============================================================================
// FILTERING
// =============================================================================

/// Node filter criteria. Empty criteria are no-ops, never "match nothing."
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GraphFilter {
    /// Keep nodes whose category is in this allow-list.
    pub categories: Vec<Category>,
    /// Keep nodes carrying at least one of these tags.
    pub tags: Vec<String>,
    /// Keep only orphan nodes.
    pub orphans_only: bool,
    /// Case-insensitive substring match against name, path, or tags.
    pub search: Option<String>,
}

impl GraphFilter {
    fn matches(&self, node: &GraphNode) -> bool {
        if !self.categories.is_empty() && !self.categories.contains(&node.category) {
            return false;
        }
        if !self.tags.is_empty() && !node.tags.iter().any(|t| self.tags.contains(t)) {
            return false;
        }
        if self.orphans_only && !node.orphan {
            return false;
        }
        if let Some(term) = self.search.as_deref() {
            let term = term.trim().to_lowercase();
            if !term.is_empty() && !search_hit(node, &term) {
                return false;
            }
        }
        true
    }
}

fn search_hit(node: &GraphNode, term_lower: &str) -> bool {
    node.name.to_lowercase().contains(term_lower)
        || node.id.to_lowercase().contains(term_lower)
        || node
            .tags
            .iter()
            .any(|t| t.to_lowercase().contains(term_lower))
}

/// Induced subgraph: nodes passing the filter, edges whose both endpoints
/// survive.
#[must_use]
pub fn filter_graph(graph: &DocumentGraph, filter: &GraphFilter) -> DocumentGraph {
    let nodes: Vec<GraphNode> = graph
        .nodes
        .iter()
        .filter(|n| filter.matches(n))
        .cloned()
        .collect();
    let kept: BTreeSet<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
    let edges = graph
        .edges
        .iter()
        .filter(|e| kept.contains(e.source.as_str()) && kept.contains(e.target.as_str()))
        .cloned()
        .collect();
    DocumentGraph { nodes, edges }
}

// =============================================================================
// TESTS
// =============================================================================
