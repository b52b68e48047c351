//! # Property-Based Tests
//!
//! Invariants that must hold for arbitrary corpora: graph shape,
//! edge-strength rules, mention placement, and search determinism.

use docmesh_core::{
    BacklinkOptions, Document, DocumentMeta, EdgeKind, LinkSpans, SearchIndex, SearchQuery,
    build_graph, scan_references, unlinked_mentions,
};
use proptest::collection::vec;
use proptest::prelude::*;

// =============================================================================
// STRATEGIES
// =============================================================================

/// Arbitrary small corpora: unique paths, loose titles, content that may
/// contain bracket/parenthesis runs resembling (or malforming) links.
fn corpus_strategy() -> impl Strategy<Value = Vec<Document>> {
    vec(
        (
            "[A-Za-z][A-Za-z ]{0,14}",
            "[a-zA-Z \\[\\]()./\n]{0,120}",
            vec("[a-z]{1,6}", 0..3),
        ),
        1..10,
    )
    .prop_map(|entries| {
        entries
            .into_iter()
            .enumerate()
            .map(|(i, (title, content, tags))| {
                Document::new(
                    format!("/doc-{i}.md"),
                    DocumentMeta::new(title.trim()).with_tags(tags),
                    content,
                )
            })
            .collect()
    })
}

// =============================================================================
// PROPERTY TESTS
// =============================================================================

proptest! {
    /// Exactly one node per document, and never a self-edge.
    #[test]
    fn one_node_per_document_and_no_self_edges(corpus in corpus_strategy()) {
        let graph = build_graph(&corpus);

        prop_assert_eq!(graph.nodes.len(), corpus.len());
        for (node, doc) in graph.nodes.iter().zip(corpus.iter()) {
            prop_assert_eq!(&node.id, &doc.path);
        }
        for edge in &graph.edges {
            prop_assert_ne!(&edge.source, &edge.target);
        }
    }

    /// Edge strength is fixed by kind: 1.0 explicit, 0.3 shared-tag.
    #[test]
    fn edge_strength_is_fixed_by_kind(corpus in corpus_strategy()) {
        let graph = build_graph(&corpus);
        for edge in &graph.edges {
            match edge.kind {
                EdgeKind::Structured | EdgeKind::Inline => {
                    prop_assert_eq!(edge.strength, 1.0)
                }
                EdgeKind::SharedTag => prop_assert_eq!(edge.strength, 0.3),
            }
        }
    }

    /// A shared-tag edge never coexists with an explicit edge between the
    /// same pair, in either direction.
    #[test]
    fn shared_tag_edges_never_shadow_explicit_pairs(corpus in corpus_strategy()) {
        let graph = build_graph(&corpus);
        for tag_edge in graph.edges.iter().filter(|e| e.kind == EdgeKind::SharedTag) {
            let shadowed = graph.edges.iter().any(|e| {
                e.is_explicit()
                    && ((e.source == tag_edge.source && e.target == tag_edge.target)
                        || (e.source == tag_edge.target && e.target == tag_edge.source))
            });
            prop_assert!(!shadowed);
        }
    }

    /// Node sizes never drop under 1.0, and orphans sit exactly at it.
    #[test]
    fn node_sizes_have_a_floor_and_orphans_sit_on_it(corpus in corpus_strategy()) {
        let graph = build_graph(&corpus);
        for node in &graph.nodes {
            prop_assert!(node.size >= 1.0);
            if node.orphan {
                prop_assert_eq!(node.size, 1.0);
            }
        }
    }

    /// Building the same corpus twice yields the same graph.
    #[test]
    fn graph_build_is_deterministic(corpus in corpus_strategy()) {
        prop_assert_eq!(build_graph(&corpus), build_graph(&corpus));
    }

    /// Extracted references are ordered, in-bounds, and trimmed non-empty.
    #[test]
    fn references_are_ordered_and_in_bounds(content in "[a-zA-Z \\[\\]()./\n]{0,200}") {
        let refs = scan_references(&content);
        for pair in refs.windows(2) {
            prop_assert!(pair[0].start <= pair[1].start);
        }
        for r in &refs {
            prop_assert!(r.start < r.end);
            prop_assert!(r.end <= content.len());
            prop_assert!(!r.target.is_empty());
            prop_assert_eq!(r.target.trim(), r.target.as_str());
        }
    }

    /// Unlinked mentions never land inside an explicit link span, and
    /// their confidences stay within the configured bounds.
    #[test]
    fn unlinked_mentions_stay_outside_link_spans(corpus in corpus_strategy()) {
        let target = &corpus[0];
        let opts = BacklinkOptions::default();
        for mention in unlinked_mentions(target, &corpus, &opts) {
            prop_assert!(mention.confidence >= opts.min_confidence);
            prop_assert!(mention.confidence <= 1.0);

            let source = corpus
                .iter()
                .find(|d| d.path == mention.source.path)
                .expect("mention source must be a corpus document");
            prop_assert_ne!(&source.path, &target.path);
            prop_assert!(!LinkSpans::of(&source.content).covers(mention.offset));
        }
    }

    /// Searching the same index with the same query twice is identical,
    /// ranked ascending by score, and capped at the limit.
    #[test]
    fn search_is_deterministic_and_ranked(
        corpus in corpus_strategy(),
        query in "[a-z]{2,10}",
        limit in 1usize..8,
    ) {
        let index = SearchIndex::build(&corpus);
        let mut q = SearchQuery::new(query);
        q.limit = limit;

        let first = index.search(&q);
        let second = index.search(&q);
        prop_assert_eq!(&first, &second);

        prop_assert!(first.len() <= limit);
        for pair in first.windows(2) {
            prop_assert!(pair[0].score <= pair[1].score);
        }
        for result in &first {
            prop_assert!(!result.field_matches.is_empty());
        }
    }

    /// Queries under the length floor never match anything.
    #[test]
    fn sub_length_queries_match_nothing(corpus in corpus_strategy(), query in "[a-z]{0,1}") {
        let index = SearchIndex::build(&corpus);
        prop_assert!(index.search(&SearchQuery::new(query)).is_empty());
    }
}
