//! Integration tests for the docmesh HTTP API.
//!
//! Uses axum-test to test the API handlers without starting a real server.

// Allow unwrap and panic in tests - these are standard for test code
#![allow(clippy::unwrap_used, clippy::panic)]

use axum_test::TestServer;
use docmesh::api::{
    AppState, BacklinksResponse, ErrorResponse, HealthResponse, ReindexResponse, SearchResponse,
    StatusResponse, create_router,
};
use docmesh_core::{
    Category, Document, DocumentGraph, DocumentMeta, GraphMetrics, MatchField, RefKind,
};

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

/// A small corpus with one structured link, one inline link, one orphan,
/// and one plain-text mention of another document's title.
fn fixture_corpus() -> Vec<Document> {
    vec![
        Document::new(
            "/api/search.md",
            DocumentMeta::new("Search API")
                .with_tags(["search"])
                .with_category(Category::Api),
            "Query the search index over HTTP. Graph data is served separately.",
        ),
        Document::new(
            "/guides/getting-started.md",
            DocumentMeta::new("Getting Started")
                .with_tags(["basics"])
                .with_category(Category::Guide),
            "Start with [[Graph Metrics]], then try the [search api](/api/search.md).",
        ),
        Document::new(
            "/guides/graph.md",
            DocumentMeta::new("Graph Metrics")
                .with_tags(["graphs"])
                .with_category(Category::Guide),
            "Node sizes scale with connection weight; orphans stay at the floor.",
        ),
        Document::new(
            "/notes/lonely.md",
            DocumentMeta::new("Lonely Note"),
            "People keep mentioning Graph Metrics here without linking.",
        ),
    ]
}

/// Create a test server over the fixture corpus.
fn create_test_server() -> TestServer {
    let state = AppState::new(fixture_corpus());
    TestServer::new(create_router(state)).unwrap()
}

/// Create a test server over an empty corpus.
fn create_empty_test_server() -> TestServer {
    let state = AppState::new(Vec::new());
    TestServer::new(create_router(state)).unwrap()
}

// =============================================================================
// HEALTH ENDPOINT TESTS
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let server = create_test_server();

    let response = server.get("/health").await;

    response.assert_status_ok();
    let health: HealthResponse = response.json();
    assert_eq!(health.status, "ok");
    assert_eq!(health.version, env!("CARGO_PKG_VERSION"));
}

// =============================================================================
// STATUS ENDPOINT TESTS
// =============================================================================

#[tokio::test]
async fn test_status_reports_corpus_and_index() {
    let server = create_test_server();

    let response = server.get("/status").await;

    response.assert_status_ok();
    let status: StatusResponse = response.json();
    assert_eq!(status.document_count, 4);
    assert_eq!(status.node_count, 4);
    assert_eq!(status.edge_count, 2);
    assert_eq!(status.orphan_count, 1);
    assert!(status.index_ready, "state construction indexes eagerly");
    assert_eq!(status.indexed_documents, 4);
}

#[tokio::test]
async fn test_status_empty_corpus() {
    let server = create_empty_test_server();

    let response = server.get("/status").await;

    response.assert_status_ok();
    let status: StatusResponse = response.json();
    assert_eq!(status.document_count, 0);
    assert_eq!(status.node_count, 0);
    assert_eq!(status.edge_count, 0);
    assert!(status.index_ready);
    assert_eq!(status.indexed_documents, 0);
}

// =============================================================================
// GRAPH ENDPOINT TESTS
// =============================================================================

#[tokio::test]
async fn test_graph_full() {
    let server = create_test_server();

    let response = server.get("/graph").await;

    response.assert_status_ok();
    let graph: DocumentGraph = response.json();
    assert_eq!(graph.node_count(), 4);
    assert_eq!(graph.edge_count(), 2);

    let lonely = graph.node("/notes/lonely.md").unwrap();
    assert!(lonely.orphan);
    assert_eq!(lonely.size, 1.0);

    let hub = graph.node("/guides/getting-started.md").unwrap();
    assert!(!hub.orphan);
    assert!(hub.size > lonely.size);
}

#[tokio::test]
async fn test_graph_has_structured_and_inline_edges() {
    let server = create_test_server();

    let graph: DocumentGraph = server.get("/graph").await.json();

    assert!(graph.edges.iter().any(|e| {
        e.source == "/guides/getting-started.md" && e.target == "/guides/graph.md"
    }));
    assert!(graph.edges.iter().any(|e| {
        e.source == "/guides/getting-started.md" && e.target == "/api/search.md"
    }));
    assert!(graph.edges.iter().all(|e| e.strength == 1.0));
}

#[tokio::test]
async fn test_graph_category_filter() {
    let server = create_test_server();

    let response = server.get("/graph").add_query_param("category", "guide").await;

    response.assert_status_ok();
    let graph: DocumentGraph = response.json();
    // Both guides survive; the edge out to the api document is pruned.
    assert_eq!(graph.node_count(), 2);
    assert_eq!(graph.edge_count(), 1);
    assert!(graph.nodes.iter().all(|n| n.category == Category::Guide));
}

#[tokio::test]
async fn test_graph_orphans_only_filter() {
    let server = create_test_server();

    let graph: DocumentGraph = server
        .get("/graph")
        .add_query_param("orphans_only", "true")
        .await
        .json();

    assert_eq!(graph.node_count(), 1);
    assert_eq!(graph.nodes[0].id, "/notes/lonely.md");
    assert_eq!(graph.edge_count(), 0);
}

#[tokio::test]
async fn test_graph_tag_filter() {
    let server = create_test_server();

    let graph: DocumentGraph = server.get("/graph").add_query_param("tag", "graphs").await.json();

    assert_eq!(graph.node_count(), 1);
    assert_eq!(graph.nodes[0].id, "/guides/graph.md");
}

#[tokio::test]
async fn test_graph_search_filter() {
    let server = create_test_server();

    let graph: DocumentGraph = server
        .get("/graph")
        .add_query_param("search", "metrics")
        .await
        .json();

    assert_eq!(graph.node_count(), 1);
    assert_eq!(graph.nodes[0].name, "Graph Metrics");
}

#[tokio::test]
async fn test_graph_invalid_category_is_bad_request() {
    let server = create_test_server();

    let response = server.get("/graph").add_query_param("category", "commerce").await;

    response.assert_status_bad_request();
    let error: ErrorResponse = response.json();
    assert!(!error.success);
    assert!(error.error.contains("unknown category"));
}

// =============================================================================
// GRAPH METRICS ENDPOINT TESTS
// =============================================================================

#[tokio::test]
async fn test_graph_metrics() {
    let server = create_test_server();

    let response = server.get("/graph/metrics").await;

    response.assert_status_ok();
    let metrics: GraphMetrics = response.json();
    assert_eq!(metrics.node_count, 4);
    assert_eq!(metrics.edge_count, 2);
    assert_eq!(metrics.orphan_count, 1);
    // api, guide, other
    assert_eq!(metrics.cluster_count, 3);
    // 2 edges -> 4 endpoint increments over 4 nodes
    assert_eq!(metrics.avg_connections, 1.0);

    let top = metrics.most_connected.first().unwrap();
    assert_eq!(top.id, "/guides/getting-started.md");
    assert_eq!(top.connections, 2);
}

#[tokio::test]
async fn test_graph_metrics_empty_corpus() {
    let server = create_empty_test_server();

    let metrics: GraphMetrics = server.get("/graph/metrics").await.json();
    assert_eq!(metrics, GraphMetrics::empty());
}

// =============================================================================
// BACKLINKS ENDPOINT TESTS
// =============================================================================

#[tokio::test]
async fn test_backlinks_linked_and_unlinked() {
    let server = create_test_server();

    let response = server.get("/backlinks/guides/graph.md").await;

    response.assert_status_ok();
    let body: BacklinksResponse = response.json();
    assert!(body.success);
    assert_eq!(body.target.as_deref(), Some("/guides/graph.md"));

    let backlinks = body.backlinks.unwrap();
    assert_eq!(backlinks.linked.len(), 1);
    let linked = &backlinks.linked[0];
    assert_eq!(linked.source.path, "/guides/getting-started.md");
    assert_eq!(linked.kind, RefKind::Structured);
    assert_eq!(linked.text, "Graph Metrics");

    // Full-title mention in the lonely note, plus two title-word hits.
    assert_eq!(backlinks.unlinked.len(), 3);
    assert_eq!(backlinks.unlinked[0].source.path, "/notes/lonely.md");
    assert_eq!(backlinks.unlinked[0].confidence, 1.0);
    assert!(
        backlinks
            .unlinked
            .windows(2)
            .all(|w| w[0].confidence >= w[1].confidence)
    );
    assert_eq!(backlinks.total_count, 4);
}

#[tokio::test]
async fn test_backlinks_min_confidence_param() {
    let server = create_test_server();

    let body: BacklinksResponse = server
        .get("/backlinks/guides/graph.md")
        .add_query_param("min_confidence", "0.8")
        .await
        .json();

    let backlinks = body.backlinks.unwrap();
    assert_eq!(backlinks.unlinked.len(), 1);
    assert_eq!(backlinks.unlinked[0].confidence, 1.0);
    assert_eq!(backlinks.total_count, 2);
}

#[tokio::test]
async fn test_backlinks_max_unlinked_param() {
    let server = create_test_server();

    let body: BacklinksResponse = server
        .get("/backlinks/guides/graph.md")
        .add_query_param("max_unlinked", "1")
        .await
        .json();

    let backlinks = body.backlinks.unwrap();
    assert_eq!(backlinks.unlinked.len(), 1);
    // The cap keeps the highest-confidence mention.
    assert_eq!(backlinks.unlinked[0].confidence, 1.0);
}

#[tokio::test]
async fn test_backlinks_unlinked_false_skips_scan() {
    let server = create_test_server();

    let body: BacklinksResponse = server
        .get("/backlinks/guides/graph.md")
        .add_query_param("unlinked", "false")
        .await
        .json();

    let backlinks = body.backlinks.unwrap();
    assert_eq!(backlinks.linked.len(), 1);
    assert!(backlinks.unlinked.is_empty());
    assert_eq!(backlinks.total_count, 1);
}

#[tokio::test]
async fn test_backlinks_unknown_document_is_not_found() {
    let server = create_test_server();

    let response = server.get("/backlinks/notes/missing.md").await;

    response.assert_status(axum::http::StatusCode::NOT_FOUND);
    let body: BacklinksResponse = response.json();
    assert!(!body.success);
    assert!(body.error.unwrap().contains("/notes/missing.md"));
}

// =============================================================================
// SEARCH ENDPOINT TESTS
// =============================================================================

#[tokio::test]
async fn test_search_exact_title_is_top_result() {
    let server = create_test_server();

    let response = server.get("/search").add_query_param("q", "Search API").await;

    response.assert_status_ok();
    let body: SearchResponse = response.json();
    assert!(body.success);
    assert_eq!(body.query, "Search API");
    assert!(body.count >= 1);
    assert_eq!(body.results[0].document.path, "/api/search.md");
    assert_eq!(body.results[0].match_field, MatchField::Title);
}

#[tokio::test]
async fn test_search_missing_query_is_bad_request() {
    let server = create_test_server();

    let response = server.get("/search").await;

    response.assert_status_bad_request();
    let body: SearchResponse = response.json();
    assert!(!body.success);
    assert!(body.error.unwrap().contains("q"));
}

#[tokio::test]
async fn test_search_short_query_returns_empty() {
    let server = create_test_server();

    let body: SearchResponse = server.get("/search").add_query_param("q", "a").await.json();

    assert!(body.success);
    assert_eq!(body.count, 0);
    assert!(body.results.is_empty());
}

#[tokio::test]
async fn test_search_category_filter() {
    let server = create_test_server();

    let body: SearchResponse = server
        .get("/search")
        .add_query_param("q", "graph")
        .add_query_param("category", "api")
        .await
        .json();

    assert_eq!(body.count, 1);
    assert_eq!(body.results[0].document.path, "/api/search.md");
}

#[tokio::test]
async fn test_search_status_filter_excludes_all_published() {
    let server = create_test_server();

    let body: SearchResponse = server
        .get("/search")
        .add_query_param("q", "graph")
        .add_query_param("status", "draft")
        .await
        .json();

    assert!(body.success);
    assert_eq!(body.count, 0);
}

#[tokio::test]
async fn test_search_invalid_category_is_bad_request() {
    let server = create_test_server();

    let response = server
        .get("/search")
        .add_query_param("q", "graph")
        .add_query_param("category", "nope")
        .await;

    response.assert_status_bad_request();
    let body: SearchResponse = response.json();
    assert!(!body.success);
    assert!(body.error.unwrap().contains("unknown category"));
}

#[tokio::test]
async fn test_search_limit_caps_results() {
    let server = create_test_server();

    let body: SearchResponse = server
        .get("/search")
        .add_query_param("q", "graph")
        .add_query_param("limit", "1")
        .await
        .json();

    assert_eq!(body.count, 1);
}

#[tokio::test]
async fn test_search_preview_can_be_disabled() {
    let server = create_test_server();

    let body: SearchResponse = server
        .get("/search")
        .add_query_param("q", "graph")
        .add_query_param("preview", "false")
        .await
        .json();

    assert!(body.count >= 1);
    assert!(body.results.iter().all(|r| r.preview.is_none()));
}

// =============================================================================
// REINDEX ENDPOINT TESTS
// =============================================================================

#[tokio::test]
async fn test_reindex_rebuilds_over_corpus() {
    let server = create_test_server();

    let response = server.post("/reindex").await;

    response.assert_status_ok();
    let body: ReindexResponse = response.json();
    assert!(body.success);
    assert_eq!(body.document_count, 4);

    // Search still answers afterwards.
    let search: SearchResponse = server.get("/search").add_query_param("q", "graph").await.json();
    assert!(search.count >= 1);
}

// =============================================================================
// ROUTING TESTS
// =============================================================================

#[tokio::test]
async fn test_unknown_endpoint_is_not_found() {
    let server = create_test_server();

    let response = server.get("/nonexistent").await;
    response.assert_status(axum::http::StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_wrong_method_is_rejected() {
    let server = create_test_server();

    let response = server.post("/health").await;
    response.assert_status(axum::http::StatusCode::METHOD_NOT_ALLOWED);

    let response = server.get("/reindex").await;
    response.assert_status(axum::http::StatusCode::METHOD_NOT_ALLOWED);
}
