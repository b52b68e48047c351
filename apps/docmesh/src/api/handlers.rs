//! # API Endpoint Handlers
//!
//! This module implements the actual HTTP endpoint handlers.

use super::{
    AppState,
    types::{
        BacklinksParams, BacklinksResponse, ErrorResponse, GraphParams, HealthResponse,
        ReindexResponse, SearchParams, SearchResponse, StatusResponse,
    },
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use docmesh_core::{
    BacklinkOptions, Category, GraphFilter, GraphMetrics, SearchFilters, SearchQuery, Status,
    backlinks, build_graph, filter_graph,
};

// =============================================================================
// HEALTH HANDLER
// =============================================================================

/// Health check endpoint.
pub async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse::default())
}

// =============================================================================
// STATUS HANDLER
// =============================================================================

/// Corpus and index status.
pub async fn status_handler(State(state): State<AppState>) -> impl IntoResponse {
    let graph = build_graph(&state.corpus);
    let orphan_count = graph.nodes.iter().filter(|n| n.orphan).count();
    let stats = state.engine.read().await.stats();

    let response = StatusResponse {
        document_count: state.corpus.len(),
        node_count: graph.node_count(),
        edge_count: graph.edge_count(),
        orphan_count,
        index_ready: stats.ready,
        indexed_documents: stats.document_count,
    };

    (StatusCode::OK, Json(response))
}

// =============================================================================
// GRAPH HANDLERS
// =============================================================================

/// Build (and optionally filter) the relationship graph.
pub async fn graph_handler(
    State(state): State<AppState>,
    Query(params): Query<GraphParams>,
) -> Response {
    let mut filter = GraphFilter::default();
    if let Some(raw) = params.category {
        match raw.parse::<Category>() {
            Ok(c) => filter.categories = vec![c],
            Err(e) => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(ErrorResponse::new(e.to_string())),
                )
                    .into_response();
            }
        }
    }
    if let Some(tag) = params.tag {
        filter.tags = vec![tag];
    }
    filter.orphans_only = params.orphans_only.unwrap_or(false);
    filter.search = params.search;

    let graph = build_graph(&state.corpus);
    let graph = filter_graph(&graph, &filter);

    (StatusCode::OK, Json(graph)).into_response()
}

/// Connectivity metrics over the full graph.
pub async fn graph_metrics_handler(State(state): State<AppState>) -> impl IntoResponse {
    let graph = build_graph(&state.corpus);
    let metrics = GraphMetrics::from_graph(&graph);
    (StatusCode::OK, Json(metrics))
}

// =============================================================================
// BACKLINKS HANDLER
// =============================================================================

/// Linked and unlinked mentions for one document.
pub async fn backlinks_handler(
    State(state): State<AppState>,
    Path(path): Path<String>,
    Query(params): Query<BacklinksParams>,
) -> impl IntoResponse {
    // Wildcard captures arrive without the leading slash.
    let target_path = if path.starts_with('/') {
        path
    } else {
        format!("/{}", path)
    };

    let Some(target) = state.corpus.iter().find(|d| d.path == target_path) else {
        return (
            StatusCode::NOT_FOUND,
            Json(BacklinksResponse::error(format!(
                "document not found: {}",
                target_path
            ))),
        );
    };

    let mut opts = BacklinkOptions::default();
    if let Some(v) = params.min_confidence {
        opts.min_confidence = v;
    }
    if let Some(v) = params.max_unlinked {
        opts.max_unlinked = v;
    }
    if let Some(v) = params.unlinked {
        opts.include_unlinked = v;
    }

    let result = backlinks(target, &state.corpus, &opts);
    (
        StatusCode::OK,
        Json(BacklinksResponse::found(target_path, result)),
    )
}

// =============================================================================
// SEARCH HANDLER
// =============================================================================

/// Weighted fuzzy search over the current index.
pub async fn search_handler(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> impl IntoResponse {
    let Some(q) = params.q else {
        return (
            StatusCode::BAD_REQUEST,
            Json(SearchResponse::error("", "missing query parameter: q")),
        );
    };

    let mut filters = SearchFilters::default();
    if let Some(raw) = params.category {
        match raw.parse::<Category>() {
            Ok(c) => filters.categories = vec![c],
            Err(e) => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(SearchResponse::error(q, e.to_string())),
                );
            }
        }
    }
    if let Some(raw) = params.status {
        match raw.parse::<Status>() {
            Ok(s) => filters.statuses = vec![s],
            Err(e) => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(SearchResponse::error(q, e.to_string())),
                );
            }
        }
    }
    if let Some(tag) = params.tag {
        filters.tags = vec![tag];
    }

    let mut query = SearchQuery::new(q.clone());
    query.filters = filters;
    if let Some(v) = params.limit {
        query.limit = v;
    }
    query.threshold = params.threshold;
    if let Some(v) = params.preview {
        query.include_preview = v;
    }

    let engine = state.engine.read().await;
    let results = engine.search(&query);
    (StatusCode::OK, Json(SearchResponse::success(q, results)))
}

// =============================================================================
// REINDEX HANDLER
// =============================================================================

/// Rebuild the search index over the corpus snapshot.
pub async fn reindex_handler(State(state): State<AppState>) -> impl IntoResponse {
    let mut engine = state.engine.write().await;
    engine.reindex(&state.corpus);
    let stats = engine.stats();
    tracing::info!("search index rebuilt over {} documents", stats.document_count);

    (
        StatusCode::OK,
        Json(ReindexResponse {
            success: true,
            document_count: stats.document_count,
        }),
    )
}
