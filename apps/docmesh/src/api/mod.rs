//! # Docmesh HTTP API Module
//!
//! This module implements the HTTP REST API server using axum.
//!
//! ## Endpoints
//!
//! - `GET /health` - Health check
//! - `GET /status` - Corpus and index status
//! - `GET /graph` - Relationship graph (filterable via query params)
//! - `GET /graph/metrics` - Connectivity metrics
//! - `GET /backlinks/{path}` - Linked + unlinked mentions for a document
//! - `GET /search` - Weighted fuzzy search
//! - `POST /reindex` - Rebuild the search index
//!
//! ## Security Configuration (Environment Variables)
//!
//! - `DOCMESH_CORS_ORIGINS`: Comma-separated list of allowed origins, or
//!   "*" for all (default: localhost only)

mod handlers;
mod types;

// Re-export handlers and types for integration tests (via `docmesh::api::*`)
pub use handlers::{
    backlinks_handler, graph_handler, graph_metrics_handler, health_handler, reindex_handler,
    search_handler, status_handler,
};
pub use types::{
    BacklinksParams, BacklinksResponse, ErrorResponse, GraphParams, HealthResponse,
    ReindexResponse, SearchParams, SearchResponse, StatusResponse,
};

use crate::DocmeshError;
use axum::{
    Router,
    http::{HeaderValue, Method, header},
    routing::{get, post},
};
use docmesh_core::{Document, SearchEngine};
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

// =============================================================================
// SERVER STATE
// =============================================================================

/// Shared server state: an immutable corpus snapshot plus the search engine.
///
/// Graph and backlink operations read the corpus directly on each request;
/// only the search engine holds derived state, replaced wholesale under the
/// write lock by `POST /reindex`.
#[derive(Clone)]
pub struct AppState {
    /// The loaded corpus, ordered by path.
    pub corpus: Arc<Vec<Document>>,
    /// The search engine with its current index snapshot.
    pub engine: Arc<RwLock<SearchEngine>>,
}

impl AppState {
    /// Create app state over a corpus, with the search index built eagerly.
    #[must_use]
    pub fn new(corpus: Vec<Document>) -> Self {
        let mut engine = SearchEngine::new();
        engine.reindex(&corpus);
        Self {
            corpus: Arc::new(corpus),
            engine: Arc::new(RwLock::new(engine)),
        }
    }
}

// =============================================================================
// CORS CONFIGURATION
// =============================================================================

/// Build CORS layer from environment configuration.
///
/// Reads the `DOCMESH_CORS_ORIGINS` environment variable:
/// - If "*": allows all origins (development mode - use with caution!)
/// - If not set: defaults to localhost only (restrictive default)
/// - Otherwise: parses comma-separated list of allowed origins
fn build_cors_layer() -> CorsLayer {
    let origins_env = std::env::var("DOCMESH_CORS_ORIGINS").ok();

    match origins_env.as_deref() {
        Some("*") => {
            tracing::warn!(
                "CORS: Allowing ALL origins (DOCMESH_CORS_ORIGINS=*). This is insecure for production!"
            );
            CorsLayer::permissive()
        }
        Some(origins) => {
            let allowed_origins: Vec<HeaderValue> = origins
                .split(',')
                .filter_map(|s| {
                    let trimmed = s.trim();
                    match trimmed.parse::<HeaderValue>() {
                        Ok(hv) => {
                            tracing::info!("CORS: Allowing origin: {}", trimmed);
                            Some(hv)
                        }
                        Err(e) => {
                            tracing::warn!("CORS: Invalid origin '{}': {}", trimmed, e);
                            None
                        }
                    }
                })
                .collect();

            if allowed_origins.is_empty() {
                tracing::warn!(
                    "CORS: No valid origins in DOCMESH_CORS_ORIGINS, defaulting to localhost only"
                );
                build_localhost_cors()
            } else {
                CorsLayer::new()
                    .allow_origin(allowed_origins)
                    .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                    .allow_headers([header::CONTENT_TYPE])
            }
        }
        None => {
            tracing::info!("CORS: No DOCMESH_CORS_ORIGINS set, defaulting to localhost only");
            build_localhost_cors()
        }
    }
}

/// Build a restrictive CORS layer that only allows localhost origins.
fn build_localhost_cors() -> CorsLayer {
    let localhost_origins = vec![
        "http://localhost:3000".parse::<HeaderValue>().ok(),
        "http://localhost:8080".parse::<HeaderValue>().ok(),
        "http://127.0.0.1:3000".parse::<HeaderValue>().ok(),
        "http://127.0.0.1:8080".parse::<HeaderValue>().ok(),
    ];
    let origins: Vec<HeaderValue> = localhost_origins.into_iter().flatten().collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}

// =============================================================================
// ROUTER CREATION
// =============================================================================

/// Create the axum router with all endpoints and middleware.
///
/// Middleware stack (outer to inner):
/// 1. Tracing - logs all requests
/// 2. CORS - handles preflight requests
/// 3. Body limit - caps request bodies at 2 MB
pub fn create_router(state: AppState) -> Router {
    let cors = build_cors_layer();

    Router::new()
        .route("/health", get(handlers::health_handler))
        .route("/status", get(handlers::status_handler))
        .route("/graph", get(handlers::graph_handler))
        .route("/graph/metrics", get(handlers::graph_metrics_handler))
        .route("/backlinks/{*path}", get(handlers::backlinks_handler))
        .route("/search", get(handlers::search_handler))
        .route("/reindex", post(handlers::reindex_handler))
        .layer(axum::extract::DefaultBodyLimit::max(2 * 1024 * 1024))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// =============================================================================
// SERVER STARTUP
// =============================================================================

/// Start the HTTP server over a loaded corpus.
pub async fn run_server(addr: &str, corpus: Vec<Document>) -> Result<(), DocmeshError> {
    let state = AppState::new(corpus);
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| DocmeshError::Server(format!("bind {}: {}", addr, e)))?;

    tracing::info!("docmesh HTTP server listening on {}", addr);

    axum::serve(listener, router)
        .await
        .map_err(|e| DocmeshError::Server(format!("server error: {}", e)))
}
