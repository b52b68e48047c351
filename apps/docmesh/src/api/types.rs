//! # API Request/Response Types
//!
//! Thin envelopes around the engine's own serde types. Graph and metrics
//! endpoints return the core structures directly; these types cover health,
//! status, and the endpoints that need a success/error wrapper.

use docmesh_core::{Backlinks, SearchResult};
use serde::{Deserialize, Serialize};

// =============================================================================
// HEALTH RESPONSE
// =============================================================================

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

// =============================================================================
// STATUS RESPONSE
// =============================================================================

/// Corpus and index status response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub document_count: usize,
    pub node_count: usize,
    pub edge_count: usize,
    pub orphan_count: usize,
    pub index_ready: bool,
    pub indexed_documents: usize,
}

// =============================================================================
// GRAPH PARAMETERS
// =============================================================================

/// Query parameters for `GET /graph`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphParams {
    /// Keep nodes of this category only.
    pub category: Option<String>,
    /// Keep nodes carrying this tag only.
    pub tag: Option<String>,
    /// Keep orphan nodes only.
    pub orphans_only: Option<bool>,
    /// Substring filter against name, path, or tags.
    pub search: Option<String>,
}

// =============================================================================
// BACKLINKS PARAMETERS/RESPONSE
// =============================================================================

/// Query parameters for `GET /backlinks/{path}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BacklinksParams {
    /// Minimum confidence for unlinked mentions.
    pub min_confidence: Option<f64>,
    /// Cap on reported unlinked mentions.
    pub max_unlinked: Option<usize>,
    /// Set to `false` to skip unlinked-mention scanning.
    pub unlinked: Option<bool>,
}

/// Backlinks response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacklinksResponse {
    pub success: bool,
    pub target: Option<String>,
    pub backlinks: Option<Backlinks>,
    pub error: Option<String>,
}

impl BacklinksResponse {
    pub fn found(target: impl Into<String>, backlinks: Backlinks) -> Self {
        Self {
            success: true,
            target: Some(target.into()),
            backlinks: Some(backlinks),
            error: None,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            target: None,
            backlinks: None,
            error: Some(msg.into()),
        }
    }
}

// =============================================================================
// SEARCH PARAMETERS/RESPONSE
// =============================================================================

/// Query parameters for `GET /search`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchParams {
    /// The search query (required).
    pub q: Option<String>,
    pub category: Option<String>,
    pub tag: Option<String>,
    pub status: Option<String>,
    pub limit: Option<usize>,
    pub threshold: Option<f64>,
    /// Set to `false` to omit previews.
    pub preview: Option<bool>,
}

/// Search response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub success: bool,
    pub query: String,
    pub count: usize,
    pub results: Vec<SearchResult>,
    pub error: Option<String>,
}

impl SearchResponse {
    pub fn success(query: impl Into<String>, results: Vec<SearchResult>) -> Self {
        let count = results.len();
        Self {
            success: true,
            query: query.into(),
            count,
            results,
            error: None,
        }
    }

    pub fn error(query: impl Into<String>, msg: impl Into<String>) -> Self {
        Self {
            success: false,
            query: query.into(),
            count: 0,
            results: Vec::new(),
            error: Some(msg.into()),
        }
    }
}

// =============================================================================
// REINDEX RESPONSE
// =============================================================================

/// Reindex response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReindexResponse {
    pub success: bool,
    pub document_count: usize,
}

// =============================================================================
// ERROR RESPONSE
// =============================================================================

/// Generic error envelope for endpoints whose success payload is a bare
/// core structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

impl ErrorResponse {
    pub fn new(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            error: msg.into(),
        }
    }
}
