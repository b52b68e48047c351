//! # docmesh-core
//!
//! The document relationship engine for DocMesh - THE LOGIC.
//!
//! This crate implements the core substrate over an in-memory markdown
//! corpus: link extraction, path resolution, graph building, graph
//! metrics, backlink discovery (linked and unlinked mentions), and
//! weighted fuzzy search.
//!
//! ## Architectural Constraints
//!
//! The CORE:
//! - Receives an immutable corpus snapshot and returns structured results
//! - Never reads from disk or network; loading is the host's job
//! - Is total: malformed references and empty queries yield empty
//!   results, never errors
//! - Has NO async, NO network dependencies (pure Rust)

// =============================================================================
// MODULES
// =============================================================================

pub mod backlinks;
pub mod extract;
pub mod graph;
pub mod metrics;
pub mod resolve;
pub mod search;
pub mod types;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{Category, Document, DocumentMeta, MetaError, SourceRef, Status};

// =============================================================================
// RE-EXPORTS: Link Extraction & Resolution
// =============================================================================

pub use extract::{
    DOC_EXTENSION, ExtractedLinks, LinkSpans, RefKind, Reference, extract_links, scan_references,
};
pub use resolve::resolve_reference;

// =============================================================================
// RE-EXPORTS: Graph & Metrics
// =============================================================================

pub use graph::{DocumentGraph, EdgeKind, GraphEdge, GraphNode, build_graph};
pub use metrics::{GraphFilter, GraphMetrics, MostConnected, filter_graph};

// =============================================================================
// RE-EXPORTS: Backlinks
// =============================================================================

pub use backlinks::{
    BacklinkOptions, Backlinks, LinkedMention, UnlinkedMention, backlinks, linked_mentions,
    unlinked_mentions,
};

// =============================================================================
// RE-EXPORTS: Search
// =============================================================================

pub use search::{
    FieldMatch, IndexStats, MatchField, SearchEngine, SearchFilters, SearchIndex, SearchQuery,
    SearchResult,
};
