//! # CLI Command Implementations
//!
//! Each command loads the corpus, runs the relevant engine operation, and
//! prints either a text summary or JSON (`--json`).

use crate::{DocmeshError, api, config::Config, loader};
use docmesh_core::{
    Category, Document, DocumentGraph, GraphMetrics, SearchEngine, SearchFilters, SearchIndex,
    SearchQuery, Status, backlinks, build_graph,
};
use std::path::Path;

/// Node/edge lines printed before eliding in text mode.
const LIST_LIMIT: usize = 20;

// =============================================================================
// SERVE COMMAND
// =============================================================================

/// Load the corpus and start the HTTP server.
pub async fn cmd_serve(
    config: &Config,
    docs_dir: &Path,
    host: Option<&str>,
    port: Option<u16>,
) -> Result<(), DocmeshError> {
    let corpus = loader::load_corpus(docs_dir)?;
    let addr = config.bind_addr(host, port);

    println!("Docmesh server starting...");
    println!();
    println!("Configuration:");
    println!("  Docs dir: {}", docs_dir.display());
    println!("  Corpus:   {} documents", corpus.len());
    println!("  Bind:     {}", addr);
    println!();
    println!("Endpoints:");
    println!("  GET  /health            - Health check");
    println!("  GET  /status            - Corpus and index status");
    println!("  GET  /graph             - Relationship graph (filterable)");
    println!("  GET  /graph/metrics     - Connectivity metrics");
    println!("  GET  /backlinks/{{path}}  - Linked + unlinked mentions");
    println!("  GET  /search            - Weighted fuzzy search");
    println!("  POST /reindex           - Rebuild the search index");
    println!();
    println!("Press Ctrl+C to stop");
    println!();

    api::run_server(&addr, corpus).await
}

// =============================================================================
// GRAPH COMMAND
// =============================================================================

/// Build and print the relationship graph.
pub fn cmd_graph(docs_dir: &Path, json: bool) -> Result<(), DocmeshError> {
    let corpus = loader::load_corpus(docs_dir)?;
    let graph = build_graph(&corpus);
    log_graph_stats(&graph);

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&graph).unwrap_or_default()
        );
        return Ok(());
    }

    println!("Document Graph");
    println!("==============");
    println!("Documents: {}", graph.node_count());
    println!("Edges:     {}", graph.edge_count());
    println!();

    println!("Nodes:");
    for node in graph.nodes.iter().take(LIST_LIMIT) {
        let orphan = if node.orphan { "  (orphan)" } else { "" };
        println!(
            "  {}  \"{}\"  size {:.1}{}",
            node.id, node.name, node.size, orphan
        );
    }
    if graph.nodes.len() > LIST_LIMIT {
        println!("  ... and {} more", graph.nodes.len() - LIST_LIMIT);
    }

    println!();
    println!("Edges:");
    for edge in graph.edges.iter().take(LIST_LIMIT) {
        println!(
            "  {} -> {}  [{}]  strength {:.1}",
            edge.source, edge.target, edge.kind, edge.strength
        );
    }
    if graph.edges.len() > LIST_LIMIT {
        println!("  ... and {} more", graph.edges.len() - LIST_LIMIT);
    }

    Ok(())
}

// =============================================================================
// METRICS COMMAND
// =============================================================================

/// Print connectivity metrics for the graph.
pub fn cmd_metrics(docs_dir: &Path, json: bool) -> Result<(), DocmeshError> {
    let corpus = loader::load_corpus(docs_dir)?;
    let graph = build_graph(&corpus);
    log_graph_stats(&graph);
    let metrics = GraphMetrics::from_graph(&graph);

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&metrics).unwrap_or_default()
        );
        return Ok(());
    }

    println!("Graph Metrics");
    println!("=============");
    println!("Documents:       {}", metrics.node_count);
    println!("Links:           {}", metrics.edge_count);
    println!("Orphans:         {}", metrics.orphan_count);
    println!("Clusters:        {}", metrics.cluster_count);
    println!("Avg connections: {:.2}", metrics.avg_connections);

    if !metrics.most_connected.is_empty() {
        println!();
        println!("Most connected:");
        for (i, doc) in metrics.most_connected.iter().enumerate() {
            println!(
                "  {}. \"{}\"  {}  ({} connections)",
                i + 1,
                doc.name,
                doc.id,
                doc.connections
            );
        }
    }

    Ok(())
}

// =============================================================================
// BACKLINKS COMMAND
// =============================================================================

/// Show linked and unlinked mentions for one document.
pub fn cmd_backlinks(
    config: &Config,
    docs_dir: &Path,
    json: bool,
    path: &str,
    min_confidence: Option<f64>,
    max_unlinked: Option<usize>,
    no_unlinked: bool,
) -> Result<(), DocmeshError> {
    let corpus = loader::load_corpus(docs_dir)?;
    let target = find_document(&corpus, path)?;

    let mut opts = config.backlink_options();
    if let Some(v) = min_confidence {
        opts.min_confidence = v;
    }
    if let Some(v) = max_unlinked {
        opts.max_unlinked = v;
    }
    opts.include_unlinked = !no_unlinked;

    let result = backlinks(target, &corpus, &opts);
    tracing::debug!(
        linked = result.linked.len(),
        unlinked = result.unlinked.len(),
        total = result.total_count,
        "backlinks computed"
    );

    if json {
        let output = serde_json::json!({
            "target": target.path,
            "title": target.meta.title,
            "linked": result.linked,
            "unlinked": result.unlinked,
            "total_count": result.total_count,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&output).unwrap_or_default()
        );
        return Ok(());
    }

    println!("Backlinks for {}  (\"{}\")", target.path, target.meta.title);
    println!("=============");
    println!();
    println!("Linked mentions ({}):", result.linked.len());
    for m in &result.linked {
        println!("  {}  \"{}\"  [{}]", m.source.path, m.source.title, m.kind);
        if !m.context.is_empty() {
            println!("      {}", m.context);
        }
    }

    if !no_unlinked {
        println!();
        println!("Unlinked mentions ({}):", result.unlinked.len());
        for m in &result.unlinked {
            println!(
                "  {}  \"{}\"  confidence {:.2}",
                m.source.path, m.text, m.confidence
            );
            if !m.context.is_empty() {
                println!("      {}", m.context);
            }
        }
    }

    println!();
    println!("Total mentions: {}", result.total_count);

    Ok(())
}

// =============================================================================
// SEARCH COMMAND
// =============================================================================

/// Search the corpus and print ranked results.
pub fn cmd_search(
    config: &Config,
    docs_dir: &Path,
    json: bool,
    query: &str,
    category: Option<&str>,
    tags: Vec<String>,
    status: Option<&str>,
    limit: Option<usize>,
    threshold: Option<f64>,
) -> Result<(), DocmeshError> {
    let corpus = loader::load_corpus(docs_dir)?;

    let mut filters = SearchFilters::default();
    if let Some(raw) = category {
        filters.categories = vec![parse_category(raw)?];
    }
    if let Some(raw) = status {
        filters.statuses = vec![parse_status(raw)?];
    }
    filters.tags = tags;

    let mut search_query = SearchQuery::new(query);
    search_query.filters = filters;
    if let Some(v) = limit.or(config.search.limit) {
        search_query.limit = v;
    }
    search_query.threshold = threshold.or(config.search.threshold);

    let index = SearchIndex::build(&corpus);
    let results = index.search(&search_query);

    if json {
        let output = serde_json::json!({
            "query": query,
            "count": results.len(),
            "results": results,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&output).unwrap_or_default()
        );
        return Ok(());
    }

    if results.is_empty() {
        println!("No results for \"{}\"", query);
        return Ok(());
    }

    println!("Search results for \"{}\" ({}):", query, results.len());
    println!();
    for (i, result) in results.iter().enumerate() {
        println!(
            "  {}. {}  \"{}\"  score {:.4}  [{}]",
            i + 1,
            result.document.path,
            result.document.meta.title,
            result.score,
            result.match_field
        );
        if let Some(preview) = &result.preview {
            println!("     {}", preview);
        }
    }

    Ok(())
}

// =============================================================================
// STATUS COMMAND
// =============================================================================

/// Show a corpus and index summary.
pub fn cmd_status(docs_dir: &Path, json: bool) -> Result<(), DocmeshError> {
    let corpus = match loader::load_corpus(docs_dir) {
        Ok(c) => c,
        Err(e) => {
            if json {
                let output = serde_json::json!({
                    "docs_dir": docs_dir.to_string_lossy(),
                    "available": false,
                    "error": e.to_string(),
                });
                println!(
                    "{}",
                    serde_json::to_string_pretty(&output).unwrap_or_default()
                );
            } else {
                println!("Corpus unavailable: {}", e);
            }
            return Ok(());
        }
    };

    let graph = build_graph(&corpus);
    log_graph_stats(&graph);
    let orphans = graph.nodes.iter().filter(|n| n.orphan).count();

    let mut engine = SearchEngine::new();
    engine.reindex(&corpus);
    let stats = engine.stats();

    if json {
        let output = serde_json::json!({
            "docs_dir": docs_dir.to_string_lossy(),
            "available": true,
            "document_count": corpus.len(),
            "node_count": graph.node_count(),
            "edge_count": graph.edge_count(),
            "orphan_count": orphans,
            "index_ready": stats.ready,
            "indexed_documents": stats.document_count,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&output).unwrap_or_default()
        );
        return Ok(());
    }

    println!("Docmesh Status");
    println!("==============");
    println!("Docs dir:  {}", docs_dir.display());
    println!();
    println!("Documents: {}", corpus.len());
    println!("Edges:     {}", graph.edge_count());
    println!("Orphans:   {}", orphans);
    if stats.ready {
        println!("Index:     ready ({} documents)", stats.document_count);
    } else {
        println!("Index:     not built");
    }

    Ok(())
}

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

/// Find a document by corpus path, tolerating a missing leading slash.
pub fn find_document<'a>(
    corpus: &'a [Document],
    path: &str,
) -> Result<&'a Document, DocmeshError> {
    let normalized = if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{}", path)
    };
    corpus
        .iter()
        .find(|d| d.path == normalized)
        .ok_or_else(|| DocmeshError::Corpus(format!("document not found: {}", normalized)))
}

fn parse_category(raw: &str) -> Result<Category, DocmeshError> {
    raw.parse::<Category>()
        .map_err(|e| DocmeshError::Config(e.to_string()))
}

fn parse_status(raw: &str) -> Result<Status, DocmeshError> {
    raw.parse::<Status>()
        .map_err(|e| DocmeshError::Config(e.to_string()))
}

fn log_graph_stats(graph: &DocumentGraph) {
    let orphans = graph.nodes.iter().filter(|n| n.orphan).count();
    tracing::debug!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        orphans,
        "graph built"
    );
}
