//! # Docmesh CLI Module
//!
//! This module implements the CLI interface for docmesh.
//!
//! ## Available Commands
//!
//! - `graph` - Build the relationship graph and print it
//! - `metrics` - Print connectivity metrics for the graph
//! - `backlinks <path>` - Show linked and unlinked mentions for a document
//! - `search <query>` - Search the corpus with weighted fuzzy matching
//! - `serve` - Start the HTTP API server
//! - `status` - Corpus and index summary (default when no subcommand)

mod commands;

use crate::DocmeshError;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// Docmesh - Document Relationship Server
///
/// Extracts links from a markdown corpus, builds the document graph, and
/// answers backlink and search queries over it.
#[derive(Parser, Debug)]
#[command(name = "docmesh")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Documentation directory to load
    #[arg(short = 'd', long, global = true)]
    pub docs_dir: Option<PathBuf>,

    /// Path to a docmesh.toml config file
    #[arg(short = 'c', long, global = true)]
    pub config: Option<PathBuf>,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build the relationship graph and print it
    Graph,

    /// Print connectivity metrics for the graph
    Metrics,

    /// Show linked and unlinked mentions for one document
    Backlinks {
        /// Corpus path of the target document (e.g. /guides/intro.md)
        path: String,

        /// Minimum confidence for unlinked mentions
        #[arg(long)]
        min_confidence: Option<f64>,

        /// Maximum number of unlinked mentions to report
        #[arg(long)]
        max_unlinked: Option<usize>,

        /// Skip unlinked-mention scanning entirely
        #[arg(long)]
        no_unlinked: bool,
    },

    /// Search the corpus
    Search {
        /// Search query
        query: String,

        /// Restrict results to one category
        #[arg(long)]
        category: Option<String>,

        /// Restrict results to documents carrying a tag (repeatable)
        #[arg(long)]
        tag: Vec<String>,

        /// Restrict results to one status
        #[arg(long)]
        status: Option<String>,

        /// Maximum number of results
        #[arg(long)]
        limit: Option<usize>,

        /// Fuzzy threshold: 0.0 demands exact matches, higher admits more
        #[arg(long)]
        threshold: Option<f64>,
    },

    /// Start the HTTP API server
    Serve {
        /// Host to bind to
        #[arg(short = 'H', long)]
        host: Option<String>,

        /// Port to bind to
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Show corpus and index status
    Status,
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub async fn execute(cli: Cli) -> Result<(), DocmeshError> {
    let config = crate::config::Config::discover(cli.config.as_deref())?;
    let docs_dir = config.docs_dir(cli.docs_dir.as_deref());
    let json = cli.json;

    match cli.command {
        Some(Commands::Serve { host, port }) => {
            cmd_serve(&config, &docs_dir, host.as_deref(), port).await
        }
        Some(Commands::Graph) => cmd_graph(&docs_dir, json),
        Some(Commands::Metrics) => cmd_metrics(&docs_dir, json),
        Some(Commands::Backlinks {
            path,
            min_confidence,
            max_unlinked,
            no_unlinked,
        }) => cmd_backlinks(
            &config,
            &docs_dir,
            json,
            &path,
            min_confidence,
            max_unlinked,
            no_unlinked,
        ),
        Some(Commands::Search {
            query,
            category,
            tag,
            status,
            limit,
            threshold,
        }) => cmd_search(
            &config,
            &docs_dir,
            json,
            &query,
            category.as_deref(),
            tag,
            status.as_deref(),
            limit,
            threshold,
        ),
        Some(Commands::Status) | None => {
            // No subcommand - show status by default
            cmd_status(&docs_dir, json)
        }
    }
}
