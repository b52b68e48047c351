//! # Docmesh - Document Relationship Server
//!
//! The main binary for the docmesh relationship engine.
//!
//! This application provides:
//! - HTTP REST API server (axum-based)
//! - CLI interface for graph, backlink, and search operations
//! - Corpus loader for markdown documentation trees
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      apps/docmesh (THE BINARY)                  │
//! │                                                                 │
//! │  ┌─────────────┐    ┌─────────────┐    ┌──────────────────┐   │
//! │  │   CLI       │    │   HTTP API  │    │  Corpus Loader   │   │
//! │  │  (clap)     │    │   (axum)    │    │  (walkdir+yaml)  │   │
//! │  └──────┬──────┘    └──────┬──────┘    └────────┬─────────┘   │
//! │         │                  │                    │              │
//! │         └──────────────────┼────────────────────┘              │
//! │                            ▼                                   │
//! │                    ┌───────────────┐                           │
//! │                    │ docmesh-core  │                           │
//! │                    │  (THE LOGIC)  │                           │
//! │                    └───────────────┘                           │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! # Start the HTTP server over a docs tree
//! docmesh --docs-dir ./docs serve --host 0.0.0.0 --port 8080
//!
//! # CLI operations
//! docmesh status
//! docmesh graph --json
//! docmesh backlinks /guides/getting-started.md
//! docmesh search "deployment checklist" --category guide
//! ```

use clap::Parser;
use docmesh::cli;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

#[tokio::main]
async fn main() {
    // Initialize tracing — DOCMESH_LOG_FORMAT=json enables machine-parseable output.
    let log_format = std::env::var("DOCMESH_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "docmesh=info,tower_http=debug".into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }

    // Parse CLI arguments
    let cli = cli::Cli::parse();

    // Display startup banner
    if !cli.quiet {
        print_banner();
    }

    // Execute command
    if let Err(e) = cli::execute(cli).await {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Print the docmesh startup banner.
fn print_banner() {
    println!(
        r#"
  ██████╗  ██████╗  ██████╗███╗   ███╗███████╗███████╗██╗  ██╗
  ██╔══██╗██╔═══██╗██╔════╝████╗ ████║██╔════╝██╔════╝██║  ██║
  ██║  ██║██║   ██║██║     ██╔████╔██║█████╗  ███████╗███████║
  ██║  ██║██║   ██║██║     ██║╚██╔╝██║██╔══╝  ╚════██║██╔══██║
  ██████╔╝╚██████╔╝╚██████╗██║ ╚═╝ ██║███████╗███████║██║  ██║
  ╚═════╝  ╚═════╝  ╚═════╝╚═╝     ╚═╝╚══════╝╚══════╝╚═╝  ╚═╝

  Document Relationship Server v{}

  Links • Backlinks • Search
"#,
        env!("CARGO_PKG_VERSION")
    );
}
