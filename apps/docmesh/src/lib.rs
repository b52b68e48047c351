//! # Docmesh Application Library
//!
//! Shared modules for the docmesh binary, exposed as a library so the
//! integration tests can exercise the API router, corpus loader, and
//! configuration without spawning a process.
//!
//! All actual relationship logic lives in `docmesh-core`; this crate only
//! adds the outer shell (files, flags, sockets).

pub mod api;
pub mod cli;
pub mod config;
pub mod loader;

use thiserror::Error;

// =============================================================================
// APPLICATION ERROR
// =============================================================================

/// Top-level application error.
///
/// The core engine is total and never fails; everything that can go wrong
/// lives out here at the boundary (filesystem, config file, socket). The
/// binary exits non-zero on any of these.
#[derive(Error, Debug)]
pub enum DocmeshError {
    /// Filesystem failure while reading config or corpus files.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// Unusable configuration (bad TOML, unknown category/status, bad flag).
    #[error("config error: {0}")]
    Config(String),

    /// Corpus-level failure (missing docs directory, unknown document).
    #[error("corpus error: {0}")]
    Corpus(String),

    /// HTTP server failure (bind or serve).
    #[error("server error: {0}")]
    Server(String),
}
