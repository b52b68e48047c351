//! # Application Configuration
//!
//! Optional `docmesh.toml` configuration file. Every field is optional;
//! resolution order is CLI flag, then config file, then built-in default.
//!
//! ```toml
//! [corpus]
//! dir = "docs"
//!
//! [server]
//! host = "127.0.0.1"
//! port = 8080
//!
//! [backlinks]
//! min_confidence = 0.4
//! max_unlinked = 20
//!
//! [search]
//! limit = 50
//! threshold = 0.3
//! ```

use crate::DocmeshError;
use docmesh_core::BacklinkOptions;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Config file read from the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "docmesh.toml";

/// Default docs directory when neither flag nor config names one.
pub const DEFAULT_DOCS_DIR: &str = "docs";

/// Default server bind host.
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default server bind port.
pub const DEFAULT_PORT: u16 = 8080;

// =============================================================================
// CONFIG STRUCTURE
// =============================================================================

/// Root configuration, mirroring the `docmesh.toml` sections.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub corpus: CorpusConfig,
    pub server: ServerConfig,
    pub backlinks: BacklinksConfig,
    pub search: SearchConfig,
}

/// `[corpus]` section.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct CorpusConfig {
    /// Docs directory to load.
    pub dir: Option<PathBuf>,
}

/// `[server]` section.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
}

/// `[backlinks]` section.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct BacklinksConfig {
    pub min_confidence: Option<f64>,
    pub max_unlinked: Option<usize>,
}

/// `[search]` section.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct SearchConfig {
    pub limit: Option<usize>,
    pub threshold: Option<f64>,
}

// =============================================================================
// LOADING
// =============================================================================

impl Config {
    /// Parse a config file.
    pub fn load(path: &Path) -> Result<Self, DocmeshError> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            DocmeshError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        toml::from_str(&text)
            .map_err(|e| DocmeshError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Load from an explicit path, or from [`DEFAULT_CONFIG_FILE`] in the
    /// working directory when present. A missing explicit path is an error;
    /// a missing default file just yields the defaults.
    pub fn discover(explicit: Option<&Path>) -> Result<Self, DocmeshError> {
        match explicit {
            Some(path) => Self::load(path),
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILE);
                if default.is_file() {
                    tracing::debug!("using config file {}", default.display());
                    Self::load(default)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Resolve the docs directory: flag wins over config wins over default.
    #[must_use]
    pub fn docs_dir(&self, flag: Option<&Path>) -> PathBuf {
        flag.map(Path::to_path_buf)
            .or_else(|| self.corpus.dir.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DOCS_DIR))
    }

    /// Resolve the server bind address: flags win over config wins over
    /// defaults.
    #[must_use]
    pub fn bind_addr(&self, host_flag: Option<&str>, port_flag: Option<u16>) -> String {
        let host = host_flag
            .map(str::to_string)
            .or_else(|| self.server.host.clone())
            .unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = port_flag.or(self.server.port).unwrap_or(DEFAULT_PORT);
        format!("{}:{}", host, port)
    }

    /// Backlink options with config-file values applied over the engine
    /// defaults. CLI flags are applied on top by the caller.
    #[must_use]
    pub fn backlink_options(&self) -> BacklinkOptions {
        let mut opts = BacklinkOptions::default();
        if let Some(v) = self.backlinks.min_confidence {
            opts.min_confidence = v;
        }
        if let Some(v) = self.backlinks.max_unlinked {
            opts.max_unlinked = v;
        }
        opts
    }
}
