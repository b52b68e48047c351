//! # Types Module
//!
//! Core type definitions for the Docmesh relationship engine.
//!
//! A corpus is an ordered slice of [`Document`]s. Documents are immutable
//! snapshots for the duration of one graph-build/backlink/search pass; the
//! engine borrows them and never mutates or retains them.
//!
//! Category and status are closed enumerations, validated once at the
//! corpus boundary. Unknown strings are a [`MetaError`] there; callers that
//! want the permissive behavior of the surrounding platform map the error
//! to the documented defaults (`Category::Other`, `Status::Published`).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

// =============================================================================
// CATEGORY
// =============================================================================

/// Document category.
///
/// Fixed small enumeration; the corpus default is [`Category::Other`].
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Roadmap,
    Guide,
    Api,
    Tutorial,
    BestPractices,
    #[default]
    Other,
}

impl Category {
    /// The canonical kebab-case form used in frontmatter and filters.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Roadmap => "roadmap",
            Self::Guide => "guide",
            Self::Api => "api",
            Self::Tutorial => "tutorial",
            Self::BestPractices => "best-practices",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = MetaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "roadmap" => Ok(Self::Roadmap),
            "guide" => Ok(Self::Guide),
            "api" => Ok(Self::Api),
            "tutorial" => Ok(Self::Tutorial),
            "best-practices" => Ok(Self::BestPractices),
            "other" => Ok(Self::Other),
            _ => Err(MetaError::UnknownCategory(s.to_string())),
        }
    }
}

// =============================================================================
// STATUS
// =============================================================================

/// Document publication status.
///
/// The corpus default is [`Status::Published`].
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Draft,
    Review,
    #[default]
    Published,
    Archived,
}

impl Status {
    /// The canonical lowercase form used in frontmatter and filters.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Review => "review",
            Self::Published => "published",
            Self::Archived => "archived",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = MetaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "draft" => Ok(Self::Draft),
            "review" => Ok(Self::Review),
            "published" => Ok(Self::Published),
            "archived" => Ok(Self::Archived),
            _ => Err(MetaError::UnknownStatus(s.to_string())),
        }
    }
}

// =============================================================================
// DOCUMENT METADATA
// =============================================================================

/// Structured metadata attached to a document.
///
/// The closed replacement for the platform's loose frontmatter maps: every
/// field is typed, and unknown category/status values never get past the
/// corpus boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentMeta {
    /// Display title.
    pub title: String,
    /// Optional short description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Category (defaults to `other`).
    #[serde(default)]
    pub category: Category,
    /// Tags; order-irrelevant, case-sensitive.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Optional author.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// Optional declared date (frontmatter `YYYY-MM-DD`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    /// Publication status (defaults to `published`).
    #[serde(default)]
    pub status: Status,
}

impl DocumentMeta {
    /// Create metadata with the given title and defaults everywhere else.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            category: Category::default(),
            tags: Vec::new(),
            author: None,
            date: None,
            status: Status::default(),
        }
    }

    /// Builder-style tag assignment.
    #[must_use]
    pub fn with_tags(mut self, tags: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Builder-style category assignment.
    #[must_use]
    pub fn with_category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }
}

// =============================================================================
// DOCUMENT
// =============================================================================

/// One document in the corpus.
///
/// Identity is the `path` string; two documents with equal paths are the
/// same document. The engine treats the whole struct as an immutable
/// snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Unique identity, a `/`-rooted path string ending in `.md`.
    pub path: String,
    /// Structured metadata.
    pub meta: DocumentMeta,
    /// Raw markdown body (frontmatter already stripped by the loader).
    pub content: String,
}

impl Document {
    /// Create a document from its parts.
    #[must_use]
    pub fn new(path: impl Into<String>, meta: DocumentMeta, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            meta,
            content: content.into(),
        }
    }

    /// Display title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.meta.title
    }

    /// Final path segment, e.g. `"guide.md"` for `"/docs/guide.md"`.
    #[must_use]
    pub fn filename(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }

    /// True if this document shares at least one tag with `other`.
    #[must_use]
    pub fn shares_tag_with(&self, other: &Document) -> bool {
        self.meta
            .tags
            .iter()
            .any(|t| other.meta.tags.iter().any(|o| o == t))
    }
}

/// Lightweight reference to a source document, carried inside mention
/// results so callers can render them without another corpus lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRef {
    /// Source document path.
    pub path: String,
    /// Source document title.
    pub title: String,
    /// Source document category.
    pub category: Category,
}

impl SourceRef {
    /// Build a reference from a corpus document.
    #[must_use]
    pub fn of(doc: &Document) -> Self {
        Self {
            path: doc.path.clone(),
            title: doc.meta.title.clone(),
            category: doc.meta.category,
        }
    }
}

// =============================================================================
// ERRORS
// =============================================================================

/// Metadata validation errors, raised only at the corpus boundary.
///
/// Engine operations themselves are total: they return empty results, never
/// errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MetaError {
    /// Category string not in the closed enumeration.
    #[error("unknown category: {0}")]
    UnknownCategory(String),

    /// Status string not in the closed enumeration.
    #[error("unknown status: {0}")]
    UnknownStatus(String),
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_parses_canonical_forms() {
        assert_eq!(
            "best-practices".parse::<Category>().expect("parse"),
            Category::BestPractices
        );
        assert_eq!("API".parse::<Category>().expect("parse"), Category::Api);
        assert_eq!(
            " roadmap ".parse::<Category>().expect("parse"),
            Category::Roadmap
        );
    }

    #[test]
    fn category_rejects_unknown() {
        let err = "commerce".parse::<Category>();
        assert_eq!(
            err,
            Err(MetaError::UnknownCategory("commerce".to_string()))
        );
    }

    #[test]
    fn category_default_is_other() {
        assert_eq!(Category::default(), Category::Other);
    }

    #[test]
    fn status_default_is_published() {
        assert_eq!(Status::default(), Status::Published);
    }

    #[test]
    fn status_parses_case_insensitively() {
        assert_eq!("Draft".parse::<Status>().expect("parse"), Status::Draft);
        assert_eq!(
            "ARCHIVED".parse::<Status>().expect("parse"),
            Status::Archived
        );
    }

    #[test]
    fn filename_is_final_segment() {
        let doc = Document::new("/docs/api/auth.md", DocumentMeta::new("Auth"), "");
        assert_eq!(doc.filename(), "auth.md");

        let flat = Document::new("top.md", DocumentMeta::new("Top"), "");
        assert_eq!(flat.filename(), "top.md");
    }

    #[test]
    fn shares_tag_with_detects_overlap() {
        let a = Document::new(
            "/a.md",
            DocumentMeta::new("A").with_tags(["rust", "graph"]),
            "",
        );
        let b = Document::new(
            "/b.md",
            DocumentMeta::new("B").with_tags(["graph", "search"]),
            "",
        );
        let c = Document::new("/c.md", DocumentMeta::new("C").with_tags(["ui"]), "");

        assert!(a.shares_tag_with(&b));
        assert!(!a.shares_tag_with(&c));
        assert!(!c.shares_tag_with(&a));
    }

    #[test]
    fn tags_are_case_sensitive() {
        let a = Document::new("/a.md", DocumentMeta::new("A").with_tags(["Rust"]), "");
        let b = Document::new("/b.md", DocumentMeta::new("B").with_tags(["rust"]), "");
        assert!(!a.shares_tag_with(&b));
    }

    #[test]
    fn category_serializes_kebab_case() {
        let json = serde_json::to_string(&Category::BestPractices).expect("serialize");
        assert_eq!(json, "\"best-practices\"");
    }

    #[test]
    fn meta_roundtrips_through_json() {
        let meta = DocumentMeta {
            title: "Guide".to_string(),
            description: Some("Intro".to_string()),
            category: Category::Guide,
            tags: vec!["rust".to_string()],
            author: Some("ana".to_string()),
            date: NaiveDate::from_ymd_opt(2025, 1, 15),
            status: Status::Review,
        };
        let json = serde_json::to_string(&meta).expect("serialize");
        let back: DocumentMeta = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, meta);
    }
}
