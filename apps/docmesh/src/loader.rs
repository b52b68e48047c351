//! # Corpus Loader
//!
//! Walks a documentation directory and turns every markdown file into a
//! [`Document`]. This is the only place filesystem paths exist; the engine
//! sees `/`-rooted corpus paths only.
//!
//! Frontmatter is an optional YAML block fenced by `---` lines at the very
//! top of the file:
//!
//! ```markdown
//! ---
//! title: Getting Started
//! category: guide
//! tags: [onboarding, basics]
//! date: 2025-03-01
//! ---
//! # Getting Started
//! ...
//! ```
//!
//! Every frontmatter field is optional. The title falls back to the first
//! `# ` heading, then to the file stem. Unknown category or status values
//! warn and fall back to their defaults rather than rejecting the file.

use crate::DocmeshError;
use chrono::NaiveDate;
use docmesh_core::{Category, DOC_EXTENSION, Document, DocumentMeta, Status};
use std::path::Path;
use walkdir::{DirEntry, WalkDir};

/// Files larger than this are skipped with a warning.
pub const MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

// =============================================================================
// DIRECTORY WALK
// =============================================================================

/// Load every markdown document under `root` into a corpus, sorted by path.
///
/// Individual files that cannot be read, decoded, or parsed are skipped
/// with a logged reason; only a missing root directory is an error.
pub fn load_corpus(root: &Path) -> Result<Vec<Document>, DocmeshError> {
    if !root.is_dir() {
        return Err(DocmeshError::Corpus(format!(
            "docs directory not found: {}",
            root.display()
        )));
    }

    let mut documents = Vec::new();
    let walker = WalkDir::new(root).follow_links(false).into_iter();
    for entry in walker.filter_entry(|e| !is_hidden(e)) {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                tracing::warn!("skipping unreadable entry: {}", e);
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        if !is_markdown(&entry) {
            tracing::debug!("skipping non-markdown file {}", entry.path().display());
            continue;
        }
        match entry.metadata() {
            Ok(meta) if meta.len() > MAX_FILE_SIZE => {
                tracing::warn!(
                    "skipping {}: {} bytes exceeds the {} byte limit",
                    entry.path().display(),
                    meta.len(),
                    MAX_FILE_SIZE
                );
                continue;
            }
            Ok(_) => {}
            Err(e) => {
                tracing::warn!("skipping {}: {}", entry.path().display(), e);
                continue;
            }
        }
        let bytes = match std::fs::read(entry.path()) {
            Ok(b) => b,
            Err(e) => {
                tracing::warn!("skipping {}: {}", entry.path().display(), e);
                continue;
            }
        };
        let raw = match String::from_utf8(bytes) {
            Ok(s) => s,
            Err(_) => {
                tracing::warn!("skipping {}: not valid UTF-8", entry.path().display());
                continue;
            }
        };
        let Some(path) = corpus_path(root, entry.path()) else {
            continue;
        };
        documents.push(parse_document(path, &raw, entry.path()));
    }

    documents.sort_by(|a, b| a.path.cmp(&b.path));
    tracing::info!(
        "loaded {} documents from {}",
        documents.len(),
        root.display()
    );
    Ok(documents)
}

/// Hidden files and directories (dot-prefixed) are pruned from the walk.
fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.starts_with('.'))
}

fn is_markdown(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(|name| name.to_ascii_lowercase().ends_with(DOC_EXTENSION))
}

/// `/`-rooted, forward-slash corpus path relative to the docs root.
fn corpus_path(root: &Path, file: &Path) -> Option<String> {
    let rel = file.strip_prefix(root).ok()?;
    let mut out = String::new();
    for comp in rel.components() {
        out.push('/');
        out.push_str(&comp.as_os_str().to_string_lossy());
    }
    (!out.is_empty()).then_some(out)
}

// =============================================================================
// DOCUMENT PARSING
// =============================================================================

/// Parsed frontmatter fields before defaulting.
#[derive(Default)]
struct Frontmatter {
    title: Option<String>,
    description: Option<String>,
    category: Category,
    tags: Vec<String>,
    author: Option<String>,
    date: Option<NaiveDate>,
    status: Status,
}

fn parse_document(path: String, raw: &str, file: &Path) -> Document {
    let (frontmatter, body) = split_frontmatter(raw);
    let fields = frontmatter
        .map(|fm| parse_frontmatter(fm, file))
        .unwrap_or_default();

    let title = fields
        .title
        .or_else(|| first_heading(body))
        .unwrap_or_else(|| file_stem(file));

    let mut meta = DocumentMeta::new(title);
    meta.description = fields.description;
    meta.category = fields.category;
    meta.tags = fields.tags;
    meta.author = fields.author;
    meta.date = fields.date;
    meta.status = fields.status;

    Document::new(path, meta, body)
}

/// Split an optional leading YAML frontmatter block from the body.
///
/// The opening fence must be `---` on the very first line; the block ends
/// at the next `---` or `...` line. An unterminated fence is treated as
/// ordinary content.
fn split_frontmatter(raw: &str) -> (Option<&str>, &str) {
    let mut lines = raw.split_inclusive('\n');
    let Some(first) = lines.next() else {
        return (None, raw);
    };
    if first.trim_end() != "---" {
        return (None, raw);
    }

    let start = first.len();
    let mut offset = start;
    for line in lines {
        let trimmed = line.trim_end();
        if trimmed == "---" || trimmed == "..." {
            return (Some(&raw[start..offset]), &raw[offset + line.len()..]);
        }
        offset += line.len();
    }
    (None, raw)
}

fn parse_frontmatter(fm: &str, file: &Path) -> Frontmatter {
    let value: serde_yaml::Value = match serde_yaml::from_str(fm) {
        Ok(v) => v,
        Err(e) => {
            tracing::warn!(
                "{}: unparseable frontmatter ({}), ignoring",
                file.display(),
                e
            );
            return Frontmatter::default();
        }
    };

    let mut out = Frontmatter {
        title: yaml_str(&value, "title"),
        description: yaml_str(&value, "description"),
        author: yaml_str(&value, "author"),
        tags: yaml_tags(&value),
        ..Frontmatter::default()
    };

    if let Some(raw) = yaml_str(&value, "date") {
        match NaiveDate::parse_from_str(&raw, "%Y-%m-%d") {
            Ok(d) => out.date = Some(d),
            Err(_) => tracing::warn!(
                "{}: invalid date '{}', expected YYYY-MM-DD",
                file.display(),
                raw
            ),
        }
    }
    if let Some(raw) = yaml_str(&value, "category") {
        match raw.parse::<Category>() {
            Ok(c) => out.category = c,
            Err(e) => tracing::warn!(
                "{}: {}, falling back to '{}'",
                file.display(),
                e,
                Category::default()
            ),
        }
    }
    if let Some(raw) = yaml_str(&value, "status") {
        match raw.parse::<Status>() {
            Ok(s) => out.status = s,
            Err(e) => tracing::warn!(
                "{}: {}, falling back to '{}'",
                file.display(),
                e,
                Status::default()
            ),
        }
    }

    out
}

/// Read a scalar frontmatter field as a trimmed, non-empty string.
fn yaml_str(value: &serde_yaml::Value, key: &str) -> Option<String> {
    match value.get(key)? {
        serde_yaml::Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Tags accept both a YAML sequence and a comma-separated string.
fn yaml_tags(value: &serde_yaml::Value) -> Vec<String> {
    match value.get("tags") {
        Some(serde_yaml::Value::String(s)) => s
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(String::from)
            .collect(),
        Some(serde_yaml::Value::Sequence(items)) => items
            .iter()
            .filter_map(|item| match item {
                serde_yaml::Value::String(s) => {
                    let t = s.trim();
                    (!t.is_empty()).then(|| t.to_string())
                }
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

fn first_heading(body: &str) -> Option<String> {
    body.lines().find_map(|line| {
        line.strip_prefix("# ")
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(String::from)
    })
}

fn file_stem(file: &Path) -> String {
    file.file_stem()
        .map_or_else(|| "untitled".to_string(), |s| s.to_string_lossy().into_owned())
}
