//! Output artifacts: the line-delimited manifest and the category index.
//!
//! Both files are projections of the sorted article list from
//! [`collect`](crate::collect) and are consumed by the site renderer.
//!
//! ## `manifest.jsonl`
//!
//! One compact JSON object per article, newest first:
//!
//! ```text
//! {"id":"cc-review","title":"Claude Code","type":"review","category":"tools","score":0.85,"tokens":1204,"date":"2024-06-01","tags":["cli"],"path":"/content/reviews/cc","sponsored":false,"files":["cover.jpg"]}
//! ```
//!
//! The key set is fixed. Absent fields get neutral defaults (`""`, `0`, `[]`,
//! `false`), `date` is always a string, and `files` only appears when the post
//! has sibling assets.
//!
//! ## `categories.json`
//!
//! ```text
//! {
//!   "tools": [
//!     { "id": "cc-review", "title": "Claude Code", "type": "review",
//!       "score": 0.85, "tokens": 1204, "path": "/content/reviews/cc" }
//!   ]
//! }
//! ```
//!
//! Pretty-printed with two-space indentation and a trailing newline.
//! Categories appear in order of their newest article.
//!
//! Files are written in full and in place; there is no temp-file rename.

use crate::collect::{Article, Collection};
use crate::frontmatter::Value;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::borrow::Cow;
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum IndexError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// One line of `manifest.jsonl`.
#[derive(Debug, Serialize)]
pub struct ManifestEntry<'a> {
    pub id: Cow<'a, Value>,
    pub title: Cow<'a, Value>,
    #[serde(rename = "type")]
    pub kind: Cow<'a, Value>,
    pub category: Cow<'a, Value>,
    pub score: Cow<'a, Value>,
    pub tokens: u64,
    pub date: Cow<'a, str>,
    pub tags: Cow<'a, Value>,
    pub path: &'a str,
    pub sponsored: Cow<'a, Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub files: &'a Vec<String>,
}

impl<'a> From<&'a Article> for ManifestEntry<'a> {
    fn from(article: &'a Article) -> Self {
        Self {
            id: field_or_empty(article, "id"),
            title: field_or_empty(article, "title"),
            kind: field_or_empty(article, "type"),
            category: field_or_empty(article, "category"),
            score: field(article, "score", Value::Integer(0)),
            tokens: article.tokens,
            date: article.date_key(),
            tags: field(article, "tags", Value::List(Vec::new())),
            path: &article.path,
            sponsored: field(article, "sponsored", Value::Bool(false)),
            files: &article.files,
        }
    }
}

/// One article summary inside `categories.json`.
#[derive(Debug, Serialize)]
pub struct CategoryEntry<'a> {
    pub id: Cow<'a, Value>,
    pub title: Cow<'a, Value>,
    #[serde(rename = "type")]
    pub kind: Cow<'a, Value>,
    pub score: Cow<'a, Value>,
    pub tokens: u64,
    pub path: &'a str,
}

impl<'a> From<&'a Article> for CategoryEntry<'a> {
    fn from(article: &'a Article) -> Self {
        Self {
            id: field_or_empty(article, "id"),
            title: field_or_empty(article, "title"),
            kind: field_or_empty(article, "type"),
            score: field(article, "score", Value::Integer(0)),
            tokens: article.tokens,
            path: &article.path,
        }
    }
}

/// Category name to article summaries, in first-appearance order.
#[derive(Debug, Default)]
pub struct CategoryIndex<'a> {
    groups: Vec<(Cow<'a, str>, Vec<CategoryEntry<'a>>)>,
}

impl<'a> CategoryIndex<'a> {
    pub fn build(collection: &'a Collection, fallback: &'a str) -> Self {
        let groups = collection
            .categories(fallback)
            .into_iter()
            .map(|(name, articles)| {
                let entries = articles.into_iter().map(CategoryEntry::from).collect();
                (name, entries)
            })
            .collect();
        Self { groups }
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|(name, _)| name.as_ref())
    }

    pub fn get(&self, name: &str) -> Option<&[CategoryEntry<'a>]> {
        self.groups
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, entries)| entries.as_slice())
    }
}

impl Serialize for CategoryIndex<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.groups.len()))?;
        for (name, entries) in &self.groups {
            map.serialize_entry(name, entries)?;
        }
        map.end()
    }
}

fn field<'a>(article: &'a Article, key: &str, default: Value) -> Cow<'a, Value> {
    match article.meta.get(key) {
        Some(v) => Cow::Borrowed(v),
        None => Cow::Owned(default),
    }
}

fn field_or_empty<'a>(article: &'a Article, key: &str) -> Cow<'a, Value> {
    field(article, key, Value::String(String::new()))
}

/// Render the manifest: one compact JSON object per line.
pub fn render_manifest(articles: &[Article]) -> Result<String, IndexError> {
    let mut out = String::new();
    for article in articles {
        out.push_str(&serde_json::to_string(&ManifestEntry::from(article))?);
        out.push('\n');
    }
    Ok(out)
}

/// Render the category index as pretty JSON with a trailing newline.
pub fn render_categories(index: &CategoryIndex<'_>) -> Result<String, IndexError> {
    let mut out = serde_json::to_string_pretty(index)?;
    out.push('\n');
    Ok(out)
}

/// Write `manifest.jsonl`, returning the number of entries written.
pub fn write_manifest(path: &Path, articles: &[Article]) -> Result<usize, IndexError> {
    write_file(path, &render_manifest(articles)?)?;
    info!(path = %path.display(), entries = articles.len(), "wrote manifest");
    Ok(articles.len())
}

/// Write `categories.json`, returning the number of categories written.
pub fn write_categories(path: &Path, index: &CategoryIndex<'_>) -> Result<usize, IndexError> {
    write_file(path, &render_categories(index)?)?;
    info!(path = %path.display(), categories = index.len(), "wrote category index");
    Ok(index.len())
}

fn write_file(path: &Path, contents: &str) -> Result<(), IndexError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, contents)?;
    Ok(())
}
