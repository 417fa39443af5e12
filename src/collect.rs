//! Content tree scanning and article aggregation.
//!
//! Walks the content directory, turns every post into an [`Article`], and
//! collects per-post problems into a flat error list.
//!
//! ## Directory Structure
//!
//! ```text
//! content/                              # Content root
//! ├── reviews/
//! │   └── claude-code/                  # Post directory
//! │       ├── index.md                  # Frontmatter + body
//! │       ├── cover.jpg                 # Sibling assets, listed in `files`
//! │       └── notes.txt
//! └── guides/
//!     └── context-window-management/
//!         ├── index.md
//!         └── drafts/                   # Subdirectories are not assets
//! ```
//!
//! Posts can be nested at any depth; any file named `index.md` defines one.
//!
//! ## Error Policy
//!
//! - A missing content root is fatal ([`ScanError::MissingContentRoot`]).
//! - Any I/O failure while walking or reading is fatal; there are no retries.
//! - A post without frontmatter is reported and left out of the output.
//! - A post failing schema validation is reported and still indexed.
//!
//! ## Ordering
//!
//! Posts are read in sorted path order, then the article list is stably
//! sorted by the `date` field, newest first. Dates compare as strings, so they
//! must be ISO-8601-like; posts without a date go last.

use crate::config::BuildConfig;
use crate::frontmatter::{self, Frontmatter, Value};
use crate::tokens;
use crate::validate;
use std::borrow::Cow;
use std::fmt;
use std::fs;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};
use walkdir::WalkDir;

const POST_FILE: &str = "index.md";

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Content directory not found: {0}")]
    MissingContentRoot(PathBuf),
}

/// A per-post problem. Never aborts the scan.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Post `index.md` path relative to the project root.
    pub post: String,
    /// Full message, already prefixed with the post path.
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// One indexed post.
#[derive(Debug, Clone)]
pub struct Article {
    pub meta: Frontmatter,
    pub body: String,
    pub tokens: u64,
    /// Post directory as `/`-prefixed path relative to the project root.
    pub path: String,
    /// `index.md` path relative to the project root.
    pub source: String,
    /// Sibling asset file names, sorted.
    pub files: Vec<String>,
}

impl Article {
    /// Sort key: the `date` field as text, empty when absent.
    pub fn date_key(&self) -> Cow<'_, str> {
        text_of(self.meta.get("date"))
    }

    /// Category index bucket for this article.
    pub fn category_key<'a>(&'a self, fallback: &'a str) -> Cow<'a, str> {
        match self.meta.get("category") {
            Some(v) => text_of(Some(v)),
            None => Cow::Borrowed(fallback),
        }
    }
}

fn text_of(value: Option<&Value>) -> Cow<'_, str> {
    match value {
        None => Cow::Borrowed(""),
        Some(Value::String(s)) => Cow::Borrowed(s),
        Some(other) => Cow::Owned(other.to_string()),
    }
}

/// Result of scanning the content tree.
#[derive(Debug, Default)]
pub struct Collection {
    /// Indexed articles, newest first.
    pub articles: Vec<Article>,
    /// Every per-post problem, in scan order.
    pub errors: Vec<ValidationError>,
    /// Number of `index.md` files found, including excluded ones.
    pub scanned: usize,
}

impl Collection {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    /// Group articles by category, keeping the newest-first order within each
    /// group. Groups appear in order of their first article.
    pub fn categories<'a>(&'a self, fallback: &'a str) -> Vec<(Cow<'a, str>, Vec<&'a Article>)> {
        let mut groups: Vec<(Cow<'a, str>, Vec<&'a Article>)> = Vec::new();
        for article in &self.articles {
            let key = article.category_key(fallback);
            match groups.iter_mut().find(|(k, _)| *k == key) {
                Some((_, members)) => members.push(article),
                None => groups.push((key, vec![article])),
            }
        }
        groups
    }
}

/// Scan the content tree described by `config`.
pub fn collect(config: &BuildConfig) -> Result<Collection, ScanError> {
    let content_root = config.content_root();
    if !content_root.is_dir() {
        return Err(ScanError::MissingContentRoot(content_root));
    }

    let posts = find_posts(&content_root)?;
    if posts.is_empty() {
        warn!(root = %content_root.display(), "no {POST_FILE} files found");
    }

    let mut collection = Collection {
        scanned: posts.len(),
        ..Collection::default()
    };

    for post in &posts {
        let source = relative_display(post, &config.root);
        let text = fs::read_to_string(post)?;
        let (meta, body) = frontmatter::parse(&text);

        if meta.is_empty() {
            debug!(post = %source, "no frontmatter");
            collection.errors.push(ValidationError {
                message: format!("{source}: no frontmatter found"),
                post: source,
            });
            continue;
        }

        collection.errors.extend(
            validate::validate(&meta, &source, &config.schema)
                .into_iter()
                .map(|message| ValidationError {
                    post: source.clone(),
                    message,
                }),
        );

        let post_dir = post.parent().unwrap_or(content_root.as_path());
        let article = Article {
            tokens: tokens::estimate_with_ratio(body, config.tokens.ratio),
            body: body.to_string(),
            path: format!("/{}", relative_display(post_dir, &config.root)),
            files: sibling_files(post_dir)?,
            source,
            meta,
        };
        debug!(
            post = %article.source,
            fields = article.meta.len(),
            tokens = article.tokens,
            files = article.files.len(),
            "indexed"
        );
        collection.articles.push(article);
    }

    collection
        .articles
        .sort_by(|a, b| b.date_key().cmp(&a.date_key()));

    Ok(collection)
}

/// Every `index.md` file under `root`, sorted by path.
fn find_posts(root: &Path) -> Result<Vec<PathBuf>, ScanError> {
    let mut posts = Vec::new();
    for entry in WalkDir::new(root) {
        let entry = entry?;
        if entry.file_name() == POST_FILE && entry.path().is_file() {
            posts.push(entry.into_path());
        }
    }
    posts.sort();
    Ok(posts)
}

/// Names of the non-directory entries next to `index.md`, sorted.
fn sibling_files(post_dir: &Path) -> Result<Vec<String>, ScanError> {
    let mut files = Vec::new();
    for entry in fs::read_dir(post_dir)? {
        let path = entry?.path();
        if path.is_dir() {
            continue;
        }
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        if name != POST_FILE {
            files.push(name);
        }
    }
    files.sort();
    Ok(files)
}

/// `/`-joined path of `path` relative to `root`, independent of platform.
fn relative_display(path: &Path, root: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
