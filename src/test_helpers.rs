//! Shared test utilities: temp-dir post fixtures and collection lookups.
//!
//! ```text
//! use crate::test_helpers::*;
//!
//! let tmp = TempDir::new().unwrap();
//! write_post(&tmp, "tools/cc", &valid_post("cc", "2024-06-01", "tools"));
//! let collection = collect(&config_for(&tmp)).unwrap();
//! assert_eq!(article_ids(&collection), vec!["cc"]);
//! ```

use std::path::PathBuf;
use tempfile::TempDir;

use crate::collect::{Article, Collection};
use crate::config::BuildConfig;

// =========================================================================
// Fixture setup
// =========================================================================

/// Default config rooted at the temp dir (content lives in `content/`).
pub fn config_for(tmp: &TempDir) -> BuildConfig {
    BuildConfig::default().with_root(tmp.path())
}

/// Write `content/<dir>/index.md` and return the post directory.
pub fn write_post(tmp: &TempDir, dir: &str, text: &str) -> PathBuf {
    let post_dir = tmp.path().join("content").join(dir);
    std::fs::create_dir_all(&post_dir).unwrap();
    std::fs::write(post_dir.join("index.md"), text).unwrap();
    post_dir
}

/// A post that passes validation under the default schema.
pub fn valid_post(id: &str, date: &str, category: &str) -> String {
    format!(
        "---\n\
         id: {id}\n\
         title: \"Post {id}\"\n\
         slug: {id}\n\
         date: {date}\n\
         type: review\n\
         category: {category}\n\
         tags: [rust, tooling]\n\
         score: 0.8\n\
         sponsored: false\n\
         ---\n\
         Body of post {id}.\n"
    )
}

// =========================================================================
// Collection lookups — panics with a clear message on miss
// =========================================================================

/// The `id` of an article as text, empty when absent.
pub fn id_of(article: &Article) -> &str {
    article
        .meta
        .get("id")
        .and_then(|v| v.as_str())
        .unwrap_or("")
}

/// All article ids in collection order.
pub fn article_ids(collection: &Collection) -> Vec<&str> {
    collection.articles.iter().map(id_of).collect()
}

/// Find an article by id. Panics if not found.
pub fn find_article<'a>(collection: &'a Collection, id: &str) -> &'a Article {
    collection
        .articles
        .iter()
        .find(|a| id_of(a) == id)
        .unwrap_or_else(|| {
            let ids = article_ids(collection);
            panic!("article '{id}' not found. Available: {ids:?}")
        })
}
