//! # content-index
//!
//! Build step for a Markdown blog. Scans a content tree of posts, parses the
//! frontmatter of every `index.md`, validates it against a schema, and writes
//! two artifacts for the site renderer:
//!
//! ```text
//! content/  ──scan──▶  articles + errors  ──▶  manifest.jsonl   (one JSON object per post)
//!                                        └──▶  categories.json  (category → summaries)
//! ```
//!
//! Every run re-scans the whole tree; there is no cache and no incremental
//! mode.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`frontmatter`] | Restricted `key: value` frontmatter grammar and the tagged [`frontmatter::Value`] type |
//! | [`tokens`] | Word-count token estimate and the [`tokens::TokenBudget`] counter |
//! | [`validate`] | Required fields, allowed `type`/`category` values, `score`/`confidence` ranges |
//! | [`collect`] | Walks the content tree, builds sorted [`collect::Article`] records and the error list |
//! | [`index`] | Serializes `manifest.jsonl` and `categories.json` |
//! | [`pipeline`] | `check` and `build` entry points tying scan and write together |
//! | [`config`] | `content-index.toml` loading, merging, and validation |
//! | [`output`] | CLI report formatting |
//!
//! # Design Decisions
//!
//! ## Not YAML
//!
//! Frontmatter is a flat list of `key: value` lines with four value kinds
//! (list, bool, number, string). Anything fancier is out of scope; malformed
//! lines are skipped instead of failing the post. Keeping the grammar tiny
//! keeps the build dependency-light and its behavior predictable.
//!
//! ## Errors Are Data
//!
//! Per-post problems are collected, not thrown. A post with schema errors is
//! still indexed so the site keeps rendering while content gets fixed; only a
//! post with no frontmatter at all is dropped. The process exit status is the
//! single pass/fail signal.
//!
//! ## Explicit Configuration
//!
//! Paths, the required field list, and the allowed values are one immutable
//! [`config::BuildConfig`] handed to the pipeline, so tests can run several
//! configurations side by side.

pub mod collect;
pub mod config;
pub mod frontmatter;
pub mod index;
pub mod output;
pub mod pipeline;
pub mod tokens;
pub mod validate;

#[cfg(test)]
pub(crate) mod test_helpers;
