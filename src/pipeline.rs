//! Pipeline entry points: scan the tree, then (for builds) write both
//! artifacts.
//!
//! ```text
//! content/ ──collect──▶ Collection ──index──▶ manifest.jsonl
//!                                        └──▶ categories.json
//! ```
//!
//! Per-post problems never stop the pipeline; they ride along in
//! [`Collection::errors`] and decide the exit status afterwards. Only a
//! missing content root or an I/O failure returns `Err`, and in that case
//! nothing has been written.

use crate::collect::{self, Collection, ScanError};
use crate::config::BuildConfig;
use crate::index::{self, CategoryIndex, IndexError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Scan(#[from] ScanError),
    #[error(transparent)]
    Index(#[from] IndexError),
}

/// What a build produced.
#[derive(Debug)]
pub struct BuildOutcome {
    pub collection: Collection,
    /// Number of manifest lines written.
    pub manifest_entries: usize,
    /// Number of categories in the category index.
    pub categories: usize,
}

impl BuildOutcome {
    pub fn is_clean(&self) -> bool {
        self.collection.is_clean()
    }
}

/// Scan and validate without writing anything.
pub fn check(config: &BuildConfig) -> Result<Collection, PipelineError> {
    Ok(collect::collect(config)?)
}

/// Scan, validate, and write `manifest.jsonl` and `categories.json`.
///
/// Both files are written even when validation errors were recorded.
pub fn build(config: &BuildConfig) -> Result<BuildOutcome, PipelineError> {
    let collection = collect::collect(config)?;

    let manifest_entries = index::write_manifest(&config.manifest_path(), &collection.articles)?;
    let categories = {
        let category_index = CategoryIndex::build(&collection, &config.schema.fallback_category);
        index::write_categories(&config.categories_path(), &category_index)?
    };

    Ok(BuildOutcome {
        collection,
        manifest_entries,
        categories,
    })
}
