//! Build configuration.
//!
//! Handles loading, validating, and merging `content-index.toml`. Every key is
//! optional: the stock defaults describe the standard blog layout and schema,
//! and a user file overrides only what it names.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! content_dir = "content"          # Post tree, relative to the project root
//! manifest = "manifest.jsonl"      # Line-delimited manifest output
//! categories = "categories.json"   # Category index output
//!
//! [schema]
//! required_fields = ["id", "title", "slug", "date", "type",
//!                    "category", "tags", "score", "sponsored"]
//! types = ["comparison", "guide", "review", "sponsored"]
//! categories = ["apis", "models", "skills", "tools"]
//! fallback_category = "uncategorized"
//!
//! [tokens]
//! ratio = 1.3                      # Estimated tokens per word
//! ```
//!
//! Unknown keys are rejected to catch typos early.
//!
//! The project root is not a config key. It comes from the command line and
//! is attached with [`BuildConfig::with_root`]; all paths above resolve
//! against it.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default config file name, looked up in the project root.
pub const CONFIG_FILE: &str = "content-index.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Immutable configuration for one build run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfig {
    /// Project root every other path is relative to. Never read from TOML.
    #[serde(skip)]
    pub root: PathBuf,
    /// Directory holding the post tree.
    pub content_dir: PathBuf,
    /// Output path of the line-delimited manifest.
    pub manifest: PathBuf,
    /// Output path of the category index.
    pub categories: PathBuf,
    /// Frontmatter schema enforced by the validator.
    pub schema: SchemaConfig,
    /// Token estimation settings.
    pub tokens: TokensConfig,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            content_dir: PathBuf::from("content"),
            manifest: PathBuf::from("manifest.jsonl"),
            categories: PathBuf::from("categories.json"),
            schema: SchemaConfig::default(),
            tokens: TokensConfig::default(),
        }
    }
}

impl BuildConfig {
    /// Bind the config to a project root.
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }

    pub fn content_root(&self) -> PathBuf {
        self.root.join(&self.content_dir)
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.root.join(&self.manifest)
    }

    pub fn categories_path(&self) -> PathBuf {
        self.root.join(&self.categories)
    }

    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.tokens.ratio.is_finite() && self.tokens.ratio > 0.0) {
            return Err(ConfigError::Validation(
                "tokens.ratio must be a positive number".into(),
            ));
        }
        if self.manifest.as_os_str().is_empty() || self.categories.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "output paths must not be empty".into(),
            ));
        }
        if self.manifest == self.categories {
            return Err(ConfigError::Validation(
                "manifest and categories must be different files".into(),
            ));
        }
        if self.schema.fallback_category.is_empty() {
            return Err(ConfigError::Validation(
                "schema.fallback_category must not be empty".into(),
            ));
        }
        Ok(())
    }
}

/// Required fields and allowed values for post frontmatter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SchemaConfig {
    /// Fields every post must define, checked in this order.
    pub required_fields: Vec<String>,
    /// Allowed values of the `type` field.
    pub types: BTreeSet<String>,
    /// Allowed values of the `category` field.
    pub categories: BTreeSet<String>,
    /// Category index bucket for posts without a `category`.
    pub fallback_category: String,
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self {
            required_fields: [
                "id",
                "title",
                "slug",
                "date",
                "type",
                "category",
                "tags",
                "score",
                "sponsored",
            ]
            .map(String::from)
            .to_vec(),
            types: ["review", "guide", "comparison", "sponsored"]
                .map(String::from)
                .into(),
            categories: ["models", "tools", "apis", "skills"]
                .map(String::from)
                .into(),
            fallback_category: "uncategorized".to_string(),
        }
    }
}

/// Token estimation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TokensConfig {
    /// Estimated tokens per whitespace-separated word.
    pub ratio: f64,
}

impl Default for TokensConfig {
    fn default() -> Self {
        Self {
            ratio: crate::tokens::DEFAULT_RATIO,
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer user overrides are merged onto.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(BuildConfig::default())
        .map_err(|e| ConfigError::Validation(format!("default config must serialize: {e}")))
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto the stock defaults, then deserialize and
/// validate.
pub fn resolve_config(overlay: Option<toml::Value>) -> Result<BuildConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: BuildConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load the config for a project.
///
/// Reads `config_path` if given, otherwise `<root>/content-index.toml`; a
/// missing file yields the stock defaults. The result is bound to `root`.
pub fn load_config(root: &Path, config_path: Option<&Path>) -> Result<BuildConfig, ConfigError> {
    let path = match config_path {
        Some(p) => p.to_path_buf(),
        None => root.join(CONFIG_FILE),
    };
    let overlay = load_raw_config(&path)?;
    Ok(resolve_config(overlay)?.with_root(root))
}

/// Returns a fully-commented stock `content-index.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# content-index configuration
# ===========================
#
# All keys are optional. Values below are the built-in defaults; delete any
# line you do not want to change. Paths are relative to the project root
# given with --root (default: the current directory).

# Directory holding the post tree. Every `index.md` below it is a post.
content_dir = "content"

# Line-delimited manifest, one JSON object per post, newest first.
manifest = "manifest.jsonl"

# Category index: category name -> list of article summaries.
categories = "categories.json"

[schema]
# Fields every post's frontmatter must define.
required_fields = [
    "id", "title", "slug", "date", "type",
    "category", "tags", "score", "sponsored",
]

# Allowed values for the `type` field.
types = ["comparison", "guide", "review", "sponsored"]

# Allowed values for the `category` field.
categories = ["apis", "models", "skills", "tools"]

# Bucket used in the category index for posts without a category.
fallback_category = "uncategorized"

[tokens]
# Estimated tokens per whitespace-separated word of the post body.
ratio = 1.3
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_paths() {
        let config = BuildConfig::default().with_root("/srv/blog");
        assert_eq!(config.content_root(), PathBuf::from("/srv/blog/content"));
        assert_eq!(
            config.manifest_path(),
            PathBuf::from("/srv/blog/manifest.jsonl")
        );
        assert_eq!(
            config.categories_path(),
            PathBuf::from("/srv/blog/categories.json")
        );
    }

    #[test]
    fn default_schema() {
        let schema = SchemaConfig::default();
        assert_eq!(schema.required_fields.len(), 9);
        assert_eq!(schema.required_fields[0], "id");
        assert!(schema.types.contains("review"));
        assert!(schema.categories.contains("skills"));
        assert_eq!(schema.fallback_category, "uncategorized");
    }

    #[test]
    fn parse_partial_config() {
        let toml = r#"
[schema]
categories = ["models", "hardware"]
"#;
        let config: BuildConfig = toml::from_str(toml).unwrap();
        assert!(config.schema.categories.contains("hardware"));
        assert!(!config.schema.categories.contains("tools"));
        // Defaults preserved
        assert_eq!(config.schema.required_fields.len(), 9);
        assert_eq!(config.content_dir, PathBuf::from("content"));
    }

    // =========================================================================
    // load_config tests
    // =========================================================================

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path(), None).unwrap();
        assert_eq!(config, BuildConfig::default().with_root(tmp.path()));
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILE),
            r#"
content_dir = "posts"

[tokens]
ratio = 1.5
"#,
        )
        .unwrap();

        let config = load_config(tmp.path(), None).unwrap();
        assert_eq!(config.content_root(), tmp.path().join("posts"));
        assert_eq!(config.tokens.ratio, 1.5);
        assert_eq!(config.manifest, PathBuf::from("manifest.jsonl"));
    }

    #[test]
    fn load_config_explicit_path() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("alt.toml");
        fs::write(&path, "manifest = \"out/m.jsonl\"\n").unwrap();

        let config = load_config(tmp.path(), Some(path.as_path())).unwrap();
        assert_eq!(config.manifest_path(), tmp.path().join("out/m.jsonl"));
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE), "this is not valid toml [[[").unwrap();

        let result = load_config(tmp.path(), None);
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn unknown_key_rejected() {
        let result: Result<BuildConfig, _> = toml::from_str("content_root = \"x\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn unknown_nested_key_rejected() {
        let result: Result<BuildConfig, _> = toml::from_str("[schema]\nrequired = []\n");
        assert!(result.is_err());
    }

    #[test]
    fn root_is_not_a_config_key() {
        let result: Result<BuildConfig, _> = toml::from_str("root = \"/tmp\"\n");
        assert!(result.is_err());
    }

    // =========================================================================
    // Merging
    // =========================================================================

    #[test]
    fn merge_toml_scalar_override() {
        let base: toml::Value = toml::from_str("a = 1\nb = 2").unwrap();
        let overlay: toml::Value = toml::from_str("b = 3").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged["a"].as_integer(), Some(1));
        assert_eq!(merged["b"].as_integer(), Some(3));
    }

    #[test]
    fn merge_toml_nested_table_keeps_base_keys() {
        let base = stock_defaults_value().unwrap();
        let overlay: toml::Value = toml::from_str("[schema]\nfallback_category = \"misc\"").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged["schema"]["fallback_category"].as_str(), Some("misc"));
        assert!(merged["schema"]["required_fields"].as_array().is_some());
    }

    #[test]
    fn merge_toml_arrays_replace() {
        let base = stock_defaults_value().unwrap();
        let overlay: toml::Value = toml::from_str("[schema]\nrequired_fields = [\"id\"]").unwrap();
        let config: BuildConfig = merge_toml(base, overlay).try_into().unwrap();
        assert_eq!(config.schema.required_fields, vec!["id".to_string()]);
    }

    // =========================================================================
    // Validation
    // =========================================================================

    #[test]
    fn validate_default_config_passes() {
        assert!(BuildConfig::default().validate().is_ok());
    }

    #[test]
    fn validate_ratio_must_be_positive() {
        let mut config = BuildConfig::default();
        config.tokens.ratio = 0.0;
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
        config.tokens.ratio = f64::NAN;
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn validate_outputs_must_differ() {
        let mut config = BuildConfig::default();
        config.categories = config.manifest.clone();
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn validate_fallback_category_not_empty() {
        let mut config = BuildConfig::default();
        config.schema.fallback_category.clear();
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn load_config_validates_values() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE), "[tokens]\nratio = -1.0\n").unwrap();
        let result = load_config(tmp.path(), None);
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn stock_config_toml_matches_defaults() {
        let config: BuildConfig = toml::from_str(stock_config_toml()).unwrap();
        assert_eq!(config, BuildConfig::default());
    }
}
