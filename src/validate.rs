//! Frontmatter schema validation.
//!
//! Checks run independently and every failure is reported, so a post with
//! three problems produces three messages. Validation never stops a post from
//! being indexed; it only decides whether the build as a whole succeeds.

use crate::config::SchemaConfig;
use crate::frontmatter::{Frontmatter, Value};
use std::collections::BTreeSet;

/// Validate `meta` against `schema`, returning one message per problem.
///
/// Messages are prefixed with `identity`, normally the post's `index.md` path.
pub fn validate(meta: &Frontmatter, identity: &str, schema: &SchemaConfig) -> Vec<String> {
    let mut errors = Vec::new();

    for field in &schema.required_fields {
        if !meta.contains_key(field) {
            errors.push(format!("{identity}: missing required field '{field}'"));
        }
    }

    if let Some(value) = meta.get("type")
        && !is_member(value, &schema.types)
    {
        errors.push(format!(
            "{identity}: invalid type '{value}' (expected one of {})",
            join(&schema.types)
        ));
    }

    if let Some(value) = meta.get("category")
        && !is_member(value, &schema.categories)
    {
        errors.push(format!(
            "{identity}: invalid category '{value}' (expected one of {})",
            join(&schema.categories)
        ));
    }

    // `confidence` is optional but held to the same range as `score`.
    for field in ["score", "confidence"] {
        if let Some(value) = meta.get(field)
            && !is_unit_interval(value)
        {
            errors.push(format!("{identity}: {field} must be 0.0-1.0, got {value}"));
        }
    }

    errors
}

fn is_member(value: &Value, allowed: &BTreeSet<String>) -> bool {
    value.as_str().is_some_and(|s| allowed.contains(s))
}

fn is_unit_interval(value: &Value) -> bool {
    value.as_f64().is_some_and(|n| (0.0..=1.0).contains(&n))
}

fn join(set: &BTreeSet<String>) -> String {
    set.iter().map(String::as_str).collect::<Vec<_>>().join(", ")
}
