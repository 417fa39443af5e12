//! Frontmatter parsing for post `index.md` files.
//!
//! Every post carries a small metadata block at the very top of its
//! `index.md`, delimited by `---`:
//!
//! ```text
//! ---
//! id: claude-code-review
//! title: "Claude Code, six months in"
//! date: 2024-06-01
//! tags: [cli, agents, "code review"]
//! score: 0.85
//! sponsored: false
//! ---
//! Body text starts here.
//! ```
//!
//! ## Grammar
//!
//! This is deliberately *not* YAML. Only flat `key: value` lines are
//! understood; there is no nesting, escaping, or multi-line value. Blank lines
//! and lines starting with `#` are ignored, and so are lines without a colon.
//!
//! Each raw value is classified by a fixed list of rules, first match wins:
//!
//! | Rule | Matches | Produces |
//! |------|---------|----------|
//! | list | `[a, "b", 'c']` | [`Value::List`] |
//! | bool | `true` / `FALSE` (any case) | [`Value::Bool`] |
//! | number | `3`, `-2`, `0.75` | [`Value::Integer`] or [`Value::Float`] |
//! | string | anything else, one layer of quotes stripped | [`Value::String`] |
//!
//! A block that never closes is treated as "no frontmatter" rather than an
//! error: [`parse`] returns an empty mapping and the untouched text.

use serde::{Serialize, Serializer};
use std::fmt;

const DELIMITER: &str = "---";

/// A single frontmatter value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    List(Vec<String>),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric view of the value. Booleans are not numbers.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(n) => Some(*n as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Render the value so that [`parse_value`] reads it back unchanged.
    ///
    /// Strings that would otherwise be classified as another kind (`"true"`,
    /// `"42"`, `"[x]"`) or that carry edge whitespace are wrapped in quotes.
    pub fn to_frontmatter(&self) -> String {
        match self {
            Value::String(s) => {
                if parse_value(s) == Value::String(s.clone()) && s.trim() == s {
                    s.clone()
                } else {
                    format!("\"{s}\"")
                }
            }
            Value::List(items) => {
                let rendered: Vec<String> = items
                    .iter()
                    .map(|item| {
                        if !item.is_empty()
                            && item.trim() == item
                            && strip_item_quotes(item) == item
                        {
                            item.clone()
                        } else {
                            format!("\"{item}\"")
                        }
                    })
                    .collect();
                format!("[{}]", rendered.join(", "))
            }
            other => other.to_string(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => f.write_str(s),
            Value::Integer(n) => write!(f, "{n}"),
            Value::Float(x) => {
                let s = x.to_string();
                if x.is_finite() && !s.contains('.') {
                    write!(f, "{s}.0")
                } else {
                    f.write_str(&s)
                }
            }
            Value::Bool(b) => write!(f, "{b}"),
            Value::List(items) => write!(f, "[{}]", items.join(", ")),
        }
    }
}

/// Values serialize untagged: the JSON type follows the variant.
impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::String(s) => serializer.serialize_str(s),
            Value::Integer(n) => serializer.serialize_i64(*n),
            Value::Float(x) => serializer.serialize_f64(*x),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::List(items) => items.serialize(serializer),
        }
    }
}

/// Ordered key/value mapping parsed from a frontmatter block.
///
/// Keys keep the position of their first appearance; re-inserting a key
/// replaces its value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frontmatter {
    entries: Vec<(String, Value)>,
}

impl Frontmatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Render the mapping as a complete `---` delimited block.
    pub fn to_block(&self) -> String {
        let mut out = String::from(DELIMITER);
        out.push('\n');
        for (key, value) in self.iter() {
            out.push_str(&format!("{key}: {}\n", value.to_frontmatter()));
        }
        out.push_str(DELIMITER);
        out.push('\n');
        out
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Frontmatter {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        let mut fm = Frontmatter::new();
        for (k, v) in iter {
            fm.insert(k, v);
        }
        fm
    }
}

/// Split `text` into its frontmatter mapping and trimmed body.
///
/// Returns an empty mapping and the original text when the text does not
/// start with `---` or the block is never closed.
pub fn parse(text: &str) -> (Frontmatter, &str) {
    if !text.starts_with(DELIMITER) {
        return (Frontmatter::new(), text);
    }
    let Some(offset) = text[DELIMITER.len()..].find(DELIMITER) else {
        return (Frontmatter::new(), text);
    };
    let end = DELIMITER.len() + offset;

    let raw = &text[DELIMITER.len()..end];
    let body = text[end + DELIMITER.len()..].trim();

    let mut meta = Frontmatter::new();
    for line in raw.split('\n') {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        meta.insert(key.trim(), parse_value(value.trim()));
    }

    (meta, body)
}

/// Classify a raw (already trimmed) value string.
pub fn parse_value(raw: &str) -> Value {
    parse_list(raw)
        .or_else(|| parse_bool(raw))
        .or_else(|| parse_number(raw))
        .unwrap_or_else(|| Value::String(strip_quotes(raw).to_string()))
}

fn parse_list(raw: &str) -> Option<Value> {
    let inner = raw.strip_prefix('[')?.strip_suffix(']')?;
    if inner.trim().is_empty() {
        return Some(Value::List(Vec::new()));
    }
    let items = inner
        .split(',')
        .map(|item| strip_item_quotes(item.trim()).to_string())
        .collect();
    Some(Value::List(items))
}

fn parse_bool(raw: &str) -> Option<Value> {
    if raw.eq_ignore_ascii_case("true") {
        Some(Value::Bool(true))
    } else if raw.eq_ignore_ascii_case("false") {
        Some(Value::Bool(false))
    } else {
        None
    }
}

fn parse_number(raw: &str) -> Option<Value> {
    if raw.contains('.') {
        raw.parse::<f64>().ok().map(Value::Float)
    } else {
        raw.parse::<i64>().ok().map(Value::Integer)
    }
}

/// Strip one layer of matching single or double quotes.
fn strip_quotes(s: &str) -> &str {
    for quote in ['"', '\''] {
        if s.len() >= 2 && s.starts_with(quote) && s.ends_with(quote) {
            return &s[1..s.len() - 1];
        }
    }
    s
}

const QUOTES: [char; 2] = ['"', '\''];

/// List items lose one quote at each end independently, so a quoted run
/// split by a comma (`["a, b"]`) still yields clean items.
fn strip_item_quotes(s: &str) -> &str {
    let s = s.strip_prefix(QUOTES).unwrap_or(s);
    s.strip_suffix(QUOTES).unwrap_or(s)
}
