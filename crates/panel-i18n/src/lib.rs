//! Translation lookup for the admin panel.
//!
//! Every page title, column header and validation message goes through a
//! [`Translate`] implementation. Lookups are total: a missing key translates
//! to the key itself, while [`Translate::lookup`] lets callers detect the
//! miss and fall back to something better.
//!
//! ```
//! use panel_i18n::{Catalog, Translate};
//!
//! let catalog = Catalog::from_json_str(r#"{ "properties": { "title": "title" } }"#)?;
//! assert_eq!(catalog.translate("properties.title"), "title");
//! assert_eq!(catalog.translate("properties.missing"), "properties.missing");
//! # Ok::<(), panel_i18n::I18nError>(())
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;
use tracing::debug;

/// Errors raised while loading a translation catalog.
#[derive(Debug, Error)]
pub enum I18nError {
    /// The catalog file could not be read.
    #[error("failed to read catalog {path}: {source}")]
    Io {
        /// Path of the catalog file.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The catalog is not valid JSON.
    #[error("failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),

    /// The catalog root is not a JSON object.
    #[error("catalog root must be an object, got {0}")]
    NotAnObject(&'static str),
}

/// Result type alias for catalog operations.
pub type I18nResult<T> = Result<T, I18nError>;

/// A translation lookup.
pub trait Translate: Send + Sync {
    /// Look up a key, returning `None` when no translation exists.
    fn lookup(&self, key: &str) -> Option<&str>;

    /// Translate a key, falling back to the key itself.
    fn translate(&self, key: &str) -> String {
        self.lookup(key).map_or_else(|| key.to_owned(), str::to_owned)
    }
}

impl<T: Translate + ?Sized> Translate for Arc<T> {
    fn lookup(&self, key: &str) -> Option<&str> {
        (**self).lookup(key)
    }
}

impl<T: Translate + ?Sized> Translate for &T {
    fn lookup(&self, key: &str) -> Option<&str> {
        (**self).lookup(key)
    }
}

/// Translator that knows no keys, so every key translates to itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;

impl Translate for Identity {
    fn lookup(&self, _key: &str) -> Option<&str> {
        None
    }
}

/// A flat key → text catalog.
///
/// Nested JSON objects are flattened into dotted keys, so
/// `{"errors": {"isNotEmpty": "..."}}` is looked up as `errors.isNotEmpty`.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: HashMap<String, String>,
}

impl Catalog {
    /// Create an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from a parsed JSON document.
    pub fn from_value(value: &Value) -> I18nResult<Self> {
        let Value::Object(map) = value else {
            return Err(I18nError::NotAnObject(json_kind(value)));
        };

        let mut catalog = Self::new();
        for (key, child) in map {
            catalog.flatten(key, child);
        }
        debug!(entries = catalog.len(), "built translation catalog");
        Ok(catalog)
    }

    /// Parse a catalog from JSON text.
    pub fn from_json_str(json: &str) -> I18nResult<Self> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(&value)
    }

    /// Load a catalog from a JSON file.
    pub fn load(path: &Path) -> I18nResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|source| I18nError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    /// Insert or replace a single entry.
    #[must_use]
    pub fn with_entry(mut self, key: impl Into<String>, text: impl Into<String>) -> Self {
        self.entries.insert(key.into(), text.into());
        self
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the catalog has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn flatten(&mut self, prefix: &str, value: &Value) {
        match value {
            Value::Object(map) => {
                for (key, child) in map {
                    self.flatten(&format!("{prefix}.{key}"), child);
                }
            }
            Value::String(text) => {
                self.entries.insert(prefix.to_owned(), text.clone());
            }
            Value::Number(n) => {
                self.entries.insert(prefix.to_owned(), n.to_string());
            }
            Value::Bool(b) => {
                self.entries.insert(prefix.to_owned(), b.to_string());
            }
            Value::Null | Value::Array(_) => {
                debug!(key = prefix, "skipping non-text catalog entry");
            }
        }
    }
}

impl Translate for Catalog {
    fn lookup(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }
}

/// Upper-case the first character and lower-case the rest, so
/// `"video ID"` becomes `"Video id"`.
#[must_use]
pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.as_str().to_lowercase().chars()).collect(),
        None => String::new(),
    }
}

/// Lower-case the first character, leaving the rest untouched.
#[must_use]
pub fn decapitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
