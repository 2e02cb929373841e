//! Merged-source JSON configuration for the strata ORM.
//!
//! A [`Config`] is built from one or more JSON documents merged in order:
//! later sources override earlier ones, recursing into objects so partial
//! overrides keep surrounding keys intact. Values are resolved by dotted
//! path, e.g. `connections.default.table` or
//! `providers.widget.schema.columns.status.condition`.

use std::fs;
use std::path::Path;

use serde_json::Value;
use strata_types::{Error, Result};

/// Resolved configuration over merged JSON sources.
#[derive(Debug, Clone, Default)]
pub struct Config {
    root: Value,
}

impl Config {
    /// An empty configuration. Every lookup misses.
    pub fn new() -> Self {
        Self {
            root: Value::Object(Default::default()),
        }
    }

    /// Build from a single parsed document.
    pub fn from_value(root: Value) -> Self {
        Self { root }
    }

    /// Parse one JSON document.
    pub fn from_json(text: &str) -> Result<Self> {
        let root = serde_json::from_str(text)
            .map_err(|e| Error::Configuration(format!("invalid configuration JSON: {e}")))?;
        Ok(Self { root })
    }

    /// Read and parse one JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| {
            Error::Configuration(format!(
                "unable to read configuration \"{}\": {e}",
                path.display()
            ))
        })?;
        Self::from_json(&text)
    }

    /// Merge another source on top of this one. Objects merge key-by-key,
    /// recursively; any other value is replaced wholesale.
    pub fn merge(&mut self, source: Value) -> &mut Self {
        merge_values(&mut self.root, source);
        self
    }

    /// Merge a JSON file on top of this configuration.
    pub fn merge_file(&mut self, path: impl AsRef<Path>) -> Result<&mut Self> {
        let overlay = Self::from_file(path)?;
        Ok(self.merge(overlay.root))
    }

    /// Resolve a dotted path to its raw value.
    pub fn get(&self, path: &str) -> Option<&Value> {
        let mut current = &self.root;
        for segment in path.split('.') {
            current = current.as_object()?.get(segment)?;
        }
        Some(current)
    }

    /// Resolve a dotted path to a string.
    pub fn get_str(&self, path: &str) -> Option<&str> {
        self.get(path)?.as_str()
    }

    /// Resolve a dotted path to an integer, accepting numeric text.
    pub fn get_i64(&self, path: &str) -> Option<i64> {
        match self.get(path)? {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.parse().ok(),
            _ => None,
        }
    }

    /// Resolve a dotted path to a list of strings. Missing paths yield an
    /// empty list; a present non-list is a configuration error.
    pub fn get_str_list(&self, path: &str) -> Result<Vec<String>> {
        match self.get(path) {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| {
                    item.as_str().map(str::to_owned).ok_or_else(|| {
                        Error::Configuration(format!("\"{path}\" must be a list of strings"))
                    })
                })
                .collect(),
            Some(_) => Err(Error::Configuration(format!(
                "\"{path}\" must be a list of strings"
            ))),
        }
    }

    /// Whether the path resolves to a non-empty object or scalar.
    pub fn has(&self, path: &str) -> bool {
        match self.get(path) {
            None | Some(Value::Null) => false,
            Some(Value::Object(map)) => !map.is_empty(),
            Some(Value::String(s)) => !s.is_empty(),
            Some(_) => true,
        }
    }
}

fn merge_values(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            for (key, value) in overlay_map {
                match base_map.get_mut(&key) {
                    Some(existing) => merge_values(existing, value),
                    None => {
                        base_map.insert(key, value);
                    }
                }
            }
        }
        (base_slot, overlay) => *base_slot = overlay,
    }
}
