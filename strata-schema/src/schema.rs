use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use strata_types::{Error, Result};

use crate::column::Column;

/// Immutable physical layout derived for one entity type: a logical name, a
/// physical source (table) identifier, and an ordered column list.
///
/// Column names are unique within a schema; the column list is fixed at
/// construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    name: String,
    source: String,
    columns: Vec<Column>,
}

impl Schema {
    /// Logical name used when none is configured.
    pub const DEFAULT_NAME: &'static str = "default";

    pub fn new(
        name: impl Into<String>,
        source: impl Into<String>,
        columns: Vec<Column>,
    ) -> Result<Self> {
        let mut seen = HashSet::new();
        for column in &columns {
            if !seen.insert(column.name.as_str()) {
                return Err(Error::InvalidArgument(format!(
                    "duplicate column \"{}\" in schema",
                    column.name
                )));
            }
        }

        Ok(Self {
            name: name.into(),
            source: source.into(),
            columns,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Look up a column by name.
    pub fn column(&self, name: &str) -> Result<&Column> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| Error::InvalidArgument(format!("column \"{name}\" does not exist")))
    }

    /// The identifier column, if one is marked.
    pub fn identifier(&self) -> Option<&Column> {
        self.columns.iter().find(|c| c.is_identifier())
    }
}
