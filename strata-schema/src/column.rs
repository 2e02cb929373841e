use std::fmt;

use serde::{Deserialize, Serialize};

/// Scalar storage type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    Bool,
    Int,
    Float,
    Text,
    Serialized,
    Compound,
}

impl ColumnType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnType::Bool => "bool",
            ColumnType::Int => "int",
            ColumnType::Float => "float",
            ColumnType::Text => "text",
            ColumnType::Serialized => "serialized",
            ColumnType::Compound => "compound",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A secondary index carried by a column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexDescriptor {
    pub unique: bool,
}

/// A foreign-key relationship carried by a column. Implies cascading delete
/// and update against the referenced table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
    /// Physical source (table) name of the referenced entity's schema.
    pub table: String,
    /// Referenced column within that table.
    pub column: String,
}

/// Open metadata attached to a column.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColumnMetadata {
    /// Exactly one column per schema should carry this.
    pub identifier: bool,
    pub default_value: Option<String>,
    pub indexes: Vec<IndexDescriptor>,
    pub relationships: Vec<Relationship>,
    /// Registry key of a per-column condition processor override.
    pub condition: Option<String>,
}

/// Immutable descriptor of one physical column.
///
/// `length` is numeric text (`"0"` meaning unbounded) or a structured
/// `"precision,scale"` pair for decimals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub length: String,
    pub column_type: ColumnType,
    pub metadata: ColumnMetadata,
}

impl Column {
    pub fn new(name: impl Into<String>, length: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            length: length.into(),
            column_type,
            metadata: ColumnMetadata::default(),
        }
    }

    pub fn with_metadata(mut self, metadata: ColumnMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Mark this column as the schema identifier.
    pub fn identifier(mut self) -> Self {
        self.metadata.identifier = true;
        self
    }

    pub fn is_identifier(&self) -> bool {
        self.metadata.identifier
    }
}
