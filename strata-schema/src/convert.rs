//! Schema-to-DDL conversion and migration diffing.
//!
//! A [`SchemaConverter`] renders a [`Schema`] to a backend-specific
//! `CREATE TABLE` statement and computes the ordered `ALTER TABLE` statements
//! needed to bring an introspected table in line with an expected schema.
//!
//! The diff compares columns by name, type, and length only; it does not
//! detect column removal, index changes, or relationship changes.

use sha2::{Digest, Sha256};
use strata_types::{Error, Result};

use crate::column::{Column, ColumnType};
use crate::schema::Schema;

/// Generate a stable index name for a table and ordered column list. The
/// name is a deterministic digest so repeated renders agree.
pub(crate) fn index_name(table: &str, columns: &[&str]) -> Result<String> {
    if columns.is_empty() {
        return Err(Error::InvalidArgument(
            "index name generation requires at least 1 column".to_string(),
        ));
    }

    let key = format!("{table};{}", columns.join(":"));
    let digest = Sha256::digest(key.as_bytes());
    Ok(format!("IDX_{}", &hex::encode(digest)[..32]))
}

/// Renders schemas to DDL for one SQL dialect.
///
/// `convert` and `diff` are shared; dialects supply the type mapping, the
/// primary-key attribute, and whether declared lengths are rendered.
pub trait SchemaConverter {
    /// Backend type keyword for the given column.
    fn column_type(&self, column: &Column) -> &'static str;

    /// Attribute string appended to the identifier column.
    fn primary_key_attribute(&self) -> &'static str;

    /// Whether declared lengths are rendered into the definition.
    fn renders_length(&self) -> bool;

    /// One column definition as a statement partial.
    fn column_definition(&self, column: &Column) -> String {
        let length = if self.renders_length() && !column.length.is_empty() && column.length != "0" {
            format!("({})", column.length)
        } else {
            String::new()
        };

        let mut definition = format!("`{}` {}{}", column.name, self.column_type(column), length);

        if column.is_identifier() {
            definition.push(' ');
            definition.push_str(self.primary_key_attribute());
        }

        if let Some(default) = &column.metadata.default_value {
            definition.push_str(" DEFAULT ");
            if default == "NULL" {
                definition.push_str(default);
            } else {
                definition.push_str(&format!("'{}'", default.replace('\'', "''")));
            }
        }

        definition
    }

    /// Render a full `CREATE TABLE` statement: column definitions, then
    /// relationship constraints, then index definitions.
    fn convert(&self, schema: &Schema) -> Result<String> {
        validate(schema)?;

        let columns: Vec<String> = schema
            .columns()
            .iter()
            .map(|c| self.column_definition(c))
            .collect();
        let relationships = relationship_definitions(schema);
        let indexes = index_definitions(schema)?;

        let groups: Vec<String> = [columns, relationships, indexes]
            .into_iter()
            .map(|group| group.join(",\n"))
            .filter(|group| !group.is_empty())
            .collect();

        Ok(format!(
            "CREATE TABLE `{}` (\n{}\n);",
            schema.source(),
            groups.join(",\n")
        ))
    }

    /// Compute the ordered migration statements turning `actual` into
    /// `expected`: `MODIFY COLUMN` for same-named columns whose type or
    /// length differ, `ADD COLUMN` for columns with no same-named
    /// counterpart. Removals are not detected.
    fn diff(&self, actual: &Schema, expected: &Schema) -> Result<Vec<String>> {
        validate(expected)?;

        let mut statements = Vec::new();
        for column in expected.columns() {
            let existing = actual.columns().iter().find(|c| c.name == column.name);
            let action = match existing {
                Some(found)
                    if found.column_type == column.column_type && found.length == column.length =>
                {
                    continue
                }
                Some(_) => "MODIFY",
                None => "ADD",
            };

            statements.push(format!(
                "ALTER TABLE {} {} COLUMN {}",
                expected.source(),
                action,
                self.column_definition(column)
            ));
        }

        Ok(statements)
    }
}

fn validate(schema: &Schema) -> Result<()> {
    if schema.source().is_empty() {
        return Err(Error::Configuration(
            "schema has no storage source".to_string(),
        ));
    }
    if schema.columns().is_empty() {
        return Err(Error::Configuration(format!(
            "schema \"{}\" has no columns",
            schema.source()
        )));
    }
    Ok(())
}

fn relationship_definitions(schema: &Schema) -> Vec<String> {
    let mut definitions = Vec::new();
    for column in schema.columns() {
        for relationship in &column.metadata.relationships {
            definitions.push(format!(
                "FOREIGN KEY (`{}`) REFERENCES `{}`(`{}`) ON DELETE CASCADE ON UPDATE CASCADE",
                column.name, relationship.table, relationship.column
            ));
        }
    }
    definitions
}

fn index_definitions(schema: &Schema) -> Result<Vec<String>> {
    let mut default_group: Vec<&str> = Vec::new();
    let mut unique_group: Vec<&str> = Vec::new();

    for column in schema.columns() {
        for index in &column.metadata.indexes {
            if index.unique {
                unique_group.push(&column.name);
            } else {
                default_group.push(&column.name);
            }
        }
    }

    let mut definitions = Vec::new();
    if !default_group.is_empty() {
        definitions.push(format!(
            "INDEX {} ({})",
            index_name(schema.source(), &default_group)?,
            default_group.join(", ")
        ));
    }
    if !unique_group.is_empty() {
        definitions.push(format!(
            "UNIQUE INDEX {} ({})",
            index_name(schema.source(), &unique_group)?,
            unique_group.join(", ")
        ));
    }

    Ok(definitions)
}

/// MySQL dialect: `TINYINT`/`INT`/`DECIMAL`, `VARCHAR(n)` for bounded text,
/// `TEXT` otherwise, `AUTO_INCREMENT` identifiers.
#[derive(Debug, Clone, Copy, Default)]
pub struct MysqlConverter;

impl SchemaConverter for MysqlConverter {
    fn column_type(&self, column: &Column) -> &'static str {
        match column.column_type {
            ColumnType::Bool => "TINYINT",
            ColumnType::Float => "DECIMAL",
            ColumnType::Int => "INT",
            ColumnType::Text | ColumnType::Serialized | ColumnType::Compound => {
                // Bounded text becomes VARCHAR; "0" and "12,4"-style lengths
                // fall through to TEXT.
                let bounded = column
                    .length
                    .parse::<u64>()
                    .map(|n| n > 0)
                    .unwrap_or(false);
                if bounded {
                    "VARCHAR"
                } else {
                    "TEXT"
                }
            }
        }
    }

    fn primary_key_attribute(&self) -> &'static str {
        "AUTO_INCREMENT PRIMARY KEY"
    }

    fn renders_length(&self) -> bool {
        true
    }
}

/// SQLite dialect: affinity types only, no rendered lengths,
/// `AUTOINCREMENT` identifiers.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqliteConverter;

impl SchemaConverter for SqliteConverter {
    fn column_type(&self, column: &Column) -> &'static str {
        match column.column_type {
            ColumnType::Bool | ColumnType::Int => "INTEGER",
            ColumnType::Float => "REAL",
            ColumnType::Text | ColumnType::Serialized | ColumnType::Compound => "TEXT",
        }
    }

    fn primary_key_attribute(&self) -> &'static str {
        "PRIMARY KEY AUTOINCREMENT"
    }

    fn renders_length(&self) -> bool {
        false
    }
}
