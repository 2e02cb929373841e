//! Schema derivation from entity field tables.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;
use strata_config::Config;
use strata_types::{Entity, Error, FieldKind, Result, ENTITY_ID};
use tracing::{debug, warn};

use crate::column::{Column, ColumnType};
use crate::registry::{ProcessorRegistry, SchemaFactoryRegistry};
use crate::schema::Schema;

const DEFAULT_LENGTH: &str = "0";

/// Derives a [`Schema`] for an entity type from its declared field table and
/// the `providers.<type>.schema` configuration, caching the result per
/// concrete type.
pub struct SchemaMapper {
    config: Arc<Config>,
    processors: Arc<ProcessorRegistry>,
    factories: Arc<SchemaFactoryRegistry>,
    cache: HashMap<(&'static str, i64), Schema>,
}

impl SchemaMapper {
    pub fn new(
        config: Arc<Config>,
        processors: Arc<ProcessorRegistry>,
        factories: Arc<SchemaFactoryRegistry>,
    ) -> Self {
        Self {
            config,
            processors,
            factories,
            cache: HashMap::new(),
        }
    }

    /// Derive (or fetch the cached) schema for the entity's concrete type.
    /// Scoped entities cache one schema per scope, since the scope is part of
    /// the physical source name.
    pub fn map(&mut self, entity: &dyn Entity) -> Result<Schema> {
        let key = (entity.type_key(), entity.scope_id());
        if let Some(schema) = self.cache.get(&key) {
            return Ok(schema.clone());
        }

        let schema = self.derive(entity)?;
        self.cache.insert(key, schema.clone());
        Ok(schema)
    }

    /// Drop all cached schemas, forcing re-derivation on next use.
    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    fn derive(&self, entity: &dyn Entity) -> Result<Schema> {
        // First lookup key with any schema configuration wins.
        let base = entity
            .schema_keys()
            .into_iter()
            .map(|key| format!("providers.{key}.schema"))
            .find(|path| self.config.has(path))
            .ok_or_else(|| {
                Error::Configuration(format!(
                    "invalid schema configuration for \"{}\"",
                    entity.type_key()
                ))
            })?;

        let columns = self.derive_columns(entity)?;

        let factory_key = self
            .config
            .get_str(&format!("{base}.class"))
            .filter(|v| !v.is_empty());
        if let Some(factory_key) = factory_key {
            let name = self.config.get_str(&format!("{base}.name")).unwrap_or("");
            let source = self.config.get_str(&format!("{base}.source")).unwrap_or("");
            let factory = self.factories.resolve(factory_key)?;
            return factory.create(name, &source_name(entity, source), columns);
        }

        let name = self
            .config
            .get_str(&format!("{base}.name"))
            .filter(|v| !v.is_empty());
        let source = self
            .config
            .get_str(&format!("{base}.source"))
            .filter(|v| !v.is_empty());
        let (Some(name), Some(source)) = (name, source) else {
            return Err(Error::Configuration(format!(
                "invalid schema configuration for \"{}\"",
                entity.type_key()
            )));
        };

        Schema::new(name, source_name(entity, source), columns)
    }

    fn derive_columns(&self, entity: &dyn Entity) -> Result<Vec<Column>> {
        let mut columns = Vec::new();

        for descriptor in entity.descriptors() {
            let Some(column_type) = column_type_for(descriptor.kind) else {
                // Unclassifiable fields contribute no column. Deliberate,
                // silent omission; the field is simply absent from storage.
                warn!(
                    entity = entity.type_key(),
                    field = descriptor.name,
                    "skipping field with unsupported kind"
                );
                continue;
            };

            let mut column = Column::new(descriptor.name, default_length(column_type), column_type);
            column.metadata.identifier = descriptor.name == ENTITY_ID;
            column.metadata.condition = self.condition_key(entity.type_key(), descriptor.name)?;
            columns.push(column);
        }

        Ok(columns)
    }

    /// Resolve a configured per-column condition processor key. A key that
    /// is not registered falls back to no override; a configured value of
    /// the wrong shape is a configuration error.
    fn condition_key(&self, type_key: &str, field: &str) -> Result<Option<String>> {
        let path = format!("providers.{type_key}.schema.columns.{field}.condition");
        match self.config.get(&path) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(key)) if key.is_empty() => Ok(None),
            Some(Value::String(key)) => {
                if self.processors.contains(key) {
                    Ok(Some(key.clone()))
                } else {
                    debug!(%path, key, "condition processor not registered; ignoring");
                    Ok(None)
                }
            }
            Some(_) => Err(Error::Configuration(format!(
                "\"{path}\" must be a condition processor name"
            ))),
        }
    }
}

fn column_type_for(kind: FieldKind) -> Option<ColumnType> {
    match kind {
        FieldKind::Bool => Some(ColumnType::Bool),
        FieldKind::Int => Some(ColumnType::Int),
        FieldKind::Float => Some(ColumnType::Float),
        FieldKind::Text => Some(ColumnType::Text),
        FieldKind::Serialized => Some(ColumnType::Serialized),
        FieldKind::Unsupported => None,
    }
}

fn default_length(column_type: ColumnType) -> &'static str {
    match column_type {
        ColumnType::Bool => "1",
        ColumnType::Float => "12,4",
        ColumnType::Int => "12",
        ColumnType::Text | ColumnType::Serialized | ColumnType::Compound => DEFAULT_LENGTH,
    }
}

/// Resolve the physical source name, applying the scope suffix for scoped
/// entities.
pub(crate) fn source_name(entity: &dyn Entity, source: &str) -> String {
    if source.is_empty() {
        return String::new();
    }

    let scope = entity.scope_id();
    if scope > 0 {
        format!("{source}_{scope}")
    } else {
        source.to_string()
    }
}
