#![allow(dead_code)]

use std::sync::Arc;

use serde_json::json;
use strata_config::Config;
use strata_schema::{ProcessorRegistry, SchemaFactoryRegistry, SchemaMapper};
use strata_types::{Entity, FieldDescriptor, FieldKind, FieldValue, Record};

/// Basic test entity with one field of every storable kind plus one
/// unsupported field.
#[derive(Debug, Default)]
pub struct Widget {
    pub entity_id: i64,
    pub name: String,
    pub active: bool,
    pub price: f64,
    pub tags: Vec<String>,
    pub scope: i64,
}

const WIDGET_FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::int("entity_id"),
    FieldDescriptor::text("name"),
    FieldDescriptor::bool("active"),
    FieldDescriptor::float("price"),
    FieldDescriptor::serialized("tags"),
    FieldDescriptor::new("session", FieldKind::Unsupported),
];

impl Entity for Widget {
    fn type_key(&self) -> &'static str {
        "widget"
    }

    fn descriptors(&self) -> &'static [FieldDescriptor] {
        WIDGET_FIELDS
    }

    fn export(&self) -> Record {
        let mut record = Record::new();
        record.insert("entity_id", FieldValue::Int(self.entity_id));
        record.insert("name", FieldValue::Text(self.name.clone()));
        record.insert("active", FieldValue::Bool(self.active));
        record.insert("price", FieldValue::Float(self.price));
        record.insert(
            "tags",
            FieldValue::Serialized(serde_json::to_value(&self.tags).unwrap()),
        );
        record
    }

    fn apply(&mut self, field: &str, value: FieldValue) {
        match field {
            "entity_id" => self.entity_id = value.as_int().unwrap_or_default(),
            "name" => self.name = value.as_text().unwrap_or_default().to_string(),
            "active" => self.active = value.as_bool().unwrap_or_default(),
            "price" => self.price = value.as_float().unwrap_or_default(),
            "tags" => {
                if let FieldValue::Serialized(v) = value {
                    self.tags = serde_json::from_value(v).unwrap_or_default();
                }
            }
            _ => {}
        }
    }

    fn entity_id(&self) -> i64 {
        self.entity_id
    }

    fn set_entity_id(&mut self, id: i64) {
        self.entity_id = id;
    }

    fn scope_id(&self) -> i64 {
        self.scope
    }
}

/// Configuration mapping `widget` onto a `widget` table.
pub fn widget_config() -> Config {
    Config::from_value(json!({
        "providers": {
            "widget": {
                "schema": { "name": "default", "source": "widget" }
            }
        }
    }))
}

pub fn mapper_for(config: Config) -> SchemaMapper {
    SchemaMapper::new(
        Arc::new(config),
        Arc::new(ProcessorRegistry::with_builtins()),
        Arc::new(SchemaFactoryRegistry::new()),
    )
}
