//! Record-to-entity mapping with per-kind coercion.

use strata_types::{Entity, FieldKind, FieldValue, Record, ENTITY_ID};

/// Map a record onto an entity, field by field.
///
/// Only fields named in the entity's descriptor table are considered; keys
/// the record lacks leave the entity's current values intact, and a value
/// that cannot be coerced to the declared kind is skipped rather than
/// applied.
pub fn apply_record(entity: &mut dyn Entity, data: &Record) {
    for descriptor in entity.descriptors() {
        let Some(value) = data.get(descriptor.name) else {
            continue;
        };
        let Some(coerced) = coerce(descriptor.kind, value) else {
            continue;
        };
        entity.apply(descriptor.name, coerced);
    }

    if let Some(id) = data.get(ENTITY_ID).and_then(FieldValue::as_int) {
        entity.set_entity_id(id);
    }
}

fn coerce(kind: FieldKind, value: &FieldValue) -> Option<FieldValue> {
    match kind {
        FieldKind::Bool => value.as_bool().map(FieldValue::Bool),
        FieldKind::Int => value.as_int().map(FieldValue::Int),
        FieldKind::Float => value.as_float().map(FieldValue::Float),
        FieldKind::Text => match value {
            FieldValue::Text(v) => Some(FieldValue::Text(v.clone())),
            FieldValue::Int(v) => Some(FieldValue::Text(v.to_string())),
            FieldValue::Float(v) => Some(FieldValue::Text(v.to_string())),
            FieldValue::Bool(v) => Some(FieldValue::Text(i64::from(*v).to_string())),
            _ => None,
        },
        FieldKind::Serialized => match value {
            FieldValue::Serialized(v) => Some(FieldValue::Serialized(v.clone())),
            // Storage hands serialized columns back as JSON text.
            FieldValue::Text(v) => serde_json::from_str(v).ok().map(FieldValue::Serialized),
            _ => None,
        },
        FieldKind::Unsupported => None,
    }
}
