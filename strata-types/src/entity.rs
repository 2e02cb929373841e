use crate::field::{FieldDescriptor, FieldValue, Record};

/// Reserved field name carrying an entity's numeric identity.
pub const ENTITY_ID: &str = "entity_id";

/// A domain object whose field state can be exported as a flat record and
/// that carries a numeric identity.
///
/// Identity is assigned by storage on first save (auto-increment semantics);
/// an explicit identity on save acts as an upsert key. Scoped entities
/// override [`Entity::scope_id`]; when it is greater than zero the physical
/// source name is suffixed with it, producing one table per scope.
pub trait Entity {
    /// Stable identifier for the concrete type. Used as the schema cache key
    /// and the primary configuration lookup key (`providers.<type_key>.…`).
    fn type_key(&self) -> &'static str;

    /// Additional configuration lookup keys tried, in order, after
    /// [`Entity::type_key`] when resolving schema configuration. Lets several
    /// concrete types share one configured schema.
    fn schema_keys(&self) -> Vec<&'static str> {
        vec![self.type_key()]
    }

    /// The static field table describing this type's storable shape.
    fn descriptors(&self) -> &'static [FieldDescriptor];

    /// Export all field state, keyed by field name.
    ///
    /// Storage drivers rely on export: fields absent from it are not
    /// committed to storage.
    fn export(&self) -> Record;

    /// Accept one field value during hydration. Implementations coerce or
    /// ignore values as they see fit; unknown fields must be ignored.
    fn apply(&mut self, field: &str, value: FieldValue);

    fn entity_id(&self) -> i64;

    fn set_entity_id(&mut self, id: i64);

    /// Partitioning scope. The default of 0 means unscoped.
    fn scope_id(&self) -> i64 {
        0
    }
}
