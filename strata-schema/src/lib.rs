//! Schema model and schema machinery for the strata ORM.
//!
//! - [`Column`] / [`Schema`] — immutable value descriptors of a physical table
//! - [`SchemaMapper`] — derives a [`Schema`] from an entity's declared field
//!   table, with per-type caching and configuration-driven overrides
//! - [`SchemaConverter`] with [`MysqlConverter`] / [`SqliteConverter`] — renders
//!   CREATE TABLE statements and computes additive/modifying migration diffs
//! - [`ConditionPipeline`] — the ordered chain of value rewriters applied to a
//!   filter before it is embedded in a query

mod column;
mod condition;
mod convert;
mod mapper;
mod registry;
mod schema;

pub use column::{Column, ColumnMetadata, ColumnType, IndexDescriptor, Relationship};
pub use condition::{
    ConditionPipeline, ConditionProcessor, InSet, NullNotNull, SingleQuoteEscaper, SqlQuoter,
};
pub use convert::{MysqlConverter, SchemaConverter, SqliteConverter};
pub use mapper::SchemaMapper;
pub use registry::{ProcessorRegistry, SchemaFactory, SchemaFactoryRegistry};
pub use schema::Schema;
