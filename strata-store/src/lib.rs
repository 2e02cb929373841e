//! Storage drivers for the strata ORM.
//!
//! A driver owns one lazy, persistent backend connection and a [`Schema`]
//! describing its single table. On first use it runs a one-time prepare step:
//! the table is created from the schema if absent, otherwise its introspected
//! structure is diffed against the schema and the resulting migration
//! statements are applied. Queries are built from [`Filter`] lists, each
//! filter's value passing through the condition pipeline.

mod params;
mod sqlite;

use strata_schema::Schema;
use strata_types::{Filter, Record, Result};

pub use params::ConnectionParams;
pub use sqlite::SqliteDriver;

/// CRUD operations over a single entity table.
pub trait Storage {
    /// Load one record by identity. `None` when no row matches.
    fn load(&mut self, id: i64) -> Result<Option<Record>>;

    /// Query records matching the filters, paged. A limit of 0 means
    /// unbounded; the offset is zero-based, derived from `page - 1`.
    fn query(&mut self, filters: &[Filter], page: u32, limit: u32) -> Result<Vec<Record>>;

    /// Count all records matching the filters.
    fn count(&mut self, filters: &[Filter]) -> Result<u64>;

    /// Upsert a record, returning the backend-assigned identity (or the
    /// supplied one for update-only saves).
    fn save(&mut self, record: &Record, id: Option<i64>) -> Result<i64>;

    /// Delete one record by identity. Deleting a missing record is a
    /// storage-write error.
    fn delete(&mut self, id: i64) -> Result<()>;

    /// Assign a new schema. An already-connected driver reconnects and
    /// re-runs the prepare step.
    fn set_schema(&mut self, schema: Schema) -> Result<()>;
}
