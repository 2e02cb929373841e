//! Entity management for the strata ORM.
//!
//! [`EntityManager`] is the orchestration layer callers talk to: it derives a
//! schema for each entity type, obtains a storage driver for that schema from
//! the [`StorageFactory`], and runs hydrate, persist, flush, remove, and
//! search against it. Loaded record state is cached per (identity, type,
//! scope) for the life of the manager, with eviction on every write.
//!
//! Everything here is single-threaded unit-of-work state; share a manager
//! across threads only behind external mutual exclusion.

mod coerce;
mod context;
mod factory;
mod manager;

pub use coerce::apply_record;
pub use context::OrmContext;
pub use factory::StorageFactory;
pub use manager::{EntityManager, SharedEntity};
