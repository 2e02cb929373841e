//! Shared value types for the strata ORM.
//!
//! Defines the vocabulary every other strata crate speaks:
//! - [`Filter`], [`Comparator`], [`Operator`] — one comparison clause of a query
//! - [`SearchCriteria`] / [`SearchResult`] — paged, filtered repository searches
//! - [`FieldValue`], [`FieldKind`], [`FieldDescriptor`], [`Record`] — the flat
//!   field model entities export to and hydrate from
//! - [`Entity`] — the trait domain objects implement to participate in storage
//! - [`Error`] — the error taxonomy shared across the workspace
//!
//! These types are deliberately free of any SQL or connection concerns; schema
//! derivation and storage drivers live downstream.

mod entity;
mod error;
mod field;
mod filter;
mod search;

pub use entity::{Entity, ENTITY_ID};
pub use error::{Error, Result};
pub use field::{FieldDescriptor, FieldKind, FieldValue, Record};
pub use filter::{Comparator, Filter, Operator};
pub use search::{SearchCriteria, SearchResult};
