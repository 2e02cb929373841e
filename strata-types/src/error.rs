//! Error taxonomy shared across the strata workspace.

use thiserror::Error;

/// Result type for strata operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by any strata component.
///
/// Backend errors (rusqlite, serde) never cross a crate boundary raw; storage
/// drivers rewrap them into [`Error::StorageRead`] or [`Error::StorageWrite`]
/// with a contextual message at the call site.
#[derive(Debug, Error)]
pub enum Error {
    /// Missing or invalid configuration, including bad schema overrides and
    /// unknown registry keys.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Connection, validation, or query failure on a read path, and strict
    /// hydration misses.
    #[error("storage read error: {0}")]
    StorageRead(String),

    /// Insert, update, or delete failure, including deletes affecting no rows.
    #[error("storage write error: {0}")]
    StorageWrite(String),

    /// Unsupported comparator/operator text or a malformed filter.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}
