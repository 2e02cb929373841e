use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;

use strata_config::Config;
use strata_schema::{ProcessorRegistry, Schema};
use strata_store::{SqliteDriver, Storage};
use strata_types::Result;
use tracing::debug;

/// Creates and caches one storage driver per (schema name, source) pair, so
/// each physical table keeps a single persistent connection for the
/// factory's lifetime.
pub struct StorageFactory {
    config: Arc<Config>,
    processors: Arc<ProcessorRegistry>,
    drivers: HashMap<(String, String), SqliteDriver>,
}

impl StorageFactory {
    pub fn new(config: Arc<Config>, processors: Arc<ProcessorRegistry>) -> Self {
        Self {
            config,
            processors,
            drivers: HashMap::new(),
        }
    }

    /// The driver serving the given schema, created on first request.
    pub fn get(&mut self, schema: &Schema) -> Result<&mut dyn Storage> {
        let key = (schema.name().to_string(), schema.source().to_string());
        match self.drivers.entry(key) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                debug!(
                    connection = schema.name(),
                    source = schema.source(),
                    "creating storage driver"
                );
                let driver = SqliteDriver::new(
                    self.config.clone(),
                    self.processors.clone(),
                    Some(schema.clone()),
                )?;
                Ok(entry.insert(driver))
            }
        }
    }
}
