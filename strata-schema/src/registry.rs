//! Startup-populated registries resolving configured names to strategies.
//!
//! The configuration refers to condition processors and schema overrides by
//! key; these registries map those keys to concrete implementations, replacing
//! construction-by-type-name with plain lookup.

use std::collections::HashMap;
use std::sync::Arc;

use strata_types::{Error, Result};

use crate::column::Column;
use crate::condition::{ConditionProcessor, InSet, NullNotNull};
use crate::schema::Schema;

/// Builds a [`Schema`] from resolved parts. Registered implementations back
/// the `providers.<type>.schema.class` override.
pub trait SchemaFactory: Send + Sync {
    fn create(&self, name: &str, source: &str, columns: Vec<Column>) -> Result<Schema>;
}

/// Registry of named [`SchemaFactory`] implementations.
#[derive(Default)]
pub struct SchemaFactoryRegistry {
    factories: HashMap<String, Arc<dyn SchemaFactory>>,
}

impl SchemaFactoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, key: impl Into<String>, factory: Arc<dyn SchemaFactory>) {
        self.factories.insert(key.into(), factory);
    }

    pub fn get(&self, key: &str) -> Option<&Arc<dyn SchemaFactory>> {
        self.factories.get(key)
    }

    /// Resolve a configured override key, failing with a configuration error
    /// when the key is unknown.
    pub fn resolve(&self, key: &str) -> Result<&Arc<dyn SchemaFactory>> {
        self.get(key).ok_or_else(|| {
            Error::Configuration(format!("unknown schema factory \"{key}\""))
        })
    }
}

/// Registry of named [`ConditionProcessor`] implementations.
#[derive(Default)]
pub struct ProcessorRegistry {
    processors: HashMap<String, Arc<dyn ConditionProcessor>>,
}

impl ProcessorRegistry {
    /// Registry key of the built-in set-membership processor.
    pub const IN_SET: &'static str = "in_set";
    /// Registry key of the built-in nullity processor.
    pub const NULL_NOT_NULL: &'static str = "null_not_null";

    pub fn new() -> Self {
        Self::default()
    }

    /// A registry preloaded with the built-in processors under their
    /// conventional keys.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(Self::IN_SET, Arc::new(InSet));
        registry.register(Self::NULL_NOT_NULL, Arc::new(NullNotNull));
        registry
    }

    pub fn register(&mut self, key: impl Into<String>, processor: Arc<dyn ConditionProcessor>) {
        self.processors.insert(key.into(), processor);
    }

    pub fn get(&self, key: &str) -> Option<Arc<dyn ConditionProcessor>> {
        self.processors.get(key).cloned()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.processors.contains_key(key)
    }
}
