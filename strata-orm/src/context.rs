use std::sync::Arc;

use strata_config::Config;
use strata_schema::{ProcessorRegistry, SchemaFactoryRegistry};

/// The explicit construction context for ORM components: configuration plus
/// the registries resolving configured strategy names.
///
/// Built once at startup and passed to whatever needs it; there is no
/// process-wide default instance.
pub struct OrmContext {
    pub config: Arc<Config>,
    pub processors: Arc<ProcessorRegistry>,
    pub factories: Arc<SchemaFactoryRegistry>,
}

impl OrmContext {
    /// Context with the built-in condition processors and no schema
    /// factories.
    pub fn new(config: Arc<Config>) -> Self {
        Self {
            config,
            processors: Arc::new(ProcessorRegistry::with_builtins()),
            factories: Arc::new(SchemaFactoryRegistry::new()),
        }
    }

    pub fn with_registries(
        config: Arc<Config>,
        processors: Arc<ProcessorRegistry>,
        factories: Arc<SchemaFactoryRegistry>,
    ) -> Self {
        Self {
            config,
            processors,
            factories,
        }
    }
}
