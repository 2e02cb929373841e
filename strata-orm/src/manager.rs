//! Unit-of-work entity management.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use strata_schema::SchemaMapper;
use strata_types::{Entity, Error, Record, Result, SearchCriteria, SearchResult};
use tracing::debug;

use crate::coerce::apply_record;
use crate::context::OrmContext;
use crate::factory::StorageFactory;

/// Handle to an entity tracked across calls. Single-threaded shared
/// ownership, matching the manager's unit-of-work call model.
pub type SharedEntity = Rc<RefCell<dyn Entity>>;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    id: i64,
    type_key: &'static str,
    scope: i64,
}

impl CacheKey {
    fn of(entity: &dyn Entity, id: i64) -> Self {
        Self {
            id,
            type_key: entity.type_key(),
            scope: entity.scope_id(),
        }
    }
}

/// Orchestrates load, hydrate, persist, flush, and remove for entities.
///
/// Loaded record state is cached per (identity, type, scope); every write
/// evicts the written entity's entry, so a hydrate following a flush always
/// observes the just-written state.
pub struct EntityManager {
    mapper: SchemaMapper,
    storages: StorageFactory,
    cache: HashMap<CacheKey, Record>,
    tracked: Vec<SharedEntity>,
}

impl EntityManager {
    pub fn new(context: &OrmContext) -> Self {
        Self {
            mapper: SchemaMapper::new(
                context.config.clone(),
                context.processors.clone(),
                context.factories.clone(),
            ),
            storages: StorageFactory::new(context.config.clone(), context.processors.clone()),
            cache: HashMap::new(),
            tracked: Vec::new(),
        }
    }

    /// Populate the entity from storage (or the identity cache), overlaying
    /// the supplied overrides last.
    ///
    /// In strict mode a missing row is a read error; otherwise it means "no
    /// data" and the entity's own field defaults stay in place.
    pub fn hydrate(
        &mut self,
        entity: &mut dyn Entity,
        overrides: Option<Record>,
        strict: bool,
    ) -> Result<()> {
        let id = entity.entity_id();
        let key = CacheKey::of(entity, id);

        let cached = self.cache.get(&key).cloned();
        let mut data = match cached {
            Some(record) => record,
            None => {
                let schema = self.mapper.map(entity)?;
                let storage = self.storages.get(&schema)?;
                match storage.load(id)? {
                    Some(record) => {
                        self.cache.insert(key, record.clone());
                        record
                    }
                    None if strict => {
                        return Err(Error::StorageRead(format!(
                            "no record found with ID \"{id}\""
                        )));
                    }
                    None => {
                        // Misses are cached too; re-hydrating a missing
                        // identity does not touch storage again.
                        self.cache.insert(key, Record::new());
                        Record::new()
                    }
                }
            }
        };

        if let Some(overrides) = overrides {
            data.merge(overrides);
        }

        apply_record(entity, &data);
        Ok(())
    }

    /// Write the entity's exported state, assign the resulting identity back
    /// onto it, and evict its cache entry.
    pub fn flush(&mut self, entity: &mut dyn Entity) -> Result<i64> {
        let record = entity.export();
        let schema = self.mapper.map(entity)?;
        let storage = self.storages.get(&schema)?;

        let id = (entity.entity_id() > 0).then(|| entity.entity_id());
        let id = storage.save(&record, id)?;
        entity.set_entity_id(id);

        self.cache.remove(&CacheKey::of(entity, id));
        debug!(entity = entity.type_key(), id, "flushed entity");
        Ok(id)
    }

    /// Flush immediately and begin tracking the entity for
    /// [`Self::flush_all`]. Persisting the same handle twice tracks it once.
    pub fn persist(&mut self, entity: &SharedEntity) -> Result<i64> {
        let id = self.flush(&mut *entity.borrow_mut())?;
        if !self.tracked.iter().any(|t| Rc::ptr_eq(t, entity)) {
            self.tracked.push(Rc::clone(entity));
        }
        Ok(id)
    }

    /// Flush every entity tracked by [`Self::persist`], in tracking order.
    pub fn flush_all(&mut self) -> Result<()> {
        let tracked: Vec<SharedEntity> = self.tracked.clone();
        for entity in &tracked {
            self.flush(&mut *entity.borrow_mut())?;
        }
        Ok(())
    }

    /// Delete the entity's stored record, evict its cache entry, and clear
    /// the identity on the entity itself.
    pub fn remove(&mut self, entity: &mut dyn Entity) -> Result<()> {
        let id = entity.entity_id();
        let schema = self.mapper.map(entity)?;
        let storage = self.storages.get(&schema)?;
        storage.delete(id)?;

        self.cache.remove(&CacheKey::of(entity, id));
        entity.set_entity_id(0);
        debug!(entity = entity.type_key(), id, "removed entity");
        Ok(())
    }

    /// Run a paged, filtered search for the entity type, hydrating one
    /// instance per matching row. The result carries the total match count
    /// across all pages.
    pub fn search<E: Entity + Default>(
        &mut self,
        criteria: &SearchCriteria,
    ) -> Result<SearchResult<E>> {
        let prototype = E::default();
        let schema = self.mapper.map(&prototype)?;
        let storage = self.storages.get(&schema)?;

        let records = storage.query(criteria.filters(), criteria.page(), criteria.limit())?;
        let total = storage.count(criteria.filters())?;

        let mut items = Vec::with_capacity(records.len());
        for record in records {
            let mut entity = E::default();
            apply_record(&mut entity, &record);
            items.push(entity);
        }

        Ok(SearchResult::new(items, criteria.clone(), Some(total)))
    }

    /// Drop all cached load data and schema derivations.
    pub fn clear_cache(&mut self) {
        self.cache.clear();
        self.mapper.clear_cache();
    }
}
