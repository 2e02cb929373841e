use serde::{Deserialize, Deserializer, Serialize};

use crate::filter::{Comparator, Filter, Operator};

/// Filtered, paged search criteria assembled by a caller before being handed
/// to a repository-style consumer.
///
/// Filters are keyed by field name: re-adding a field replaces the earlier
/// filter in place, preserving its position in the supplied order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchCriteria {
    filters: Vec<Filter>,
    page: u32,
    limit: u32,
}

impl Default for SearchCriteria {
    fn default() -> Self {
        Self::new()
    }
}

// Page and limit pass through the clamping setters, so deserialized criteria
// honor the same bounds as built ones.
impl<'de> Deserialize<'de> for SearchCriteria {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Raw {
            #[serde(default)]
            filters: Vec<Filter>,
            #[serde(default = "default_page")]
            page: i64,
            #[serde(default = "default_limit")]
            limit: i64,
        }

        let raw = Raw::deserialize(deserializer)?;
        let mut criteria = SearchCriteria::new();
        criteria.set_page(raw.page).set_limit(raw.limit);
        for filter in raw.filters {
            criteria.add_filter(filter);
        }
        Ok(criteria)
    }
}

fn default_page() -> i64 {
    1
}

fn default_limit() -> i64 {
    SearchCriteria::DEFAULT_LIMIT as i64
}

impl SearchCriteria {
    pub const DEFAULT_LIMIT: u32 = 250;
    pub const MAX_LIMIT: u32 = 1000;

    pub fn new() -> Self {
        Self {
            filters: Vec::new(),
            page: 1,
            limit: Self::DEFAULT_LIMIT,
        }
    }

    /// Add a filter, replacing any existing filter on the same field.
    pub fn add_filter(&mut self, filter: Filter) -> &mut Self {
        match self.filters.iter_mut().find(|f| f.field == filter.field) {
            Some(existing) => *existing = filter,
            None => self.filters.push(filter),
        }
        self
    }

    /// Shorthand for adding a filter from its parts.
    pub fn filter(
        &mut self,
        field: impl Into<String>,
        value: impl Into<String>,
        comparator: Comparator,
        operator: Operator,
    ) -> &mut Self {
        self.add_filter(Filter::new(field, value, comparator, operator))
    }

    pub fn get_filter(&self, field: &str) -> Option<&Filter> {
        self.filters.iter().find(|f| f.field == field)
    }

    pub fn remove_filter(&mut self, field: &str) {
        self.filters.retain(|f| f.field != field);
    }

    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Set the page, clamping values below 1 up to 1.
    pub fn set_page(&mut self, page: i64) -> &mut Self {
        self.page = page.clamp(1, u32::MAX as i64) as u32;
        self
    }

    /// Set the row limit, clamping negatives to 0 and values above
    /// [`Self::MAX_LIMIT`] down to it. A limit of 0 means unbounded.
    pub fn set_limit(&mut self, limit: i64) -> &mut Self {
        self.limit = limit.clamp(0, Self::MAX_LIMIT as i64) as u32;
        self
    }
}

/// The outcome of a repository search: hydrated items, the criteria that
/// produced them, and optionally the total match count. Immutable once built.
#[derive(Debug, Clone)]
pub struct SearchResult<T> {
    items: Vec<T>,
    criteria: SearchCriteria,
    total_records: Option<u64>,
}

impl<T> SearchResult<T> {
    pub fn new(items: Vec<T>, criteria: SearchCriteria, total_records: Option<u64>) -> Self {
        Self {
            items,
            criteria,
            total_records,
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    pub fn criteria(&self) -> &SearchCriteria {
        &self.criteria
    }

    pub fn total_records(&self) -> Option<u64> {
        self.total_records
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
