//! Condition processing pipeline.
//!
//! Each filter's quoted value runs through an ordered, globally configured
//! list of processors, then through the column's own override processor when
//! one is configured. Processors are idempotent value rewriters; any failure
//! aborts query construction for the filter set.

use std::sync::Arc;

use strata_config::Config;
use strata_types::{Comparator, Error, Filter, Result};

use crate::column::Column;
use crate::registry::ProcessorRegistry;

/// Quotes raw text as a SQL string literal for the active backend.
pub trait SqlQuoter {
    fn quote(&self, raw: &str) -> String;
}

/// Standard single-quote escaping (quote doubling), shared by SQLite and
/// MySQL string literals.
#[derive(Debug, Clone, Copy, Default)]
pub struct SingleQuoteEscaper;

impl SqlQuoter for SingleQuoteEscaper {
    fn quote(&self, raw: &str) -> String {
        format!("'{}'", raw.replace('\'', "''"))
    }
}

/// One step of the condition pipeline: rewrites a filter's value text into a
/// backend-safe fragment.
pub trait ConditionProcessor: Send + Sync {
    fn process(
        &self,
        value: &str,
        filter: &Filter,
        column: &Column,
        quoter: &dyn SqlQuoter,
    ) -> Result<String>;
}

/// Wraps the value in exactly one parenthesis pair for `IN` comparisons,
/// regardless of prior parenthesization.
#[derive(Debug, Clone, Copy, Default)]
pub struct InSet;

impl ConditionProcessor for InSet {
    fn process(
        &self,
        value: &str,
        filter: &Filter,
        _column: &Column,
        _quoter: &dyn SqlQuoter,
    ) -> Result<String> {
        if filter.comparator == Comparator::InSet {
            return Ok(format!("({})", value.trim_matches(['(', ')'])));
        }
        Ok(value.to_string())
    }
}

/// Suppresses the value entirely for `IS NULL` / `IS NOT NULL` comparisons;
/// for any other comparator, re-quotes the filter's raw value.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullNotNull;

impl ConditionProcessor for NullNotNull {
    fn process(
        &self,
        _value: &str,
        filter: &Filter,
        _column: &Column,
        quoter: &dyn SqlQuoter,
    ) -> Result<String> {
        if filter.comparator.is_nullity() {
            return Ok(String::new());
        }
        Ok(quoter.quote(&filter.value))
    }
}

/// The ordered processor chain applied once per filter during query
/// construction.
pub struct ConditionPipeline {
    steps: Vec<Arc<dyn ConditionProcessor>>,
    registry: Arc<ProcessorRegistry>,
}

impl ConditionPipeline {
    pub fn new(steps: Vec<Arc<dyn ConditionProcessor>>, registry: Arc<ProcessorRegistry>) -> Self {
        Self { steps, registry }
    }

    /// Build the globally configured pipeline from
    /// `schema_management.columns.conditions`. Every name in that list must
    /// resolve; an unknown name is a configuration error.
    pub fn from_config(config: &Config, registry: Arc<ProcessorRegistry>) -> Result<Self> {
        let names = config.get_str_list("schema_management.columns.conditions")?;
        let mut steps = Vec::with_capacity(names.len());
        for name in names {
            let processor = registry.get(&name).ok_or_else(|| {
                Error::Configuration(format!("unknown condition processor \"{name}\""))
            })?;
            steps.push(processor);
        }
        Ok(Self::new(steps, registry))
    }

    /// Run the global steps in order, each receiving the previous step's
    /// output, then the column's override processor last.
    pub fn process(
        &self,
        value: &str,
        filter: &Filter,
        column: &Column,
        quoter: &dyn SqlQuoter,
    ) -> Result<String> {
        let mut value = value.to_string();
        for step in &self.steps {
            value = step.process(&value, filter, column, quoter)?;
        }

        if let Some(key) = &column.metadata.condition {
            if let Some(processor) = self.registry.get(key) {
                value = processor.process(&value, filter, column, quoter)?;
            }
        }

        Ok(value)
    }
}
