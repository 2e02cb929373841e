use std::sync::Arc;

use pretty_assertions::assert_eq;
use serde_json::json;
use strata_config::Config;
use strata_schema::{
    Column, ColumnType, ConditionPipeline, ConditionProcessor, InSet, NullNotNull,
    ProcessorRegistry, SingleQuoteEscaper, SqlQuoter,
};
use strata_types::{Comparator, Error, Filter, Result};

fn column() -> Column {
    Column::new("status", "16", ColumnType::Text)
}

fn pipeline() -> ConditionPipeline {
    let config = Config::from_value(json!({
        "schema_management": { "columns": { "conditions": ["in_set", "null_not_null"] } }
    }));
    ConditionPipeline::from_config(&config, Arc::new(ProcessorRegistry::with_builtins())).unwrap()
}

// ── Built-in processors ──────────────────────────────────────────

#[test]
fn in_set_wraps_exactly_one_paren_pair() {
    let filter = Filter::eq("status", "1,2,3").with_comparator(Comparator::InSet);
    let quoter = SingleQuoteEscaper;

    assert_eq!(
        InSet.process("1,2,3", &filter, &column(), &quoter).unwrap(),
        "(1,2,3)"
    );
    // Prior parenthesization is not doubled.
    assert_eq!(
        InSet.process("((1,2,3))", &filter, &column(), &quoter).unwrap(),
        "(1,2,3)"
    );
}

#[test]
fn in_set_leaves_other_comparators_alone() {
    let filter = Filter::eq("status", "open");
    assert_eq!(
        InSet.process("'open'", &filter, &column(), &SingleQuoteEscaper).unwrap(),
        "'open'"
    );
}

#[test]
fn nullity_comparators_suppress_the_value() {
    let quoter = SingleQuoteEscaper;
    for comparator in [Comparator::Null, Comparator::NotNull] {
        let filter = Filter::eq("status", "ignored").with_comparator(comparator);
        assert_eq!(
            NullNotNull.process("'ignored'", &filter, &column(), &quoter).unwrap(),
            ""
        );
    }
}

#[test]
fn null_not_null_requotes_other_values() {
    let filter = Filter::eq("status", "it's open");
    assert_eq!(
        NullNotNull.process("whatever", &filter, &column(), &SingleQuoteEscaper).unwrap(),
        "'it''s open'"
    );
}

#[test]
fn quoter_doubles_single_quotes() {
    assert_eq!(SingleQuoteEscaper.quote("a'b"), "'a''b'");
    assert_eq!(SingleQuoteEscaper.quote(""), "''");
}

// ── Pipeline composition ─────────────────────────────────────────

#[test]
fn steps_run_in_configured_order() {
    // in_set runs before null_not_null: for an IN filter the re-quote from
    // null_not_null replaces the wrapped value, so order is observable.
    let pipeline = pipeline();
    let filter = Filter::eq("status", "1,2,3").with_comparator(Comparator::InSet);
    let processed = pipeline
        .process("'1,2,3'", &filter, &column(), &SingleQuoteEscaper)
        .unwrap();
    assert_eq!(processed, "'1,2,3'");
}

#[test]
fn nullity_filter_ends_with_empty_value() {
    let pipeline = pipeline();
    let filter = Filter::eq("status", "").with_comparator(Comparator::Null);
    let processed = pipeline
        .process("''", &filter, &column(), &SingleQuoteEscaper)
        .unwrap();
    assert_eq!(processed, "");
}

#[test]
fn unknown_global_processor_name_fails_fast() {
    let config = Config::from_value(json!({
        "schema_management": { "columns": { "conditions": ["nope"] } }
    }));
    let result = ConditionPipeline::from_config(&config, Arc::new(ProcessorRegistry::with_builtins()));
    assert!(matches!(result, Err(Error::Configuration(_))));
}

#[test]
fn empty_configuration_yields_passthrough_pipeline() {
    let pipeline =
        ConditionPipeline::from_config(&Config::new(), Arc::new(ProcessorRegistry::with_builtins()))
            .unwrap();
    let filter = Filter::eq("status", "open");
    assert_eq!(
        pipeline.process("'open'", &filter, &column(), &SingleQuoteEscaper).unwrap(),
        "'open'"
    );
}

// ── Column overrides ─────────────────────────────────────────────

struct Suffixing;

impl ConditionProcessor for Suffixing {
    fn process(
        &self,
        value: &str,
        _filter: &Filter,
        _column: &Column,
        _quoter: &dyn SqlQuoter,
    ) -> Result<String> {
        Ok(format!("{value} /* override */"))
    }
}

#[test]
fn column_override_runs_last() {
    let mut registry = ProcessorRegistry::with_builtins();
    registry.register("suffixing", Arc::new(Suffixing));
    let registry = Arc::new(registry);

    let config = Config::from_value(json!({
        "schema_management": { "columns": { "conditions": ["null_not_null"] } }
    }));
    let pipeline = ConditionPipeline::from_config(&config, registry).unwrap();

    let mut column = column();
    column.metadata.condition = Some("suffixing".to_string());

    let filter = Filter::eq("status", "open");
    let processed = pipeline
        .process("'open'", &filter, &column, &SingleQuoteEscaper)
        .unwrap();
    assert_eq!(processed, "'open' /* override */");
}

struct Failing;

impl ConditionProcessor for Failing {
    fn process(
        &self,
        _value: &str,
        _filter: &Filter,
        _column: &Column,
        _quoter: &dyn SqlQuoter,
    ) -> Result<String> {
        Err(Error::InvalidArgument("boom".to_string()))
    }
}

#[test]
fn processor_error_aborts_processing() {
    let mut registry = ProcessorRegistry::new();
    registry.register("failing", Arc::new(Failing));
    let pipeline = ConditionPipeline::new(vec![Arc::new(Failing)], Arc::new(registry));

    let filter = Filter::eq("status", "open");
    assert!(pipeline
        .process("'open'", &filter, &column(), &SingleQuoteEscaper)
        .is_err());
}
