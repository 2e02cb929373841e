use std::io::Write;

use pretty_assertions::assert_eq;
use serde_json::json;
use strata_config::Config;
use strata_types::Error;

#[test]
fn dotted_path_lookup() {
    let config = Config::from_value(json!({
        "connections": {
            "default": { "name": "app.db", "table": "widget", "port": 3306 }
        }
    }));

    assert_eq!(config.get_str("connections.default.name"), Some("app.db"));
    assert_eq!(config.get_i64("connections.default.port"), Some(3306));
    assert_eq!(config.get_str("connections.default.missing"), None);
    assert_eq!(config.get_str("connections.other.name"), None);
}

#[test]
fn numeric_text_parses_as_integer() {
    let config = Config::from_value(json!({ "connections": { "default": { "port": "3306" } } }));
    assert_eq!(config.get_i64("connections.default.port"), Some(3306));
}

#[test]
fn later_sources_override_scalars_and_merge_objects() {
    let mut config = Config::from_value(json!({
        "connections": { "default": { "name": "app.db", "table": "widget" } },
        "schema_management": { "columns": { "conditions": ["in_set"] } }
    }));
    config.merge(json!({
        "connections": { "default": { "table": "gadget" } }
    }));

    // Overridden key takes the new value; sibling keys survive the merge.
    assert_eq!(config.get_str("connections.default.table"), Some("gadget"));
    assert_eq!(config.get_str("connections.default.name"), Some("app.db"));
    assert_eq!(
        config.get_str_list("schema_management.columns.conditions").unwrap(),
        ["in_set"]
    );
}

#[test]
fn non_object_overlay_replaces_wholesale() {
    let mut config = Config::from_value(json!({ "providers": { "widget": { "schema": {} } } }));
    config.merge(json!({ "providers": "disabled" }));
    assert_eq!(config.get_str("providers"), Some("disabled"));
    assert_eq!(config.get("providers.widget"), None);
}

#[test]
fn str_list_missing_is_empty_but_wrong_type_fails() {
    let config = Config::from_value(json!({ "schema_management": { "columns": { "conditions": 5 } } }));
    assert!(config.get_str_list("nowhere").unwrap().is_empty());
    assert!(matches!(
        config.get_str_list("schema_management.columns.conditions"),
        Err(Error::Configuration(_))
    ));
}

#[test]
fn has_treats_empty_values_as_absent() {
    let config = Config::from_value(json!({
        "a": {},
        "b": { "c": 1 },
        "d": "",
        "e": null
    }));
    assert!(!config.has("a"));
    assert!(config.has("b"));
    assert!(config.has("b.c"));
    assert!(!config.has("d"));
    assert!(!config.has("e"));
}

#[test]
fn loads_and_merges_files() {
    let mut base = tempfile::NamedTempFile::new().unwrap();
    write!(base, r#"{{ "connections": {{ "default": {{ "name": "a.db" }} }} }}"#).unwrap();
    let mut overlay = tempfile::NamedTempFile::new().unwrap();
    write!(overlay, r#"{{ "connections": {{ "default": {{ "table": "widget" }} }} }}"#).unwrap();

    let mut config = Config::from_file(base.path()).unwrap();
    config.merge_file(overlay.path()).unwrap();

    assert_eq!(config.get_str("connections.default.name"), Some("a.db"));
    assert_eq!(config.get_str("connections.default.table"), Some("widget"));
}

#[test]
fn unreadable_file_is_a_configuration_error() {
    let err = Config::from_file("/nonexistent/config.json").unwrap_err();
    assert!(matches!(err, Error::Configuration(_)));
}

#[test]
fn malformed_json_is_a_configuration_error() {
    let err = Config::from_json("{ not json").unwrap_err();
    assert!(matches!(err, Error::Configuration(_)));
}
