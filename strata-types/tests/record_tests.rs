use strata_types::{FieldValue, Record};

#[test]
fn insert_preserves_order() {
    let mut record = Record::new();
    record.insert("entity_id", FieldValue::Int(1));
    record.insert("name", FieldValue::Text("a".into()));
    record.insert("active", FieldValue::Bool(true));

    let keys: Vec<_> = record.keys().collect();
    assert_eq!(keys, ["entity_id", "name", "active"]);
}

#[test]
fn insert_replaces_existing_key_in_place() {
    let mut record = Record::new();
    record.insert("name", FieldValue::Text("a".into()));
    record.insert("active", FieldValue::Bool(true));
    record.insert("name", FieldValue::Text("b".into()));

    assert_eq!(record.len(), 2);
    assert_eq!(record.get("name"), Some(&FieldValue::Text("b".into())));
    assert_eq!(record.keys().next(), Some("name"));
}

#[test]
fn merge_overlays_other_on_top() {
    let mut base = Record::new();
    base.insert("name", FieldValue::Text("a".into()));
    base.insert("active", FieldValue::Bool(true));

    let overrides: Record = [("name".to_string(), FieldValue::Text("b".into()))]
        .into_iter()
        .collect();
    base.merge(overrides);

    assert_eq!(base.get("name"), Some(&FieldValue::Text("b".into())));
    assert_eq!(base.get("active"), Some(&FieldValue::Bool(true)));
}

#[test]
fn value_coercions() {
    assert_eq!(FieldValue::Text("42".into()).as_int(), Some(42));
    assert_eq!(FieldValue::Bool(true).as_int(), Some(1));
    assert_eq!(FieldValue::Int(0).as_bool(), Some(false));
    assert_eq!(FieldValue::Text("true".into()).as_bool(), Some(true));
    assert_eq!(FieldValue::Text("1.5".into()).as_float(), Some(1.5));
    assert_eq!(FieldValue::Null.as_int(), None);
}
