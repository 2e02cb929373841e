use std::str::FromStr;

use strata_types::{Comparator, Error, Filter, Operator};

// ── Comparator parsing ───────────────────────────────────────────

#[test]
fn comparator_round_trips_through_text() {
    let all = [
        Comparator::Eq,
        Comparator::Gt,
        Comparator::Gte,
        Comparator::InSet,
        Comparator::Lt,
        Comparator::Lte,
        Comparator::Neq,
        Comparator::Like,
        Comparator::NotLike,
        Comparator::NotNull,
        Comparator::Null,
    ];
    for comparator in all {
        assert_eq!(Comparator::from_str(comparator.as_str()).unwrap(), comparator);
    }
}

#[test]
fn unknown_comparator_is_rejected() {
    let err = Comparator::from_str("<>").unwrap_err();
    assert!(matches!(err, Error::InvalidArgument(_)));
}

#[test]
fn comparator_is_case_sensitive() {
    assert!(Comparator::from_str("in").is_err());
    assert!(Comparator::from_str("is null").is_err());
}

#[test]
fn nullity_comparators() {
    assert!(Comparator::Null.is_nullity());
    assert!(Comparator::NotNull.is_nullity());
    assert!(!Comparator::Eq.is_nullity());
    assert!(!Comparator::InSet.is_nullity());
}

// ── Operator parsing ─────────────────────────────────────────────

#[test]
fn operator_round_trips_through_text() {
    assert_eq!(Operator::from_str("AND").unwrap(), Operator::And);
    assert_eq!(Operator::from_str("OR").unwrap(), Operator::Or);
}

#[test]
fn unknown_operator_is_rejected() {
    let err = Operator::from_str("XOR").unwrap_err();
    assert!(matches!(err, Error::InvalidArgument(_)));
}

// ── Filter construction ──────────────────────────────────────────

#[test]
fn eq_shorthand_defaults() {
    let f = Filter::eq("name", "widget");
    assert_eq!(f.field, "name");
    assert_eq!(f.value, "widget");
    assert_eq!(f.comparator, Comparator::Eq);
    assert_eq!(f.operator, Operator::And);
}

#[test]
fn builder_replacements() {
    let f = Filter::eq("status", "1,2,3")
        .with_comparator(Comparator::InSet)
        .with_operator(Operator::Or);
    assert_eq!(f.comparator, Comparator::InSet);
    assert_eq!(f.operator, Operator::Or);
}
