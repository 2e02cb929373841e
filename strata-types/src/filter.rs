use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Comparison operator for a single filter clause.
///
/// The set is closed; text forms parse via [`FromStr`] and unknown input is
/// rejected immediately rather than coerced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Comparator {
    Eq,
    Gt,
    Gte,
    InSet,
    Lt,
    Lte,
    Neq,
    Like,
    NotLike,
    NotNull,
    Null,
}

impl Comparator {
    /// SQL text for this comparator.
    pub fn as_str(&self) -> &'static str {
        match self {
            Comparator::Eq => "=",
            Comparator::Gt => ">",
            Comparator::Gte => ">=",
            Comparator::InSet => "IN",
            Comparator::Lt => "<",
            Comparator::Lte => "<=",
            Comparator::Neq => "!=",
            Comparator::Like => "LIKE",
            Comparator::NotLike => "NOT LIKE",
            Comparator::NotNull => "IS NOT NULL",
            Comparator::Null => "IS NULL",
        }
    }

    /// Whether this comparator is a nullity test and therefore carries no
    /// value fragment in the emitted condition.
    pub fn is_nullity(&self) -> bool {
        matches!(self, Comparator::Null | Comparator::NotNull)
    }
}

impl fmt::Display for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Comparator {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "=" => Ok(Comparator::Eq),
            ">" => Ok(Comparator::Gt),
            ">=" => Ok(Comparator::Gte),
            "IN" => Ok(Comparator::InSet),
            "<" => Ok(Comparator::Lt),
            "<=" => Ok(Comparator::Lte),
            "!=" => Ok(Comparator::Neq),
            "LIKE" => Ok(Comparator::Like),
            "NOT LIKE" => Ok(Comparator::NotLike),
            "IS NOT NULL" => Ok(Comparator::NotNull),
            "IS NULL" => Ok(Comparator::Null),
            other => Err(Error::InvalidArgument(format!(
                "unsupported comparator \"{other}\""
            ))),
        }
    }
}

/// Logical operator joining a filter to the clauses before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operator {
    And,
    Or,
}

impl Operator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::And => "AND",
            Operator::Or => "OR",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operator {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "AND" => Ok(Operator::And),
            "OR" => Ok(Operator::Or),
            other => Err(Error::InvalidArgument(format!(
                "unsupported operator \"{other}\""
            ))),
        }
    }
}

/// One comparison clause: field, value, comparator, and the logical operator
/// relative to preceding clauses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    pub field: String,
    pub value: String,
    pub comparator: Comparator,
    pub operator: Operator,
}

impl Filter {
    pub fn new(
        field: impl Into<String>,
        value: impl Into<String>,
        comparator: Comparator,
        operator: Operator,
    ) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
            comparator,
            operator,
        }
    }

    /// Shorthand for an AND-joined equality filter.
    pub fn eq(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(field, value, Comparator::Eq, Operator::And)
    }

    /// Replace the comparator, consuming the filter.
    pub fn with_comparator(mut self, comparator: Comparator) -> Self {
        self.comparator = comparator;
        self
    }

    /// Replace the operator, consuming the filter.
    pub fn with_operator(mut self, operator: Operator) -> Self {
        self.operator = operator;
        self
    }
}
