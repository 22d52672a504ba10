//! Clause types produced by the tokenizer.
//!
//! A [`Clause`] is one `key/operator/value` unit of a filter string, before
//! the key has been mapped to any field.

use serde::Serialize;

use crate::op::OperatorKind;

/// A single classified filter clause.
///
/// # Example
///
/// ```
/// use djolar::{Clause, ClauseValue, OperatorKind};
///
/// let clause = Clause::new("st", OperatorKind::Contains, "abc");
/// assert_eq!(clause.value, ClauseValue::Single("abc".to_string()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clause {
    /// The DSL key, looked up in the field mapping.
    pub key: String,
    /// The operator read from the clause.
    pub operator: OperatorKind,
    /// The raw value, or list of values for `in`/`ni`.
    pub value: ClauseValue,
}

impl Clause {
    /// Creates a new clause.
    pub fn new(key: impl Into<String>, operator: OperatorKind, value: impl Into<ClauseValue>) -> Self {
        Clause {
            key: key.into(),
            operator,
            value: value.into(),
        }
    }
}

/// Value carried by a clause or comparison.
///
/// Values stay strings; no coercion happens before the store adapter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum ClauseValue {
    /// A single value.
    Single(String),
    /// A list of values, for membership tests.
    List(Vec<String>),
}

impl ClauseValue {
    /// Returns `true` if there is nothing to compare against.
    pub fn is_empty(&self) -> bool {
        match self {
            ClauseValue::Single(s) => s.is_empty(),
            ClauseValue::List(items) => items.is_empty(),
        }
    }
}

impl std::fmt::Display for ClauseValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClauseValue::Single(s) => write!(f, "{s:?}"),
            ClauseValue::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item:?}")?;
                }
                write!(f, "]")
            }
        }
    }
}

impl From<String> for ClauseValue {
    fn from(s: String) -> Self {
        ClauseValue::Single(s)
    }
}

impl From<&str> for ClauseValue {
    fn from(s: &str) -> Self {
        ClauseValue::Single(s.to_string())
    }
}

impl From<Vec<String>> for ClauseValue {
    fn from(v: Vec<String>) -> Self {
        ClauseValue::List(v)
    }
}

impl From<Vec<&str>> for ClauseValue {
    fn from(v: Vec<&str>) -> Self {
        ClauseValue::List(v.into_iter().map(str::to_string).collect())
    }
}
