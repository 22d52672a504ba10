//! Store-agnostic filter expression tree.
//!
//! A [`FilterExpression`] is the parser's output: comparisons on target
//! fields combined with AND, OR and NOT. Trees are plain values; once built
//! they are never mutated, and structural equality is derived.

use std::fmt;

use serde::Serialize;

use crate::clause::ClauseValue;
use crate::op::Op;

/// A leaf predicate on one target field.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Comparison {
    /// Target field name, after mapping.
    pub field: String,
    /// Comparison tag.
    pub op: Op,
    /// Value to compare against.
    pub value: ClauseValue,
}

impl Comparison {
    /// Creates a new comparison.
    pub fn new(field: impl Into<String>, op: Op, value: impl Into<ClauseValue>) -> Self {
        Comparison {
            field: field.into(),
            op,
            value: value.into(),
        }
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.field, self.op, self.value)
    }
}

/// Boolean filter tree.
///
/// An empty `And` is vacuously true and matches everything.
///
/// # Example
///
/// ```
/// use djolar::{Comparison, FilterExpression, Op};
///
/// let tree = FilterExpression::all()
///     .and(FilterExpression::comparison("status", Op::Exact, "open"))
///     .and(FilterExpression::comparison("kind", Op::In, vec!["a", "b"]).negate());
///
/// assert_eq!(tree.to_string(), r#"and(status exact "open", not(kind in ["a", "b"]))"#);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterExpression {
    /// A single field comparison.
    Comparison(Comparison),
    /// All children must hold.
    And(Vec<FilterExpression>),
    /// At least one child must hold.
    Or(Vec<FilterExpression>),
    /// The child must not hold.
    Not(Box<FilterExpression>),
}

impl FilterExpression {
    /// The vacuous filter: an empty `And`.
    pub fn all() -> Self {
        FilterExpression::And(Vec::new())
    }

    /// Creates a comparison leaf.
    pub fn comparison(field: impl Into<String>, op: Op, value: impl Into<ClauseValue>) -> Self {
        FilterExpression::Comparison(Comparison::new(field, op, value))
    }

    /// Wraps this expression in `Not`.
    pub fn negate(self) -> Self {
        FilterExpression::Not(Box::new(self))
    }

    /// Combines two expressions with AND.
    ///
    /// An empty `And` on either side is absorbed, and `And` children are
    /// spliced rather than nested, so folding clauses into an accumulator
    /// yields one flat conjunction.
    pub fn and(self, other: FilterExpression) -> Self {
        match (self, other) {
            (lhs, rhs) if rhs.is_vacuous() => lhs,
            (lhs, rhs) if lhs.is_vacuous() => rhs,
            (FilterExpression::And(mut lhs), FilterExpression::And(rhs)) => {
                lhs.extend(rhs);
                FilterExpression::And(lhs)
            }
            (FilterExpression::And(mut lhs), rhs) => {
                lhs.push(rhs);
                FilterExpression::And(lhs)
            }
            (lhs, FilterExpression::And(rhs)) => {
                let mut children = Vec::with_capacity(rhs.len() + 1);
                children.push(lhs);
                children.extend(rhs);
                FilterExpression::And(children)
            }
            (lhs, rhs) => FilterExpression::And(vec![lhs, rhs]),
        }
    }

    /// Returns `true` for the empty `And`.
    pub fn is_vacuous(&self) -> bool {
        matches!(self, FilterExpression::And(children) if children.is_empty())
    }

    /// Returns every comparison leaf, depth first, left to right.
    pub fn comparisons(&self) -> Vec<&Comparison> {
        let mut out = Vec::new();
        self.collect_comparisons(&mut out);
        out
    }

    fn collect_comparisons<'a>(&'a self, out: &mut Vec<&'a Comparison>) {
        match self {
            FilterExpression::Comparison(c) => out.push(c),
            FilterExpression::And(children) | FilterExpression::Or(children) => {
                for child in children {
                    child.collect_comparisons(out);
                }
            }
            FilterExpression::Not(child) => child.collect_comparisons(out),
        }
    }
}

impl Default for FilterExpression {
    fn default() -> Self {
        FilterExpression::all()
    }
}

impl From<Comparison> for FilterExpression {
    fn from(c: Comparison) -> Self {
        FilterExpression::Comparison(c)
    }
}

fn write_group(f: &mut fmt::Formatter<'_>, name: &str, children: &[FilterExpression]) -> fmt::Result {
    write!(f, "{name}(")?;
    for (i, child) in children.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{child}")?;
    }
    write!(f, ")")
}

impl fmt::Display for FilterExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterExpression::Comparison(c) => write!(f, "{c}"),
            FilterExpression::And(children) if children.is_empty() => write!(f, "true"),
            FilterExpression::And(children) => write_group(f, "and", children),
            FilterExpression::Or(children) => write_group(f, "or", children),
            FilterExpression::Not(child) => write!(f, "not({child})"),
        }
    }
}
