//! Operators recognised in the filter DSL and emitted in filter trees.
//!
//! Two enums live here. [`OperatorKind`] is what the tokenizer read from a
//! clause. [`Op`] is the tag a [`Comparison`](crate::Comparison) carries to the
//! store adapter. They differ in two places: `NotIn` becomes a `Not` node
//! around an `In` comparison, and `Contains` splits by case sensitivity.

use serde::Serialize;

/// Operator of a parsed clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatorKind {
    /// Fuzzy substring match.
    Contains,
    /// Exact match.
    Exact,
    /// Membership in a list.
    In,
    /// Negated membership in a list.
    NotIn,
    /// Less than.
    Lt,
    /// Less than or equal.
    Lte,
    /// Greater than.
    Gt,
    /// Greater than or equal.
    Gte,
}

impl OperatorKind {
    /// Returns the operator name used by the suffix grammar.
    pub fn as_str(self) -> &'static str {
        match self {
            OperatorKind::Contains => "co",
            OperatorKind::Exact => "eq",
            OperatorKind::In => "in",
            OperatorKind::NotIn => "ni",
            OperatorKind::Lt => "lt",
            OperatorKind::Lte => "lte",
            OperatorKind::Gt => "gt",
            OperatorKind::Gte => "gte",
        }
    }

    /// Returns `true` if this operator takes a bracketed list value.
    pub fn takes_list(self) -> bool {
        matches!(self, OperatorKind::In | OperatorKind::NotIn)
    }

    /// Returns the comparison tag for this operator.
    ///
    /// `NotIn` maps to `In`; the negation is expressed structurally.
    pub fn comparison_op(self, case_sensitive: bool) -> Op {
        match self {
            OperatorKind::Contains if case_sensitive => Op::ContainsCs,
            OperatorKind::Contains => Op::ContainsCi,
            OperatorKind::Exact => Op::Exact,
            OperatorKind::In | OperatorKind::NotIn => Op::In,
            OperatorKind::Lt => Op::Lt,
            OperatorKind::Lte => Op::Lte,
            OperatorKind::Gt => Op::Gt,
            OperatorKind::Gte => Op::Gte,
        }
    }
}

impl std::fmt::Display for OperatorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Comparison tag handed to the store adapter.
///
/// The builder never evaluates these; ordering and casing semantics belong
/// to whoever translates the tree into a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Op {
    /// Exact match.
    Exact,
    /// Case-insensitive substring match.
    ContainsCi,
    /// Case-sensitive substring match.
    ContainsCs,
    /// Value is one of a list.
    In,
    /// Less than.
    Lt,
    /// Less than or equal.
    Lte,
    /// Greater than.
    Gt,
    /// Greater than or equal.
    Gte,
}

impl Op {
    /// Returns the lookup name of this tag.
    pub fn as_str(self) -> &'static str {
        match self {
            Op::Exact => "exact",
            Op::ContainsCi => "icontains",
            Op::ContainsCs => "contains",
            Op::In => "in",
            Op::Lt => "lt",
            Op::Lte => "lte",
            Op::Gt => "gt",
            Op::Gte => "gte",
        }
    }
}

impl std::fmt::Display for Op {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
