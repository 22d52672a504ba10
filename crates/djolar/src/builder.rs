//! Filter expression construction.
//!
//! [`build_filter`] folds classified clauses into a [`FilterExpression`],
//! together with the configured forced and default filters:
//!
//! ```text
//! root = forced_filter                      (or the vacuous filter)
//! root = root ∧ clause₁ ∧ clause₂ ∧ …       if a filter string was given
//! root = root ∧ default_filter              if no filter string was given
//! ```
//!
//! A clause whose key is not in the field mapping contributes nothing.

use tracing::debug;

use crate::clause::Clause;
use crate::config::{exact_conjunction, SearcherConfig};
use crate::expr::FilterExpression;
use crate::op::OperatorKind;

/// Builds the filter tree for one request.
///
/// `clauses` is `None` when the filter parameter was absent altogether, and
/// `Some` (possibly empty) when it was present. The default filter applies
/// only in the first case; the forced filter applies in both.
///
/// # Example
///
/// ```
/// use djolar::{build_filter, tokenize, FieldMapping, FilterExpression, Op, SearcherConfig};
///
/// let config = SearcherConfig::builder(FieldMapping::new().field("st", "status"))
///     .build()
///     .unwrap();
/// let clauses = tokenize("st__co__abc", config.grammar());
///
/// assert_eq!(
///     build_filter(Some(clauses.as_slice()), &config),
///     FilterExpression::comparison("status", Op::ContainsCi, "abc"),
/// );
/// ```
pub fn build_filter(clauses: Option<&[Clause]>, config: &SearcherConfig) -> FilterExpression {
    let root = config
        .forced_filter()
        .map(exact_conjunction)
        .unwrap_or_else(FilterExpression::all);

    match clauses {
        Some(clauses) => clauses
            .iter()
            .filter_map(|clause| clause_node(clause, config))
            .fold(root, FilterExpression::and),
        None => match config.default_filter() {
            Some(default) => root.and(exact_conjunction(default)),
            None => root,
        },
    }
}

/// Builds the node one clause contributes, or `None` if its key is unmapped.
///
/// One field gives a bare comparison; several give an `Or` in mapping order.
/// `ni` negates the whole fan-out node.
pub fn clause_node(clause: &Clause, config: &SearcherConfig) -> Option<FilterExpression> {
    let Some(fields) = config.field_mapping().resolve(&clause.key) else {
        debug!(key = %clause.key, operator = %clause.operator, "Dropping clause with unmapped key");
        return None;
    };

    let op = clause.operator.comparison_op(config.case_sensitive());
    let mut comparisons = fields
        .iter()
        .map(|field| FilterExpression::comparison(field.as_str(), op, clause.value.clone()));

    let node = if fields.len() == 1 {
        comparisons.next()?
    } else {
        FilterExpression::Or(comparisons.collect())
    };

    Some(match clause.operator {
        OperatorKind::NotIn => node.negate(),
        _ => node,
    })
}
