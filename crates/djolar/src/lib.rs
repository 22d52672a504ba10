//! Djolar - filter/sort query-string DSL parser.
//!
//! Djolar turns the compact filter and sort strings a front end sends in a
//! query string into a store-agnostic [`FilterExpression`] tree and an
//! ordered list of [`SortSpec`]s. Translating those into SQL, a document
//! filter or an in-memory predicate is left to the store adapter.
//!
//! # Quick Start
//!
//! ```rust
//! use djolar::{FieldMapping, FilterExpression, Op, SearchParams, Searcher, SearcherConfig, SortSpec};
//!
//! let config = SearcherConfig::builder(
//!     FieldMapping::new()
//!         .field("st", "status")
//!         .fields("q", ["title", "body"]),
//! )
//! .forced("tenant", "acme")
//! .build()
//! .unwrap();
//!
//! let searcher = Searcher::new(config);
//! let query = searcher
//!     .search(&SearchParams::from_query("q=q__co__rust&s=-st"))
//!     .unwrap();
//!
//! assert_eq!(
//!     query.filter,
//!     FilterExpression::And(vec![
//!         FilterExpression::comparison("tenant", Op::Exact, "acme"),
//!         FilterExpression::Or(vec![
//!             FilterExpression::comparison("title", Op::ContainsCi, "rust"),
//!             FilterExpression::comparison("body", Op::ContainsCi, "rust"),
//!         ]),
//!     ])
//! );
//! assert_eq!(query.order, [SortSpec::desc("status")]);
//! ```
//!
//! # Filter Syntax
//!
//! Clauses are joined by `|`:
//!
//! | Clause | Meaning |
//! |--------|---------|
//! | `key__co__v` | field contains `v` (case-insensitive unless configured) |
//! | `key__eq__v` | field equals `v` |
//! | `key__in__[a,b]` | field is one of `a`, `b` |
//! | `key__ni__[a,b]` | field is none of `a`, `b` |
//! | `key__lt__v`, `lte`, `gt`, `gte` | ordering comparisons |
//!
//! The older `key:value` dialect is available as [`ColonGrammar`].
//!
//! # Semantics
//!
//! ```text
//! filter = forced_filter ∧ (clauses, if q is present | default_filter, if q is absent)
//! ```
//!
//! - A key mapped to several fields becomes an `Or` over them, in mapping order.
//! - `ni` wraps that whole node in `Not`.
//! - Unknown keys, unrecognised clauses and empty values are dropped silently.
//! - Sort tokens go through the mapping; `-key` sorts descending. An unknown
//!   or multi-field sort key is an error.

mod builder;
mod clause;
mod config;
mod error;
mod expr;
mod mapping;
mod op;
mod order;
mod searcher;
mod tokenizer;

// Re-export public API
pub use builder::{build_filter, clause_node};
pub use clause::{Clause, ClauseValue};
pub use config::{FilterMap, SearcherConfig, SearcherConfigBuilder};
pub use error::{ConfigError, Result, SearchError, SortFieldProblem};
pub use expr::{Comparison, FilterExpression};
pub use mapping::FieldMapping;
pub use op::{Op, OperatorKind};
pub use order::{resolve_order, Dir, SortSpec, FALLBACK_ORDER_FIELD};
pub use searcher::{SearchParams, SearchQuery, Searcher, FILTER_PARAM, SORT_PARAM};
pub use tokenizer::{split_clauses, tokenize, ColonGrammar, Grammar, GrammarKind, SuffixGrammar};
