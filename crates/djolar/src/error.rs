//! Error types for the djolar crate.
//!
//! Configuration problems surface once, when a [`SearcherConfig`] is built.
//! Parsing a filter string never fails; the only parse-time error is an
//! unresolvable sort token.
//!
//! [`SearcherConfig`]: crate::SearcherConfig

use std::fmt;

use thiserror::Error;

/// Errors raised while constructing a [`SearcherConfig`](crate::SearcherConfig).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// No `field_mapping` was supplied, or it has no keys.
    #[error("field_mapping is not defined or is empty")]
    MissingFieldMapping,

    /// A mapping key is not usable as a DSL key.
    #[error("field_mapping key '{0}' must match [A-Za-z0-9_]+")]
    InvalidKey(String),

    /// A mapping key names no target field.
    #[error("field_mapping key '{0}' must name at least one target field")]
    EmptyTargets(String),

    /// An option has the wrong type.
    #[error("{option} should be {expected}")]
    WrongShape {
        option: String,
        expected: &'static str,
    },

    /// An option name the configuration does not know about.
    #[error("unknown searcher option '{0}'")]
    UnknownOption(String),

    /// The configuration document could not be read at all.
    #[error("malformed searcher configuration: {0}")]
    Malformed(String),
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Malformed(err.to_string())
    }
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigError::Malformed(err.to_string())
    }
}

/// Why a sort token could not be turned into a single field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortFieldProblem {
    /// The key is not in the field mapping.
    Unmapped,
    /// The key fans out to this many fields.
    Ambiguous(usize),
}

impl fmt::Display for SortFieldProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortFieldProblem::Unmapped => write!(f, "key is not mapped to a field"),
            SortFieldProblem::Ambiguous(n) => write!(f, "key maps to {n} fields"),
        }
    }
}

/// Errors that can occur while resolving a search request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    /// A sort token is absent from the mapping or maps to several fields.
    ///
    /// This is a client input error; reject the request.
    #[error("invalid sort field '{key}': {problem}")]
    InvalidSortField {
        key: String,
        problem: SortFieldProblem,
    },

    /// Configuration failure surfaced through the facade.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Result type for djolar operations.
pub type Result<T> = std::result::Result<T, SearchError>;
