//! Request-level facade.
//!
//! [`Searcher`] ties the pieces together for one search endpoint: it reads
//! the filter (`q`) and sort (`s`) parameters of a request and produces a
//! [`SearchQuery`] for the store adapter.

use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::builder::build_filter;
use crate::config::SearcherConfig;
use crate::error::Result;
use crate::expr::FilterExpression;
use crate::order::{resolve_order, SortSpec};
use crate::tokenizer::tokenize;

/// Query parameter carrying the filter string.
pub const FILTER_PARAM: &str = "q";
/// Query parameter carrying the sort string.
pub const SORT_PARAM: &str = "s";

/// The two DSL parameters of a request.
///
/// `None` means the parameter was absent; `Some("")` means it was present
/// but empty. The two drive different fallbacks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchParams {
    /// Raw filter string.
    pub filter: Option<String>,
    /// Raw sort string.
    pub sort: Option<String>,
}

impl SearchParams {
    /// Creates params from already-extracted values.
    pub fn new(filter: Option<impl Into<String>>, sort: Option<impl Into<String>>) -> Self {
        SearchParams {
            filter: filter.map(Into::into),
            sort: sort.map(Into::into),
        }
    }

    /// Reads `q` and `s` from a URL query string.
    ///
    /// The string is `application/x-www-form-urlencoded`, with or without a
    /// leading `?`. For a repeated parameter the last value wins.
    ///
    /// ```
    /// use djolar::SearchParams;
    ///
    /// let params = SearchParams::from_query("?q=st__co__abc&s=-st&page=2");
    /// assert_eq!(params.filter.as_deref(), Some("st__co__abc"));
    /// assert_eq!(params.sort.as_deref(), Some("-st"));
    ///
    /// let params = SearchParams::from_query("q=");
    /// assert_eq!(params.filter.as_deref(), Some(""));
    /// assert_eq!(params.sort, None);
    /// ```
    pub fn from_query(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        form_urlencoded::parse(query.as_bytes()).fold(SearchParams::default(), |mut params, (name, value)| {
            match &*name {
                FILTER_PARAM => params.filter = Some(value.into_owned()),
                SORT_PARAM => params.sort = Some(value.into_owned()),
                _ => {}
            }
            params
        })
    }
}

/// Parsed search request, ready for a store adapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchQuery {
    /// Filter tree.
    pub filter: FilterExpression,
    /// Sort order, never empty.
    pub order: Vec<SortSpec>,
}

/// Parser for one search endpoint.
///
/// Cheap to clone; the configuration is shared, not copied.
///
/// # Example
///
/// ```
/// use djolar::{FieldMapping, FilterExpression, Op, SearchParams, Searcher, SearcherConfig, SortSpec};
///
/// let config = SearcherConfig::builder(FieldMapping::new().field("st", "status"))
///     .build()
///     .unwrap();
/// let searcher = Searcher::new(config);
///
/// let query = searcher
///     .search(&SearchParams::from_query("q=st__eq__open&s=-st"))
///     .unwrap();
///
/// assert_eq!(query.filter, FilterExpression::comparison("status", Op::Exact, "open"));
/// assert_eq!(query.order, [SortSpec::desc("status")]);
/// ```
#[derive(Debug, Clone)]
pub struct Searcher {
    config: Arc<SearcherConfig>,
}

impl Searcher {
    /// Creates a searcher owning `config`.
    pub fn new(config: SearcherConfig) -> Self {
        Searcher {
            config: Arc::new(config),
        }
    }

    /// Creates a searcher over an already shared config.
    pub fn from_shared(config: Arc<SearcherConfig>) -> Self {
        Searcher { config }
    }

    /// The configuration in use.
    pub fn config(&self) -> &SearcherConfig {
        &self.config
    }

    /// Builds the filter tree for a filter parameter.
    ///
    /// Never fails: unusable clauses are dropped.
    pub fn filter(&self, raw: Option<&str>) -> FilterExpression {
        let clauses = raw.map(|raw| tokenize(raw, self.config.grammar()));
        let tree = build_filter(clauses.as_deref(), &self.config);
        debug!(
            present = raw.is_some(),
            clauses = clauses.as_ref().map_or(0, Vec::len),
            "Built filter expression"
        );
        tree
    }

    /// Resolves a sort parameter.
    pub fn order(&self, raw: Option<&str>) -> Result<Vec<SortSpec>> {
        resolve_order(raw, &self.config)
    }

    /// Parses both parameters of a request.
    pub fn search(&self, params: &SearchParams) -> Result<SearchQuery> {
        Ok(SearchQuery {
            order: self.order(params.sort.as_deref())?,
            filter: self.filter(params.filter.as_deref()),
        })
    }
}

impl From<SearcherConfig> for Searcher {
    fn from(config: SearcherConfig) -> Self {
        Searcher::new(config)
    }
}
