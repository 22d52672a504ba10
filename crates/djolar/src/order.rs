//! Sort parameter resolution.
//!
//! Provides [`Dir`] for sort direction, [`SortSpec`] for field-based
//! ordering, and [`resolve_order`] to turn a sort parameter into specs.

use serde::Serialize;

use crate::config::SearcherConfig;
use crate::error::{Result, SearchError, SortFieldProblem};

/// Field ordered on when neither a sort parameter nor a default order is given.
pub const FALLBACK_ORDER_FIELD: &str = "pk";

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Dir {
    /// Ascending order (smallest first).
    #[default]
    Asc,
    /// Descending order (largest first).
    Desc,
}

impl Dir {
    /// Returns the display name of this direction.
    pub fn as_str(self) -> &'static str {
        match self {
            Dir::Asc => "asc",
            Dir::Desc => "desc",
        }
    }
}

impl std::fmt::Display for Dir {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single ordering clause specifying a field and direction.
///
/// Displays as an order term: `status` or `-status`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct SortSpec {
    /// The field to sort by.
    pub field: String,
    /// The sort direction.
    pub dir: Dir,
}

impl SortSpec {
    /// Creates a new ascending ordering for the given field.
    pub fn asc(field: impl Into<String>) -> Self {
        SortSpec {
            field: field.into(),
            dir: Dir::Asc,
        }
    }

    /// Creates a new descending ordering for the given field.
    pub fn desc(field: impl Into<String>) -> Self {
        SortSpec {
            field: field.into(),
            dir: Dir::Desc,
        }
    }

    /// Creates a new ordering with the given direction.
    pub fn new(field: impl Into<String>, dir: Dir) -> Self {
        SortSpec {
            field: field.into(),
            dir,
        }
    }

    /// Reads an order term: a leading `-` means descending.
    fn from_term(term: &str) -> Self {
        match term.strip_prefix('-') {
            Some(field) => SortSpec::desc(field),
            None => SortSpec::asc(term),
        }
    }
}

impl std::fmt::Display for SortSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.dir {
            Dir::Asc => write!(f, "{}", self.field),
            Dir::Desc => write!(f, "-{}", self.field),
        }
    }
}

/// Resolves a sort parameter into sort specs.
///
/// With no parameter (or an empty or all-blank one) the configured default
/// order is used verbatim, without mapping, falling back to `pk` ascending.
/// Otherwise each comma-separated token is mapped through the field mapping;
/// a leading `-` sorts descending. A token whose key is unmapped or fans out
/// to several fields fails the whole call.
///
/// # Example
///
/// ```
/// use djolar::{resolve_order, FieldMapping, SearcherConfig, SortSpec};
///
/// let config = SearcherConfig::builder(FieldMapping::new().field("st", "status"))
///     .build()
///     .unwrap();
///
/// assert_eq!(resolve_order(Some("-st"), &config).unwrap(), [SortSpec::desc("status")]);
/// assert_eq!(resolve_order(None, &config).unwrap(), [SortSpec::asc("pk")]);
/// assert!(resolve_order(Some("nope"), &config).is_err());
/// ```
pub fn resolve_order(raw: Option<&str>, config: &SearcherConfig) -> Result<Vec<SortSpec>> {
    let raw = match raw {
        Some(raw) if !raw.is_empty() => raw,
        _ => return Ok(default_order(config)),
    };

    let specs = raw
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(|token| {
            let (key, dir) = match token.strip_prefix('-') {
                Some(key) => (key, Dir::Desc),
                None => (token, Dir::Asc),
            };
            resolve_sort_key(key, config).map(|field| SortSpec::new(field, dir))
        })
        .collect::<Result<Vec<_>>>()?;

    // All tokens blank: same as an empty parameter
    if specs.is_empty() {
        return Ok(default_order(config));
    }
    Ok(specs)
}

fn resolve_sort_key(key: &str, config: &SearcherConfig) -> Result<String> {
    match config.field_mapping().resolve(key) {
        Some([field]) => Ok(field.clone()),
        Some(fields) => Err(SearchError::InvalidSortField {
            key: key.to_string(),
            problem: SortFieldProblem::Ambiguous(fields.len()),
        }),
        None => Err(SearchError::InvalidSortField {
            key: key.to_string(),
            problem: SortFieldProblem::Unmapped,
        }),
    }
}

fn default_order(config: &SearcherConfig) -> Vec<SortSpec> {
    if config.default_order().is_empty() {
        return vec![SortSpec::asc(FALLBACK_ORDER_FIELD)];
    }
    config
        .default_order()
        .iter()
        .map(|term| SortSpec::from_term(term))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::FieldMapping;

    fn config() -> SearcherConfig {
        SearcherConfig::builder(
            FieldMapping::new()
                .field("st", "status")
                .field("nm", "name")
                .fields("q", ["title", "body"]),
        )
        .build()
        .unwrap()
    }

    #[test]
    fn dir_display() {
        assert_eq!(Dir::Asc.to_string(), "asc");
        assert_eq!(Dir::Desc.to_string(), "desc");
        assert_eq!(Dir::default(), Dir::Asc);
    }

    #[test]
    fn sort_spec_constructors() {
        let asc = SortSpec::asc("name");
        assert_eq!(asc.field, "name");
        assert_eq!(asc.dir, Dir::Asc);

        let desc = SortSpec::desc("priority");
        assert_eq!(desc.field, "priority");
        assert_eq!(desc.dir, Dir::Desc);
    }

    #[test]
    fn sort_spec_display_as_order_term() {
        assert_eq!(SortSpec::asc("status").to_string(), "status");
        assert_eq!(SortSpec::desc("status").to_string(), "-status");
    }

    #[test]
    fn ascending_and_descending_tokens() {
        let specs = resolve_order(Some("st,-nm"), &config()).unwrap();
        assert_eq!(specs, [SortSpec::asc("status"), SortSpec::desc("name")]);
    }

    #[test]
    fn tokens_are_trimmed_and_blanks_skipped() {
        let specs = resolve_order(Some(" st , ,-nm,"), &config()).unwrap();
        assert_eq!(specs, [SortSpec::asc("status"), SortSpec::desc("name")]);

        let specs = resolve_order(Some(" , "), &config()).unwrap();
        assert_eq!(specs, [SortSpec::asc(FALLBACK_ORDER_FIELD)]);
    }

    #[test]
    fn unmapped_key_fails() {
        let err = resolve_order(Some("st,zz"), &config()).unwrap_err();
        assert_eq!(
            err,
            SearchError::InvalidSortField {
                key: "zz".into(),
                problem: SortFieldProblem::Unmapped,
            }
        );
    }

    #[test]
    fn bare_minus_fails() {
        let err = resolve_order(Some("-"), &config()).unwrap_err();
        assert!(matches!(err, SearchError::InvalidSortField { ref key, .. } if key.is_empty()));
    }

    #[test]
    fn fan_out_key_is_ambiguous() {
        let err = resolve_order(Some("-q"), &config()).unwrap_err();
        assert_eq!(
            err,
            SearchError::InvalidSortField {
                key: "q".into(),
                problem: SortFieldProblem::Ambiguous(2),
            }
        );
    }

    #[test]
    fn absent_or_empty_uses_default_order() {
        let config = SearcherConfig::builder(FieldMapping::new().field("st", "status"))
            .default_order(["status", "-created"])
            .build()
            .unwrap();
        let expected = [SortSpec::asc("status"), SortSpec::desc("created")];
        assert_eq!(resolve_order(None, &config).unwrap(), expected);
        assert_eq!(resolve_order(Some(""), &config).unwrap(), expected);
    }

    #[test]
    fn default_order_is_not_mapped() {
        // "st" is a DSL key, but default order terms are literal fields
        let config = SearcherConfig::builder(FieldMapping::new().field("st", "status"))
            .default_order(["st"])
            .build()
            .unwrap();
        assert_eq!(resolve_order(None, &config).unwrap(), [SortSpec::asc("st")]);
    }

    #[test]
    fn falls_back_to_pk() {
        assert_eq!(resolve_order(None, &config()).unwrap(), [SortSpec::asc("pk")]);
    }
}
