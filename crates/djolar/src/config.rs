//! Searcher configuration.
//!
//! A [`SearcherConfig`] is built once per search endpoint and shared,
//! read-only, by every parse. All validation happens at construction; parsing
//! never re-checks the configuration.
//!
//! Two ways in:
//!
//! - [`SearcherConfig::builder`] for typed setup in code.
//! - [`SearcherConfig::from_value`] (and the JSON/YAML helpers) for
//!   configuration documents, with shape checks on every option.
//!
//! ```yaml
//! field_mapping:
//!   st: status
//!   q: [title, body]
//! forced_filter:
//!   tenant: acme
//! default_filter:
//!   archived: false
//! default_order: [status]
//! case_sensitive: false
//! grammar: suffix
//! ```

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;
use tracing::trace;

use crate::error::ConfigError;
use crate::expr::FilterExpression;
use crate::mapping::FieldMapping;
use crate::op::Op;
use crate::tokenizer::{Grammar, GrammarKind};

/// Field name to value pairs, compared with exact match.
pub type FilterMap = IndexMap<String, String>;

/// Immutable configuration read by every parse.
///
/// # Example
///
/// ```
/// use djolar::{FieldMapping, SearcherConfig};
///
/// let config = SearcherConfig::builder(FieldMapping::new().field("st", "status"))
///     .forced("tenant", "acme")
///     .default_order(["-created"])
///     .build()
///     .unwrap();
///
/// assert!(!config.case_sensitive());
/// assert_eq!(config.default_order(), ["-created"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "serde_json::Value")]
pub struct SearcherConfig {
    field_mapping: FieldMapping,
    forced_filter: Option<FilterMap>,
    default_filter: Option<FilterMap>,
    default_order: Vec<String>,
    case_sensitive: bool,
    grammar: GrammarKind,
}

impl SearcherConfig {
    /// Starts a builder around the required field mapping.
    pub fn builder(field_mapping: FieldMapping) -> SearcherConfigBuilder {
        SearcherConfigBuilder {
            field_mapping,
            forced_filter: None,
            default_filter: None,
            default_order: Vec::new(),
            case_sensitive: false,
            grammar: GrammarKind::default(),
        }
    }

    /// Builds a configuration from a JSON-shaped document.
    ///
    /// Recognised options are `field_mapping` (required), `forced_filter`,
    /// `default_filter`, `default_order`, `case_sensitive` and `grammar`. A
    /// `null` optional option counts as absent.
    pub fn from_value(value: Value) -> Result<Self, ConfigError> {
        let Value::Object(options) = value else {
            return Err(ConfigError::WrongShape {
                option: "searcher configuration".to_string(),
                expected: "a mapping of options",
            });
        };

        let mut field_mapping = None;
        let mut forced_filter = None;
        let mut default_filter = None;
        let mut default_order = Vec::new();
        let mut case_sensitive = false;
        let mut grammar = GrammarKind::default();

        for (name, value) in options {
            match name.as_str() {
                "field_mapping" => field_mapping = parse_field_mapping(value)?,
                "forced_filter" => forced_filter = parse_filter_map("forced_filter", value)?,
                "default_filter" => default_filter = parse_filter_map("default_filter", value)?,
                "default_order" => default_order = parse_default_order(value)?,
                "case_sensitive" => match value {
                    Value::Bool(flag) => case_sensitive = flag,
                    Value::Null => {}
                    _ => return Err(wrong_shape("case_sensitive", "true/false")),
                },
                "grammar" => match value {
                    Value::String(kind) => grammar = kind.parse()?,
                    Value::Null => {}
                    _ => return Err(wrong_shape("grammar", "one of \"suffix\", \"colon\"")),
                },
                _ => return Err(ConfigError::UnknownOption(name)),
            }
        }

        let mut builder = SearcherConfig::builder(field_mapping.ok_or(ConfigError::MissingFieldMapping)?)
            .default_order(default_order)
            .case_sensitive(case_sensitive)
            .grammar(grammar);
        builder.forced_filter = forced_filter;
        builder.default_filter = default_filter;
        builder.build()
    }

    /// Parses a JSON configuration document.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let value: Value = serde_json::from_str(s)?;
        SearcherConfig::from_value(value)
    }

    /// Parses a YAML configuration document.
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        let value: Value = serde_yaml::from_str(s)?;
        SearcherConfig::from_value(value)
    }

    /// The DSL key to field mapping.
    pub fn field_mapping(&self) -> &FieldMapping {
        &self.field_mapping
    }

    /// Filter always applied, if configured.
    pub fn forced_filter(&self) -> Option<&FilterMap> {
        self.forced_filter.as_ref()
    }

    /// Filter applied when no filter parameter is given, if configured.
    pub fn default_filter(&self) -> Option<&FilterMap> {
        self.default_filter.as_ref()
    }

    /// Literal order terms used when no sort parameter is given.
    pub fn default_order(&self) -> &[String] {
        &self.default_order
    }

    /// Whether `co` emits case-sensitive comparisons.
    pub fn case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    /// Which clause grammar to tokenize with.
    pub fn grammar_kind(&self) -> GrammarKind {
        self.grammar
    }

    /// The clause grammar to tokenize with.
    pub fn grammar(&self) -> &'static dyn Grammar {
        self.grammar.grammar()
    }
}

impl TryFrom<Value> for SearcherConfig {
    type Error = ConfigError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        SearcherConfig::from_value(value)
    }
}

/// Builder for [`SearcherConfig`]. Nothing is checked until [`build`](Self::build).
#[derive(Debug, Clone)]
pub struct SearcherConfigBuilder {
    field_mapping: FieldMapping,
    forced_filter: Option<FilterMap>,
    default_filter: Option<FilterMap>,
    default_order: Vec<String>,
    case_sensitive: bool,
    grammar: GrammarKind,
}

impl SearcherConfigBuilder {
    /// Adds one forced `field == value` condition.
    pub fn forced(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.forced_filter
            .get_or_insert_with(FilterMap::new)
            .insert(field.into(), value.into());
        self
    }

    /// Adds one default `field == value` condition.
    pub fn by_default(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_filter
            .get_or_insert_with(FilterMap::new)
            .insert(field.into(), value.into());
        self
    }

    /// Replaces the default order terms.
    ///
    /// Terms are literal field names, optionally prefixed with `-`; they do
    /// not go through the field mapping.
    pub fn default_order<I, S>(mut self, order: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.default_order = order.into_iter().map(Into::into).collect();
        self
    }

    /// Sets whether `co` is case sensitive. Defaults to `false`.
    pub fn case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    /// Selects the clause grammar. Defaults to [`GrammarKind::Suffix`].
    pub fn grammar(mut self, grammar: GrammarKind) -> Self {
        self.grammar = grammar;
        self
    }

    /// Validates and freezes the configuration.
    pub fn build(self) -> Result<SearcherConfig, ConfigError> {
        self.field_mapping.validate()?;
        check_filter_fields("forced_filter", self.forced_filter.as_ref())?;
        check_filter_fields("default_filter", self.default_filter.as_ref())?;
        if self
            .default_order
            .iter()
            .any(|term| term.trim_start_matches('-').is_empty())
        {
            return Err(wrong_shape("default_order", "a list of field names"));
        }

        trace!(
            keys = self.field_mapping.len(),
            grammar = %self.grammar,
            case_sensitive = self.case_sensitive,
            "Built searcher config"
        );

        Ok(SearcherConfig {
            field_mapping: self.field_mapping,
            forced_filter: self.forced_filter,
            default_filter: self.default_filter,
            default_order: self.default_order,
            case_sensitive: self.case_sensitive,
            grammar: self.grammar,
        })
    }
}

/// Renders a filter map as an `And` of exact comparisons, in map order.
pub(crate) fn exact_conjunction(filter: &FilterMap) -> FilterExpression {
    FilterExpression::And(
        filter
            .iter()
            .map(|(field, value)| FilterExpression::comparison(field.as_str(), Op::Exact, value.as_str()))
            .collect(),
    )
}

fn wrong_shape(option: &str, expected: &'static str) -> ConfigError {
    ConfigError::WrongShape {
        option: option.to_string(),
        expected,
    }
}

fn check_filter_fields(option: &str, filter: Option<&FilterMap>) -> Result<(), ConfigError> {
    match filter {
        Some(map) if map.keys().any(String::is_empty) => {
            Err(wrong_shape(option, "a mapping of field names to values"))
        }
        _ => Ok(()),
    }
}

fn parse_field_mapping(value: Value) -> Result<Option<FieldMapping>, ConfigError> {
    let entries = match value {
        Value::Null => return Ok(None),
        Value::Object(entries) => entries,
        _ => return Err(wrong_shape("field_mapping", "a mapping of keys to fields")),
    };

    let mut mapping = FieldMapping::new();
    for (key, target) in entries {
        mapping = match target {
            Value::String(field) => mapping.field(key, field),
            Value::Array(items) => {
                let fields = items
                    .into_iter()
                    .map(|item| match item {
                        Value::String(field) => Ok(field),
                        _ => Err(ConfigError::WrongShape {
                            option: format!("field_mapping.{key}"),
                            expected: "a field name or list of field names",
                        }),
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                mapping.fields(key, fields)
            }
            _ => {
                return Err(ConfigError::WrongShape {
                    option: format!("field_mapping.{key}"),
                    expected: "a field name or list of field names",
                })
            }
        };
    }
    Ok(Some(mapping))
}

fn parse_filter_map(option: &str, value: Value) -> Result<Option<FilterMap>, ConfigError> {
    let entries = match value {
        Value::Null => return Ok(None),
        Value::Object(entries) => entries,
        _ => return Err(wrong_shape(option, "a mapping of field names to values")),
    };

    entries
        .into_iter()
        .map(|(field, value)| {
            let value = match value {
                Value::String(s) => s,
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                _ => {
                    return Err(ConfigError::WrongShape {
                        option: format!("{option}.{field}"),
                        expected: "a string, number or boolean",
                    })
                }
            };
            Ok((field, value))
        })
        .collect::<Result<FilterMap, _>>()
        .map(Some)
}

fn parse_default_order(value: Value) -> Result<Vec<String>, ConfigError> {
    match value {
        Value::Null => Ok(Vec::new()),
        Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Value::String(term) => Ok(term),
                _ => Err(wrong_shape("default_order", "a list of field names")),
            })
            .collect(),
        _ => Err(wrong_shape("default_order", "a list of field names")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn mapping() -> FieldMapping {
        FieldMapping::new().field("st", "status")
    }

    #[test]
    fn builder_defaults() {
        let config = SearcherConfig::builder(mapping()).build().unwrap();
        assert!(!config.case_sensitive());
        assert_eq!(config.grammar_kind(), GrammarKind::Suffix);
        assert!(config.forced_filter().is_none());
        assert!(config.default_filter().is_none());
        assert!(config.default_order().is_empty());
    }

    #[test]
    fn builder_requires_mapping() {
        let err = SearcherConfig::builder(FieldMapping::new()).build().unwrap_err();
        assert_eq!(err, ConfigError::MissingFieldMapping);
    }

    #[test]
    fn builder_rejects_blank_order_terms() {
        let err = SearcherConfig::builder(mapping())
            .default_order(["status", "-"])
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::WrongShape { ref option, .. } if option == "default_order"));
    }

    #[test]
    fn builder_rejects_blank_filter_fields() {
        let err = SearcherConfig::builder(mapping())
            .forced("", "x")
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::WrongShape { ref option, .. } if option == "forced_filter"));
    }

    #[test]
    fn filters_keep_insertion_order() {
        let config = SearcherConfig::builder(mapping())
            .forced("b", "2")
            .forced("a", "1")
            .build()
            .unwrap();
        let fields: Vec<&String> = config.forced_filter().unwrap().keys().collect();
        assert_eq!(fields, ["b", "a"]);
    }

    #[test]
    fn exact_conjunction_renders_in_order() {
        let mut filter = FilterMap::new();
        filter.insert("name".into(), "abc".into());
        filter.insert("kind".into(), "x".into());
        assert_eq!(
            exact_conjunction(&filter),
            FilterExpression::And(vec![
                FilterExpression::comparison("name", Op::Exact, "abc"),
                FilterExpression::comparison("kind", Op::Exact, "x"),
            ])
        );
    }

    #[test]
    fn from_value_full() {
        let config = SearcherConfig::from_value(json!({
            "field_mapping": {"st": "status", "q": ["title", "body"]},
            "forced_filter": {"tenant": "acme", "level": 3},
            "default_filter": {"archived": false},
            "default_order": ["-created", "status"],
            "case_sensitive": true,
            "grammar": "colon"
        }))
        .unwrap();

        assert_eq!(config.field_mapping().resolve("q").unwrap(), ["title", "body"]);
        assert_eq!(config.forced_filter().unwrap()["level"], "3");
        assert_eq!(config.default_filter().unwrap()["archived"], "false");
        assert_eq!(config.default_order(), ["-created", "status"]);
        assert!(config.case_sensitive());
        assert_eq!(config.grammar_kind(), GrammarKind::Colon);
    }

    #[test]
    fn from_value_missing_mapping() {
        assert_eq!(
            SearcherConfig::from_value(json!({"default_order": []})),
            Err(ConfigError::MissingFieldMapping)
        );
        assert_eq!(
            SearcherConfig::from_value(json!({"field_mapping": null})),
            Err(ConfigError::MissingFieldMapping)
        );
        assert_eq!(
            SearcherConfig::from_value(json!({"field_mapping": {}})),
            Err(ConfigError::MissingFieldMapping)
        );
    }

    #[test]
    fn from_value_wrong_shapes() {
        let cases = [
            (json!([]), "searcher configuration"),
            (json!({"field_mapping": ["st"]}), "field_mapping"),
            (json!({"field_mapping": {"st": 1}}), "field_mapping.st"),
            (json!({"field_mapping": {"st": ["a", 2]}}), "field_mapping.st"),
            (json!({"field_mapping": {"st": "s"}, "default_filter": ["x"]}), "default_filter"),
            (json!({"field_mapping": {"st": "s"}, "forced_filter": "x"}), "forced_filter"),
            (json!({"field_mapping": {"st": "s"}, "forced_filter": {"a": [1]}}), "forced_filter.a"),
            (json!({"field_mapping": {"st": "s"}, "default_order": "status"}), "default_order"),
            (json!({"field_mapping": {"st": "s"}, "default_order": [1]}), "default_order"),
            (json!({"field_mapping": {"st": "s"}, "case_sensitive": "yes"}), "case_sensitive"),
            (json!({"field_mapping": {"st": "s"}, "grammar": "sql"}), "grammar"),
        ];
        for (doc, expected_option) in cases {
            match SearcherConfig::from_value(doc.clone()) {
                Err(ConfigError::WrongShape { option, .. }) => {
                    assert_eq!(option, expected_option, "{doc}")
                }
                other => panic!("expected WrongShape for {doc}, got {other:?}"),
            }
        }
    }

    #[test]
    fn from_value_unknown_option() {
        assert_eq!(
            SearcherConfig::from_value(json!({"field_mapping": {"st": "s"}, "ignore": 1})),
            Err(ConfigError::UnknownOption("ignore".into()))
        );
    }

    #[test]
    fn from_value_nulls_are_absent() {
        let config = SearcherConfig::from_value(json!({
            "field_mapping": {"st": "s"},
            "forced_filter": null,
            "default_order": null,
            "case_sensitive": null
        }))
        .unwrap();
        assert!(config.forced_filter().is_none());
        assert!(config.default_order().is_empty());
        assert!(!config.case_sensitive());
    }

    #[test]
    fn deserialize_through_serde() {
        let config: SearcherConfig =
            serde_json::from_str(r#"{"field_mapping": {"st": "status"}}"#).unwrap();
        assert_eq!(config.field_mapping().resolve("st").unwrap(), ["status"]);

        let err = serde_json::from_str::<SearcherConfig>(r#"{"default_order": []}"#).unwrap_err();
        assert!(err.to_string().contains("field_mapping"));
    }

    #[test]
    fn malformed_documents() {
        assert!(matches!(
            SearcherConfig::from_json_str("{not json"),
            Err(ConfigError::Malformed(_))
        ));
        assert!(matches!(
            SearcherConfig::from_yaml_str("field_mapping: [unclosed"),
            Err(ConfigError::Malformed(_))
        ));
    }
}
