//! DSL key to target field resolution.

use indexmap::IndexMap;

use crate::error::ConfigError;

/// Mapping from DSL keys to one or more target field names.
///
/// Declaration order is kept: a key mapped to several fields fans out into
/// an `Or` whose children follow the order given here.
///
/// # Example
///
/// ```
/// use djolar::FieldMapping;
///
/// let mapping = FieldMapping::new()
///     .field("st", "status")
///     .fields("q", ["title", "body"]);
///
/// assert_eq!(mapping.resolve("st"), Some(&["status".to_string()][..]));
/// assert_eq!(mapping.resolve("q").map(<[String]>::len), Some(2));
/// assert_eq!(mapping.resolve("nope"), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldMapping {
    entries: IndexMap<String, Vec<String>>,
}

impl FieldMapping {
    /// Creates an empty mapping.
    pub fn new() -> Self {
        FieldMapping::default()
    }

    /// Maps `key` to a single field. A repeated key replaces the earlier entry.
    pub fn field(mut self, key: impl Into<String>, field: impl Into<String>) -> Self {
        self.entries.insert(key.into(), vec![field.into()]);
        self
    }

    /// Maps `key` to several fields, in fan-out order.
    pub fn fields<I, S>(mut self, key: impl Into<String>, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.entries
            .insert(key.into(), fields.into_iter().map(Into::into).collect());
        self
    }

    /// Looks up the target fields for a DSL key.
    ///
    /// Returns `None` for an unknown key; callers drop such clauses.
    pub fn resolve(&self, key: &str) -> Option<&[String]> {
        self.entries.get(key).map(Vec::as_slice)
    }

    /// Number of mapped keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no key is mapped.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over `(key, fields)` in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.entries.is_empty() {
            return Err(ConfigError::MissingFieldMapping);
        }
        for (key, fields) in &self.entries {
            if !is_valid_key(key) {
                return Err(ConfigError::InvalidKey(key.clone()));
            }
            if fields.is_empty() || fields.iter().any(|f| f.is_empty()) {
                return Err(ConfigError::EmptyTargets(key.clone()));
            }
        }
        Ok(())
    }
}

impl<K, V> FromIterator<(K, V)> for FieldMapping
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        iter.into_iter()
            .fold(FieldMapping::new(), |mapping, (k, v)| mapping.field(k, v))
    }
}

/// Returns `true` if `key` matches `[A-Za-z0-9_]+`.
pub(crate) fn is_valid_key(key: &str) -> bool {
    !key.is_empty() && key.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_')
}
