//! Filter string tokenization.
//!
//! A filter string is a list of clauses joined by a grammar-specific
//! delimiter. Each clause is classified by a [`Grammar`], which tries an
//! ordered list of operator matchers and stops at the first hit.
//!
//! Two grammars are provided:
//!
//! | Grammar | Delimiter | Clause form |
//! |---------|-----------|-------------|
//! | [`SuffixGrammar`] | `\|` | `key__op__value`, `key__in__[a,b]` |
//! | [`ColonGrammar`] | `+` | `key:value`, `key:"v"`, `key:<v`, `key:~[a,b]` |
//!
//! The grammar is picked once, in [`SearcherConfig`](crate::SearcherConfig);
//! nothing downstream of tokenization knows which one produced a clause.

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, error};

use crate::clause::{Clause, ClauseValue};
use crate::error::ConfigError;
use crate::mapping::is_valid_key;
use crate::op::OperatorKind;

/// A clause syntax: how to split a filter string and classify each piece.
///
/// Implementations must be pure; the same token always classifies the same way.
pub trait Grammar: fmt::Debug + Send + Sync {
    /// Character separating clauses.
    fn delimiter(&self) -> char;

    /// Classifies one non-empty token.
    ///
    /// Returns `None` when no operator pattern matches. A returned clause may
    /// carry an empty value; [`tokenize`] drops those.
    fn classify(&self, token: &str) -> Option<Clause>;
}

/// Splits a raw filter string on `delimiter`, dropping empty tokens.
pub fn split_clauses(raw: &str, delimiter: char) -> impl Iterator<Item = &str> {
    raw.split(delimiter).filter(|token| !token.is_empty())
}

/// Tokenizes a filter string into classified clauses.
///
/// Tokens that match no operator, or whose value is empty, contribute
/// nothing and are logged at debug level.
///
/// # Example
///
/// ```
/// use djolar::{tokenize, OperatorKind, SuffixGrammar};
///
/// let clauses = tokenize("st__co__abc||age__gte__18", &SuffixGrammar);
/// assert_eq!(clauses.len(), 2);
/// assert_eq!(clauses[1].operator, OperatorKind::Gte);
/// ```
pub fn tokenize(raw: &str, grammar: &dyn Grammar) -> Vec<Clause> {
    split_clauses(raw, grammar.delimiter())
        .filter_map(|token| match grammar.classify(token) {
            Some(clause) if clause.value.is_empty() => {
                debug!(token, key = %clause.key, "Skipping clause with empty value");
                None
            }
            Some(clause) => Some(clause),
            None => {
                debug!(token, "Skipping unrecognised clause");
                None
            }
        })
        .collect()
}

/// Splits the inside of a `[...]` list. Elements are trimmed and blank
/// elements dropped, for every grammar.
pub(crate) fn split_list(inner: &str) -> Vec<String> {
    inner
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

fn clause_value(operator: OperatorKind, raw: &str) -> ClauseValue {
    if operator.takes_list() {
        ClauseValue::List(split_list(raw))
    } else {
        ClauseValue::Single(raw.to_string())
    }
}

/// One entry of an ordered matcher table.
struct Matcher {
    operator: OperatorKind,
    pattern: Regex,
}

impl Matcher {
    fn new(operator: OperatorKind, pattern: &str) -> Result<Self, regex::Error> {
        Ok(Matcher {
            operator,
            pattern: Regex::new(pattern)?,
        })
    }
}

type MatcherTable = Result<Vec<Matcher>, regex::Error>;

/// The matchers of a table, or none if its patterns failed to compile.
fn matchers(table: &'static MatcherTable) -> &'static [Matcher] {
    match table {
        Ok(matchers) => matchers,
        Err(err) => {
            error!(%err, "Clause patterns failed to compile");
            &[]
        }
    }
}

// ============================================================================
// Suffix grammar
// ============================================================================

/// Comparison, exact and list forms come before `co`.
static SUFFIX_MATCHERS: Lazy<MatcherTable> = Lazy::new(|| {
    [
        OperatorKind::Lt,
        OperatorKind::Lte,
        OperatorKind::Gt,
        OperatorKind::Gte,
        OperatorKind::Exact,
        OperatorKind::In,
        OperatorKind::NotIn,
        OperatorKind::Contains,
    ]
    .into_iter()
    .map(|op| {
        let value = if op.takes_list() {
            r"\[(?P<value>.*)\]"
        } else {
            r"(?P<value>.*)"
        };
        let pattern = format!(r"(?s)^(?P<key>[A-Za-z0-9_]+?)__{}__{}$", op.as_str(), value);
        Matcher::new(op, &pattern)
    })
    .collect()
});

/// The canonical `key__op__value` grammar, clauses joined by `|`.
///
/// ```text
/// st__co__abc          contains
/// st__eq__abc          exact
/// st__in__[v1, v2]     membership
/// st__ni__[v1,v2]      negated membership
/// age__lt__3 / lte / gt / gte
/// ```
///
/// Operators are tried in the order lt, lte, gt, gte, eq, in, ni, co. Within
/// one operator the key is the shortest `[A-Za-z0-9_]+` prefix followed by
/// its marker, so `a__eq__b__c` reads as key `a`, value `b__c`.
///
/// A value must not contain the marker of an operator tried earlier than its
/// own: `st__co__a__lt__b` reads as key `st__co__a` with `lt`, which no
/// mapping can resolve, so the clause is dropped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SuffixGrammar;

impl Grammar for SuffixGrammar {
    fn delimiter(&self) -> char {
        '|'
    }

    fn classify(&self, token: &str) -> Option<Clause> {
        matchers(&SUFFIX_MATCHERS).iter().find_map(|matcher| {
            let caps = matcher.pattern.captures(token)?;
            Some(Clause {
                key: caps["key"].to_string(),
                operator: matcher.operator,
                value: clause_value(matcher.operator, &caps["value"]),
            })
        })
    }
}

// ============================================================================
// Colon grammar
// ============================================================================

/// Symbolic prefixes; anything unmatched falls back to contains.
static COLON_MATCHERS: Lazy<MatcherTable> = Lazy::new(|| {
    [
        (OperatorKind::Lt, r"(?s)^<(?P<value>.*)$"),
        (OperatorKind::Lte, r"(?s)^\|<(?P<value>.*)$"),
        (OperatorKind::Gt, r"(?s)^>(?P<value>.*)$"),
        (OperatorKind::Gte, r"(?s)^\|>(?P<value>.*)$"),
        (OperatorKind::Exact, r#"(?s)^"(?P<value>.*)"$"#),
        (OperatorKind::In, r"(?s)^\[(?P<value>.*)\]$"),
        (OperatorKind::NotIn, r"(?s)^~\[(?P<value>.*)\]$"),
    ]
    .into_iter()
    .map(|(op, pattern)| Matcher::new(op, pattern))
    .collect()
});

/// The older `key:value` grammar, clauses joined by `+`.
///
/// ```text
/// st:abc               contains
/// st:"abc"             exact
/// st:[v1,v2]           membership
/// st:~[v1,v2]          negated membership
/// age:<3  age:|<3  age:>3  age:|>3
/// ```
///
/// In a URL the `+` delimiter must be sent percent-encoded (`%2B`), since
/// form decoding turns a bare `+` into a space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ColonGrammar;

impl Grammar for ColonGrammar {
    fn delimiter(&self) -> char {
        '+'
    }

    fn classify(&self, token: &str) -> Option<Clause> {
        let (key, raw) = token.split_once(':')?;
        if !is_valid_key(key) {
            return None;
        }

        let (operator, value) = matchers(&COLON_MATCHERS)
            .iter()
            .find_map(|matcher| {
                let caps = matcher.pattern.captures(raw)?;
                Some((matcher.operator, clause_value(matcher.operator, &caps["value"])))
            })
            .unwrap_or_else(|| (OperatorKind::Contains, ClauseValue::Single(raw.to_string())));

        Some(Clause {
            key: key.to_string(),
            operator,
            value,
        })
    }
}

// ============================================================================
// Grammar selection
// ============================================================================

/// Which grammar a searcher uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum GrammarKind {
    /// [`SuffixGrammar`].
    #[default]
    Suffix,
    /// [`ColonGrammar`].
    Colon,
}

impl GrammarKind {
    /// Returns the grammar implementation.
    pub fn grammar(self) -> &'static dyn Grammar {
        match self {
            GrammarKind::Suffix => &SuffixGrammar,
            GrammarKind::Colon => &ColonGrammar,
        }
    }

    /// Returns the configuration name of this grammar.
    pub fn as_str(self) -> &'static str {
        match self {
            GrammarKind::Suffix => "suffix",
            GrammarKind::Colon => "colon",
        }
    }
}

impl fmt::Display for GrammarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for GrammarKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "suffix" => Ok(GrammarKind::Suffix),
            "colon" => Ok(GrammarKind::Colon),
            _ => Err(ConfigError::WrongShape {
                option: "grammar".to_string(),
                expected: "one of \"suffix\", \"colon\"",
            }),
        }
    }
}
