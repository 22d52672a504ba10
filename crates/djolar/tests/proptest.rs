//! Property-based tests for djolar using proptest.

use djolar::{
    tokenize, FieldMapping, FilterExpression, GrammarKind, Op, Searcher, SearcherConfig, SortSpec,
    SuffixGrammar,
};
use proptest::prelude::*;

// ============================================================================
// Test helpers
// ============================================================================

fn searcher_with(fields: &[String], forced: Option<(&str, &str)>) -> Searcher {
    let mut builder = SearcherConfig::builder(
        FieldMapping::new()
            .fields("k", fields.iter().cloned())
            .field("st", "status"),
    );
    if let Some((field, value)) = forced {
        builder = builder.forced(field, value);
    }
    Searcher::new(builder.build().unwrap())
}

fn operator_strategy() -> impl Strategy<Value = (&'static str, Op)> {
    prop_oneof![
        Just(("co", Op::ContainsCi)),
        Just(("eq", Op::Exact)),
        Just(("lt", Op::Lt)),
        Just(("lte", Op::Lte)),
        Just(("gt", Op::Gt)),
        Just(("gte", Op::Gte)),
    ]
}

// Values without delimiter, brackets or operator markers
fn value_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 .:-]{1,12}".prop_map(String::from)
}

fn fields_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-z]{1,8}".prop_map(String::from), 1..5)
}

// ============================================================================
// Property tests
// ============================================================================

proptest! {
    /// A scalar clause on a single-field key yields exactly one comparison.
    #[test]
    fn scalar_clause_yields_one_comparison(
        (name, op) in operator_strategy(),
        value in value_strategy(),
    ) {
        let searcher = searcher_with(&["x".to_string()], None);
        let tree = searcher.filter(Some(format!("st__{name}__{value}").as_str()));
        prop_assert_eq!(tree, FilterExpression::comparison("status", op, value));
    }

    /// A key mapped to N fields yields an Or of N comparisons in mapping order.
    #[test]
    fn fan_out_preserves_mapping_order(
        fields in fields_strategy(),
        value in value_strategy(),
    ) {
        let searcher = searcher_with(&fields, None);
        let tree = searcher.filter(Some(format!("k__eq__{value}").as_str()));
        let got: Vec<&str> = tree.comparisons().iter().map(|c| c.field.as_str()).collect();
        prop_assert_eq!(got, fields.iter().map(String::as_str).collect::<Vec<_>>());
        if fields.len() > 1 {
            prop_assert!(matches!(tree, FilterExpression::Or(ref children) if children.len() == fields.len()));
        }
    }

    /// `ni` negates the fan-out node as a whole, never its children.
    #[test]
    fn not_in_wraps_whole_fan_out(
        fields in fields_strategy(),
        items in prop::collection::vec("[a-z0-9]{1,6}", 1..5),
    ) {
        let searcher = searcher_with(&fields, None);
        let tree = searcher.filter(Some(format!("k__ni__[{}]", items.join(",")).as_str()));
        match tree {
            FilterExpression::Not(inner) => {
                prop_assert!(!matches!(*inner, FilterExpression::Not(_)));
                prop_assert_eq!(inner.comparisons().len(), fields.len());
                prop_assert!(inner.comparisons().iter().all(|c| c.op == Op::In));
            }
            other => prop_assert!(false, "expected Not, got {other}"),
        }
    }

    /// Parsing is a pure function of its inputs.
    #[test]
    fn filter_and_order_are_idempotent(
        raw in "[a-z_|\\[\\],]{0,40}",
        sort in "[a-z,-]{0,12}",
    ) {
        let searcher = searcher_with(&["a".to_string(), "b".to_string()], Some(("tenant", "t")));
        prop_assert_eq!(searcher.filter(Some(raw.as_str())), searcher.filter(Some(raw.as_str())));
        prop_assert_eq!(searcher.order(Some(sort.as_str())), searcher.order(Some(sort.as_str())));
    }

    /// The forced filter is always the first comparison of the tree.
    #[test]
    fn forced_filter_always_present(raw in proptest::option::of("[a-z_|]{0,30}")) {
        let searcher = searcher_with(&["a".to_string()], Some(("tenant", "t")));
        let tree = searcher.filter(raw.as_deref());
        let first = tree.comparisons()[0].clone();
        prop_assert_eq!(first.field, "tenant");
        prop_assert_eq!(first.op, Op::Exact);
    }

    /// Arbitrary input never panics, and tokenization never yields empty values.
    #[test]
    fn arbitrary_input_is_tolerated(raw in ".{0,64}") {
        let clauses = tokenize(&raw, &SuffixGrammar);
        prop_assert!(clauses.iter().all(|c| !c.value.is_empty()));
        prop_assert!(clauses.len() <= raw.split('|').count());

        let colon = Searcher::new(
            SearcherConfig::builder(FieldMapping::new().field("st", "status"))
                .grammar(GrammarKind::Colon)
                .build()
                .unwrap(),
        );
        let _ = colon.filter(Some(raw.as_str()));
    }

    /// Mapped sort keys resolve one spec per token, keeping direction.
    #[test]
    fn sort_tokens_resolve_in_order(dirs in prop::collection::vec(any::<bool>(), 1..6)) {
        let searcher = searcher_with(&["a".to_string(), "b".to_string()], None);
        let raw = dirs
            .iter()
            .map(|desc| if *desc { "-st" } else { "st" })
            .collect::<Vec<_>>()
            .join(",");
        let specs = searcher.order(Some(raw.as_str())).unwrap();
        let expected: Vec<SortSpec> = dirs
            .iter()
            .map(|desc| if *desc { SortSpec::desc("status") } else { SortSpec::asc("status") })
            .collect();
        prop_assert_eq!(specs, expected);
    }
}
