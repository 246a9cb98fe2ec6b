//! Property-based tests for the tree store, writer and reader.
//!
//! Generated trees only hold non-empty nested nodes: an empty nested node is
//! left out of the output and would not come back.

use pdl::{parse_str, to_string, to_string_cooked, List, Parameters, Value};
use proptest::collection::vec;
use proptest::prelude::*;

fn name() -> impl Strategy<Value = String> {
    prop_oneof![
        4 => "[A-Za-z_$][A-Za-z0-9_$]{0,8}",
        1 => "[a-z \"\\\\.-]{1,6}",
    ]
}

fn text() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 \"\\\\\n/*@#{}();=]{0,12}"
}

fn finite_f64() -> impl Strategy<Value = f64> {
    any::<f64>().prop_filter("finite", |f| f.is_finite())
}

fn leaf() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::Integer),
        finite_f64().prop_map(Value::Float),
        text().prop_map(Value::String),
        vec(any::<u8>(), 0..8).prop_map(Value::Bytes),
        vec(any::<bool>(), 0..4).prop_map(Value::from),
        vec(any::<i64>(), 0..4).prop_map(Value::from),
        vec(finite_f64(), 1..4).prop_map(Value::from),
        vec(text(), 1..4).prop_map(Value::from),
    ]
}

fn node_of(values: impl Strategy<Value = Value>) -> impl Strategy<Value = Parameters> {
    vec((name(), values), 1..5).prop_map(|entries| entries.into_iter().collect())
}

fn value() -> impl Strategy<Value = Value> {
    leaf().prop_recursive(3, 32, 4, |inner| {
        prop_oneof![
            node_of(inner.clone()).prop_map(Value::Parameters),
            vec(node_of(inner), 1..3).prop_map(|nodes| Value::List(List::Parameters(nodes))),
        ]
    })
}

fn tree() -> impl Strategy<Value = Parameters> {
    node_of(value())
}

proptest! {
    #[test]
    fn prop_canonical_round_trip(params in tree()) {
        let text = to_string(&params);
        let back = parse_str(&text);
        prop_assert!(back.is_ok(), "failed to parse {:?}: {:?}", text, back);
        prop_assert_eq!(back.unwrap(), params);
    }

    #[test]
    fn prop_cooked_round_trip(params in tree()) {
        let text = to_string_cooked(&params);
        prop_assert_eq!(parse_str(&text).unwrap(), params);
    }

    #[test]
    fn prop_canonical_is_stable(params in tree()) {
        let once = to_string(&params);
        let twice = to_string(&parse_str(&once).unwrap());
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn prop_clone_equal_and_same_hash(params in tree()) {
        let copy = params.clone();
        prop_assert_eq!(&copy, &params);
        prop_assert_eq!(copy.structural_hash(), params.structural_hash());
    }

    #[test]
    fn prop_hash_survives_round_trip(params in tree()) {
        let back = parse_str(&to_string(&params)).unwrap();
        prop_assert_eq!(back.structural_hash(), params.structural_hash());
    }

    #[test]
    fn prop_leaf_change_changes_hash(params in tree(), n in any::<i64>()) {
        let mut a = params.clone();
        let mut b = params;
        a.put("probe/leaf", n).unwrap();
        b.put("probe/leaf", n.wrapping_add(1)).unwrap();
        prop_assert_ne!(a.structural_hash(), b.structural_hash());
    }

    #[test]
    fn prop_mutating_clone_leaves_original(params in tree(), n in any::<i64>()) {
        let before = params.clone();
        let mut copy = params.clone();
        copy.put("probe", n).unwrap();
        prop_assert_eq!(params, before);
    }

    #[test]
    fn prop_appends_read_back_in_order(values in vec(any::<i64>(), 1..20)) {
        let mut params = Parameters::new();
        for v in &values {
            params.put("xs[]", *v).unwrap();
        }
        for (i, v) in values.iter().enumerate() {
            prop_assert_eq!(params.get(&format!("xs[{i}]")), Some(Value::Integer(*v)));
        }
        prop_assert_eq!(params.get(&format!("xs[{}]", values.len())), None);
    }

    #[test]
    fn prop_missing_paths_give_default(params in tree(), d in any::<i64>()) {
        prop_assert_eq!(params.get_i64("no such/path/anywhere", d), d);
    }
}
