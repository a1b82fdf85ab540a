//! Property-based tests for path rendering, slicing, and mutation.

use proptest::prelude::*;
use std::collections::HashMap;

use jpath::{Expr, Fragment, Selector, Value, parse};

// ============================================================================
// Strategies
// ============================================================================

fn name_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-zA-Z_][a-zA-Z0-9_]{0,6}",
        "[ -~]{0,6}",
    ]
}

fn index_strategy() -> impl Strategy<Value = i64> {
    -1000i64..1000
}

fn selector_strategy() -> impl Strategy<Value = Selector> {
    prop_oneof![
        index_strategy().prop_map(Selector::Index),
        name_strategy().prop_map(Selector::Key),
    ]
}

/// Fragments that may follow the head of an expression. A descent is
/// always paired with the fragment after it.
fn step_strategy() -> impl Strategy<Value = Vec<Fragment>> {
    prop_oneof![
        name_strategy().prop_map(|name| vec![Fragment::Child(name)]),
        index_strategy().prop_map(|i| vec![Fragment::Nth(i)]),
        Just(vec![Fragment::Wildcard]),
        name_strategy().prop_map(|name| vec![Fragment::Descent, Fragment::Child(name)]),
        Just(vec![Fragment::Descent, Fragment::Wildcard]),
        (
            proptest::option::of(-20i64..20),
            proptest::option::of(-20i64..20),
            proptest::option::of(-5i64..5),
        )
            .prop_map(|(start, end, step)| vec![Fragment::Slice { start, end, step }]),
        proptest::collection::vec(selector_strategy(), 2..5)
            .prop_map(|selectors| vec![Fragment::Union(selectors)]),
    ]
}

fn expr_strategy() -> impl Strategy<Value = Expr> {
    (
        prop_oneof![Just(Fragment::Root), Just(Fragment::Current)],
        proptest::collection::vec(step_strategy(), 0..6),
    )
        .prop_map(|(head, steps)| {
            let mut fragments = vec![head];
            fragments.extend(steps.into_iter().flatten());
            Expr::new(fragments)
        })
}

fn numbered(len: usize) -> Value {
    Value::Array((0..len as i64).map(Value::Integer).collect())
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    /// Property: rendering an expression and parsing it back is lossless
    #[test]
    fn prop_display_parses_back(expr in expr_strategy()) {
        let rendered = expr.to_string();
        let parsed = parse(&rendered);
        prop_assert!(parsed.is_ok(), "{} failed to parse: {:?}", rendered, parsed);
        prop_assert_eq!(parsed.unwrap(), expr);
    }

    /// Property: a slice yields each element at most once, in step order
    #[test]
    fn prop_slice_is_ordered_and_bounded(
        len in 0usize..12,
        start in proptest::option::of(-15i64..15),
        end in proptest::option::of(-15i64..15),
        step in proptest::option::of(-4i64..4),
    ) {
        let data = numbered(len);
        let expr = Expr::root().slice(start, end, step);
        let found: Vec<i64> = expr.get(&data).iter().filter_map(|v| v.as_int()).collect();

        prop_assert!(found.len() <= len);
        prop_assert!(found.iter().all(|&i| i >= 0 && (i as usize) < len));
        match step.unwrap_or(1) {
            0 => prop_assert!(found.is_empty()),
            s if s > 0 => prop_assert!(found.windows(2).all(|w| w[0] < w[1])),
            _ => prop_assert!(found.windows(2).all(|w| w[0] > w[1])),
        }
    }

    /// Property: the full forward slice is the array itself
    #[test]
    fn prop_full_slice_is_identity(len in 0usize..12) {
        let data = numbered(len);
        let found: Vec<Value> = parse("$[:]").unwrap().get(&data).into_iter().cloned().collect();
        prop_assert_eq!(Value::Array(found), data);
    }

    /// Property: a value set at a two-level path is read back from it
    #[test]
    fn prop_set_then_get(a in "[a-z]{1,8}", b in "[a-z]{1,8}", n in any::<i64>()) {
        let mut data = Value::Object(HashMap::new());
        let expr = Expr::root().child(a).child(b);
        expr.set(&mut data, n).unwrap();
        let expected = Value::Integer(n);
        prop_assert_eq!(expr.get(&data), vec![&expected]);
    }

    /// Property: deleting an array element keeps the array length
    #[test]
    fn prop_delete_keeps_length(len in 1usize..10, index in -10i64..10) {
        let mut data = numbered(len);
        let expr = Expr::root().nth(index);
        let in_bounds = index < len as i64 && index >= -(len as i64);
        let result = expr.del(&mut data);
        prop_assert_eq!(result.is_ok(), in_bounds);
        prop_assert_eq!(data.size(), Some(len));
        prop_assert!(!in_bounds || expr.first(&data) == Some(&Value::Null));
    }
}
