use jpath::{Expr, Value, convert::from_json, parse};
use serde_json::json;
use std::collections::HashMap;

fn doc(json: serde_json::Value) -> Value {
    from_json(json)
}

/// Odd depths are objects keyed `a`, `b`, ...; even depths are arrays.
/// Each child's leaf value extends its parent's by one decimal digit.
fn build_tree(size: i64, depth: u32, iv: i64) -> Value {
    if depth == 0 {
        return Value::Integer(iv);
    }
    if depth % 2 == 1 {
        let mut map = HashMap::new();
        for (i, key) in ('a'..).take(size as usize).enumerate() {
            let i = i as i64;
            map.insert(key.to_string(), build_tree(size, depth - 1, iv * 10 + i + 1));
        }
        Value::Object(map)
    } else {
        Value::Array(
            (0..size)
                .map(|i| build_tree(size, depth - 1, iv * 10 + i + 1))
                .collect(),
        )
    }
}

fn get(path: &str, data: &Value) -> Vec<Value> {
    parse(path).unwrap().get(data).into_iter().cloned().collect()
}

fn sorted_ints(path: &str, data: &Value) -> Vec<i64> {
    let mut ints: Vec<i64> = get(path, data)
        .iter()
        .map(|v| v.as_int().unwrap())
        .collect();
    ints.sort();
    ints
}

// ============================================================================
// Fixture tree
// ============================================================================

#[test]
fn test_tree_child_wildcard_child() {
    let tree = build_tree(4, 3, 0);
    assert_eq!(sorted_ints("$.a.*.b", &tree), vec![112, 122, 132, 142]);
}

#[test]
fn test_tree_current_and_index() {
    let tree = build_tree(4, 3, 0);
    assert_eq!(get("@.b[1].c", &tree), vec![Value::Integer(223)]);
}

#[test]
fn test_tree_descent_index() {
    let tree = build_tree(4, 3, 0);
    assert_eq!(sorted_ints("..[1].b", &tree), vec![122, 222, 322, 422]);
}

#[test]
fn test_tree_union_order() {
    let tree = build_tree(4, 3, 0);
    assert_eq!(get("[1,'a']['b',2]['c',3]", &tree), vec![Value::Integer(133)]);
}

#[test]
fn test_tree_slice_step() {
    let tree = build_tree(4, 3, 0);
    assert_eq!(
        get("a[1::2].a", &tree),
        vec![Value::Integer(121), Value::Integer(141)]
    );
}

#[test]
fn test_tree_filter() {
    let tree = build_tree(4, 3, 0);
    assert_eq!(get("a[?(@.a > 135)].b", &tree), vec![Value::Integer(142)]);
    assert_eq!(sorted_ints("[?(@[1].a > 230)][1].b", &tree), vec![322, 422]);
}

#[test]
fn test_tree_wildcard_each_level() {
    let tree = build_tree(4, 3, 0);
    assert_eq!(
        sorted_ints("$.*[*].a", &tree),
        vec![111, 121, 131, 141, 211, 221, 231, 241, 311, 321, 331, 341, 411, 421, 431, 441]
    );
}

// ============================================================================
// Basic laws
// ============================================================================

#[test]
fn test_root_returns_whole_tree() {
    let data = doc(json!({"a": [1, 2], "b": null}));
    assert_eq!(get("$", &data), vec![data.clone()]);
    assert_eq!(get("@", &data), vec![data.clone()]);
}

#[test]
fn test_empty_path_returns_nothing() {
    let data = doc(json!({"a": 1}));
    assert!(get("", &data).is_empty());
    assert!(!Expr::default().has(&data));
}

#[test]
fn test_negative_index() {
    let data = doc(json!([0, 1, 2, 3]));
    assert_eq!(get("[-1]", &data), vec![Value::Integer(3)]);
    assert!(get("[-5]", &data).is_empty());
    assert!(get("[4]", &data).is_empty());
}

#[test]
fn test_out_of_bounds_read_is_empty() {
    let data = doc(json!([1]));
    assert!(get("[1]", &data).is_empty());
}

#[test]
fn test_slices() {
    let data = doc(json!([1, 2, 3, 4, 5, 6]));
    assert_eq!(sorted_ints("[1:3]", &data), vec![2, 3]);
    assert!(get("[::0]", &data).is_empty());
    assert_eq!(get("[-4:]", &data), get("[2:]", &data));
    assert_eq!(sorted_ints("[-4:]", &data), vec![3, 4, 5, 6]);
    assert_eq!(
        get("[::-1]", &data),
        doc(json!([6, 5, 4, 3, 2, 1])).children().into_iter().cloned().collect::<Vec<_>>()
    );
    assert_eq!(
        get("[4:1:-2]", &data),
        vec![Value::Integer(5), Value::Integer(3)]
    );
    assert!(get("[10:]", &data).is_empty());
}

#[test]
fn test_slice_does_not_reorder_container() {
    let data = doc(json!([1, 2, 3]));
    let _ = get("[::-1]", &data);
    assert_eq!(data, doc(json!([1, 2, 3])));
}

#[test]
fn test_wildcard_on_object_counts_members() {
    let data = doc(json!({"a": 1, "b": {"c": 2}, "d": [3], "e": null}));
    assert_eq!(get("$.*", &data).len(), 4);
    assert_eq!(get("$[*]", &data).len(), 4);
}

#[test]
fn test_descent_visits_every_node_once() {
    let data = doc(json!([1, [2, [3]]]));
    let found = get("$..", &data);
    assert_eq!(
        found,
        vec![
            doc(json!([1, [2, [3]]])),
            Value::Integer(1),
            doc(json!([2, [3]])),
            Value::Integer(2),
            doc(json!([3])),
            Value::Integer(3),
        ]
    );
}

#[test]
fn test_descent_wildcard_excludes_root() {
    let data = doc(json!([1, [2, [3]]]));
    assert_eq!(get("$..*", &data).len(), 5);
}

#[test]
fn test_descent_child() {
    let data = doc(json!({
        "o": {
            "a": [{"x": 1}, {"x": {"x": 2}}],
            "x": 3
        },
        "x": 4
    }));
    let found = get("$..x", &data);
    assert_eq!(found.len(), 5);
    assert!(found.contains(&doc(json!({"x": 2}))));
    for n in 1..=4 {
        assert!(found.contains(&Value::Integer(n)));
    }
}

#[test]
fn test_descent_index_child() {
    let data = doc(json!({
        "x": [0, 1],
        "y": [{"x": 0}, {"x": 42}],
        "z": [
            [{"x": 100}, {"x": 200}, {"x": 300}],
            [{"x": 400}, {"x": 500}, {"x": 600}]
        ]
    }));
    assert_eq!(sorted_ints("$..[1].x", &data), vec![42, 200, 500]);
}

#[test]
fn test_child_after_descent_below_name() {
    let data = doc(json!({"a": {"b": {"x": 1}, "x": 2}, "x": 3}));
    assert_eq!(sorted_ints("$.a..x", &data), vec![1, 2]);
}

#[test]
fn test_quoted_key() {
    let data = doc(json!({"a-b": 1, "c-d": 2}));
    assert_eq!(get("$['a-b']", &data), vec![Value::Integer(1)]);
}

#[test]
fn test_union_skips_mismatched_kinds() {
    let data = doc(json!({"a": 1, "b": 2}));
    assert_eq!(
        get("$['b', 0, 'a', 'missing']", &data),
        vec![Value::Integer(2), Value::Integer(1)]
    );
    let arr = doc(json!([10, 20]));
    assert_eq!(
        get("$['b', 1, 0, 1]", &arr),
        vec![Value::Integer(20), Value::Integer(10), Value::Integer(20)]
    );
}

#[test]
fn test_path_through_scalar_is_empty() {
    let data = doc(json!({"a": 4}));
    assert!(get("$.a.b", &data).is_empty());
    assert!(get("$.a[0]", &data).is_empty());
    assert!(get("$.a.*", &data).is_empty());
}

#[test]
fn test_filter_on_scalars() {
    let data = doc(json!([1, 2, 3]));
    assert_eq!(
        get("[?(@ > 1)]", &data),
        vec![Value::Integer(2), Value::Integer(3)]
    );
    assert_eq!(get("$[?(1==1)]", &data).len(), 3);
}

#[test]
fn test_filter_then_child() {
    let data = doc(json!({"a": [{"x": 1, "y": 2, "z": 3}, {"x": 2, "y": 4, "z": 6}]}));
    assert_eq!(
        get("$.a[*].y", &data),
        vec![Value::Integer(2), Value::Integer(4)]
    );
    assert_eq!(get("$.a[?(@.x == 2)].z", &data), vec![Value::Integer(6)]);
}

#[test]
fn test_filter_reads_root() {
    let data = doc(json!({"limit": 10, "items": [{"p": 5}, {"p": 15}, {"p": 8}]}));
    assert_eq!(
        get("$.items[?(@.p < $.limit)].p", &data),
        vec![Value::Integer(5), Value::Integer(8)]
    );
}

#[test]
fn test_first_and_has() {
    let data = doc(json!({"a": [{"b": 1}, {"b": 2}]}));
    let expr = parse("$.a[*].b").unwrap();
    assert_eq!(expr.first(&data), Some(&Value::Integer(1)));
    assert!(expr.has(&data));

    let missing = parse("$.a[*].c").unwrap();
    assert_eq!(missing.first(&data), None);
    assert!(!missing.has(&data));
}

#[test]
fn test_first_on_descent() {
    let data = doc(json!({"a": {"a": 1}}));
    assert_eq!(
        parse("$..a").unwrap().first(&data),
        Some(&doc(json!({"a": 1})))
    );
}

#[test]
fn test_has_null_value() {
    let data = doc(json!({"a": null}));
    assert!(parse("$.a").unwrap().has(&data));
    assert!(!parse("$.b").unwrap().has(&data));
}

#[test]
fn test_deep_tree_does_not_overflow() {
    let mut data = Value::Integer(0);
    for _ in 0..50_000 {
        data = Value::Array(vec![data]);
    }
    assert_eq!(
        parse("$..[?(@ == 0)]").unwrap().get(&data),
        vec![&Value::Integer(0)]
    );
    // Dropping a deeply nested Value recurses; leak it instead.
    std::mem::forget(data);
}
