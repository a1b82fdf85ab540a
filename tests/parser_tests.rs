use jpath::{Expr, Fragment, Selector, parse, parse_script};

fn fragments(text: &str) -> Vec<Fragment> {
    parse(text).unwrap().fragments().to_vec()
}

fn child(name: &str) -> Fragment {
    Fragment::Child(name.to_string())
}

fn error_message(text: &str) -> String {
    parse(text).unwrap_err().message
}

// ============================================================================
// Fragments
// ============================================================================

#[test]
fn test_rooted_children() {
    assert_eq!(fragments("$.a.b"), vec![Fragment::Root, child("a"), child("b")]);
    assert_eq!(fragments("@.a"), vec![Fragment::Current, child("a")]);
}

#[test]
fn test_bare_path() {
    assert_eq!(fragments("a.b"), vec![child("a"), child("b")]);
    assert_eq!(fragments("a[1]"), vec![child("a"), Fragment::Nth(1)]);
}

#[test]
fn test_root_alone() {
    assert_eq!(fragments("$"), vec![Fragment::Root]);
    assert_eq!(fragments("@"), vec![Fragment::Current]);
}

#[test]
fn test_empty_path() {
    assert!(parse("").unwrap().is_empty());
}

#[test]
fn test_wildcards() {
    assert_eq!(fragments("$.*"), vec![Fragment::Root, Fragment::Wildcard]);
    assert_eq!(fragments("$[*]"), vec![Fragment::Root, Fragment::Wildcard]);
    assert_eq!(fragments("*"), vec![Fragment::Wildcard]);
    assert_eq!(fragments(".*"), vec![Fragment::Wildcard]);
}

#[test]
fn test_wildcard_without_dot() {
    assert_eq!(fragments("$*"), vec![Fragment::Root, Fragment::Wildcard]);
    assert_eq!(fragments("a*"), vec![child("a"), Fragment::Wildcard]);
    assert_eq!(
        fragments("$.a*.b"),
        vec![Fragment::Root, child("a"), Fragment::Wildcard, child("b")]
    );
    assert_eq!(parse("$*").unwrap().to_string(), "$.*");
    assert_eq!(parse("a*").unwrap().to_string(), "a.*");
}

#[test]
fn test_descent() {
    assert_eq!(
        fragments("$..a"),
        vec![Fragment::Root, Fragment::Descent, child("a")]
    );
    assert_eq!(
        fragments("..[1].b"),
        vec![Fragment::Descent, Fragment::Nth(1), child("b")]
    );
    assert_eq!(
        fragments("$..*"),
        vec![Fragment::Root, Fragment::Descent, Fragment::Wildcard]
    );
    assert_eq!(fragments("$.."), vec![Fragment::Root, Fragment::Descent]);
}

#[test]
fn test_quoted_child() {
    assert_eq!(fragments("$['a b']"), vec![Fragment::Root, child("a b")]);
    assert_eq!(fragments(r#"$["x"]"#), vec![Fragment::Root, child("x")]);
    assert_eq!(fragments(r"$['it\'s']"), vec![Fragment::Root, child("it's")]);
    assert_eq!(fragments("$['a-b']"), vec![Fragment::Root, child("a-b")]);
}

#[test]
fn test_indexes() {
    assert_eq!(fragments("[-1]"), vec![Fragment::Nth(-1)]);
    assert_eq!(fragments("[007]"), vec![Fragment::Nth(7)]);
    assert_eq!(fragments("[ 2 ]"), vec![Fragment::Nth(2)]);
}

#[test]
fn test_slices() {
    assert_eq!(
        fragments("[1:3]"),
        vec![Fragment::Slice {
            start: Some(1),
            end: Some(3),
            step: None
        }]
    );
    assert_eq!(
        fragments("[::-1]"),
        vec![Fragment::Slice {
            start: None,
            end: None,
            step: Some(-1)
        }]
    );
    assert_eq!(
        fragments("[-2:]"),
        vec![Fragment::Slice {
            start: Some(-2),
            end: None,
            step: None
        }]
    );
    assert_eq!(
        fragments("[:2:]"),
        vec![Fragment::Slice {
            start: None,
            end: Some(2),
            step: None
        }]
    );
}

#[test]
fn test_unions() {
    assert_eq!(
        fragments("[1,'a']['b',2]"),
        vec![
            Fragment::Union(vec![Selector::Index(1), Selector::Key("a".into())]),
            Fragment::Union(vec![Selector::Key("b".into()), Selector::Index(2)]),
        ]
    );
    assert_eq!(
        fragments("[0, 0, -1]"),
        vec![Fragment::Union(vec![
            Selector::Index(0),
            Selector::Index(0),
            Selector::Index(-1)
        ])]
    );
}

#[test]
fn test_filters() {
    let expected = parse_script("@.x > 1").unwrap();
    assert_eq!(
        fragments("$[?(@.x > 1)]"),
        vec![Fragment::Root, Fragment::Filter(expected.clone())]
    );
    assert_eq!(fragments("$[?@.x > 1]"), vec![Fragment::Root, Fragment::Filter(expected)]);
}

#[test]
fn test_filter_with_grouped_terms() {
    let expr = parse("$[?(@.a == 1) && (@.b == 2)]").unwrap();
    assert_eq!(expr.len(), 2);
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_unterminated_bracket() {
    let err = parse("$.a[").unwrap_err();
    assert_eq!(err.message, "not terminated");
    assert_eq!(err.position, 3);
    assert_eq!(err.near, "[");
    assert_eq!(err.to_string(), "not terminated at position 3 near '['");
}

#[test]
fn test_unterminated_string() {
    assert!(error_message("$['a").contains("not terminated"));
}

#[test]
fn test_empty_bracket() {
    assert_eq!(error_message("$.a[]"), "empty expression fragment");
}

#[test]
fn test_invalid_number() {
    assert_eq!(error_message("[1.5]"), "invalid number");
    assert_eq!(error_message("[12x]"), "invalid number");
}

#[test]
fn test_trailing_dot() {
    assert_eq!(error_message("$."), "empty expression fragment");
}

#[test]
fn test_illegal_characters() {
    assert_eq!(
        error_message("$.-"),
        "an expression fragment can not start with a '-'"
    );
    assert_eq!(
        error_message("-a"),
        "an expression fragment can not start with a '-'"
    );
    assert_eq!(
        error_message("$[a]"),
        "an expression fragment can not start with a 'a'"
    );
}

#[test]
fn test_trailing_input() {
    let err = parse("$.a-b").unwrap_err();
    assert_eq!(err.message, "parse error");
    assert_eq!(err.position, 3);
    assert_eq!(error_message("$$"), "parse error");
    assert_eq!(error_message("$.a @"), "parse error");
}

#[test]
fn test_bad_slice_and_union() {
    assert_eq!(error_message("$[1:x]"), "invalid slice");
    assert_eq!(error_message("[1,x]"), "invalid union entry");
    assert_eq!(error_message("[1 2]"), "expected ']'");
}

#[test]
fn test_bad_filter() {
    assert_eq!(error_message("$[?(@.a == )]"), "unexpected character ')'");
    assert_eq!(error_message("$[?(@.a == 1]"), "expected ')'");
    assert_eq!(error_message("$[?(@.a = 1)]"), "unexpected '=' (did you mean '==' or '=~'?)");
}

// ============================================================================
// Display and builder
// ============================================================================

#[test]
fn test_display_normalizes() {
    assert_eq!(parse(r#"$["x"]"#).unwrap().to_string(), "$.x");
    assert_eq!(parse("$[*]").unwrap().to_string(), "$.*");
    assert_eq!(parse("$[ 1 , 'a' ]").unwrap().to_string(), "$[1,'a']");
    assert_eq!(parse("[007]").unwrap().to_string(), "[7]");
    assert_eq!(
        parse("$[?(@.x>1&&@.y)]").unwrap().to_string(),
        "$[?((@.x > 1) && @.y)]"
    );
}

#[test]
fn test_display_quotes_when_needed() {
    let expr = Expr::root().child("a b").child("c").child("it's");
    assert_eq!(expr.to_string(), r"$['a b'].c['it\'s']");
    assert_eq!(Expr::new(vec![child("")]).to_string(), "['']");
}

#[test]
fn test_builder_matches_parser() {
    let built = Expr::root()
        .child("store")
        .descent()
        .child("price")
        .nth(-1)
        .wildcard()
        .slice(Some(1), None, Some(2))
        .union(vec![Selector::Index(0), Selector::Key("k".into())]);
    assert_eq!(built.to_string(), "$.store..price[-1].*[1::2][0,'k']");
    assert_eq!(parse(&built.to_string()).unwrap(), built);
}

#[test]
fn test_builder_union_normalizes() {
    assert_eq!(
        Expr::root().union(vec![Selector::Key("a".into())]),
        Expr::root().child("a")
    );
    assert_eq!(Expr::root().union(vec![Selector::Index(-1)]), Expr::root().nth(-1));
    let pair = Expr::root().union(vec![Selector::Index(0), Selector::Key("a".into())]);
    assert_eq!(parse(&pair.to_string()).unwrap(), pair);
}

#[test]
#[should_panic(expected = "a union needs at least one selector")]
fn test_builder_empty_union_panics() {
    let _ = Expr::root().union(Vec::new());
}

#[test]
fn test_round_trip() {
    let paths = [
        "$.a.b",
        "@.b[1].c",
        "a.b",
        "$..a",
        "$..*",
        "..[1].b",
        "*",
        "[1].a",
        "$['a b']",
        "$[1,'a',-2]",
        "$[1:3]",
        "$[::-1]",
        "$[-2:]",
        "$[?(@.x > 1)]",
        "$.a[?(@.b == 'x' && @.c)].d",
        "$[?(!(@.a < 2) || length(@.tags) >= 3)]",
        "$[?(match(@.name, /^a.*/) && @.n * 2 + 1 == 7)]",
        "$[?(2 in get(@.tags[*]))]",
        "$[?(@.x == Nothing)]",
        "$[?(@.v == -1.5 || @.v == null)]",
    ];
    for path in paths {
        let expr = parse(path).unwrap();
        let rendered = expr.to_string();
        assert_eq!(parse(&rendered).unwrap(), expr, "{path} rendered as {rendered}");
    }
}

#[test]
fn test_from_str() {
    let expr: Expr = "$.a[0]".parse().unwrap();
    assert_eq!(expr, Expr::root().child("a").nth(0));
    assert!("$.a[".parse::<Expr>().is_err());
}

#[test]
#[should_panic(expected = "invalid path")]
fn test_must_parse_panics() {
    jpath::must_parse("$[");
}
