use std::hash::{DefaultHasher, Hash, Hasher};

use ruleloom_core::{Grammar, NumberValue, Radix, RuleId};

use crate::{FuelLimits, ParseError, Parser, parse};

fn hash_of<T: Hash>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

/// `rule = "hel" "lo"`
fn hello() -> (Grammar, RuleId) {
    let mut g = Grammar::new();
    let hel = g.literal("hel");
    let lo = g.literal("lo");
    let body = g.conjunction([hel, lo]);
    let rule = g.define("rule", body);
    (g, rule)
}

/// `expr = "(" [expr] ")" / "x"`
fn parens() -> (Grammar, RuleId) {
    let mut g = Grammar::new();
    let expr = g.non_terminal("expr");
    let open = g.literal("(");
    let inner = g.optional(expr);
    let close = g.literal(")");
    let group = g.conjunction([open, inner, close]);
    let x = g.literal("x");
    let body = g.disjunction([group, x]);
    g.bind(expr, body).unwrap();
    (g, expr)
}

#[test]
fn sequence_of_terminals() {
    let (g, rule) = hello();

    let tree = parse(&g, "hello", rule).unwrap();

    insta::assert_snapshot!(tree.dump(), @r#"
    rule
      "hel"
      "lo"
    "#);
    insta::assert_snapshot!(tree.printer().with_spans(true).dump(), @r#"
    rule [0..5]
      "hel" [0..3]
      "lo" [3..5]
    "#);
}

#[test]
fn alternation_takes_matching_alternative() {
    let mut g = Grammar::new();
    let hel = g.literal("hel");
    let lo = g.literal("lo");
    let body = g.disjunction([hel, lo]);
    let rule = g.define("rule", body);

    let tree = parse(&g, "lo", rule).unwrap();
    insta::assert_snapshot!(tree.dump(), @r#"
    rule
      "lo"
    "#);

    assert_eq!(
        parse(&g, "xx", rule),
        Err(ParseError::NoMatch {
            rule: "rule".into(),
            furthest: 0
        })
    );
}

#[test]
fn repetition_within_bounds() {
    let mut g = Grammar::new();
    let a = g.literal("a");
    let body = g.repetition(a, 2, Some(4));
    let rule = g.define("rule", body);

    let tree = parse(&g, "aaa", rule).unwrap();
    insta::assert_snapshot!(tree.dump(), @r#"
    rule
      "a"
      "a"
      "a"
    "#);

    assert_eq!(
        parse(&g, "a", rule),
        Err(ParseError::NoMatch {
            rule: "rule".into(),
            furthest: 1
        })
    );
    assert_eq!(
        parse(&g, "aaaaa", rule),
        Err(ParseError::TrailingInput {
            rule: "rule".into(),
            offset: 4,
            furthest: 4
        })
    );
}

#[test]
fn parsing_is_deterministic() {
    let (g, expr) = parens();
    let parser = Parser::new(&g);

    let first = parser.parse("((x))", expr).unwrap();
    let second = parser.parse("((x))", expr).unwrap();

    assert_eq!(first, second);
    assert_eq!(hash_of(&first), hash_of(&second));
    assert_eq!(first.dump(), second.dump());
}

#[test]
fn recursive_grammar() {
    let (g, expr) = parens();

    let tree = parse(&g, "(x)", expr).unwrap();

    insta::assert_snapshot!(tree.dump(), @r#"
    expr
      _
        "("
        _
          expr
            "x"
        ")"
    "#);
    insta::assert_snapshot!(tree.simplify().dump(), @r#"
    expr
      "("
      expr
        "x"
      ")"
    "#);
}

#[test]
fn failed_sequence_rolls_back_fully() {
    let mut g = Grammar::new();
    let a = g.literal("a");
    let b = g.literal("b");
    let c = g.literal("c");
    let ab = g.conjunction([a, b]);
    let ac = g.conjunction([a, c]);
    let body = g.disjunction([ab, ac]);
    let rule = g.define("rule", body);

    let tree = parse(&g, "ac", rule).unwrap();

    insta::assert_snapshot!(tree.dump(), @r#"
    rule
      _
        "a"
        "c"
    "#);
    // Nodes from the abandoned attempts are gone.
    assert_eq!(tree.len(), 4);
}

#[test]
fn optional_never_fails() {
    let mut g = Grammar::new();
    let x = g.literal("x");
    let y = g.literal("y");
    let maybe_x = g.optional(x);
    let body = g.conjunction([maybe_x, y]);
    let rule = g.define("rule", body);

    insta::assert_snapshot!(parse(&g, "y", rule).unwrap().dump(), @r#"
    rule
      _
      "y"
    "#);
    insta::assert_snapshot!(parse(&g, "xy", rule).unwrap().dump(), @r#"
    rule
      _
        "x"
      "y"
    "#);
}

#[test]
fn disjunction_prefers_longest_then_earliest() {
    let mut g = Grammar::new();
    let a = g.literal("a");
    let ab = g.literal("ab");
    let first = g.define("first", a);
    let second = g.define("second", a);
    let longest = g.disjunction([a, ab]);
    let longest = g.define("longest", longest);
    let tie = g.disjunction([first, second]);
    let tie = g.define("tie", tie);

    insta::assert_snapshot!(parse(&g, "ab", longest).unwrap().dump(), @r#"
    longest
      "ab"
    "#);
    insta::assert_snapshot!(parse(&g, "a", tie).unwrap().dump(), @r#"
    tie
      first
        "a"
    "#);
}

#[test]
fn disjunction_does_not_reconsider_shorter_alternatives() {
    // ("a" / "ab") "b" cannot match "ab": the alternation commits to "ab".
    let mut g = Grammar::new();
    let a = g.literal("a");
    let ab = g.literal("ab");
    let b = g.literal("b");
    let either = g.disjunction([a, ab]);
    let body = g.conjunction([either, b]);
    let rule = g.define("rule", body);

    assert!(matches!(
        parse(&g, "ab", rule),
        Err(ParseError::NoMatch { .. })
    ));
    assert!(parse(&g, "abb", rule).is_ok());
}

#[test]
fn repetition_stops_on_empty_iterations() {
    let mut g = Grammar::new();
    let x = g.literal("x");
    let maybe_x = g.optional(x);
    let body = g.repetition(maybe_x, 0, None);
    let rule = g.define("rule", body);

    assert!(parse(&g, "", rule).is_ok());
    assert_eq!(parse(&g, "xx", rule).unwrap().root_text(), "xx");
}

#[test]
fn case_insensitive_terminal_keeps_input_text() {
    let mut g = Grammar::new();
    let hello = g.literal_ignore_case("hello");
    let rule = g.define("rule", hello);

    let tree = parse(&g, "HeLLo", rule).unwrap();

    insta::assert_snapshot!(tree.dump(), @r#"
    rule
      "HeLLo"
    "#);
}

#[test]
fn number_values_match_one_code_point() {
    let mut g = Grammar::new();
    let digit = g.number(NumberValue::range(Radix::Hexadecimal, 0x30, 0x39));
    let crlf = g.number(NumberValue::list(Radix::Decimal, vec![13, 10]));
    let body = g.conjunction([digit, crlf]);
    let rule = g.define("rule", body);

    assert_eq!(parse(&g, "7\n", rule).unwrap().root_text(), "7\n");
    assert_eq!(parse(&g, "7\r", rule).unwrap().root_text(), "7\r");
    assert!(parse(&g, "a\n", rule).is_err());
    assert!(parse(&g, "7\r\n", rule).is_err());
}

#[test]
fn left_recursion_hits_recursion_limit() {
    let mut g = Grammar::new();
    let expr = g.non_terminal("expr");
    let plus = g.literal("+");
    let x = g.literal("x");
    let sum = g.conjunction([expr, plus, x]);
    let body = g.disjunction([sum, x]);
    g.bind(expr, body).unwrap();

    assert_eq!(FuelLimits::default().get_recursion_limit(), 1024);

    let parser = Parser::builder(&g).recursion_limit(16).build();
    assert_eq!(parser.limits().get_recursion_limit(), 16);
    assert_eq!(
        parser.parse("x+x", expr),
        Err(ParseError::RecursionLimitExceeded(16))
    );
}

#[test]
fn recursion_limit_counts_non_terminals_only() {
    // list = "a" ["," list]
    let mut g = Grammar::new();
    let list = g.non_terminal("list");
    let a = g.literal("a");
    let comma = g.literal(",");
    let more = g.conjunction([comma, list]);
    let tail = g.optional(more);
    let body = g.conjunction([a, tail]);
    g.bind(list, body).unwrap();

    let input = vec!["a"; 300].join(",");
    let tree = parse(&g, &input, list).unwrap();
    assert_eq!(tree.root_text(), input);

    let parser = Parser::builder(&g).recursion_limit(300).build();
    assert!(parser.parse(&input, list).is_ok());
    let parser = Parser::builder(&g).recursion_limit(299).build();
    assert_eq!(
        parser.parse(&input, list),
        Err(ParseError::RecursionLimitExceeded(299))
    );
}

#[test]
fn exec_fuel_limits_activations() {
    let (g, rule) = hello();
    let parser = Parser::builder(&g).exec_fuel(3).build();

    assert_eq!(
        parser.parse("hello", rule),
        Err(ParseError::ExecFuelExhausted(3))
    );
    assert!(Parser::builder(&g).exec_fuel(4).build().parse("hello", rule).is_ok());
}

#[test]
fn unbound_non_terminal_is_an_error() {
    let mut g = Grammar::new();
    let missing = g.non_terminal("missing");
    let rule = g.define("rule", missing);

    assert_eq!(
        parse(&g, "a", rule),
        Err(ParseError::Unbound {
            name: "missing".into()
        })
    );
}

#[test]
fn root_must_be_non_terminal() {
    let mut g = Grammar::new();
    let a = g.literal("a");

    assert_eq!(
        parse(&g, "a", a),
        Err(ParseError::RootNotNonTerminal { kind: "Terminal" })
    );
}
