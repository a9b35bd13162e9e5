use crate::{CodePoints, Grammar, GraphError, NumberValue, Radix, Rule, RuleId, Terminal};

#[test]
fn terminal_candidates_longest_first() {
    let terminal = Terminal::new(["a", "abc", "ab", "abc", "xy"]);

    assert_eq!(terminal.candidates(), ["abc", "ab", "xy", "a"]);
    assert!(terminal.is_case_sensitive());
    assert!(!Terminal::ignore_case(["a"]).is_case_sensitive());
}

#[test]
fn bind_is_set_once() {
    let mut g = Grammar::new();
    let rule = g.non_terminal("rule");
    let hel = g.literal("hel");
    let lo = g.literal("lo");

    assert_eq!(g.body(rule), Err(GraphError::Unbound { name: "rule".into() }));

    g.bind(rule, hel).unwrap();
    assert_eq!(g.body(rule), Ok(hel));

    let err = g.bind(rule, lo).unwrap_err();
    assert_eq!(err, GraphError::AlreadyBound { name: "rule".into() });
    assert_eq!(err.to_string(), "non-terminal `rule` is already bound");
    assert_eq!(g.body(rule), Ok(hel));
}

#[test]
fn bind_rejects_anonymous_rules() {
    let mut g = Grammar::new();
    let a = g.literal("a");
    let opt = g.optional(a);

    assert_eq!(
        g.bind(opt, a),
        Err(GraphError::NotNonTerminal { kind: "Optional" })
    );
}

#[test]
fn bind_with_comment_keeps_existing_comment_when_none() {
    let mut g = Grammar::new();
    let a = g.literal("a");
    let rule = g.non_terminal_with_comment("rule", "first");
    g.bind_with_comment(rule, a, None).unwrap();

    let nt = g.rule(rule).as_non_terminal().unwrap();
    assert_eq!(nt.comment(), Some("first"));
    assert!(nt.is_bound());
}

#[test]
fn push_child_on_composites_only() {
    let mut g = Grammar::new();
    let a = g.literal("a");
    let b = g.literal("b");
    let seq = g.conjunction([a]);
    let opt = g.optional(a);
    let num = g.number(NumberValue::single(Radix::Decimal, 65));

    g.push_child(seq, b).unwrap();
    assert_eq!(g.rule(seq).children(), vec![a, b]);

    assert_eq!(
        g.push_child(a, b),
        Err(GraphError::LeafRule { kind: "Terminal" })
    );
    assert_eq!(
        g.push_child(num, b),
        Err(GraphError::LeafRule { kind: "NumberValue" })
    );
    assert_eq!(
        g.push_child(opt, b),
        Err(GraphError::SingleChild { kind: "Optional" })
    );
}

#[test]
fn number_value_matches_single_list_and_range() {
    let single = NumberValue::single(Radix::Hexadecimal, 0x41);
    let list = NumberValue::list(Radix::Decimal, vec![13, 10]);
    let range = NumberValue::range(Radix::Hexadecimal, 0x30, 0x39);

    assert!(single.matches('A'));
    assert!(!single.matches('a'));
    assert!(list.matches('\r'));
    assert!(list.matches('\n'));
    assert!(!list.matches(' '));
    assert!(range.matches('0'));
    assert!(range.matches('9'));
    assert!(!range.matches('a'));
    assert_eq!(range.code_points, CodePoints::Range(0x30, 0x39));
}

#[test]
fn radix_prefixes() {
    assert_eq!(Radix::from_prefix('X'), Some(Radix::Hexadecimal));
    assert_eq!(Radix::from_prefix('d'), Some(Radix::Decimal));
    assert_eq!(Radix::from_prefix('b'), Some(Radix::Binary));
    assert_eq!(Radix::from_prefix('q'), None);
    assert_eq!(Radix::Binary.format(5), "101");
    assert_eq!(Radix::Hexadecimal.format(255), "FF");
}

#[test]
fn labels_and_lookup() {
    let mut g = Grammar::new();
    let a = g.literal("a");
    let rule = g.define("rule", a);

    assert_eq!(g.label(rule), "rule");
    assert_eq!(g.label(a), "Terminal#0");
    assert_eq!(g.name(rule), Some("rule"));
    assert_eq!(g.name(a), None);
    assert_eq!(g.find("rule"), Some(rule));
    assert_eq!(g.find("RULE"), None);
    assert_eq!(g.len(), 2);
}

#[test]
fn validate_reports_dangling_handles() {
    let mut g = Grammar::new();
    g.add(Rule::Optional(RuleId::from_raw(9)));

    assert_eq!(g.validate(), Err(GraphError::DanglingHandle { index: 9 }));
}

#[test]
#[should_panic(expected = "handle belongs to another grammar")]
fn foreign_handle_panics() {
    let mut other = Grammar::new();
    other.literal("a");
    other.literal("b");
    let foreign = other.literal("c");

    let g = Grammar::new();
    g.rule(foreign);
}
