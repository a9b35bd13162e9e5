use crate::{Grammar, GraphError, RuleId};

/// `sum = term *("+" term)`, `term = digit / "(" sum ")"`, `digit` unbound.
fn arithmetic() -> (Grammar, RuleId, RuleId, RuleId) {
    let mut g = Grammar::new();
    let sum = g.non_terminal("sum");
    let term = g.non_terminal("term");
    let digit = g.non_terminal("digit");

    let plus = g.literal("+");
    let tail = g.conjunction([plus, term]);
    let tails = g.repetition(tail, 0, None);
    let sum_body = g.conjunction([term, tails]);
    g.bind(sum, sum_body).unwrap();

    let open = g.literal("(");
    let close = g.literal(")");
    let group = g.conjunction([open, sum, close]);
    let term_body = g.disjunction([digit, group]);
    g.bind(term, term_body).unwrap();

    (g, sum, term, digit)
}

#[test]
fn terminals_in_discovery_order() {
    let (g, sum, _, _) = arithmetic();

    let terminals: Vec<_> = g.terminals(&[sum]).into_iter().collect();

    assert_eq!(terminals, ["(", ")", "+"]);
}

#[test]
fn reachable_and_unbound_non_terminals() {
    let (g, sum, term, digit) = arithmetic();

    assert_eq!(g.non_terminals(&[sum]), [sum, term, digit]);
    assert_eq!(g.non_terminals(&[digit]), [digit]);
    assert_eq!(g.unbound(&[sum]), [digit]);
}

#[test]
fn check_acyclic() {
    let (g, sum, _, digit) = arithmetic();

    assert_eq!(
        g.check_acyclic(sum),
        Err(GraphError::CyclicGraph { rule: "sum".into() })
    );
    assert_eq!(g.check_acyclic(digit), Ok(()));
}
