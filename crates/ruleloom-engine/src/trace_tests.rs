use ruleloom_core::{Grammar, RuleId};

use crate::{Parser, PrintTracer, TraceColors, Verbosity};

/// `rule = "hel" / "lo"`
fn greeting() -> (Grammar, RuleId) {
    let mut g = Grammar::new();
    let hel = g.literal("hel");
    let lo = g.literal("lo");
    let body = g.disjunction([hel, lo]);
    let rule = g.define("rule", body);
    (g, rule)
}

fn trace(verbosity: Verbosity, colors: TraceColors) -> PrintTracer {
    let (g, rule) = greeting();
    let mut tracer = PrintTracer::new(verbosity, colors);
    Parser::new(&g)
        .parse_with("lo", rule, &mut tracer)
        .unwrap();
    tracer
}

#[test]
fn default_shows_non_terminals_and_commits() {
    let tracer = trace(Verbosity::Default, TraceColors::OFF);

    insta::assert_snapshot!(tracer.dump(), @r"
    > rule @0
      = Disjunction#2 alt 1 (2 bytes)
    < rule @0..2
    ");
}

#[test]
fn verbose_shows_every_rule_and_backtrack() {
    let tracer = trace(Verbosity::Verbose, TraceColors::OFF);

    insta::assert_snapshot!(tracer.dump(), @r"
    > rule @0
      > Disjunction#2 @0
        > Terminal#0 @0
        x Terminal#0 @0
        > Terminal#1 @0
        < Terminal#1 @0..2
        ~ backtrack @2 -> @0
        = Disjunction#2 alt 1 (2 bytes)
        > Terminal#1 @0
        < Terminal#1 @0..2
      < Disjunction#2 @0..2
    < rule @0..2
    ");
}

#[test]
fn very_verbose_adds_matched_text() {
    let tracer = trace(Verbosity::VeryVerbose, TraceColors::OFF);

    assert_eq!(tracer.lines().last().unwrap(), r#"< rule @0..2 "lo""#);
}

#[test]
fn colors_wrap_names_and_offsets() {
    let tracer = trace(Verbosity::Default, TraceColors::ON);

    assert_eq!(
        tracer.lines()[0],
        "> \x1b[34mrule\x1b[0m \x1b[2m@0\x1b[0m"
    );
    assert!(TraceColors::ON.is_enabled());
    assert!(!TraceColors::new(false).is_enabled());
}

#[test]
fn failed_parse_still_closes_every_line() {
    let (g, rule) = greeting();
    let mut tracer = PrintTracer::new(Verbosity::Default, TraceColors::OFF);

    assert!(Parser::new(&g).parse_with("xx", rule, &mut tracer).is_err());

    insta::assert_snapshot!(tracer.dump(), @r"
    > rule @0
    x rule @0
    ");
}
