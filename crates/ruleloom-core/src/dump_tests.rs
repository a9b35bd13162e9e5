use crate::{Grammar, NumberValue, Radix};

#[test]
fn dump_lists_each_non_terminal_once() {
    let mut g = Grammar::new();
    let world = g.non_terminal("world");
    let hel = g.literal("hel");
    let greeting = g.non_terminal_with_comment("greeting", "salutation");
    let body = g.conjunction([hel, world]);
    g.bind(greeting, body).unwrap();

    let letters = g.number(NumberValue::range(Radix::Hexadecimal, 0x41, 0x5A));
    let o = g.literal_ignore_case("o");
    let reps = g.repetition(o, 2, Some(4));
    let seq = g.conjunction([letters, reps]);
    let newline = g.number(NumberValue::list(Radix::Decimal, vec![13, 10]));
    let opt = g.optional(newline);
    let more = g.repetition(world, 0, None);
    let seq2 = g.conjunction([opt, more]);
    let alt = g.disjunction([seq, seq2]);
    g.bind(world, alt).unwrap();

    insta::assert_snapshot!(g.printer(greeting).with_comments(true).dump(), @r#"
    greeting = ; salutation
      Conjunction
        Terminal %s"hel"
        NonTerminal world
    world =
      Disjunction
        Conjunction
          NumberValue %x41-5A
          Repetition 2*4
            Terminal "o"
        Conjunction
          Optional
            NumberValue %d13.10
          Repetition *
            NonTerminal world
    "#);
}

#[test]
fn dump_marks_stubs() {
    let mut g = Grammar::new();
    let b = g.non_terminal("b");
    let a = g.define("a", b);

    insta::assert_snapshot!(g.dump(a), @r"
    a =
      NonTerminal b
    b = <unbound>
    ");
}

#[test]
fn dump_repetition_forms() {
    let mut g = Grammar::new();
    let x = g.terminal(crate::Terminal::ignore_case(["x", "xy"]));
    let exact = g.repetition(x, 3, Some(3));
    let at_most = g.repetition(x, 0, Some(3));
    let at_least = g.repetition(x, 1, None);
    let bit = g.number(NumberValue::single(Radix::Binary, 1));
    let body = g.conjunction([exact, at_most, at_least, bit]);
    let rule = g.define("rule", body);

    insta::assert_snapshot!(g.dump(rule), @r#"
    rule =
      Conjunction
        Repetition 3
          Terminal "xy" | "x"
        Repetition *3
          Terminal "xy" | "x"
        Repetition 1*
          Terminal "xy" | "x"
        NumberValue %b1
    "#);
}

#[test]
fn dump_marks_anonymous_cycles() {
    let mut g = Grammar::new();
    let x = g.literal("x");
    let seq = g.conjunction([x]);
    g.push_child(seq, seq).unwrap();
    let rule = g.define("loop", seq);

    insta::assert_snapshot!(g.dump(rule), @r#"
    loop =
      Conjunction
        Terminal %s"x"
        <cycle>
    "#);
}

#[test]
fn dump_several_roots_in_order() {
    let mut g = Grammar::new();
    let x = g.literal("x");
    let shared = g.define("shared", x);
    let first = g.define("first", shared);
    let second = g.define("second", shared);

    insta::assert_snapshot!(g.printer_for(&[second, first]).dump(), @r#"
    second =
      NonTerminal shared
    first =
      NonTerminal shared
    shared =
      Terminal %s"x"
    "#);
}
