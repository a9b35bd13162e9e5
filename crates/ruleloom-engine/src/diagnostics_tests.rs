use ruleloom_core::Grammar;

use crate::{ParseError, Report, parse};

#[test]
fn no_match_points_at_furthest_offset() {
    let mut g = Grammar::new();
    let hel = g.literal("hel");
    let lo = g.literal("lo");
    let body = g.conjunction([hel, lo]);
    let rule = g.define("rule", body);

    let err = parse(&g, "helx", rule).unwrap_err();
    assert_eq!(
        err,
        ParseError::NoMatch {
            rule: "rule".into(),
            furthest: 3
        }
    );

    let rendered = err.render("helx");
    assert!(rendered.contains("error: input does not match `rule`"));
    assert!(rendered.contains("helx"));
    assert!(rendered.contains("no way to continue `rule` here"));
}

#[test]
fn trailing_input_report_labels() {
    let err = ParseError::TrailingInput {
        rule: "rule".into(),
        offset: 2,
        furthest: 3,
    };

    assert_eq!(
        err.report(),
        Report::new("`rule` matched, but input remains at offset 2")
            .primary(2..2, "unexpected input")
            .context(3..3, "furthest attempted match")
    );
}

#[test]
fn unlocated_errors_render_plain() {
    let err = ParseError::RecursionLimitExceeded(512);

    assert_eq!(
        err.render("anything"),
        "error: recursion limit of 512 nested rules exceeded"
    );
}

#[test]
fn printer_options() {
    let report = Report::new("bad token").primary(4..4, "here");

    let plain = report.printer("let é = 1;").path("input.txt").render();
    assert!(plain.contains("input.txt"));
    assert!(plain.contains("here"));

    let colored = report.printer("let é = 1;").colored(true).render();
    assert!(colored.contains('\x1b'));
}
