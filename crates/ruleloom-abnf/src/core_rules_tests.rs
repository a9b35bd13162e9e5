use crate::compile;
use crate::core_rules::core_rules;

#[test]
fn every_appendix_b_rule_is_indexed() {
    let core = core_rules();
    for name in [
        "alpha", "bit", "char", "cr", "crlf", "ctl", "digit", "dquote", "hexdig", "htab", "lf",
        "lwsp", "octet", "sp", "vchar", "wsp",
    ] {
        assert!(core.find(name).is_some(), "{name}");
    }
    assert!(core.find("LWSP").is_none());
    assert!(core.find("upalpha").is_none());
}

#[test]
fn multi_line_comments_are_joined() {
    let compiled = compile("c = CHAR\n").unwrap();

    insta::assert_snapshot!(compiled.dump(), @r"
    c =
      NonTerminal CHAR
    CHAR = ; any 7-bit US-ASCII character, excluding NUL
      NumberValue %x1-7F
    ");
}

#[test]
fn hexdig_ignores_case() {
    let compiled = compile("hex = 1*HEXDIG\n").unwrap();

    assert!(compiled.parse("09afAF").is_ok());
    assert!(compiled.parse("g").is_err());
}

#[test]
fn lwsp_spans_lines() {
    let compiled = compile("gap = LWSP \"x\"\n").unwrap();

    assert_eq!(compiled.parse(" \t\r\n x").unwrap().root_text(), " \t\r\n x");
    assert!(compiled.parse("\r\nx").is_err());
}
