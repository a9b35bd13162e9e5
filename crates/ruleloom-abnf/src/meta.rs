//! Hand-built rule graph for ABNF itself (RFC 5234 section 4, RFC 7405).
//!
//! Deviations from the RFC text:
//! - line ends may be CRLF or a bare LF;
//! - comments may contain non-ASCII characters.
//!
//! The non-terminal names match the RFC rule names; the interpreter
//! dispatches on them.

use std::sync::LazyLock;

use ruleloom_core::{Grammar, NumberValue, Radix, RuleId, Terminal};

/// The ABNF meta grammar and its `rulelist` entry point.
#[derive(Debug)]
pub struct MetaGrammar {
    grammar: Grammar,
    rulelist: RuleId,
}

static META: LazyLock<MetaGrammar> = LazyLock::new(MetaGrammar::build);

/// Shared meta grammar instance.
pub fn meta_grammar() -> &'static MetaGrammar {
    &META
}

impl MetaGrammar {
    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    pub fn rulelist(&self) -> RuleId {
        self.rulelist
    }

    fn build() -> Self {
        let mut b = Builder {
            g: Grammar::new(),
        };

        // Forward declarations for the recursive part.
        let alternation = b.g.non_terminal("alternation");
        let c_wsp = b.g.non_terminal("c-wsp");
        let c_nl = b.g.non_terminal("c-nl");

        // Core rules used by the meta grammar.
        let alpha = {
            let upper = b.hex_range(0x41, 0x5A);
            let lower = b.hex_range(0x61, 0x7A);
            let body = b.alt([upper, lower]);
            b.g.define("ALPHA", body)
        };
        let digit = {
            let body = b.hex_range(0x30, 0x39);
            b.g.define("DIGIT", body)
        };
        let hexdig = {
            let letters = b
                .g
                .terminal(Terminal::ignore_case(["A", "B", "C", "D", "E", "F"]));
            let body = b.alt([digit, letters]);
            b.g.define("HEXDIG", body)
        };
        let bit = {
            let body = b.g.terminal(Terminal::new(["0", "1"]));
            b.g.define("BIT", body)
        };
        let wsp = {
            let sp = b.hex(0x20);
            let htab = b.hex(0x09);
            let body = b.alt([sp, htab]);
            b.g.define("WSP", body)
        };
        let vchar = {
            let body = b.hex_range(0x21, 0x7E);
            b.g.define("VCHAR", body)
        };
        let dquote = {
            let body = b.hex(0x22);
            b.g.define("DQUOTE", body)
        };
        let lf = {
            let body = b.hex(0x0A);
            b.g.define("LF", body)
        };
        let crlf = {
            let cr = b.hex(0x0D);
            let body = b.seq([cr, lf]);
            b.g.define("CRLF", body)
        };

        // rulename = ALPHA *(ALPHA / DIGIT / "-")
        let rulename = {
            let dash = b.lit("-");
            let tail_char = b.alt([alpha, digit, dash]);
            let tail = b.many(tail_char);
            let body = b.seq([alpha, tail]);
            b.g.define("rulename", body)
        };

        // defined-as = *c-wsp ("=" / "=/") *c-wsp
        let defined_as = {
            let eq = b.lit("=");
            let eq_slash = b.lit("=/");
            let op = b.alt([eq, eq_slash]);
            let before = b.many(c_wsp);
            let after = b.many(c_wsp);
            let body = b.seq([before, op, after]);
            b.g.define("defined-as", body)
        };

        // elements = alternation *c-wsp
        let elements = {
            let trailing = b.many(c_wsp);
            let body = b.seq([alternation, trailing]);
            b.g.define("elements", body)
        };

        // c-wsp = WSP / (c-nl WSP)
        {
            let continued = b.seq([c_nl, wsp]);
            let body = b.alt([wsp, continued]);
            b.bind(c_wsp, body);
        }

        // comment = ";" *(WSP / VCHAR / %x80-10FFFF) (CRLF / LF)
        let comment = {
            let semi = b.lit(";");
            let non_ascii = b.hex_range(0x80, 0x10FFFF);
            let text_char = b.alt([wsp, vchar, non_ascii]);
            let text = b.many(text_char);
            let end = b.alt([crlf, lf]);
            let body = b.seq([semi, text, end]);
            b.g.define("comment", body)
        };

        // c-nl = comment / CRLF / LF
        {
            let body = b.alt([comment, crlf, lf]);
            b.bind(c_nl, body);
        }

        // repeat = 1*DIGIT / (*DIGIT "*" *DIGIT)
        let repeat = {
            let exact = b.some(digit);
            let min = b.many(digit);
            let star = b.lit("*");
            let max = b.many(digit);
            let range = b.seq([min, star, max]);
            let body = b.alt([exact, range]);
            b.g.define("repeat", body)
        };

        // quoted-string = DQUOTE *(%x20-21 / %x23-7E) DQUOTE
        let quoted_string = {
            let low = b.hex_range(0x20, 0x21);
            let high = b.hex_range(0x23, 0x7E);
            let text_char = b.alt([low, high]);
            let text = b.many(text_char);
            let body = b.seq([dquote, text, dquote]);
            b.g.define("quoted-string", body)
        };

        // case-insensitive-string = [ "%i" ] quoted-string
        let insensitive = {
            let marker = b.lit("%i");
            let marker = b.opt(marker);
            let body = b.seq([marker, quoted_string]);
            b.g.define("case-insensitive-string", body)
        };

        // case-sensitive-string = "%s" quoted-string
        let sensitive = {
            let marker = b.lit("%s");
            let body = b.seq([marker, quoted_string]);
            b.g.define("case-sensitive-string", body)
        };

        // char-val = case-insensitive-string / case-sensitive-string
        let char_val = {
            let body = b.alt([insensitive, sensitive]);
            b.g.define("char-val", body)
        };

        // bin-val / dec-val / hex-val
        let bin_val = b.radix_val("bin-val", "b", bit);
        let dec_val = b.radix_val("dec-val", "d", digit);
        let hex_val = b.radix_val("hex-val", "x", hexdig);

        // num-val = "%" (bin-val / dec-val / hex-val)
        let num_val = {
            let percent = b.lit("%");
            let value = b.alt([bin_val, dec_val, hex_val]);
            let body = b.seq([percent, value]);
            b.g.define("num-val", body)
        };

        // prose-val = "<" *(%x20-3D / %x3F-7E) ">"
        let prose_val = {
            let open = b.lit("<");
            let low = b.hex_range(0x20, 0x3D);
            let high = b.hex_range(0x3F, 0x7E);
            let text_char = b.alt([low, high]);
            let text = b.many(text_char);
            let close = b.lit(">");
            let body = b.seq([open, text, close]);
            b.g.define("prose-val", body)
        };

        // group = "(" *c-wsp alternation *c-wsp ")"
        let group = b.bracketed("group", "(", alternation, ")", c_wsp);
        // option = "[" *c-wsp alternation *c-wsp "]"
        let option = b.bracketed("option", "[", alternation, "]", c_wsp);

        // element = rulename / group / option / char-val / num-val / prose-val
        let element = {
            let body = b.alt([rulename, group, option, char_val, num_val, prose_val]);
            b.g.define("element", body)
        };

        // repetition = [repeat] element
        let repetition = {
            let count = b.opt(repeat);
            let body = b.seq([count, element]);
            b.g.define("repetition", body)
        };

        // concatenation = repetition *(1*c-wsp repetition)
        let concatenation = {
            let gap = b.some(c_wsp);
            let next = b.seq([gap, repetition]);
            let rest = b.many(next);
            let body = b.seq([repetition, rest]);
            b.g.define("concatenation", body)
        };

        // alternation = concatenation *(*c-wsp "/" *c-wsp concatenation)
        {
            let before = b.many(c_wsp);
            let slash = b.lit("/");
            let after = b.many(c_wsp);
            let next = b.seq([before, slash, after, concatenation]);
            let rest = b.many(next);
            let body = b.seq([concatenation, rest]);
            b.bind(alternation, body);
        }

        // rule = rulename defined-as elements c-nl
        let rule = {
            let body = b.seq([rulename, defined_as, elements, c_nl]);
            b.g.define("rule", body)
        };

        // rulelist = 1*( rule / (*c-wsp c-nl) )
        let rulelist = {
            let gap = b.many(c_wsp);
            let blank = b.seq([gap, c_nl]);
            let line = b.alt([rule, blank]);
            let body = b.some(line);
            b.g.define("rulelist", body)
        };

        MetaGrammar {
            grammar: b.g,
            rulelist,
        }
    }
}

struct Builder {
    g: Grammar,
}

impl Builder {
    /// Quoted ABNF literal; case-insensitive.
    fn lit(&mut self, text: &str) -> RuleId {
        self.g.literal_ignore_case(text)
    }

    fn hex(&mut self, value: u32) -> RuleId {
        self.g.number(NumberValue::single(Radix::Hexadecimal, value))
    }

    fn hex_range(&mut self, start: u32, end: u32) -> RuleId {
        self.g.number(NumberValue::range(Radix::Hexadecimal, start, end))
    }

    fn seq<const N: usize>(&mut self, rules: [RuleId; N]) -> RuleId {
        self.g.conjunction(rules)
    }

    fn alt<const N: usize>(&mut self, rules: [RuleId; N]) -> RuleId {
        self.g.disjunction(rules)
    }

    fn opt(&mut self, rule: RuleId) -> RuleId {
        self.g.optional(rule)
    }

    fn many(&mut self, rule: RuleId) -> RuleId {
        self.g.repetition(rule, 0, None)
    }

    fn some(&mut self, rule: RuleId) -> RuleId {
        self.g.repetition(rule, 1, None)
    }

    fn bind(&mut self, stub: RuleId, body: RuleId) {
        self.g
            .bind(stub, body)
            .expect("meta grammar stubs are bound once");
    }

    /// `name = prefix 1*D [ 1*("." 1*D) / ("-" 1*D) ]`
    fn radix_val(&mut self, name: &str, prefix: &str, digit: RuleId) -> RuleId {
        let prefix = self.lit(prefix);
        let first = self.some(digit);

        let dot = self.lit(".");
        let dot_digits = self.some(digit);
        let dotted = self.seq([dot, dot_digits]);
        let list = self.some(dotted);

        let dash = self.lit("-");
        let dash_digits = self.some(digit);
        let range = self.seq([dash, dash_digits]);

        let tail = self.alt([list, range]);
        let tail = self.opt(tail);
        let body = self.seq([prefix, first, tail]);
        self.g.define(name, body)
    }

    /// `name = open *c-wsp inner *c-wsp close`
    fn bracketed(
        &mut self,
        name: &str,
        open: &str,
        inner: RuleId,
        close: &str,
        c_wsp: RuleId,
    ) -> RuleId {
        let open = self.lit(open);
        let before = self.many(c_wsp);
        let after = self.many(c_wsp);
        let close = self.lit(close);
        let body = self.seq([open, before, inner, after, close]);
        self.g.define(name, body)
    }
}
