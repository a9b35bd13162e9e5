//! RFC 5234 Appendix B core rules, imported on demand.

use std::sync::LazyLock;

use indexmap::IndexMap;
use ruleloom_core::{NodeId, ParseTree};
use ruleloom_engine::FuelLimits;

use crate::interpret::{parse_rulelist, rule_key};

pub(crate) const CORE_RULES: &str = r#"ALPHA          =  %x41-5A / %x61-7A   ; A-Z / a-z

BIT            =  "0" / "1"

CHAR           =  %x01-7F
                       ; any 7-bit US-ASCII character,
                       ;  excluding NUL

CR             =  %x0D
                       ; carriage return

CRLF           =  CR LF
                       ; Internet standard newline

CTL            =  %x00-1F / %x7F
                       ; controls

DIGIT          =  %x30-39
                       ; 0-9

DQUOTE         =  %x22
                       ; " (Double Quote)

HEXDIG         =  DIGIT / "A" / "B" / "C" / "D" / "E" / "F"

HTAB           =  %x09
                       ; horizontal tab

LF             =  %x0A
                       ; linefeed

LWSP           =  *(WSP / CRLF WSP)
                       ; Use of this linear-white-space rule
                       ;  permits lines containing only white
                       ;  space that are no longer legal in
                       ;  mail headers and have caused
                       ;  interoperability problems in other
                       ;  contexts.
                       ; Do not use when defining mail
                       ;  headers and use with caution in
                       ;  other contexts.

OCTET          =  %x00-FF
                       ; 8 bits of data

SP             =  %x20

VCHAR          =  %x21-7E
                       ; visible (printing) characters

WSP            =  SP / HTAB
                       ; white space
"#;

/// Parsed core rules, keyed by [`rule_key`].
pub(crate) struct CoreRules {
    pub(crate) tree: ParseTree,
    rules: IndexMap<String, NodeId>,
}

static CORE: LazyLock<CoreRules> = LazyLock::new(|| {
    let tree = parse_rulelist(CORE_RULES, FuelLimits::default())
        .expect("core rules are valid ABNF");
    let mut rules = IndexMap::new();
    if let Some(root) = tree.root() {
        for &child in tree.children(root) {
            if tree.node(child).name() != Some("rule") {
                continue;
            }
            let name = tree
                .children(child)
                .first()
                .map(|&name| tree.text(name))
                .unwrap_or_default();
            rules.insert(rule_key(&name), child);
        }
    }
    CoreRules { tree, rules }
});

pub(crate) fn core_rules() -> &'static CoreRules {
    &CORE
}

impl CoreRules {
    /// `rule` node defining `key`.
    pub(crate) fn find(&self, key: &str) -> Option<NodeId> {
        self.rules.get(key).copied()
    }
}
