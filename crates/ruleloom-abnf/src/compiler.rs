//! ABNF text to rule graph.

use indexmap::IndexMap;
use ruleloom_core::{Grammar, GraphError, ParseTree, RuleId};
use ruleloom_engine::{FuelLimits, Parser};
use serde::{Deserialize, Serialize};

use crate::error::AbnfError;
use crate::interpret::{Definitions, parse_rulelist, rule_key};
use crate::resolve::resolve;

/// Compiles ABNF grammar text.
#[derive(Clone, Copy, Debug)]
pub struct AbnfCompiler {
    core_rules: bool,
    limits: FuelLimits,
}

impl Default for AbnfCompiler {
    fn default() -> Self {
        Self {
            core_rules: true,
            limits: FuelLimits::default(),
        }
    }
}

impl AbnfCompiler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Import RFC 5234 core rules (`ALPHA`, `DIGIT`, ...) when referenced but
    /// not defined. On by default.
    pub fn core_rules(mut self, value: bool) -> Self {
        self.core_rules = value;
        self
    }

    /// Limits for parsing the grammar text itself.
    pub fn limits(mut self, limits: FuelLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn compile(&self, text: &str) -> Result<AbnfGrammar, AbnfError> {
        let tree = parse_rulelist(text, self.limits)?;
        let mut defs = Definitions::new();
        defs.rulelist(&tree)?;
        if defs.defined().next().is_none() {
            return Err(AbnfError::NoRules);
        }

        let defs = resolve(defs, self.core_rules)?;
        let rules = defs
            .defined()
            .map(|(key, stub)| (key.to_owned(), stub))
            .collect();
        Ok(AbnfGrammar {
            grammar: defs.grammar,
            rules,
        })
    }
}

/// Compile ABNF text with default settings.
pub fn compile(text: &str) -> Result<AbnfGrammar, AbnfError> {
    AbnfCompiler::new().compile(text)
}

/// A compiled ABNF grammar: the rule graph plus its named entry points.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "RawAbnfGrammar")]
pub struct AbnfGrammar {
    grammar: Grammar,
    /// Lower-cased name to non-terminal, in order of first definition.
    /// Imported core rules follow the rules of the text.
    rules: IndexMap<String, RuleId>,
}

#[derive(Deserialize)]
pub struct RawAbnfGrammar {
    grammar: Grammar,
    rules: IndexMap<String, RuleId>,
}

impl TryFrom<RawAbnfGrammar> for AbnfGrammar {
    type Error = GraphError;

    /// Every named entry must be a non-terminal of the decoded grammar.
    fn try_from(raw: RawAbnfGrammar) -> Result<Self, GraphError> {
        for &id in raw.rules.values() {
            raw.grammar.checked_non_terminal(id)?;
        }
        Ok(Self {
            grammar: raw.grammar,
            rules: raw.rules,
        })
    }
}

impl AbnfGrammar {
    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    /// Non-terminal for `name`, ignoring case.
    pub fn rule(&self, name: &str) -> Option<RuleId> {
        self.rules.get(&rule_key(name)).copied()
    }

    /// The first rule defined in the text.
    pub fn start(&self) -> Option<RuleId> {
        self.rules.values().next().copied()
    }

    /// Rule names as first spelled, in definition order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.rules
            .values()
            .filter_map(|&id| self.grammar.name(id))
    }

    /// Parse `input` as the first defined rule.
    pub fn parse(&self, input: &str) -> Result<ParseTree, AbnfError> {
        let root = self.start().ok_or(AbnfError::NoRules)?;
        Parser::new(&self.grammar)
            .parse(input, root)
            .map_err(AbnfError::Input)
    }

    /// Parse `input` as the rule called `name`.
    pub fn parse_rule(&self, name: &str, input: &str) -> Result<ParseTree, AbnfError> {
        let root = self.rule(name).ok_or_else(|| AbnfError::UnknownRule {
            name: name.to_owned(),
        })?;
        Parser::new(&self.grammar)
            .parse(input, root)
            .map_err(AbnfError::Input)
    }

    /// Listing of every rule with its comment.
    pub fn dump(&self) -> String {
        let roots: Vec<RuleId> = self.rules.values().copied().collect();
        self.grammar.printer_for(&roots).with_comments(true).dump()
    }
}
