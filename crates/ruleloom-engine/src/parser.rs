//! Parser entry points and runtime limits.

use ruleloom_core::{Grammar, ParseTree, Rule, RuleId};

use crate::error::ParseError;
use crate::exec::Session;
use crate::trace::{NoopTracer, Tracer};

/// Runtime limits for a parse.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FuelLimits {
    /// Maximum total rule activations (default: 10,000,000).
    pub(crate) exec_fuel: u32,
    /// Maximum nested non-terminals (default: 1024).
    pub(crate) recursion_limit: u32,
}

impl Default for FuelLimits {
    fn default() -> Self {
        Self {
            exec_fuel: 10_000_000,
            recursion_limit: 1024,
        }
    }
}

impl FuelLimits {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn exec_fuel(mut self, fuel: u32) -> Self {
        self.exec_fuel = fuel;
        self
    }

    pub fn recursion_limit(mut self, limit: u32) -> Self {
        self.recursion_limit = limit;
        self
    }

    pub fn get_exec_fuel(&self) -> u32 {
        self.exec_fuel
    }
    pub fn get_recursion_limit(&self) -> u32 {
        self.recursion_limit
    }
}

/// Parses input against a grammar. Cheap to copy; holds no per-parse state.
#[derive(Clone, Copy, Debug)]
pub struct Parser<'g> {
    grammar: &'g Grammar,
    limits: FuelLimits,
}

/// Builder for [`Parser`].
pub struct ParserBuilder<'g> {
    grammar: &'g Grammar,
    limits: FuelLimits,
}

impl<'g> ParserBuilder<'g> {
    pub fn new(grammar: &'g Grammar) -> Self {
        Self {
            grammar,
            limits: FuelLimits::default(),
        }
    }

    pub fn limits(mut self, limits: FuelLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn exec_fuel(mut self, fuel: u32) -> Self {
        self.limits = self.limits.exec_fuel(fuel);
        self
    }

    pub fn recursion_limit(mut self, limit: u32) -> Self {
        self.limits = self.limits.recursion_limit(limit);
        self
    }

    pub fn build(self) -> Parser<'g> {
        Parser {
            grammar: self.grammar,
            limits: self.limits,
        }
    }
}

impl<'g> Parser<'g> {
    pub fn new(grammar: &'g Grammar) -> Self {
        Self::builder(grammar).build()
    }

    pub fn builder(grammar: &'g Grammar) -> ParserBuilder<'g> {
        ParserBuilder::new(grammar)
    }

    pub fn grammar(&self) -> &'g Grammar {
        self.grammar
    }

    pub fn limits(&self) -> FuelLimits {
        self.limits
    }

    /// Parse the whole of `input` as `root`.
    ///
    /// `root` must be a `NonTerminal`. Input left over after the root matches
    /// is an error, not a partial result.
    pub fn parse(&self, input: &str, root: RuleId) -> Result<ParseTree, ParseError> {
        self.parse_with(input, root, &mut NoopTracer)
    }

    /// [`Parser::parse`] with instrumentation.
    pub fn parse_with<T: Tracer>(
        &self,
        input: &str,
        root: RuleId,
        tracer: &mut T,
    ) -> Result<ParseTree, ParseError> {
        let rule = match self.grammar.rule(root) {
            Rule::NonTerminal(nt) => nt.name().to_owned(),
            other => {
                return Err(ParseError::RootNotNonTerminal {
                    kind: other.kind_name(),
                });
            }
        };

        let mut session = Session::new(self.grammar, input, self.limits, tracer);
        let matched = session.process(root)?;
        let (cursor, mut tree) = session.finish();

        let Some(node) = matched else {
            return Err(ParseError::NoMatch {
                rule,
                furthest: cursor.furthest(),
            });
        };
        if !cursor.is_at_end() {
            return Err(ParseError::TrailingInput {
                rule,
                offset: cursor.offset(),
                furthest: cursor.furthest(),
            });
        }

        tree.set_root(node);
        Ok(tree)
    }
}

/// Parse `input` as `root` with default limits.
pub fn parse(grammar: &Grammar, input: &str, root: RuleId) -> Result<ParseTree, ParseError> {
    Parser::new(grammar).parse(input, root)
}
