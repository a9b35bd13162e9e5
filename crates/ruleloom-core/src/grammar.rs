//! Rule arena.
//!
//! A [`Grammar`] owns every rule; rules refer to each other by [`RuleId`].
//! The arena is append-only. The only mutation after construction is the
//! one-time binding of a `NonTerminal` stub to its body.

use serde::{Deserialize, Serialize};

use crate::GraphError;
use crate::rule::{NonTerminal, NumberValue, Repetition, Rule, RuleId, Terminal};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(try_from = "RawGrammar")]
pub struct Grammar {
    rules: Vec<Rule>,
}

/// Decoded arena whose handles have not been checked yet.
#[derive(Deserialize)]
pub struct RawGrammar {
    rules: Vec<Rule>,
}

impl TryFrom<RawGrammar> for Grammar {
    type Error = GraphError;

    fn try_from(raw: RawGrammar) -> Result<Self, GraphError> {
        let grammar = Grammar { rules: raw.rules };
        grammar.validate()?;
        Ok(grammar)
    }
}

impl Grammar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a rule, returning its handle.
    pub fn add(&mut self, rule: Rule) -> RuleId {
        let id = RuleId::from_raw(self.rules.len() as u32);
        self.rules.push(rule);
        id
    }

    pub fn terminal(&mut self, terminal: Terminal) -> RuleId {
        self.add(Rule::Terminal(terminal))
    }

    /// Case-sensitive single literal.
    pub fn literal(&mut self, text: impl Into<String>) -> RuleId {
        self.terminal(Terminal::new([text.into()]))
    }

    /// Case-insensitive single literal.
    pub fn literal_ignore_case(&mut self, text: impl Into<String>) -> RuleId {
        self.terminal(Terminal::ignore_case([text.into()]))
    }

    pub fn number(&mut self, value: NumberValue) -> RuleId {
        self.add(Rule::NumberValue(value))
    }

    pub fn conjunction(&mut self, children: impl IntoIterator<Item = RuleId>) -> RuleId {
        self.add(Rule::Conjunction(children.into_iter().collect()))
    }

    pub fn disjunction(&mut self, children: impl IntoIterator<Item = RuleId>) -> RuleId {
        self.add(Rule::Disjunction(children.into_iter().collect()))
    }

    pub fn optional(&mut self, child: RuleId) -> RuleId {
        self.add(Rule::Optional(child))
    }

    pub fn repetition(&mut self, child: RuleId, min: u32, max: Option<u32>) -> RuleId {
        self.add(Rule::Repetition(Repetition {
            rule: child,
            min,
            max,
        }))
    }

    /// Forward-declared non-terminal with no body yet.
    pub fn non_terminal(&mut self, name: impl Into<String>) -> RuleId {
        self.add(Rule::NonTerminal(NonTerminal {
            name: name.into(),
            comment: None,
            body: None,
        }))
    }

    pub fn non_terminal_with_comment(
        &mut self,
        name: impl Into<String>,
        comment: impl Into<String>,
    ) -> RuleId {
        self.add(Rule::NonTerminal(NonTerminal {
            name: name.into(),
            comment: Some(comment.into()),
            body: None,
        }))
    }

    /// Declare and bind a non-terminal in one step.
    pub fn define(&mut self, name: impl Into<String>, body: RuleId) -> RuleId {
        self.ensure_rule(body);
        self.add(Rule::NonTerminal(NonTerminal {
            name: name.into(),
            comment: None,
            body: Some(body),
        }))
    }

    /// Bind a stub to its body. A non-terminal can be bound once.
    pub fn bind(&mut self, non_terminal: RuleId, body: RuleId) -> Result<(), GraphError> {
        self.bind_with_comment(non_terminal, body, None)
    }

    /// Bind a stub, replacing its comment when one is given.
    pub fn bind_with_comment(
        &mut self,
        non_terminal: RuleId,
        body: RuleId,
        comment: Option<String>,
    ) -> Result<(), GraphError> {
        self.ensure_rule(body);
        match self.ensure_rule_mut(non_terminal) {
            Rule::NonTerminal(nt) => {
                if nt.body.is_some() {
                    return Err(GraphError::AlreadyBound {
                        name: nt.name.clone(),
                    });
                }
                nt.body = Some(body);
                if comment.is_some() {
                    nt.comment = comment;
                }
                Ok(())
            }
            other => Err(GraphError::NotNonTerminal {
                kind: other.kind_name(),
            }),
        }
    }

    /// Append a child to a `Conjunction` or `Disjunction`.
    pub fn push_child(&mut self, parent: RuleId, child: RuleId) -> Result<(), GraphError> {
        self.ensure_rule(child);
        match self.ensure_rule_mut(parent) {
            Rule::Conjunction(children) | Rule::Disjunction(children) => {
                children.push(child);
                Ok(())
            }
            leaf @ (Rule::Terminal(_) | Rule::NumberValue(_)) => Err(GraphError::LeafRule {
                kind: leaf.kind_name(),
            }),
            other => Err(GraphError::SingleChild {
                kind: other.kind_name(),
            }),
        }
    }

    /// Body of a non-terminal, failing on an unbound stub.
    pub fn body(&self, non_terminal: RuleId) -> Result<RuleId, GraphError> {
        match self.ensure_rule(non_terminal) {
            Rule::NonTerminal(nt) => nt.body.ok_or_else(|| GraphError::Unbound {
                name: nt.name.clone(),
            }),
            other => Err(GraphError::NotNonTerminal {
                kind: other.kind_name(),
            }),
        }
    }

    /// # Panics
    /// Panics if `id` was not created by this grammar.
    #[inline]
    pub fn rule(&self, id: RuleId) -> &Rule {
        self.ensure_rule(id)
    }

    #[inline]
    pub fn get(&self, id: RuleId) -> Option<&Rule> {
        self.rules.get(id.index())
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, id: RuleId) -> Option<&mut Rule> {
        self.rules.get_mut(id.index())
    }

    /// The non-terminal at `id`, for handles that come from outside the arena.
    pub fn checked_non_terminal(&self, id: RuleId) -> Result<&NonTerminal, GraphError> {
        match self.get(id) {
            Some(Rule::NonTerminal(nt)) => Ok(nt),
            Some(other) => Err(GraphError::NotNonTerminal {
                kind: other.kind_name(),
            }),
            None => Err(GraphError::DanglingHandle {
                index: id.as_u32(),
            }),
        }
    }

    /// Name of a non-terminal, `None` for anonymous rules.
    pub fn name(&self, id: RuleId) -> Option<&str> {
        self.get(id)
            .and_then(Rule::as_non_terminal)
            .map(NonTerminal::name)
    }

    /// Human-readable label: the name of a non-terminal, otherwise `Kind#index`.
    pub fn label(&self, id: RuleId) -> String {
        match self.get(id) {
            Some(Rule::NonTerminal(nt)) => nt.name.clone(),
            Some(rule) => format!("{}#{}", rule.kind_name(), id.as_u32()),
            None => format!("#{}", id.as_u32()),
        }
    }

    /// First non-terminal with the given name (exact match).
    pub fn find(&self, name: &str) -> Option<RuleId> {
        self.iter()
            .find(|(_, rule)| rule.as_non_terminal().is_some_and(|nt| nt.name == name))
            .map(|(id, _)| id)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (RuleId, &Rule)> {
        self.rules
            .iter()
            .enumerate()
            .map(|(i, rule)| (RuleId::from_raw(i as u32), rule))
    }

    /// Check that every stored handle points into this arena.
    pub fn validate(&self) -> Result<(), GraphError> {
        for (_, rule) in self.iter() {
            for child in rule.children() {
                if self.get(child).is_none() {
                    return Err(GraphError::DanglingHandle {
                        index: child.as_u32(),
                    });
                }
            }
        }
        Ok(())
    }
}
