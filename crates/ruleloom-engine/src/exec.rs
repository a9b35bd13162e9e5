//! Recursive-descent execution of a rule graph.
//!
//! `process` handles one rule activation: it charges fuel, opens a cursor
//! group and records the node watermark, dispatches on the rule variant, then
//! either closes the group (success) or reverts it and drops every node
//! allocated since the watermark (failure). The per-variant functions only
//! describe what a match is.

use ruleloom_core::{
    Grammar, NodeId, NonTerminal, NumberValue, ParseTree, Repetition, Rule, RuleId, Span,
    Terminal,
};

use crate::cursor::Cursor;
use crate::error::ParseError;
use crate::parser::FuelLimits;
use crate::trace::Tracer;

/// `Ok(None)` is an ordinary failed match; `Err` aborts the whole parse.
type Step = Result<Option<NodeId>, ParseError>;

pub(crate) struct Session<'g, 'i, 't, T: Tracer> {
    grammar: &'g Grammar,
    cursor: Cursor<'i>,
    tree: ParseTree,
    tracer: &'t mut T,
    limits: FuelLimits,
    exec_fuel: u32,
    /// Non-terminals currently being matched.
    recursion_depth: u32,
}

impl<'g, 'i, 't, T: Tracer> Session<'g, 'i, 't, T> {
    pub(crate) fn new(
        grammar: &'g Grammar,
        input: &'i str,
        limits: FuelLimits,
        tracer: &'t mut T,
    ) -> Self {
        Self {
            grammar,
            cursor: Cursor::new(input),
            tree: ParseTree::new(),
            tracer,
            limits,
            exec_fuel: limits.exec_fuel,
            recursion_depth: 0,
        }
    }

    pub(crate) fn finish(self) -> (Cursor<'i>, ParseTree) {
        (self.cursor, self.tree)
    }

    pub(crate) fn process(&mut self, id: RuleId) -> Step {
        if self.exec_fuel == 0 {
            return Err(ParseError::ExecFuelExhausted(self.limits.exec_fuel));
        }
        self.exec_fuel -= 1;

        let grammar = self.grammar;
        let start = self.cursor.offset();
        let watermark = self.tree.len();
        self.tracer.trace_enter(grammar, id, start);
        self.cursor.begin_group();

        let step = match grammar.rule(id) {
            Rule::Terminal(terminal) => Ok(self.terminal(terminal, start)),
            Rule::NumberValue(value) => Ok(self.number_value(value, start)),
            Rule::Conjunction(children) => self.conjunction(children, start),
            Rule::Disjunction(children) => self.disjunction(id, children, start),
            Rule::Optional(child) => self.optional(*child, start),
            Rule::Repetition(rep) => self.repetition(rep, start),
            Rule::NonTerminal(nt) => self.non_terminal(nt),
        };

        match step {
            Ok(Some(_)) => {
                self.cursor.end_group();
                let end = self.cursor.offset();
                let text = &self.cursor.input()[start..end];
                self.tracer
                    .trace_success(grammar, id, Span::new(start, end), text);
            }
            Ok(None) => {
                self.rollback(watermark);
                self.tracer.trace_failure(grammar, id, start);
            }
            Err(_) => {}
        }
        step
    }

    fn rollback(&mut self, watermark: usize) {
        self.cursor.revert();
        self.cursor.end_group();
        self.tree.truncate(watermark);
    }

    fn attach(&mut self, parent: NodeId, child: NodeId) {
        self.tree
            .push_child(parent, child)
            .expect("intermediate nodes accept children");
    }

    fn close(&mut self, node: NodeId, start: usize) -> Option<NodeId> {
        self.tree
            .set_span(node, Span::new(start, self.cursor.offset()));
        Some(node)
    }

    fn terminal(&mut self, terminal: &Terminal, start: usize) -> Option<NodeId> {
        let case_sensitive = terminal.is_case_sensitive();
        let matched = terminal.candidates().iter().any(|candidate| {
            if case_sensitive {
                self.cursor.consume(candidate)
            } else {
                self.cursor.consume_ignore_case(candidate)
            }
        });
        if !matched {
            return None;
        }
        let end = self.cursor.offset();
        let text = &self.cursor.input()[start..end];
        Some(self.tree.terminal(text, Span::new(start, end)))
    }

    fn number_value(&mut self, value: &NumberValue, start: usize) -> Option<NodeId> {
        let c = self.cursor.consume_char_if(|c| value.matches(c))?;
        let span = Span::new(start, self.cursor.offset());
        Some(self.tree.terminal(c.to_string(), span))
    }

    /// All children in order, or nothing.
    fn conjunction(&mut self, children: &[RuleId], start: usize) -> Step {
        let node = self.tree.intermediate(Span::empty(start));
        for &child in children {
            let Some(matched) = self.process(child)? else {
                return Ok(None);
            };
            self.attach(node, matched);
        }
        Ok(self.close(node, start))
    }

    /// Try every alternative, then commit the one that consumed the most.
    /// Ties keep the earliest alternative.
    fn disjunction(&mut self, id: RuleId, children: &[RuleId], start: usize) -> Step {
        let mut best: Option<(usize, usize)> = None;
        for (index, &child) in children.iter().enumerate() {
            let watermark = self.tree.len();
            self.cursor.begin_group();
            let matched = self.process(child)?.is_some();
            let consumed = self.cursor.group_consumed();
            self.rollback(watermark);

            if matched {
                self.tracer.trace_backtrack(start + consumed, start);
                if best.is_none_or(|(_, most)| consumed > most) {
                    best = Some((index, consumed));
                }
            }
        }

        let Some((winner, consumed)) = best else {
            return Ok(None);
        };
        self.tracer.trace_commit(self.grammar, id, winner, consumed);

        let Some(matched) = self.process(children[winner])? else {
            return Ok(None);
        };
        let node = self.tree.intermediate(Span::empty(start));
        self.attach(node, matched);
        Ok(self.close(node, start))
    }

    /// Never fails; the node is empty when the child does not match.
    fn optional(&mut self, child: RuleId, start: usize) -> Step {
        let node = self.tree.intermediate(Span::empty(start));
        if let Some(matched) = self.process(child)? {
            self.attach(node, matched);
        }
        Ok(self.close(node, start))
    }

    /// Greedy: as many matches as possible up to `max`, no giving back.
    fn repetition(&mut self, rep: &Repetition, start: usize) -> Step {
        let node = self.tree.intermediate(Span::empty(start));
        let mut count = 0u32;
        while rep.max.is_none_or(|max| count < max) {
            let before = self.cursor.offset();
            let Some(matched) = self.process(rep.rule)? else {
                break;
            };
            self.attach(node, matched);
            count += 1;
            // An empty match would repeat forever.
            if self.cursor.offset() == before && count >= rep.min {
                break;
            }
        }
        if count < rep.min {
            return Ok(None);
        }
        Ok(self.close(node, start))
    }

    fn non_terminal(&mut self, nt: &NonTerminal) -> Step {
        let body = nt.body().ok_or_else(|| ParseError::Unbound {
            name: nt.name().to_owned(),
        })?;
        if self.recursion_depth >= self.limits.recursion_limit {
            return Err(ParseError::RecursionLimitExceeded(self.limits.recursion_limit));
        }
        self.recursion_depth += 1;
        let step = self.process(body);
        self.recursion_depth -= 1;

        let Some(matched) = step? else {
            return Ok(None);
        };
        Ok(Some(self.tree.wrap_named(matched, nt.name())))
    }
}
