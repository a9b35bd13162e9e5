//! Whole-graph queries over a rule graph.

use indexmap::IndexSet;

use crate::rule::{NonTerminal, Rule, RuleId, Terminal};
use crate::traverse::{CyclePolicy, RuleVisitor, Tracker, walk_non_terminal};
use crate::{Grammar, GraphError};

impl Grammar {
    /// Every literal reachable from `roots`, in discovery order.
    pub fn terminals(&self, roots: &[RuleId]) -> IndexSet<String> {
        let mut collector = Collector::new(self);
        collector.walk_roots(roots);
        collector.terminals
    }

    /// Non-terminals reachable from `roots`, in discovery order.
    pub fn non_terminals(&self, roots: &[RuleId]) -> Vec<RuleId> {
        let mut collector = Collector::new(self);
        collector.walk_roots(roots);
        collector.non_terminals.into_iter().collect()
    }

    /// Reachable non-terminals that have no body yet.
    pub fn unbound(&self, roots: &[RuleId]) -> Vec<RuleId> {
        self.non_terminals(roots)
            .into_iter()
            .filter(|&id| matches!(self.rule(id), Rule::NonTerminal(nt) if !nt.is_bound()))
            .collect()
    }

    /// Fail with [`GraphError::CyclicGraph`] if `root` reaches itself.
    pub fn check_acyclic(&self, root: RuleId) -> Result<(), GraphError> {
        let mut checker = AcyclicChecker {
            grammar: self,
            tracker: Tracker::active_path(CyclePolicy::Forbid),
        };
        checker.visit_rule(root)
    }
}

struct Collector<'g> {
    grammar: &'g Grammar,
    tracker: Tracker<RuleId>,
    terminals: IndexSet<String>,
    non_terminals: IndexSet<RuleId>,
}

impl<'g> Collector<'g> {
    fn new(grammar: &'g Grammar) -> Self {
        Self {
            grammar,
            tracker: Tracker::visited_once(),
            terminals: IndexSet::new(),
            non_terminals: IndexSet::new(),
        }
    }

    fn walk_roots(&mut self, roots: &[RuleId]) {
        for &root in roots {
            // Visited-once walks tolerate cycles.
            let _ = self.visit_rule(root);
        }
    }
}

impl<'g> RuleVisitor<'g> for Collector<'g> {
    fn grammar(&self) -> &'g Grammar {
        self.grammar
    }

    fn tracker(&mut self) -> &mut Tracker<RuleId> {
        &mut self.tracker
    }

    fn visit_terminal(&mut self, _id: RuleId, terminal: &'g Terminal) -> Result<(), GraphError> {
        self.terminals.extend(terminal.candidates().iter().cloned());
        Ok(())
    }

    fn visit_non_terminal(&mut self, id: RuleId, nt: &'g NonTerminal) -> Result<(), GraphError> {
        self.non_terminals.insert(id);
        walk_non_terminal(self, nt)
    }
}

struct AcyclicChecker<'g> {
    grammar: &'g Grammar,
    tracker: Tracker<RuleId>,
}

impl<'g> RuleVisitor<'g> for AcyclicChecker<'g> {
    fn grammar(&self) -> &'g Grammar {
        self.grammar
    }

    fn tracker(&mut self) -> &mut Tracker<RuleId> {
        &mut self.tracker
    }
}
