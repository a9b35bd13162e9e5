//! Cycle-safe traversal over rule graphs and parse trees.
//!
//! Every whole-graph operation carries a [`Tracker`] with one of two
//! disciplines:
//!
//! - **Active path**: an id is on the path while its subtree is being
//!   computed. Meeting it again is a cycle, which the caller either tolerates
//!   (equality, hashing, interpretation) or rejects ([`CyclePolicy::Forbid`]).
//! - **Visited once**: an id is recorded when it is finished. Meeting it
//!   again afterwards is [`Visit::Seen`], not an error; the caller skips it
//!   or emits a short reference.
//!
//! Membership is a bitset over arena indices.
//!
//! # Usage
//!
//! Implement [`RuleVisitor`] and override `visit_*` hooks. Call the matching
//! `walk_*` function inside an override to continue the recursion (or omit it
//! to stop).
//!
//! ```ignore
//! impl<'g> RuleVisitor<'g> for MyPass<'g> {
//!     fn visit_non_terminal(&mut self, id: RuleId, nt: &'g NonTerminal) -> Result<(), GraphError> {
//!         // pre-order logic
//!         walk_non_terminal(self, nt)
//!     }
//! }
//! ```

use crate::rule::{NonTerminal, NumberValue, Repetition, Rule, RuleId, Terminal};
use crate::{Grammar, GraphError, NodeId};

/// Arena handle usable as a bitset index.
pub trait ArenaId: Copy + Eq + std::fmt::Debug {
    fn arena_index(self) -> usize;
}

impl ArenaId for RuleId {
    #[inline]
    fn arena_index(self) -> usize {
        self.as_u32() as usize
    }
}

impl ArenaId for NodeId {
    #[inline]
    fn arena_index(self) -> usize {
        self.as_u32() as usize
    }
}

/// What to do when an active-path traversal re-enters an id.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CyclePolicy {
    /// Stop descending; the caller decides the value.
    Tolerate,
    /// Fail with [`GraphError::CyclicGraph`].
    Forbid,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Discipline {
    ActivePath,
    VisitedOnce,
}

/// Outcome of [`Tracker::enter`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Visit {
    /// First time on this path; the caller must call `leave` when done.
    Enter,
    /// Already on the active path.
    Cycle,
    /// Finished earlier (visited-once discipline only).
    Seen,
}

#[derive(Debug, Clone, Default)]
struct BitSet {
    words: Vec<u64>,
}

impl BitSet {
    fn contains(&self, index: usize) -> bool {
        self.words
            .get(index / 64)
            .is_some_and(|w| w & (1u64 << (index % 64)) != 0)
    }

    fn insert(&mut self, index: usize) {
        let word = index / 64;
        if word >= self.words.len() {
            self.words.resize(word + 1, 0);
        }
        self.words[word] |= 1u64 << (index % 64);
    }

    fn remove(&mut self, index: usize) {
        if let Some(w) = self.words.get_mut(index / 64) {
            *w &= !(1u64 << (index % 64));
        }
    }
}

/// Per-traversal identity tracking.
#[derive(Debug, Clone)]
pub struct Tracker<I> {
    discipline: Discipline,
    policy: CyclePolicy,
    active: BitSet,
    done: BitSet,
    path: Vec<I>,
}

impl<I: ArenaId> Tracker<I> {
    pub fn active_path(policy: CyclePolicy) -> Self {
        Self {
            discipline: Discipline::ActivePath,
            policy,
            active: BitSet::default(),
            done: BitSet::default(),
            path: Vec::new(),
        }
    }

    /// Dedup tracker. Cycles met before an id finishes are tolerated.
    pub fn visited_once() -> Self {
        Self {
            discipline: Discipline::VisitedOnce,
            policy: CyclePolicy::Tolerate,
            active: BitSet::default(),
            done: BitSet::default(),
            path: Vec::new(),
        }
    }

    pub fn enter(&mut self, id: I) -> Visit {
        let index = id.arena_index();
        if self.active.contains(index) {
            return Visit::Cycle;
        }
        if self.discipline == Discipline::VisitedOnce && self.done.contains(index) {
            return Visit::Seen;
        }
        self.active.insert(index);
        self.path.push(id);
        Visit::Enter
    }

    /// Pop `id` off the active path. Must pair with an `Enter`.
    pub fn leave(&mut self, id: I) {
        let popped = self.path.pop();
        debug_assert_eq!(popped, Some(id), "Tracker: unbalanced leave");
        let index = id.arena_index();
        self.active.remove(index);
        if self.discipline == Discipline::VisitedOnce {
            self.done.insert(index);
        }
    }

    pub fn is_active(&self, id: I) -> bool {
        self.active.contains(id.arena_index())
    }

    pub fn is_done(&self, id: I) -> bool {
        self.done.contains(id.arena_index())
    }

    /// Ids currently being computed, outermost first.
    pub fn path(&self) -> &[I] {
        &self.path
    }

    pub fn depth(&self) -> usize {
        self.path.len()
    }

    pub fn discipline(&self) -> Discipline {
        self.discipline
    }

    pub fn forbids_cycles(&self) -> bool {
        self.policy == CyclePolicy::Forbid
    }
}

/// Recursive dispatch over a rule graph.
pub trait RuleVisitor<'g>: Sized {
    fn grammar(&self) -> &'g Grammar;

    fn tracker(&mut self) -> &mut Tracker<RuleId>;

    fn visit_rule(&mut self, id: RuleId) -> Result<(), GraphError> {
        walk_rule(self, id)
    }

    fn visit_terminal(&mut self, _id: RuleId, _terminal: &'g Terminal) -> Result<(), GraphError> {
        Ok(())
    }

    fn visit_number_value(
        &mut self,
        _id: RuleId,
        _value: &'g NumberValue,
    ) -> Result<(), GraphError> {
        Ok(())
    }

    fn visit_conjunction(&mut self, _id: RuleId, children: &'g [RuleId]) -> Result<(), GraphError> {
        walk_children(self, children)
    }

    fn visit_disjunction(&mut self, _id: RuleId, children: &'g [RuleId]) -> Result<(), GraphError> {
        walk_children(self, children)
    }

    fn visit_optional(&mut self, _id: RuleId, child: RuleId) -> Result<(), GraphError> {
        self.visit_rule(child)
    }

    fn visit_repetition(&mut self, _id: RuleId, rep: &'g Repetition) -> Result<(), GraphError> {
        self.visit_rule(rep.rule)
    }

    fn visit_non_terminal(&mut self, _id: RuleId, nt: &'g NonTerminal) -> Result<(), GraphError> {
        walk_non_terminal(self, nt)
    }

    /// Re-entry of an id on the active path (tolerated cycles only).
    fn visit_cycle(&mut self, _id: RuleId) -> Result<(), GraphError> {
        Ok(())
    }

    /// Second encounter of a finished id (visited-once only).
    fn visit_seen(&mut self, _id: RuleId) -> Result<(), GraphError> {
        Ok(())
    }
}

pub fn walk_rule<'g, V: RuleVisitor<'g>>(visitor: &mut V, id: RuleId) -> Result<(), GraphError> {
    match visitor.tracker().enter(id) {
        Visit::Enter => {}
        Visit::Seen => return visitor.visit_seen(id),
        Visit::Cycle => {
            if visitor.tracker().forbids_cycles() {
                return Err(GraphError::CyclicGraph {
                    rule: visitor.grammar().label(id),
                });
            }
            return visitor.visit_cycle(id);
        }
    }

    let grammar = visitor.grammar();
    let result = match grammar.rule(id) {
        Rule::Terminal(terminal) => visitor.visit_terminal(id, terminal),
        Rule::NumberValue(value) => visitor.visit_number_value(id, value),
        Rule::Conjunction(children) => visitor.visit_conjunction(id, children),
        Rule::Disjunction(children) => visitor.visit_disjunction(id, children),
        Rule::Optional(child) => visitor.visit_optional(id, *child),
        Rule::Repetition(rep) => visitor.visit_repetition(id, rep),
        Rule::NonTerminal(nt) => visitor.visit_non_terminal(id, nt),
    };
    visitor.tracker().leave(id);
    result
}

pub fn walk_children<'g, V: RuleVisitor<'g>>(
    visitor: &mut V,
    children: &[RuleId],
) -> Result<(), GraphError> {
    for &child in children {
        visitor.visit_rule(child)?;
    }
    Ok(())
}

/// Descend into the body; a stub has nothing to walk.
pub fn walk_non_terminal<'g, V: RuleVisitor<'g>>(
    visitor: &mut V,
    nt: &NonTerminal,
) -> Result<(), GraphError> {
    match nt.body() {
        Some(body) => visitor.visit_rule(body),
        None => Ok(()),
    }
}
