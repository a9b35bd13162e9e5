//! Structural equality and hashing.
//!
//! Both graphs are compared by shape, never by handle. Comments and spans do
//! not participate.
//!
//! Equality walks the two graphs in lock step with an active-path tracker on
//! the left-hand side. Re-entering an active rule answers `true`, so two
//! independently built self-referential grammars of the same shape compare
//! equal and the walk terminates. Two different cyclic shapes that agree up
//! to their first cycle entry also compare equal.
//!
//! Rule hashing descends into the body of the root non-terminal only. Any
//! other non-terminal contributes its name, which keeps hashes consistent
//! with equality when the graph is cyclic.

use std::fmt;
use std::hash::{Hash, Hasher};

use crate::rule::{NonTerminal, NumberValue, Repetition, Rule, RuleId, Terminal};
use crate::traverse::{CyclePolicy, RuleVisitor, Tracker, Visit, walk_children, walk_non_terminal};
use crate::{Grammar, GraphError, Node, NodeId, ParseTree};

/// A rule viewed through its grammar, compared by shape.
#[derive(Clone, Copy)]
pub struct RuleRef<'g> {
    pub grammar: &'g Grammar,
    pub id: RuleId,
}

/// A node viewed through its tree, compared by shape.
#[derive(Clone, Copy)]
pub struct NodeRef<'t> {
    pub tree: &'t ParseTree,
    pub id: NodeId,
}

impl Grammar {
    pub fn view(&self, id: RuleId) -> RuleRef<'_> {
        self.ensure_rule(id);
        RuleRef { grammar: self, id }
    }
}

impl ParseTree {
    pub fn view(&self, id: NodeId) -> NodeRef<'_> {
        self.ensure_node(id);
        NodeRef { tree: self, id }
    }
}

impl fmt::Debug for RuleRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RuleRef({})", self.grammar.label(self.id))
    }
}

impl fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let node = self.tree.node(self.id);
        match node.name() {
            Some(name) => write!(f, "NodeRef({name})"),
            None => write!(f, "NodeRef({}#{})", node.kind_name(), self.id.as_u32()),
        }
    }
}

impl PartialEq for RuleRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        let mut tracker = Tracker::active_path(CyclePolicy::Tolerate);
        rules_eq(self.grammar, self.id, other.grammar, other.id, &mut tracker)
    }
}

impl Eq for RuleRef<'_> {}

fn rules_eq(
    left: &Grammar,
    a: RuleId,
    right: &Grammar,
    b: RuleId,
    tracker: &mut Tracker<RuleId>,
) -> bool {
    if tracker.enter(a) != Visit::Enter {
        return true;
    }

    let all_eq = |xs: &[RuleId], ys: &[RuleId], tracker: &mut Tracker<RuleId>| {
        xs.len() == ys.len()
            && xs
                .iter()
                .zip(ys)
                .all(|(&x, &y)| rules_eq(left, x, right, y, tracker))
    };

    let result = match (left.rule(a), right.rule(b)) {
        (Rule::Terminal(x), Rule::Terminal(y)) => x == y,
        (Rule::NumberValue(x), Rule::NumberValue(y)) => x == y,
        (Rule::Conjunction(xs), Rule::Conjunction(ys))
        | (Rule::Disjunction(xs), Rule::Disjunction(ys)) => all_eq(xs, ys, tracker),
        (Rule::Optional(x), Rule::Optional(y)) => rules_eq(left, *x, right, *y, tracker),
        (Rule::Repetition(x), Rule::Repetition(y)) => {
            x.min == y.min && x.max == y.max && rules_eq(left, x.rule, right, y.rule, tracker)
        }
        (Rule::NonTerminal(x), Rule::NonTerminal(y)) => {
            x.name() == y.name()
                && match (x.body(), y.body()) {
                    (Some(xb), Some(yb)) => rules_eq(left, xb, right, yb, tracker),
                    (None, None) => true,
                    _ => false,
                }
        }
        _ => false,
    };

    tracker.leave(a);
    result
}

impl Hash for RuleRef<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let mut hasher = RuleHasher {
            grammar: self.grammar,
            tracker: Tracker::active_path(CyclePolicy::Tolerate),
            root: self.id,
            state,
        };
        // Tolerated cycles never fail the walk.
        let _ = hasher.visit_rule(self.id);
    }
}

const CYCLE_MARKER: u8 = 0xff;

struct RuleHasher<'g, 's, H> {
    grammar: &'g Grammar,
    tracker: Tracker<RuleId>,
    root: RuleId,
    state: &'s mut H,
}

impl<'g, H: Hasher> RuleHasher<'g, '_, H> {
    fn tag(&mut self, id: RuleId) {
        std::mem::discriminant(self.grammar.rule(id)).hash(self.state);
    }
}

impl<'g, H: Hasher> RuleVisitor<'g> for RuleHasher<'g, '_, H> {
    fn grammar(&self) -> &'g Grammar {
        self.grammar
    }

    fn tracker(&mut self) -> &mut Tracker<RuleId> {
        &mut self.tracker
    }

    fn visit_terminal(&mut self, id: RuleId, terminal: &'g Terminal) -> Result<(), GraphError> {
        self.tag(id);
        terminal.hash(self.state);
        Ok(())
    }

    fn visit_number_value(&mut self, id: RuleId, value: &'g NumberValue) -> Result<(), GraphError> {
        self.tag(id);
        value.hash(self.state);
        Ok(())
    }

    fn visit_conjunction(&mut self, id: RuleId, children: &'g [RuleId]) -> Result<(), GraphError> {
        self.tag(id);
        children.len().hash(self.state);
        walk_children(self, children)
    }

    fn visit_disjunction(&mut self, id: RuleId, children: &'g [RuleId]) -> Result<(), GraphError> {
        self.tag(id);
        children.len().hash(self.state);
        walk_children(self, children)
    }

    fn visit_optional(&mut self, id: RuleId, child: RuleId) -> Result<(), GraphError> {
        self.tag(id);
        self.visit_rule(child)
    }

    fn visit_repetition(&mut self, id: RuleId, rep: &'g Repetition) -> Result<(), GraphError> {
        self.tag(id);
        rep.min.hash(self.state);
        rep.max.hash(self.state);
        self.visit_rule(rep.rule)
    }

    fn visit_non_terminal(&mut self, id: RuleId, nt: &'g NonTerminal) -> Result<(), GraphError> {
        self.tag(id);
        nt.name().hash(self.state);
        if id != self.root {
            return Ok(());
        }
        nt.is_bound().hash(self.state);
        walk_non_terminal(self, nt)
    }

    fn visit_cycle(&mut self, id: RuleId) -> Result<(), GraphError> {
        match self.grammar.rule(id) {
            Rule::NonTerminal(nt) => {
                self.tag(id);
                nt.name().hash(self.state);
            }
            _ => CYCLE_MARKER.hash(self.state),
        }
        Ok(())
    }
}

impl PartialEq for NodeRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        let mut tracker = Tracker::active_path(CyclePolicy::Tolerate);
        nodes_eq(self.tree, self.id, other.tree, other.id, &mut tracker)
    }
}

impl Eq for NodeRef<'_> {}

fn nodes_eq(
    left: &ParseTree,
    a: NodeId,
    right: &ParseTree,
    b: NodeId,
    tracker: &mut Tracker<NodeId>,
) -> bool {
    if tracker.enter(a) != Visit::Enter {
        return true;
    }

    let result = match (left.node(a), right.node(b)) {
        (Node::Terminal { text: x, .. }, Node::Terminal { text: y, .. }) => x == y,
        (
            Node::NonTerminal {
                name: xn,
                children: xs,
                ..
            },
            Node::NonTerminal {
                name: yn,
                children: ys,
                ..
            },
        ) => xn == yn && children_eq(left, xs, right, ys, tracker),
        (Node::Intermediate { children: xs, .. }, Node::Intermediate { children: ys, .. }) => {
            children_eq(left, xs, right, ys, tracker)
        }
        _ => false,
    };

    tracker.leave(a);
    result
}

fn children_eq(
    left: &ParseTree,
    xs: &[NodeId],
    right: &ParseTree,
    ys: &[NodeId],
    tracker: &mut Tracker<NodeId>,
) -> bool {
    xs.len() == ys.len()
        && xs
            .iter()
            .zip(ys)
            .all(|(&x, &y)| nodes_eq(left, x, right, y, tracker))
}

impl Hash for NodeRef<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let mut tracker = Tracker::active_path(CyclePolicy::Tolerate);
        hash_node(self.tree, self.id, &mut tracker, state);
    }
}

fn hash_node<H: Hasher>(tree: &ParseTree, id: NodeId, tracker: &mut Tracker<NodeId>, state: &mut H) {
    if tracker.enter(id) != Visit::Enter {
        CYCLE_MARKER.hash(state);
        return;
    }

    let node = tree.node(id);
    std::mem::discriminant(node).hash(state);
    match node {
        Node::Terminal { text, .. } => text.hash(state),
        Node::NonTerminal { name, children, .. } => {
            name.hash(state);
            children.len().hash(state);
            for &child in children {
                hash_node(tree, child, tracker, state);
            }
        }
        Node::Intermediate { children, .. } => {
            children.len().hash(state);
            for &child in children {
                hash_node(tree, child, tracker, state);
            }
        }
    }

    tracker.leave(id);
}

impl PartialEq for ParseTree {
    fn eq(&self, other: &Self) -> bool {
        match (self.root(), other.root()) {
            (Some(a), Some(b)) => self.view(a) == other.view(b),
            (None, None) => true,
            _ => false,
        }
    }
}

impl Eq for ParseTree {}

impl Hash for ParseTree {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self.root() {
            Some(root) => {
                true.hash(state);
                self.view(root).hash(state);
            }
            None => false.hash(state),
        }
    }
}
