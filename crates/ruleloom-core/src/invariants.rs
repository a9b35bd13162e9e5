//! Invariant checks excluded from coverage reports.

#![cfg_attr(coverage_nightly, coverage(off))]

use crate::{Grammar, Node, NodeId, ParseTree, Rule, RuleId};

impl Grammar {
    pub(crate) fn ensure_rule(&self, id: RuleId) -> &Rule {
        self.get(id).unwrap_or_else(|| {
            panic!(
                "Grammar: rule #{} not found (handle belongs to another grammar)",
                id.as_u32()
            )
        })
    }

    pub(crate) fn ensure_rule_mut(&mut self, id: RuleId) -> &mut Rule {
        let len = self.len();
        self.get_mut(id).unwrap_or_else(|| {
            panic!(
                "Grammar: rule #{} not found in arena of {len} (handle belongs to another grammar)",
                id.as_u32()
            )
        })
    }
}

impl ParseTree {
    pub(crate) fn ensure_node(&self, id: NodeId) -> &Node {
        self.get(id).unwrap_or_else(|| {
            panic!(
                "ParseTree: node #{} not found (handle belongs to another tree)",
                id.as_u32()
            )
        })
    }

    pub(crate) fn ensure_node_mut(&mut self, id: NodeId) -> &mut Node {
        let len = self.len();
        self.get_mut(id).unwrap_or_else(|| {
            panic!(
                "ParseTree: node #{} not found in arena of {len} (handle belongs to another tree)",
                id.as_u32()
            )
        })
    }
}
