#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Core data structures for ruleloom grammars.
//!
//! Two graphs, both arena-backed and addressed by `u32` handles:
//! - **Rule graph** (`Grammar`): the grammar description. May be cyclic
//!   through `NonTerminal` self- and mutual reference.
//! - **Parse tree** (`ParseTree`): the output of a parse. Terminal leaves,
//!   named nodes and anonymous intermediate groups.
//!
//! Whole-graph operations (structural equality, hashing, dumps, analysis)
//! run on the cycle-safe traversal in [`traverse`].

mod analysis;
mod dump;
mod grammar;
mod invariants;
mod node;
mod rule;
mod serial;
mod structural;
pub mod traverse;

#[cfg(test)]
mod analysis_tests;
#[cfg(test)]
mod dump_tests;
#[cfg(test)]
mod grammar_tests;
#[cfg(test)]
mod traverse_tests;

pub use grammar::Grammar;
pub use node::{Node, NodeId, ParseTree, Span};
pub use rule::{CodePoints, NonTerminal, NumberValue, Radix, Repetition, Rule, RuleId, Terminal};
pub use serial::SerialError;
pub use structural::{NodeRef, RuleRef};
pub use traverse::{CyclePolicy, RuleVisitor, Tracker, Visit};

/// Misuse of the rule or node graph.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    #[error("non-terminal `{name}` is already bound")]
    AlreadyBound { name: String },

    #[error("expected a NonTerminal, found {kind}")]
    NotNonTerminal { kind: &'static str },

    #[error("{kind} is a leaf rule and cannot hold children")]
    LeafRule { kind: &'static str },

    #[error("{kind} wraps exactly one child")]
    SingleChild { kind: &'static str },

    #[error("terminal nodes cannot hold children")]
    LeafNode,

    #[error("non-terminal `{name}` has no body")]
    Unbound { name: String },

    #[error("cycle through `{rule}`")]
    CyclicGraph { rule: String },

    #[error("rule handle #{index} is out of range")]
    DanglingHandle { index: u32 },
}
