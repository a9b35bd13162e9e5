//! Parse tree arena.
//!
//! Nodes are appended while the engine runs. Backtracking discards every node
//! allocated since a checkpoint with [`ParseTree::truncate`], so a finished
//! tree holds no orphans.

use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::GraphError;

/// Handle to a node inside a [`ParseTree`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
pub struct NodeId(u32);

impl NodeId {
    #[inline]
    pub fn as_u32(self) -> u32 {
        self.0
    }

    #[inline]
    pub fn from_raw(index: u32) -> Self {
        Self(index)
    }

    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// Byte range of input covered by a node.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn empty(at: usize) -> Self {
        Self { start: at, end: at }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Node {
    /// Matched literal text as it appeared in the input.
    Terminal { text: String, span: Span },
    /// Named node produced by a `NonTerminal` rule.
    NonTerminal {
        name: String,
        children: Vec<NodeId>,
        span: Span,
    },
    /// Anonymous group produced by a composite rule.
    Intermediate { children: Vec<NodeId>, span: Span },
}

impl Node {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Node::Terminal { .. } => "Terminal",
            Node::NonTerminal { .. } => "NonTerminal",
            Node::Intermediate { .. } => "Intermediate",
        }
    }

    pub fn span(&self) -> Span {
        match self {
            Node::Terminal { span, .. }
            | Node::NonTerminal { span, .. }
            | Node::Intermediate { span, .. } => *span,
        }
    }

    pub fn children(&self) -> &[NodeId] {
        match self {
            Node::Terminal { .. } => &[],
            Node::NonTerminal { children, .. } | Node::Intermediate { children, .. } => children,
        }
    }

    /// Name of a `NonTerminal` node.
    pub fn name(&self) -> Option<&str> {
        match self {
            Node::NonTerminal { name, .. } => Some(name),
            _ => None,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Terminal { .. })
    }

    pub fn is_intermediate(&self) -> bool {
        matches!(self, Node::Intermediate { .. })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParseTree {
    nodes: Vec<Node>,
    root: Option<NodeId>,
}

impl ParseTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId::from_raw(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    pub fn terminal(&mut self, text: impl Into<String>, span: Span) -> NodeId {
        self.push(Node::Terminal {
            text: text.into(),
            span,
        })
    }

    pub fn intermediate(&mut self, span: Span) -> NodeId {
        self.push(Node::Intermediate {
            children: Vec::new(),
            span,
        })
    }

    pub fn non_terminal(&mut self, name: impl Into<String>, span: Span) -> NodeId {
        self.push(Node::NonTerminal {
            name: name.into(),
            children: Vec::new(),
            span,
        })
    }

    pub fn push_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), GraphError> {
        self.ensure_node(child);
        match self.ensure_node_mut(parent) {
            Node::Terminal { .. } => Err(GraphError::LeafNode),
            Node::NonTerminal { children, .. } | Node::Intermediate { children, .. } => {
                children.push(child);
                Ok(())
            }
        }
    }

    pub fn set_span(&mut self, id: NodeId, new_span: Span) {
        match self.ensure_node_mut(id) {
            Node::Terminal { span, .. }
            | Node::NonTerminal { span, .. }
            | Node::Intermediate { span, .. } => *span = new_span,
        }
    }

    /// Name `id` as a non-terminal.
    ///
    /// An intermediate node is converted in place and keeps its children;
    /// anything else becomes the single child of a new node.
    pub fn wrap_named(&mut self, id: NodeId, name: &str) -> NodeId {
        if let Node::Intermediate { children, span } = self.ensure_node_mut(id) {
            let named = Node::NonTerminal {
                name: name.to_owned(),
                children: std::mem::take(children),
                span: *span,
            };
            self.nodes[id.index()] = named;
            return id;
        }
        let span = self.node(id).span();
        self.push(Node::NonTerminal {
            name: name.to_owned(),
            children: vec![id],
            span,
        })
    }

    pub fn set_root(&mut self, root: NodeId) {
        self.ensure_node(root);
        self.root = Some(root);
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// # Panics
    /// Panics if `id` was not created by this tree.
    #[inline]
    pub fn node(&self, id: NodeId) -> &Node {
        self.ensure_node(id)
    }

    #[inline]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.index())
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).children()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Drop every node allocated at or after `len`.
    pub fn truncate(&mut self, len: usize) {
        self.nodes.truncate(len);
        if self.root.is_some_and(|root| root.index() >= len) {
            self.root = None;
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (NodeId::from_raw(i as u32), node))
    }

    /// Concatenated text of the terminal leaves under `id`.
    pub fn text(&self, id: NodeId) -> String {
        let mut out = String::new();
        let mut stack = vec![id];
        while let Some(id) = stack.pop() {
            match self.node(id) {
                Node::Terminal { text, .. } => out.push_str(text),
                node => stack.extend(node.children().iter().rev()),
            }
        }
        out
    }

    /// Text of the whole tree, empty without a root.
    pub fn root_text(&self) -> String {
        self.root.map(|root| self.text(root)).unwrap_or_default()
    }

    /// Copy of the reachable tree with every intermediate node spliced into
    /// its parent. An intermediate root is kept as the container.
    pub fn simplify(&self) -> ParseTree {
        let mut out = ParseTree::new();
        let Some(root) = self.root else {
            return out;
        };
        let new_root = match self.node(root) {
            Node::Intermediate { children, span } => {
                let id = out.intermediate(*span);
                self.splice_children(children, id, &mut out);
                id
            }
            _ => self.copy_simplified(root, &mut out),
        };
        out.root = Some(new_root);
        out
    }

    fn copy_simplified(&self, id: NodeId, out: &mut ParseTree) -> NodeId {
        match self.node(id) {
            Node::Terminal { text, span } => out.terminal(text.clone(), *span),
            Node::NonTerminal {
                name,
                children,
                span,
            } => {
                let new_id = out.non_terminal(name.clone(), *span);
                self.splice_children(children, new_id, out);
                new_id
            }
            Node::Intermediate { children, span } => {
                let new_id = out.intermediate(*span);
                self.splice_children(children, new_id, out);
                new_id
            }
        }
    }

    fn splice_children(&self, children: &[NodeId], parent: NodeId, out: &mut ParseTree) {
        for &child in children {
            if let Node::Intermediate { children, .. } = self.node(child) {
                self.splice_children(children, parent, out);
                continue;
            }
            let new_child = self.copy_simplified(child, out);
            if let Some(Node::NonTerminal { children, .. } | Node::Intermediate { children, .. }) =
                out.get_mut(parent)
            {
                children.push(new_child);
            }
        }
    }
}
