//! Dump helpers for rule graphs and parse trees.

use std::collections::VecDeque;

use crate::rule::{CodePoints, NonTerminal, NumberValue, Repetition, Rule, RuleId, Terminal};
use crate::traverse::{CyclePolicy, RuleVisitor, Tracker, Visit, walk_children};
use crate::{Grammar, GraphError, Node, NodeId, ParseTree};

impl Grammar {
    pub fn printer(&self, root: RuleId) -> GrammarPrinter<'_> {
        GrammarPrinter::new(self, vec![root])
    }

    /// Printer listing the non-terminals reachable from any of `roots`, in
    /// root order.
    pub fn printer_for(&self, roots: &[RuleId]) -> GrammarPrinter<'_> {
        GrammarPrinter::new(self, roots.to_vec())
    }

    /// Indented listing of every non-terminal reachable from `root`.
    pub fn dump(&self, root: RuleId) -> String {
        self.printer(root).dump()
    }
}

impl ParseTree {
    pub fn printer(&self) -> TreePrinter<'_> {
        TreePrinter::new(self)
    }

    pub fn dump(&self) -> String {
        self.printer().dump()
    }
}

/// Printer for a rule graph.
///
/// Each non-terminal is listed once as `name =` followed by its body.
/// References inside bodies print the name only.
pub struct GrammarPrinter<'g> {
    grammar: &'g Grammar,
    roots: Vec<RuleId>,
    with_comments: bool,
}

impl<'g> GrammarPrinter<'g> {
    pub fn new(grammar: &'g Grammar, roots: Vec<RuleId>) -> Self {
        Self {
            grammar,
            roots,
            with_comments: false,
        }
    }

    pub fn with_comments(mut self, value: bool) -> Self {
        self.with_comments = value;
        self
    }

    pub fn dump(&self) -> String {
        let mut body = BodyWriter {
            grammar: self.grammar,
            tracker: Tracker::active_path(CyclePolicy::Tolerate),
            pending: VecDeque::new(),
            out: String::new(),
        };

        let mut defined: Tracker<RuleId> = Tracker::visited_once();
        for &root in &self.roots {
            if let Rule::NonTerminal(_) = self.grammar.rule(root) {
                body.pending.push_back(root);
            } else {
                let _ = body.visit_rule(root);
            }
        }
        while let Some(id) = body.pending.pop_front() {
            if defined.enter(id) != Visit::Enter {
                continue;
            }
            defined.leave(id);

            let Rule::NonTerminal(nt) = self.grammar.rule(id) else {
                continue;
            };
            body.out.push_str(nt.name());
            body.out.push_str(" =");
            if self.with_comments
                && let Some(comment) = nt.comment()
            {
                body.out.push_str(" ; ");
                body.out.push_str(comment);
            }
            match nt.body() {
                Some(rule) => {
                    body.out.push('\n');
                    // Tolerated cycles never fail the walk.
                    let _ = body.visit_rule(rule);
                }
                None => body.out.push_str(" <unbound>\n"),
            }
        }
        body.out
    }
}

struct BodyWriter<'g> {
    grammar: &'g Grammar,
    tracker: Tracker<RuleId>,
    pending: VecDeque<RuleId>,
    out: String,
}

impl BodyWriter<'_> {
    fn line(&mut self, indent: usize, text: &str) {
        for _ in 0..indent {
            self.out.push_str("  ");
        }
        self.out.push_str(text);
        self.out.push('\n');
    }

    /// Depth of the rule currently being written.
    fn depth(&mut self) -> usize {
        self.tracker.depth()
    }
}

impl<'g> RuleVisitor<'g> for BodyWriter<'g> {
    fn grammar(&self) -> &'g Grammar {
        self.grammar
    }

    fn tracker(&mut self) -> &mut Tracker<RuleId> {
        &mut self.tracker
    }

    fn visit_terminal(&mut self, _id: RuleId, terminal: &'g Terminal) -> Result<(), GraphError> {
        let depth = self.depth();
        self.line(depth, &format!("Terminal {}", format_terminal(terminal)));
        Ok(())
    }

    fn visit_number_value(&mut self, _id: RuleId, value: &'g NumberValue) -> Result<(), GraphError> {
        let depth = self.depth();
        self.line(depth, &format!("NumberValue {}", format_number(value)));
        Ok(())
    }

    fn visit_conjunction(&mut self, _id: RuleId, children: &'g [RuleId]) -> Result<(), GraphError> {
        let depth = self.depth();
        self.line(depth, "Conjunction");
        walk_children(self, children)
    }

    fn visit_disjunction(&mut self, _id: RuleId, children: &'g [RuleId]) -> Result<(), GraphError> {
        let depth = self.depth();
        self.line(depth, "Disjunction");
        walk_children(self, children)
    }

    fn visit_optional(&mut self, _id: RuleId, child: RuleId) -> Result<(), GraphError> {
        let depth = self.depth();
        self.line(depth, "Optional");
        self.visit_rule(child)
    }

    fn visit_repetition(&mut self, _id: RuleId, rep: &'g Repetition) -> Result<(), GraphError> {
        let depth = self.depth();
        self.line(depth, &format!("Repetition {}", format_bounds(rep)));
        self.visit_rule(rep.rule)
    }

    fn visit_non_terminal(&mut self, id: RuleId, nt: &'g NonTerminal) -> Result<(), GraphError> {
        let depth = self.depth();
        self.line(depth, &format!("NonTerminal {}", nt.name()));
        self.pending.push_back(id);
        Ok(())
    }

    fn visit_cycle(&mut self, _id: RuleId) -> Result<(), GraphError> {
        let depth = self.depth() + 1;
        self.line(depth, "<cycle>");
        Ok(())
    }
}

fn format_terminal(terminal: &Terminal) -> String {
    let prefix = if terminal.is_case_sensitive() { "%s" } else { "" };
    terminal
        .candidates()
        .iter()
        .map(|c| format!("{prefix}{c:?}"))
        .collect::<Vec<_>>()
        .join(" | ")
}

fn format_number(value: &NumberValue) -> String {
    let radix = value.radix;
    let body = match &value.code_points {
        CodePoints::Single(v) => radix.format(*v),
        CodePoints::List(values) => values
            .iter()
            .map(|v| radix.format(*v))
            .collect::<Vec<_>>()
            .join("."),
        CodePoints::Range(start, end) => {
            format!("{}-{}", radix.format(*start), radix.format(*end))
        }
    };
    format!("%{}{body}", radix.prefix())
}

fn format_bounds(rep: &Repetition) -> String {
    match (rep.min, rep.max) {
        (min, Some(max)) if min == max => min.to_string(),
        (0, None) => "*".to_owned(),
        (min, None) => format!("{min}*"),
        (0, Some(max)) => format!("*{max}"),
        (min, Some(max)) => format!("{min}*{max}"),
    }
}

/// Printer for a parse tree.
///
/// Named nodes print their name, intermediate nodes `_`, terminals their
/// quoted text.
pub struct TreePrinter<'t> {
    tree: &'t ParseTree,
    with_spans: bool,
}

impl<'t> TreePrinter<'t> {
    pub fn new(tree: &'t ParseTree) -> Self {
        Self {
            tree,
            with_spans: false,
        }
    }

    pub fn with_spans(mut self, value: bool) -> Self {
        self.with_spans = value;
        self
    }

    pub fn dump(&self) -> String {
        let mut out = String::new();
        if let Some(root) = self.tree.root() {
            let mut tracker = Tracker::active_path(CyclePolicy::Tolerate);
            self.format(root, 0, &mut tracker, &mut out);
        }
        out
    }

    fn format(&self, id: NodeId, indent: usize, tracker: &mut Tracker<NodeId>, out: &mut String) {
        for _ in 0..indent {
            out.push_str("  ");
        }
        if tracker.enter(id) != Visit::Enter {
            out.push_str("<cycle>\n");
            return;
        }

        let node = self.tree.node(id);
        match node {
            Node::Terminal { text, .. } => out.push_str(&format!("{text:?}")),
            Node::NonTerminal { name, .. } => out.push_str(name),
            Node::Intermediate { .. } => out.push('_'),
        }
        if self.with_spans {
            let span = node.span();
            out.push_str(&format!(" [{}..{}]", span.start, span.end));
        }
        out.push('\n');

        for &child in node.children() {
            self.format(child, indent + 1, tracker, out);
        }
        tracker.leave(id);
    }
}
