//! Turns a simplified ABNF parse tree into rules of a [`Grammar`].
//!
//! Rule names are case-insensitive: every spelling of a name shares one
//! non-terminal, created on first sight and bound once all definitions are
//! known. `=/` extends the body defined so far with a new alternative.

use std::borrow::Cow;

use indexmap::{IndexMap, IndexSet};
use ruleloom_core::{Grammar, Node, NodeId, NumberValue, ParseTree, Radix, RuleId, Span, Terminal};
use ruleloom_engine::{FuelLimits, Parser};

use crate::error::AbnfError;
use crate::meta::meta_grammar;

/// Parse ABNF text against the meta grammar. A missing final line end is
/// supplied.
pub(crate) fn parse_rulelist(text: &str, limits: FuelLimits) -> Result<ParseTree, AbnfError> {
    let text = if text.ends_with('\n') {
        Cow::Borrowed(text)
    } else {
        Cow::Owned(format!("{text}\n"))
    };
    let meta = meta_grammar();
    let tree = Parser::builder(meta.grammar())
        .limits(limits)
        .build()
        .parse(&text, meta.rulelist())
        .map_err(AbnfError::Syntax)?;
    Ok(tree.simplify())
}

/// Lower-cased lookup key of a rule name.
pub(crate) fn rule_key(name: &str) -> String {
    name.to_ascii_lowercase()
}

#[derive(Debug)]
struct Entry {
    stub: RuleId,
    body: Option<RuleId>,
    comment: Option<String>,
    /// First reference, reported when the rule is never defined.
    first_ref: Option<Span>,
}

/// Definitions collected so far, keyed by [`rule_key`].
#[derive(Debug, Default)]
pub(crate) struct Definitions {
    pub(crate) grammar: Grammar,
    entries: IndexMap<String, Entry>,
    /// Keys in order of first definition.
    order: IndexSet<String>,
}

impl Definitions {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Stubs of defined rules, in order of first definition.
    pub(crate) fn defined(&self) -> impl Iterator<Item = (&str, RuleId)> {
        self.order
            .iter()
            .map(|key| (key.as_str(), self.entries[key.as_str()].stub))
    }

    pub(crate) fn first_ref(&self, key: &str) -> Option<Span> {
        self.entries.get(key).and_then(|entry| entry.first_ref)
    }

    /// Bind every defined rule whose stub is still open.
    pub(crate) fn bind_defined(&mut self) -> Result<(), AbnfError> {
        for entry in self.entries.values_mut() {
            let Some(body) = entry.body else {
                continue;
            };
            let bound = self
                .grammar
                .rule(entry.stub)
                .as_non_terminal()
                .is_some_and(|nt| nt.is_bound());
            if !bound {
                self.grammar
                    .bind_with_comment(entry.stub, body, entry.comment.take())?;
            }
        }
        Ok(())
    }

    /// Interpret every `rule` of a parsed rule list.
    pub(crate) fn rulelist(&mut self, tree: &ParseTree) -> Result<(), AbnfError> {
        let Some(root) = tree.root() else {
            return Ok(());
        };
        let mut reader = Reader { tree, defs: self };
        reader.expect_named(root, "rulelist")?;
        for &child in tree.children(root) {
            if tree.node(child).name() == Some("rule") {
                reader.rule(child)?;
            }
        }
        Ok(())
    }

    /// Interpret a single `rule` node.
    pub(crate) fn rule(&mut self, tree: &ParseTree, node: NodeId) -> Result<(), AbnfError> {
        Reader { tree, defs: self }.rule(node)
    }

    fn reference(&mut self, name: &str, span: Span) -> RuleId {
        let entry = self.entry(name);
        entry.first_ref.get_or_insert(span);
        entry.stub
    }

    fn entry(&mut self, name: &str) -> &mut Entry {
        let grammar = &mut self.grammar;
        self.entries.entry(rule_key(name)).or_insert_with(|| Entry {
            stub: grammar.non_terminal(name),
            body: None,
            comment: None,
            first_ref: None,
        })
    }

    fn define(
        &mut self,
        name: &str,
        span: Span,
        incremental: bool,
        body: RuleId,
        comment: Option<String>,
    ) -> Result<(), AbnfError> {
        let base = self.entry(name).body;
        let body = match (incremental, base) {
            (true, None) => {
                return Err(AbnfError::MissingBase {
                    name: name.to_owned(),
                    span,
                });
            }
            (true, Some(base)) => self.grammar.disjunction([base, body]),
            (false, _) => body,
        };
        self.order.insert(rule_key(name));
        let entry = self.entry(name);
        entry.body = Some(body);
        if entry.comment.is_none() {
            entry.comment = comment;
        }
        Ok(())
    }
}

/// One pass over a tree, writing into shared definitions.
struct Reader<'a> {
    tree: &'a ParseTree,
    defs: &'a mut Definitions,
}

impl Reader<'_> {
    fn rule(&mut self, node: NodeId) -> Result<(), AbnfError> {
        let name_node = self.child(node, "rulename")?;
        let name = self.tree.text(name_node);
        let defined_as = self.child(node, "defined-as")?;
        let incremental = self.operator(defined_as)?;
        let elements = self.child(node, "elements")?;
        let alternation = self.child(elements, "alternation")?;
        let body = self.alternation(alternation)?;

        let comment = self.comment(node);
        let span = self.tree.node(node).span();
        self.defs.define(&name, span, incremental, body, comment)
    }

    /// `true` for `=/`.
    fn operator(&self, defined_as: NodeId) -> Result<bool, AbnfError> {
        self.tree
            .children(defined_as)
            .iter()
            .find_map(|&child| match self.tree.node(child) {
                Node::Terminal { text, .. } => Some(text == "=/"),
                _ => None,
            })
            .ok_or_else(|| self.mismatch(defined_as, "`=` or `=/`"))
    }

    /// Text of every comment inside `node`, joined by spaces.
    fn comment(&self, node: NodeId) -> Option<String> {
        let mut lines = Vec::new();
        let mut stack = vec![node];
        while let Some(id) = stack.pop() {
            let current = self.tree.node(id);
            if current.name() == Some("comment") {
                let text = self.tree.text(id);
                let line = text.trim_start_matches(';').trim();
                if !line.is_empty() {
                    lines.push(line.to_owned());
                }
                continue;
            }
            stack.extend(current.children().iter().rev());
        }
        (!lines.is_empty()).then(|| lines.join(" "))
    }

    fn alternation(&mut self, node: NodeId) -> Result<RuleId, AbnfError> {
        let children: Vec<NodeId> = self.named_children(node, "concatenation").collect();
        let alternatives = children
            .into_iter()
            .map(|child| self.concatenation(child))
            .collect::<Result<Vec<_>, _>>()?;
        self.collapse(node, alternatives, |g, rules| g.disjunction(rules))
    }

    fn concatenation(&mut self, node: NodeId) -> Result<RuleId, AbnfError> {
        let children: Vec<NodeId> = self.named_children(node, "repetition").collect();
        let parts = children
            .into_iter()
            .map(|child| self.repetition(child))
            .collect::<Result<Vec<_>, _>>()?;
        self.collapse(node, parts, |g, rules| g.conjunction(rules))
    }

    /// A single child stands for itself; more are combined with `compose`.
    fn collapse(
        &mut self,
        node: NodeId,
        mut children: Vec<RuleId>,
        compose: fn(&mut Grammar, Vec<RuleId>) -> RuleId,
    ) -> Result<RuleId, AbnfError> {
        match children.len() {
            0 => Err(self.mismatch(node, "at least one element")),
            1 => Ok(children.remove(0)),
            _ => Ok(compose(&mut self.defs.grammar, children)),
        }
    }

    fn repetition(&mut self, node: NodeId) -> Result<RuleId, AbnfError> {
        let element = self.child(node, "element")?;
        let rule = self.element(element)?;
        let Some(repeat) = self.named_children(node, "repeat").next() else {
            return Ok(rule);
        };
        let text = self.tree.text(repeat);
        let (min, max) = parse_repeat(&text, self.tree.node(repeat).span())?;
        Ok(self.defs.grammar.repetition(rule, min, max))
    }

    fn element(&mut self, node: NodeId) -> Result<RuleId, AbnfError> {
        let tree = self.tree;
        let inner = tree
            .children(node)
            .first()
            .copied()
            .ok_or_else(|| self.mismatch(node, "element"))?;
        let span = tree.node(inner).span();
        match tree.node(inner).name() {
            Some("rulename") => {
                let name = tree.text(inner);
                Ok(self.defs.reference(&name, span))
            }
            Some("group") => {
                let alternation = self.child(inner, "alternation")?;
                self.alternation(alternation)
            }
            Some("option") => {
                let alternation = self.child(inner, "alternation")?;
                let rule = self.alternation(alternation)?;
                Ok(self.defs.grammar.optional(rule))
            }
            Some("char-val") => self.char_val(inner),
            Some("num-val") => {
                let value = tree.children(inner).iter().copied().find(|&child| {
                    matches!(
                        tree.node(child).name(),
                        Some("bin-val" | "dec-val" | "hex-val")
                    )
                });
                let value = value.ok_or_else(|| self.mismatch(inner, "numeric value"))?;
                let number = parse_number(&tree.text(value), &tree.text(inner), span)?;
                Ok(self.defs.grammar.number(number))
            }
            Some("prose-val") => {
                let text = tree.text(inner);
                let prose = text.strip_prefix('<').unwrap_or(&text);
                let prose = prose.strip_suffix('>').unwrap_or(prose);
                Ok(self.defs.grammar.literal(prose))
            }
            _ => Err(self.mismatch(inner, "element")),
        }
    }

    /// `"..."` and `%i"..."` ignore case, `%s"..."` does not.
    fn char_val(&mut self, node: NodeId) -> Result<RuleId, AbnfError> {
        let string = self
            .tree
            .children(node)
            .first()
            .copied()
            .ok_or_else(|| self.mismatch(node, "quoted string"))?;
        let case_sensitive = match self.tree.node(string).name() {
            Some("case-sensitive-string") => true,
            Some("case-insensitive-string") => false,
            _ => return Err(self.mismatch(string, "quoted string")),
        };
        let quoted = self.child(string, "quoted-string")?;
        let text = self.tree.text(quoted);
        let literal = text.strip_prefix('"').unwrap_or(&text);
        let literal = literal.strip_suffix('"').unwrap_or(literal);
        let terminal = Terminal::with_case([literal], case_sensitive);
        Ok(self.defs.grammar.terminal(terminal))
    }

    fn named_children<'n>(
        &'n self,
        node: NodeId,
        name: &'static str,
    ) -> impl Iterator<Item = NodeId> + 'n {
        self.tree
            .children(node)
            .iter()
            .copied()
            .filter(move |&child| self.tree.node(child).name() == Some(name))
    }

    fn child(&self, node: NodeId, name: &'static str) -> Result<NodeId, AbnfError> {
        self.named_children(node, name)
            .next()
            .ok_or_else(|| self.mismatch(node, name))
    }

    fn expect_named(&self, node: NodeId, name: &'static str) -> Result<(), AbnfError> {
        if self.tree.node(node).name() == Some(name) {
            Ok(())
        } else {
            Err(self.mismatch(node, name))
        }
    }

    fn mismatch(&self, node: NodeId, expected: &'static str) -> AbnfError {
        let found = self.tree.node(node);
        AbnfError::Mismatch {
            expected,
            found: found.name().unwrap_or(found.kind_name()).to_owned(),
            span: found.span(),
        }
    }
}

/// `n`, `n*`, `*m`, `n*m` or `*`.
pub(crate) fn parse_repeat(text: &str, span: Span) -> Result<(u32, Option<u32>), AbnfError> {
    let invalid = || AbnfError::InvalidRepeat {
        text: text.to_owned(),
        span,
    };
    let bound = |digits: &str| digits.parse::<u32>().map_err(|_| invalid());

    let Some((min, max)) = text.split_once('*') else {
        let exact = bound(text)?;
        return Ok((exact, Some(exact)));
    };
    let min = if min.is_empty() { 0 } else { bound(min)? };
    let max = if max.is_empty() { None } else { Some(bound(max)?) };
    if max.is_some_and(|max| min > max) {
        return Err(invalid());
    }
    Ok((min, max))
}

/// `value` is the radix-prefixed body (`x41-5A`); `text` the whole literal
/// for error messages.
pub(crate) fn parse_number(value: &str, text: &str, span: Span) -> Result<NumberValue, AbnfError> {
    let invalid = || AbnfError::InvalidNumber {
        text: text.to_owned(),
        span,
    };
    let mut chars = value.chars();
    let radix = chars
        .next()
        .and_then(Radix::from_prefix)
        .ok_or_else(invalid)?;
    let digits = chars.as_str();
    let code_point = |digits: &str| {
        u32::from_str_radix(digits, radix.base())
            .ok()
            .filter(|&v| char::from_u32(v).is_some())
            .ok_or_else(invalid)
    };

    if let Some((start, end)) = digits.split_once('-') {
        let (start, end) = (code_point(start)?, code_point(end)?);
        if start > end {
            return Err(invalid());
        }
        return Ok(NumberValue::range(radix, start, end));
    }
    if digits.contains('.') {
        let values = digits
            .split('.')
            .map(|digits| code_point(digits))
            .collect::<Result<Vec<_>, _>>()?;
        return Ok(NumberValue::list(radix, values));
    }
    Ok(NumberValue::single(radix, code_point(digits)?))
}
