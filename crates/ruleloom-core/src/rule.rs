//! Rule variants stored in a [`Grammar`](crate::Grammar) arena.
//!
//! Composite rules refer to their children by [`RuleId`], so a grammar can be
//! cyclic through `NonTerminal` self- and mutual reference without any shared
//! ownership.

use serde::{Deserialize, Serialize};

/// Handle to a rule inside a [`Grammar`](crate::Grammar).
///
/// Handles are only meaningful for the grammar that created them.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
pub struct RuleId(u32);

impl RuleId {
    /// Raw index for serialization/debugging.
    #[inline]
    pub fn as_u32(self) -> u32 {
        self.0
    }

    /// Create a handle from a raw index. Use only for deserialization.
    #[inline]
    pub fn from_raw(index: u32) -> Self {
        Self(index)
    }

    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// Grammar rule variants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Rule {
    /// One of a fixed set of literal strings.
    Terminal(Terminal),
    /// A single code point drawn from a value, list, or range.
    NumberValue(NumberValue),
    /// Children matched strictly in order.
    Conjunction(Vec<RuleId>),
    /// Alternatives; the greediest match wins.
    Disjunction(Vec<RuleId>),
    /// Zero or one match of the child.
    Optional(RuleId),
    /// Bounded repetition of the child.
    Repetition(Repetition),
    /// Named wrapper, bindable exactly once.
    NonTerminal(NonTerminal),
}

impl Rule {
    /// Variant name, used by dumps and traces.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Rule::Terminal(_) => "Terminal",
            Rule::NumberValue(_) => "NumberValue",
            Rule::Conjunction(_) => "Conjunction",
            Rule::Disjunction(_) => "Disjunction",
            Rule::Optional(_) => "Optional",
            Rule::Repetition(_) => "Repetition",
            Rule::NonTerminal(_) => "NonTerminal",
        }
    }

    /// True for rules that can never hold children.
    pub fn is_leaf(&self) -> bool {
        matches!(self, Rule::Terminal(_) | Rule::NumberValue(_))
    }

    pub fn as_non_terminal(&self) -> Option<&NonTerminal> {
        match self {
            Rule::NonTerminal(nt) => Some(nt),
            _ => None,
        }
    }

    /// Direct children in match order. A stub non-terminal has none.
    pub fn children(&self) -> Vec<RuleId> {
        match self {
            Rule::Terminal(_) | Rule::NumberValue(_) => Vec::new(),
            Rule::Conjunction(children) | Rule::Disjunction(children) => children.clone(),
            Rule::Optional(child) => vec![*child],
            Rule::Repetition(rep) => vec![rep.rule],
            Rule::NonTerminal(nt) => nt.body.into_iter().collect(),
        }
    }
}

/// Literal candidates, kept longest-first for maximal munch.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Terminal {
    candidates: Vec<String>,
    case_sensitive: bool,
}

impl Terminal {
    /// Case-sensitive terminal.
    pub fn new<I, S>(candidates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_case(candidates, true)
    }

    /// Case-insensitive terminal (ASCII folding).
    pub fn ignore_case<I, S>(candidates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_case(candidates, false)
    }

    pub fn with_case<I, S>(candidates: I, case_sensitive: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut sorted: Vec<String> = Vec::new();
        for candidate in candidates {
            let candidate = candidate.into();
            if !sorted.contains(&candidate) {
                sorted.push(candidate);
            }
        }
        // Stable: equal lengths keep insertion order.
        sorted.sort_by(|a, b| b.len().cmp(&a.len()));
        Self {
            candidates: sorted,
            case_sensitive,
        }
    }

    /// Candidates, longest first.
    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }

    pub fn is_case_sensitive(&self) -> bool {
        self.case_sensitive
    }
}

/// Radix a numeric value was written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Radix {
    Binary,
    Decimal,
    Hexadecimal,
}

impl Radix {
    pub fn base(self) -> u32 {
        match self {
            Radix::Binary => 2,
            Radix::Decimal => 10,
            Radix::Hexadecimal => 16,
        }
    }

    /// ABNF prefix letter (`b`, `d`, `x`).
    pub fn prefix(self) -> char {
        match self {
            Radix::Binary => 'b',
            Radix::Decimal => 'd',
            Radix::Hexadecimal => 'x',
        }
    }

    pub fn from_prefix(prefix: char) -> Option<Self> {
        match prefix.to_ascii_lowercase() {
            'b' => Some(Radix::Binary),
            'd' => Some(Radix::Decimal),
            'x' => Some(Radix::Hexadecimal),
            _ => None,
        }
    }

    /// Format a value in this radix (hex digits uppercase).
    pub fn format(self, value: u32) -> String {
        match self {
            Radix::Binary => format!("{value:b}"),
            Radix::Decimal => format!("{value}"),
            Radix::Hexadecimal => format!("{value:X}"),
        }
    }
}

/// Code points a [`NumberValue`] accepts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CodePoints {
    Single(u32),
    /// Any one of the listed values.
    List(Vec<u32>),
    /// Inclusive range.
    Range(u32, u32),
}

/// Numeric terminal matching exactly one code point.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NumberValue {
    pub radix: Radix,
    pub code_points: CodePoints,
}

impl NumberValue {
    pub fn single(radix: Radix, value: u32) -> Self {
        Self {
            radix,
            code_points: CodePoints::Single(value),
        }
    }

    pub fn list(radix: Radix, values: Vec<u32>) -> Self {
        Self {
            radix,
            code_points: CodePoints::List(values),
        }
    }

    pub fn range(radix: Radix, start: u32, end: u32) -> Self {
        Self {
            radix,
            code_points: CodePoints::Range(start, end),
        }
    }

    pub fn matches(&self, c: char) -> bool {
        let value = c as u32;
        match &self.code_points {
            CodePoints::Single(v) => *v == value,
            CodePoints::List(values) => values.contains(&value),
            CodePoints::Range(start, end) => (*start..=*end).contains(&value),
        }
    }
}

/// `(min, max)` repetition of a child rule; `max == None` is unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Repetition {
    pub rule: RuleId,
    pub min: u32,
    pub max: Option<u32>,
}

/// Named rule; `body` is `None` until bound.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NonTerminal {
    pub(crate) name: String,
    pub(crate) comment: Option<String>,
    pub(crate) body: Option<RuleId>,
}

impl NonTerminal {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    pub fn body(&self) -> Option<RuleId> {
        self.body
    }

    pub fn is_bound(&self) -> bool {
        self.body.is_some()
    }
}
