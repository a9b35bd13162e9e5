//! Tracing infrastructure for debugging parse execution.
//!
//! The engine reports every rule activation to a [`Tracer`]. With
//! [`NoopTracer`] all hooks are `#[inline(always)]` empty functions and the
//! calls compile away. [`PrintTracer`] collects an indented, human-readable
//! log.

use ruleloom_core::{Grammar, Rule, RuleId, Span};

/// Verbosity level for trace output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Verbosity {
    /// Non-terminals and disjunction commits.
    #[default]
    Default,
    /// Every rule activation and every backtrack.
    Verbose,
    /// Everything, plus the matched text.
    VeryVerbose,
}

/// ANSI escapes for [`PrintTracer`] lines. Empty strings when disabled.
#[derive(Clone, Copy, Debug)]
pub struct TraceColors {
    /// Rule labels.
    pub rule: &'static str,
    /// Matched input text.
    pub text: &'static str,
    /// The `x` marker of a failed rule.
    pub failure: &'static str,
    /// Offsets and backtrack lines.
    pub offset: &'static str,
    pub reset: &'static str,
}

impl Default for TraceColors {
    fn default() -> Self {
        Self::OFF
    }
}

impl TraceColors {
    pub const ON: Self = Self {
        rule: "\x1b[34m",
        text: "\x1b[32m",
        failure: "\x1b[31m",
        offset: "\x1b[2m",
        reset: "\x1b[0m",
    };

    pub const OFF: Self = Self {
        rule: "",
        text: "",
        failure: "",
        offset: "",
        reset: "",
    };

    pub fn new(enabled: bool) -> Self {
        if enabled { Self::ON } else { Self::OFF }
    }

    pub fn is_enabled(&self) -> bool {
        !self.reset.is_empty()
    }
}

/// Tracer trait for parse instrumentation.
///
/// Hooks receive raw ids and offsets; name resolution and formatting happen in
/// the implementation.
pub trait Tracer {
    /// A rule is about to be tried at `offset`.
    fn trace_enter(&mut self, grammar: &Grammar, rule: RuleId, offset: usize);

    /// A rule matched `span`; `text` is the consumed input.
    fn trace_success(&mut self, grammar: &Grammar, rule: RuleId, span: Span, text: &str);

    /// A rule failed and was rolled back to `offset`.
    fn trace_failure(&mut self, grammar: &Grammar, rule: RuleId, offset: usize);

    /// A speculative match was undone.
    fn trace_backtrack(&mut self, from: usize, to: usize);

    /// A disjunction picked alternative `winner` after scanning all of them.
    fn trace_commit(&mut self, grammar: &Grammar, rule: RuleId, winner: usize, consumed: usize);
}

/// No-op tracer that gets optimized away completely.
pub struct NoopTracer;

impl Tracer for NoopTracer {
    #[inline(always)]
    fn trace_enter(&mut self, _grammar: &Grammar, _rule: RuleId, _offset: usize) {}

    #[inline(always)]
    fn trace_success(&mut self, _grammar: &Grammar, _rule: RuleId, _span: Span, _text: &str) {}

    #[inline(always)]
    fn trace_failure(&mut self, _grammar: &Grammar, _rule: RuleId, _offset: usize) {}

    #[inline(always)]
    fn trace_backtrack(&mut self, _from: usize, _to: usize) {}

    #[inline(always)]
    fn trace_commit(&mut self, _grammar: &Grammar, _rule: RuleId, _winner: usize, _consumed: usize) {
    }
}

/// Tracer that collects an execution log.
///
/// ```text
/// > greeting @0
///   = greeting alt 1 (2 bytes)
/// < greeting @0..2
/// ```
#[derive(Debug, Default)]
pub struct PrintTracer {
    verbosity: Verbosity,
    colors: TraceColors,
    lines: Vec<String>,
    /// One entry per open activation: whether its enter line was printed.
    shown: Vec<bool>,
    /// Printed activations currently open.
    indent: usize,
}

impl PrintTracer {
    pub fn new(verbosity: Verbosity, colors: TraceColors) -> Self {
        Self {
            verbosity,
            colors,
            lines: Vec::new(),
            shown: Vec::new(),
            indent: 0,
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn dump(&self) -> String {
        self.lines.join("\n")
    }

    fn shows(&self, grammar: &Grammar, rule: RuleId) -> bool {
        self.verbosity != Verbosity::Default || matches!(grammar.rule(rule), Rule::NonTerminal(_))
    }

    fn push(&mut self, line: String) {
        self.lines.push(format!("{}{line}", "  ".repeat(self.indent)));
    }

    fn name(&self, grammar: &Grammar, rule: RuleId) -> String {
        let c = &self.colors;
        format!("{}{}{}", c.rule, grammar.label(rule), c.reset)
    }

    fn finish(&mut self) -> bool {
        let shown = self.shown.pop().unwrap_or(false);
        if shown {
            self.indent = self.indent.saturating_sub(1);
        }
        shown
    }
}

impl Tracer for PrintTracer {
    fn trace_enter(&mut self, grammar: &Grammar, rule: RuleId, offset: usize) {
        let shown = self.shows(grammar, rule);
        if shown {
            let c = self.colors;
            let line = format!("> {} {}@{offset}{}", self.name(grammar, rule), c.offset, c.reset);
            self.push(line);
            self.indent += 1;
        }
        self.shown.push(shown);
    }

    fn trace_success(&mut self, grammar: &Grammar, rule: RuleId, span: Span, text: &str) {
        if !self.finish() {
            return;
        }
        let c = self.colors;
        let mut line = format!(
            "< {} {}@{}..{}{}",
            self.name(grammar, rule),
            c.offset,
            span.start,
            span.end,
            c.reset
        );
        if self.verbosity == Verbosity::VeryVerbose {
            line.push_str(&format!(" {}{text:?}{}", c.text, c.reset));
        }
        self.push(line);
    }

    fn trace_failure(&mut self, grammar: &Grammar, rule: RuleId, offset: usize) {
        if !self.finish() {
            return;
        }
        let c = self.colors;
        let line = format!(
            "{}x{} {} {}@{offset}{}",
            c.failure,
            c.reset,
            self.name(grammar, rule),
            c.offset,
            c.reset
        );
        self.push(line);
    }

    fn trace_backtrack(&mut self, from: usize, to: usize) {
        if self.verbosity == Verbosity::Default {
            return;
        }
        let c = self.colors;
        self.push(format!("{}~ backtrack @{from} -> @{to}{}", c.offset, c.reset));
    }

    fn trace_commit(&mut self, grammar: &Grammar, rule: RuleId, winner: usize, consumed: usize) {
        let line = format!(
            "= {} alt {winner} ({consumed} bytes)",
            self.name(grammar, rule)
        );
        self.push(line);
    }
}
