#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Backtracking parse engine.
//!
//! A [`Parser`] walks a rule graph against an input string through a
//! transactional [`Cursor`], producing a [`ParseTree`](ruleloom_core::ParseTree)
//! or a [`ParseError`].
//!
//! Speculation (alternatives, optional parts, repetition) is modeled with the
//! cursor's nested groups: every rule activation opens a group, a failure
//! reverts it, and the nodes allocated since the group opened are dropped.

mod cursor;
mod diagnostics;
mod error;
mod exec;
mod parser;
mod trace;

#[cfg(test)]
mod diagnostics_tests;
#[cfg(test)]
mod parser_tests;
#[cfg(test)]
mod trace_tests;

pub use cursor::Cursor;
pub use diagnostics::{Report, ReportPrinter};
pub use error::ParseError;
pub use parser::{FuelLimits, Parser, ParserBuilder, parse};
pub use trace::{NoopTracer, PrintTracer, TraceColors, Tracer, Verbosity};
