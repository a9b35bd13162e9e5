#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! ABNF (RFC 5234, RFC 7405) front end for ruleloom.
//!
//! Grammar text is parsed by the ruleloom engine itself, against a
//! hand-built rule graph for ABNF, and the resulting tree is interpreted
//! into a new [`Grammar`](ruleloom_core::Grammar):
//!
//! ```
//! let grammar = ruleloom_abnf::compile("greeting = \"hello\" / \"hi\"\n").unwrap();
//! let tree = grammar.parse("HI").unwrap();
//! assert_eq!(tree.root_text(), "HI");
//! ```

mod compiler;
mod core_rules;
mod error;
mod interpret;
mod meta;
mod resolve;

#[cfg(test)]
mod core_rules_tests;

pub use compiler::{AbnfCompiler, AbnfGrammar, compile};
pub use error::AbnfError;
pub use meta::{MetaGrammar, meta_grammar};
