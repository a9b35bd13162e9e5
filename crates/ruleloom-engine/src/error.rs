//! Errors that can occur during a parse.

use crate::diagnostics::Report;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// The root rule did not match at the start of the input.
    #[error("input does not match `{rule}`")]
    NoMatch { rule: String, furthest: usize },

    /// The root rule matched a prefix only.
    #[error("`{rule}` matched, but input remains at offset {offset}")]
    TrailingInput {
        rule: String,
        offset: usize,
        furthest: usize,
    },

    #[error("parse root must be a NonTerminal, found {kind}")]
    RootNotNonTerminal { kind: &'static str },

    /// A reachable non-terminal was never bound.
    #[error("non-terminal `{name}` has no body")]
    Unbound { name: String },

    /// Too many rule activations.
    #[error("execution limit of {0} rule activations exceeded")]
    ExecFuelExhausted(u32),

    /// Too many nested non-terminals (left recursion ends here).
    #[error("recursion limit of {0} nested rules exceeded")]
    RecursionLimitExceeded(u32),
}

impl ParseError {
    /// Annotated description against the parsed input.
    pub fn report(&self) -> Report {
        let report = Report::new(self.to_string());
        match self {
            ParseError::NoMatch { rule, furthest } => {
                report.primary(*furthest..*furthest, format!("no way to continue `{rule}` here"))
            }
            ParseError::TrailingInput {
                offset, furthest, ..
            } => {
                let report = report.primary(*offset..*offset, "unexpected input");
                if furthest > offset {
                    report.context(*furthest..*furthest, "furthest attempted match")
                } else {
                    report
                }
            }
            _ => report,
        }
    }

    /// Render against the input that was parsed.
    pub fn render(&self, source: &str) -> String {
        self.report().printer(source).render()
    }
}
