//! Errors raised while compiling ABNF text or parsing with the result.

use ruleloom_core::{GraphError, Span};
use ruleloom_engine::{ParseError, Report};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AbnfError {
    /// The grammar text is not valid ABNF.
    #[error("invalid ABNF: {0}")]
    Syntax(ParseError),

    /// The meta parse produced a shape the interpreter does not expect.
    #[error("expected {expected}, found {found}")]
    Mismatch {
        expected: &'static str,
        found: String,
        span: Span,
    },

    #[error("rule `{name}` is referenced but never defined")]
    UndefinedRule { name: String, span: Span },

    /// `=/` on a rule that has no `=` definition yet.
    #[error("`{name} =/` extends a rule that is not defined yet")]
    MissingBase { name: String, span: Span },

    #[error("invalid repeat `{text}`")]
    InvalidRepeat { text: String, span: Span },

    #[error("invalid numeric value `{text}`")]
    InvalidNumber { text: String, span: Span },

    #[error(transparent)]
    Graph(#[from] GraphError),

    /// Lookup of a rule name the grammar does not define.
    #[error("no rule named `{name}`")]
    UnknownRule { name: String },

    /// Input text did not match the compiled grammar.
    #[error(transparent)]
    Input(ParseError),

    #[error("grammar text defines no rules")]
    NoRules,
}

impl AbnfError {
    /// Annotated description. Input errors point into the parsed input,
    /// every other variant into the grammar text.
    pub fn report(&self) -> Report {
        match self {
            AbnfError::Syntax(
                ParseError::NoMatch { furthest, .. } | ParseError::TrailingInput { furthest, .. },
            ) => Report::new(self.to_string()).primary(*furthest..*furthest, "ABNF syntax stops here"),
            AbnfError::Syntax(_) => Report::new(self.to_string()),
            AbnfError::Input(err) => err.report(),
            AbnfError::Mismatch { span, .. } => {
                Report::new(self.to_string()).primary(span.range(), "unexpected construct")
            }
            AbnfError::UndefinedRule { span, .. } => {
                Report::new(self.to_string()).primary(span.range(), "referenced here")
            }
            AbnfError::MissingBase { span, .. } => {
                Report::new(self.to_string()).primary(span.range(), "incremental alternative")
            }
            AbnfError::InvalidRepeat { span, .. } | AbnfError::InvalidNumber { span, .. } => {
                Report::new(self.to_string()).primary(span.range(), "out of range")
            }
            AbnfError::Graph(_) | AbnfError::UnknownRule { .. } | AbnfError::NoRules => {
                Report::new(self.to_string())
            }
        }
    }

    /// Render against the source the error refers to.
    pub fn render(&self, source: &str) -> String {
        self.report().printer(source).render()
    }
}
