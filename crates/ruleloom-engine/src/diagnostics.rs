//! Source-annotated error reports.

use std::fmt::Write;
use std::ops::Range;

use annotate_snippets::{AnnotationKind, Group, Level, Renderer, Snippet};

/// An error message with labelled byte ranges of the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    message: String,
    labels: Vec<Label>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Label {
    range: Range<usize>,
    text: String,
    primary: bool,
}

impl Report {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            labels: Vec::new(),
        }
    }

    pub fn primary(mut self, range: Range<usize>, text: impl Into<String>) -> Self {
        self.labels.push(Label {
            range,
            text: text.into(),
            primary: true,
        });
        self
    }

    pub fn context(mut self, range: Range<usize>, text: impl Into<String>) -> Self {
        self.labels.push(Label {
            range,
            text: text.into(),
            primary: false,
        });
        self
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn printer<'r, 's>(&'r self, source: &'s str) -> ReportPrinter<'r, 's> {
        ReportPrinter::new(self, source)
    }
}

/// Builder for rendering a [`Report`].
pub struct ReportPrinter<'r, 's> {
    report: &'r Report,
    source: &'s str,
    path: Option<&'s str>,
    colored: bool,
}

impl<'r, 's> ReportPrinter<'r, 's> {
    pub fn new(report: &'r Report, source: &'s str) -> Self {
        Self {
            report,
            source,
            path: None,
            colored: false,
        }
    }

    pub fn path(mut self, path: &'s str) -> Self {
        self.path = Some(path);
        self
    }

    pub fn colored(mut self, value: bool) -> Self {
        self.colored = value;
        self
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        self.format(&mut out).expect("String write never fails");
        out
    }

    pub fn format(&self, w: &mut impl Write) -> std::fmt::Result {
        if self.report.labels.is_empty() {
            return write!(w, "error: {}", self.report.message);
        }

        let renderer = if self.colored {
            Renderer::styled()
        } else {
            Renderer::plain()
        };

        let mut snippet = Snippet::source(self.source).line_start(1);
        if let Some(p) = self.path {
            snippet = snippet.path(p);
        }
        for label in &self.report.labels {
            let kind = if label.primary {
                AnnotationKind::Primary
            } else {
                AnnotationKind::Context
            };
            snippet = snippet.annotation(
                kind.span(adjust_range(&label.range, self.source))
                    .label(&label.text),
            );
        }

        let title_group = Level::ERROR
            .primary_title(&self.report.message)
            .element(snippet);
        let report: Vec<Group> = vec![title_group];
        write!(w, "{}", renderer.render(&report))
    }
}

/// Widen an empty range to the next character so the caret is visible.
fn adjust_range(range: &Range<usize>, source: &str) -> Range<usize> {
    let start = range.start.min(source.len());
    let end = range.end.min(source.len());
    if start != end {
        return start..end;
    }
    let width = source
        .get(start..)
        .and_then(|rest| rest.chars().next())
        .map_or(0, char::len_utf8);
    start..start + width
}
