//! Parse error types for Mustache templates.

use thiserror::Error;

use super::span::Span;

/// The kind of structural problem found while parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    /// An opening delimiter without a matching close delimiter.
    #[error("'{close}' was never closed")]
    UnclosedTag { close: String },

    /// `{{{key}}` written without the extra closing brace.
    #[error("Expected '{{'")]
    ExpectedTripleClose,

    /// A `{{=` directive not terminated by `=` before the close delimiter.
    #[error("Expected '='")]
    ExpectedDelimiterTerminator,

    /// A `{{=` directive that does not name exactly two delimiters.
    #[error("Invalid delimiters")]
    InvalidDelimiters,

    /// End of input reached inside an open section.
    #[error("Section '{tag}' was not closed")]
    UnclosedSection { tag: String },

    /// A closing tag that does not match the enclosing section.
    #[error("Section '{tag}' was not opened")]
    UnopenedSection { tag: String },

    /// Sections nested beyond the parser's depth limit.
    #[error("Sections nested too deeply (limit {limit})")]
    NestingTooDeep { limit: usize },
}

/// An error that occurred during parsing, with source diagnostics.
///
/// The display form is a single diagnostic block:
///
/// ```text
/// Section '#list' was not closed, line 2
///     {{#list}}
///     ^^^^^^^^^
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}, line {line}\n    {source_line}\n    {caret}")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    /// Offending byte range in the template.
    pub span: Span,
    /// 1-based line of `span.start`.
    pub line: usize,
    /// 1-based column of `span.start`, counted in characters.
    pub column: usize,
    /// Full text of the offending line.
    pub source_line: String,
    /// Spaces followed by carets underlining the span within the line.
    pub caret: String,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, span: Span, source: &str) -> Self {
        let line_span = span.line_span(source);
        let prefix = &source[line_span.start..span.start];
        let column = prefix.chars().count() + 1;
        let underlined = source[span.start..span.end.clamp(span.start, line_span.end)]
            .chars()
            .count()
            .max(1);
        let caret = format!("{}{}", " ".repeat(column - 1), "^".repeat(underlined));

        Self {
            kind,
            span,
            line: span.line_number(source),
            column,
            source_line: line_span.slice(source).to_string(),
            caret,
        }
    }

    /// The message without location details.
    pub fn message(&self) -> String {
        self.kind.to_string()
    }
}
