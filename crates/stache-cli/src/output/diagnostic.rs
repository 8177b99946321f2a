//! Miette diagnostic wrapper for template parse errors.
//!
//! Note: This module has an exception for `unused_assignments` because miette
//! derive macros read struct fields in generated code that rustc cannot track.
#![allow(unused_assignments)]

use std::path::Path;

use miette::{Diagnostic, NamedSource, SourceSpan};
use stache::{ParseError, ParseErrorKind};
use thiserror::Error;

/// A miette-compatible diagnostic for template parse errors.
///
/// Note: Fields are read by miette derive macros, not directly by code.
#[derive(Debug, Error, Diagnostic)]
#[error("syntax error: {message}")]
#[diagnostic(code(stache::syntax))]
pub struct TemplateDiagnostic {
    #[source_code]
    src: NamedSource<String>,

    #[label("error here")]
    span: SourceSpan,

    message: String,

    #[help]
    help: Option<String>,
}

impl TemplateDiagnostic {
    /// Create a diagnostic from a ParseError with source context.
    pub fn from_parse_error(path: &Path, content: &str, err: &ParseError) -> Self {
        // Clamp to content length to avoid miette panic on out-of-bounds
        let offset = err.span.start.min(content.len());
        let length = err.span.len().min(content.len() - offset);

        TemplateDiagnostic {
            src: NamedSource::new(path.display().to_string(), content.to_string()),
            span: (offset, length).into(),
            message: err.message(),
            help: help_for(&err.kind),
        }
    }
}

fn help_for(kind: &ParseErrorKind) -> Option<String> {
    match kind {
        ParseErrorKind::UnclosedTag { close } => Some(format!("add '{close}' to end the tag")),
        ParseErrorKind::ExpectedTripleClose => {
            Some("triple mustache tags end with '}}}'".to_string())
        }
        ParseErrorKind::ExpectedDelimiterTerminator | ParseErrorKind::InvalidDelimiters => {
            Some("set delimiters with '{{=<open> <close>=}}'".to_string())
        }
        ParseErrorKind::UnclosedSection { tag } => {
            Some(format!("close the section with '{{{{/{}}}}}'", &tag[1..]))
        }
        ParseErrorKind::UnopenedSection { .. } | ParseErrorKind::NestingTooDeep { .. } => None,
    }
}
