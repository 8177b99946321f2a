//! Mustache template parser.
//!
//! Parsing is purely structural: no data is consulted, so a parsed
//! [`Template`] can be rendered any number of times against different data.

pub mod ast;
pub mod error;
pub mod span;
pub mod tokenizer;
mod template;

pub use ast::*;
pub use error::{ParseError, ParseErrorKind};
pub use span::Span;
pub use template::{MAX_NESTING_DEPTH, parse_template, parse_with_delimiters};
pub use tokenizer::{Tag, TagKind, next_tag};
