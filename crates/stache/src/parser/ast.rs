//! Public AST types for Mustache templates.
//!
//! These types are public so a template can be parsed once and rendered many
//! times, and so external tooling can inspect template structure.

/// The open/close marker pair that delimits tags.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Delimiters {
    pub open: String,
    pub close: String,
}

impl Delimiters {
    pub fn new(open: impl Into<String>, close: impl Into<String>) -> Self {
        Self {
            open: open.into(),
            close: close.into(),
        }
    }

    /// Whether these are the default `{{ }}` markers.
    pub fn is_default(&self) -> bool {
        self.open == "{{" && self.close == "}}"
    }
}

impl Default for Delimiters {
    fn default() -> Self {
        Self::new("{{", "}}")
    }
}

/// A parsed template: a flat sequence of top-level nodes.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Template {
    pub nodes: Vec<Node>,
}

/// A node in the template tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Verbatim text between tags.
    Literal(String),
    /// `{{key}}`, `{{{key}}}` or `{{&key}}`.
    Interpolation { key: String, escaped: bool },
    /// `{{#key}}...{{/key}}` or `{{^key}}...{{/key}}`.
    Section(Section),
    /// `{{>name}}` or `{{>*name}}`.
    Partial {
        key: String,
        /// The key names a context value holding the partial's name.
        dynamic: bool,
        /// Whitespace before a standalone tag; empty otherwise.
        indent: String,
    },
    /// `{{=<% %>=}}`. Only affects parsing.
    DelimiterChange(Delimiters),
    /// `{{! ... }}`.
    Comment,
}

/// A truthy or inverted section and its parsed body.
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub key: String,
    pub inverted: bool,
    pub body: Vec<Node>,
    /// Unparsed text between the opening and closing tags, handed to lambdas.
    pub raw: String,
    /// Delimiters in effect when the section was opened.
    pub delimiters: Delimiters,
}
