use std::fmt::{self, Debug, Formatter};
use std::sync::Arc;

use crate::interpreter::{RenderError, SectionRenderer};

/// Signature of a value lambda: called with no arguments.
pub type ValueFn = dyn Fn() -> String + Send + Sync;

/// Signature of a text-transform section lambda: receives the raw section body.
pub type SectionFn = dyn Fn(&str) -> String + Send + Sync;

/// Signature of a rendering section lambda: receives the raw section body and
/// a renderer bound to the current context.
pub type RenderFn =
    dyn Fn(&str, &mut SectionRenderer<'_>) -> Result<String, RenderError> + Send + Sync;

/// A callable bound into template data.
///
/// The variant decides what the callable receives and what happens to its
/// output:
///
/// | Variant   | Called with                | Output                                   |
/// |-----------|----------------------------|------------------------------------------|
/// | `Value`   | nothing                    | parsed and rendered as a template        |
/// | `Section` | raw section text           | parsed and rendered as a template        |
/// | `Render`  | raw section text, renderer | inserted verbatim                        |
///
/// # Example
///
/// ```
/// use stache::{Lambda, data, render};
///
/// let data = data! {
///     "name" => "Willy",
///     "bold" => Lambda::section(|text| format!("<b>{text}</b>")),
/// };
/// let output = render("{{#bold}}Hi {{name}}.{{/bold}}", &data).unwrap();
/// assert_eq!(output, "<b>Hi Willy.</b>");
/// ```
#[derive(Clone)]
pub enum Lambda {
    Value(Arc<ValueFn>),
    Section(Arc<SectionFn>),
    Render(Arc<RenderFn>),
}

impl Lambda {
    pub fn value(f: impl Fn() -> String + Send + Sync + 'static) -> Self {
        Lambda::Value(Arc::new(f))
    }

    pub fn section(f: impl Fn(&str) -> String + Send + Sync + 'static) -> Self {
        Lambda::Section(Arc::new(f))
    }

    pub fn render(
        f: impl Fn(&str, &mut SectionRenderer<'_>) -> Result<String, RenderError>
        + Send
        + Sync
        + 'static,
    ) -> Self {
        Lambda::Render(Arc::new(f))
    }
}

impl Debug for Lambda {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Lambda::Value(_) => f.write_str("Lambda::Value(..)"),
            Lambda::Section(_) => f.write_str("Lambda::Section(..)"),
            Lambda::Render(_) => f.write_str("Lambda::Render(..)"),
        }
    }
}

/// Lambdas are equal only when they share the same closure.
impl PartialEq for Lambda {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Lambda::Value(a), Lambda::Value(b)) => Arc::ptr_eq(a, b),
            (Lambda::Section(a), Lambda::Section(b)) => Arc::ptr_eq(a, b),
            (Lambda::Render(a), Lambda::Render(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}
