//! Template rendering.
//!
//! Walks a parsed template, resolving keys through a [`Context`] and expanding
//! partials and lambdas as they are reached. Partials and lambda output are
//! parsed on demand; nothing is cached between calls.

use std::borrow::Cow;
use std::collections::HashMap;

use bon::Builder;
use tracing::{debug, trace};

use crate::interpreter::{Context, RenderError};
use crate::parser::{
    Delimiters, MAX_NESTING_DEPTH, Node, ParseError, Section, Template, parse_template,
    parse_with_delimiters,
};
use crate::types::{Lambda, Value};

/// Default limit on nested partial and lambda expansions.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Default limit on open sections plus expansions at any point of a render.
///
/// Enough for a template at the parser's nesting limit that also uses the
/// full expansion budget.
pub const DEFAULT_MAX_NESTING: usize = MAX_NESTING_DEPTH + DEFAULT_MAX_DEPTH;

/// Renders templates with a fixed set of partials and options.
///
/// # Example
///
/// ```
/// use stache::{Renderer, data};
/// use std::collections::HashMap;
///
/// let renderer = Renderer::builder()
///     .partials(HashMap::from([("user".to_string(), "<b>{{name}}</b>".to_string())]))
///     .build();
///
/// let output = renderer.render("Hi {{>user}}!", &data! { "name" => "Ana" }).unwrap();
/// assert_eq!(output, "Hi <b>Ana</b>!");
/// ```
#[derive(Debug, Clone, Builder)]
pub struct Renderer {
    /// Partial name to unparsed partial source.
    #[builder(default)]
    partials: HashMap<String, String>,

    /// Delimiters top-level templates start with. Partials and value lambda
    /// output always start with the default delimiters.
    #[builder(default)]
    delimiters: Delimiters,

    /// Maximum nesting of partial and lambda expansions.
    #[builder(default = DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    /// Maximum number of sections and expansions open at once, counted
    /// across partial boundaries.
    #[builder(default = DEFAULT_MAX_NESTING)]
    max_nesting: usize,
}

impl Default for Renderer {
    fn default() -> Self {
        Renderer::builder().build()
    }
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn partials(&self) -> &HashMap<String, String> {
        &self.partials
    }

    /// Register or replace a partial.
    pub fn add_partial(&mut self, name: impl Into<String>, source: impl Into<String>) {
        self.partials.insert(name.into(), source.into());
    }

    pub fn delimiters(&self) -> &Delimiters {
        &self.delimiters
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn max_nesting(&self) -> usize {
        self.max_nesting
    }

    /// Parse `source` with this renderer's starting delimiters.
    pub fn parse(&self, source: &str) -> Result<Template, ParseError> {
        parse_with_delimiters(source, &self.delimiters)
    }

    /// Parse and render `source` against `data`.
    pub fn render(&self, source: &str, data: &Value) -> Result<String, RenderError> {
        let template = self.parse(source)?;
        self.render_template(&template, data)
    }

    /// Render an already parsed template against `data`.
    pub fn render_template(&self, template: &Template, data: &Value) -> Result<String, RenderError> {
        let expansion = Expansion::new(&self.partials, self.max_depth, self.max_nesting);
        render_root(&template.nodes, data, expansion)
    }
}

impl Template {
    /// Render against `data` with no partials.
    pub fn render(&self, data: &Value) -> Result<String, RenderError> {
        self.render_with_partials(data, &HashMap::new())
    }

    /// Render against `data`, resolving `{{>name}}` tags from `partials`.
    pub fn render_with_partials(
        &self,
        data: &Value,
        partials: &HashMap<String, String>,
    ) -> Result<String, RenderError> {
        let expansion = Expansion::new(partials, DEFAULT_MAX_DEPTH, DEFAULT_MAX_NESTING);
        render_root(&self.nodes, data, expansion)
    }
}

/// Render a template string against `data` with no partials.
pub fn render(source: &str, data: &Value) -> Result<String, RenderError> {
    parse_template(source)?.render(data)
}

/// Render a template string against `data`, resolving partials from `partials`.
pub fn render_with_partials(
    source: &str,
    data: &Value,
    partials: &HashMap<String, String>,
) -> Result<String, RenderError> {
    parse_template(source)?.render_with_partials(data, partials)
}

fn render_root(
    nodes: &[Node],
    data: &Value,
    expansion: Expansion<'_>,
) -> Result<String, RenderError> {
    let mut context = Context::new(data);
    let mut out = String::new();
    render_nodes(nodes, &mut context, expansion, &mut out)?;
    Ok(out)
}

/// Partials and the current recursion state.
///
/// `depth` counts partial and lambda expansions. `nesting` counts those plus
/// every open section, so sections nested inside a recursive partial are
/// bounded too.
#[derive(Debug, Clone, Copy)]
struct Expansion<'p> {
    partials: &'p HashMap<String, String>,
    depth: usize,
    max_depth: usize,
    nesting: usize,
    max_nesting: usize,
}

impl<'p> Expansion<'p> {
    fn new(partials: &'p HashMap<String, String>, max_depth: usize, max_nesting: usize) -> Self {
        Self {
            partials,
            depth: 0,
            max_depth,
            nesting: 0,
            max_nesting,
        }
    }

    /// One level deeper, for expanding the partial or lambda `name`.
    fn enter(self, name: &str) -> Result<Self, RenderError> {
        if self.depth >= self.max_depth {
            return Err(RenderError::MaxDepthExceeded {
                name: name.to_string(),
                depth: self.max_depth,
            });
        }
        Ok(Self {
            depth: self.depth + 1,
            ..self.nest(name)?
        })
    }

    /// One level deeper, for rendering the body of section `key`.
    fn nest(self, key: &str) -> Result<Self, RenderError> {
        if self.nesting >= self.max_nesting {
            return Err(RenderError::NestingTooDeep {
                key: key.to_string(),
                limit: self.max_nesting,
            });
        }
        Ok(Self {
            nesting: self.nesting + 1,
            ..self
        })
    }
}

fn render_nodes<'a>(
    nodes: &[Node],
    context: &mut Context<'a>,
    expansion: Expansion<'_>,
    out: &mut String,
) -> Result<(), RenderError> {
    for node in nodes {
        match node {
            Node::Literal(text) => out.push_str(text),
            Node::Interpolation { key, escaped } => {
                let text = interpolate(key, context, expansion)?;
                if *escaped {
                    escape_html(&text, out);
                } else {
                    out.push_str(&text);
                }
            }
            Node::Section(section) => render_section(section, context, expansion, out)?,
            Node::Partial {
                key,
                dynamic,
                indent,
            } => render_partial(key, *dynamic, indent, context, expansion, out)?,
            Node::DelimiterChange(_) | Node::Comment => {}
        }
    }
    Ok(())
}

/// Text for an interpolation tag, before escaping.
fn interpolate(
    key: &str,
    context: &mut Context<'_>,
    expansion: Expansion<'_>,
) -> Result<String, RenderError> {
    let Some(value) = context.get(key) else {
        return Ok(String::new());
    };
    let Some(lambda) = value.as_lambda() else {
        return Ok(value.to_string());
    };

    debug!(key, "expanding interpolation lambda");
    let expansion = expansion.enter(key)?;
    let defaults = Delimiters::default();
    match lambda {
        Lambda::Value(f) => render_source(&f(), &defaults, context, expansion),
        Lambda::Section(f) => render_source(&f(""), &defaults, context, expansion),
        Lambda::Render(f) => {
            let mut renderer = SectionRenderer::new(context.clone(), defaults, expansion);
            f("", &mut renderer)
        }
    }
}

fn render_section<'a>(
    section: &Section,
    context: &mut Context<'a>,
    expansion: Expansion<'_>,
    out: &mut String,
) -> Result<(), RenderError> {
    let value = context.get(&section.key);
    let truthy = value.is_some_and(Value::is_truthy);

    if section.inverted {
        if !truthy {
            let expansion = expansion.nest(&section.key)?;
            render_nodes(&section.body, context, expansion, out)?;
        }
        return Ok(());
    }

    let Some(value) = value.filter(|_| truthy) else {
        return Ok(());
    };
    trace!(key = %section.key, nesting = expansion.nesting, "rendering section");
    let expansion = expansion.nest(&section.key)?;

    match value {
        Value::Lambda(lambda) => {
            debug!(key = %section.key, "expanding section lambda");
            let expansion = expansion.enter(&section.key)?;
            let text = match lambda {
                Lambda::Value(f) => render_source(&f(), &section.delimiters, context, expansion)?,
                Lambda::Section(f) => {
                    render_source(&f(&section.raw), &section.delimiters, context, expansion)?
                }
                Lambda::Render(f) => {
                    let mut renderer = SectionRenderer::new(
                        context.clone(),
                        section.delimiters.clone(),
                        expansion,
                    );
                    f(&section.raw, &mut renderer)?
                }
            };
            out.push_str(&text);
        }
        Value::List(items) => {
            for item in items {
                render_frame(&section.body, item, context, expansion, out)?;
            }
        }
        other => render_frame(&section.body, other, context, expansion, out)?,
    }
    Ok(())
}

/// Render `body` once with `frame` pushed as the innermost scope.
fn render_frame<'a>(
    body: &[Node],
    frame: &'a Value,
    context: &mut Context<'a>,
    expansion: Expansion<'_>,
    out: &mut String,
) -> Result<(), RenderError> {
    context.push(frame);
    let result = render_nodes(body, context, expansion, out);
    context.pop();
    result
}

fn render_partial(
    key: &str,
    dynamic: bool,
    indent: &str,
    context: &mut Context<'_>,
    expansion: Expansion<'_>,
    out: &mut String,
) -> Result<(), RenderError> {
    let name = if dynamic {
        match context.get(key) {
            Some(Value::String(name)) => name.as_str(),
            _ => return Ok(()),
        }
    } else {
        key
    };

    let Some(source) = expansion.partials.get(name) else {
        debug!(name, "partial not found");
        return Ok(());
    };
    let expansion = expansion.enter(name)?;

    let source = if indent.is_empty() {
        Cow::Borrowed(source.as_str())
    } else {
        Cow::Owned(indent_lines(source, indent))
    };
    let text = render_source(&source, &Delimiters::default(), context, expansion)?;
    out.push_str(&text);
    Ok(())
}

/// Parse `source` and render it in the current context.
fn render_source(
    source: &str,
    delimiters: &Delimiters,
    context: &mut Context<'_>,
    expansion: Expansion<'_>,
) -> Result<String, RenderError> {
    let template = parse_with_delimiters(source, delimiters)?;
    let mut out = String::new();
    render_nodes(&template.nodes, context, expansion, &mut out)?;
    Ok(out)
}

/// Prefix every line of `source` that has non-whitespace content.
fn indent_lines(source: &str, indent: &str) -> String {
    let mut out = String::with_capacity(source.len() + indent.len());
    for line in source.split_inclusive('\n') {
        if !line.trim().is_empty() {
            out.push_str(indent);
        }
        out.push_str(line);
    }
    out
}

/// Append `text` to `out` with HTML special characters escaped.
pub fn escape_html(text: &str, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
}

/// Renders text on behalf of a [`Lambda::Render`] section lambda.
///
/// Text is parsed with the delimiters that were active where the section was
/// opened and rendered against the section's context.
pub struct SectionRenderer<'r> {
    context: Context<'r>,
    delimiters: Delimiters,
    expansion: Expansion<'r>,
}

impl<'r> SectionRenderer<'r> {
    fn new(context: Context<'r>, delimiters: Delimiters, expansion: Expansion<'r>) -> Self {
        Self {
            context,
            delimiters,
            expansion,
        }
    }

    /// Render `text` in the section's context.
    pub fn render(&mut self, text: &str) -> Result<String, RenderError> {
        render_source(text, &self.delimiters, &mut self.context, self.expansion)
    }

    /// Render `text` with `data` pushed as an extra innermost frame.
    pub fn render_with(&mut self, text: &str, data: &Value) -> Result<String, RenderError> {
        let mut frames: Vec<&Value> = Vec::with_capacity(self.context.depth() + 1);
        frames.extend_from_slice(self.context.frames());
        frames.push(data);
        let mut context = Context::from_frames(frames);
        render_source(text, &self.delimiters, &mut context, self.expansion)
    }

    pub fn context(&self) -> &Context<'r> {
        &self.context
    }

    pub fn delimiters(&self) -> &Delimiters {
        &self.delimiters
    }
}
