//! Recursive-descent template parser.
//!
//! Turns the linear stream of tags produced by the tokenizer into a node tree.
//! Each section body is parsed by a nested call guarded by the section's key;
//! the nested call ends at the matching `{{/key}}` tag.

use tracing::{debug, trace};

use super::ast::{Delimiters, Node, Section, Template};
use super::error::{ParseError, ParseErrorKind};
use super::span::Span;
use super::tokenizer::{Tag, TagKind, next_tag};

/// Maximum depth of nested sections accepted by the parser.
pub const MAX_NESTING_DEPTH: usize = 256;

/// Parse a template string using the default `{{ }}` delimiters.
pub fn parse_template(source: &str) -> Result<Template, ParseError> {
    parse_with_delimiters(source, &Delimiters::default())
}

/// Parse a template string starting with the given delimiters.
///
/// Parsing always begins at the start of `source` with no enclosing section,
/// so any closing tag left over at the top level is an unopened-section error.
/// Section bodies are parsed internally from the offset just past their
/// opening tag and end at the closing tag for that section's key.
pub fn parse_with_delimiters(
    source: &str,
    delimiters: &Delimiters,
) -> Result<Template, ParseError> {
    if delimiters.open.is_empty() || delimiters.close.is_empty() {
        return Err(ParseError::new(
            ParseErrorKind::InvalidDelimiters,
            Span::new(0, 0),
            source,
        ));
    }

    let block = parse_block(source, delimiters.clone(), 0, None, 0)?;
    if let Some(closing) = block.closing {
        return Err(unopened(&closing, source));
    }
    debug!(nodes = block.nodes.len(), "parsed template");
    Ok(Template { nodes: block.nodes })
}

/// Result of parsing one block: the top level or a section body.
struct Block {
    nodes: Vec<Node>,
    /// Delimiters in effect where the block ended.
    delimiters: Delimiters,
    /// The closing tag that ended the block, if input did not run out first.
    closing: Option<Tag>,
}

/// Parse nodes from `start` until end of input or a closing tag.
///
/// A closing tag is only accepted when it matches `enclosing`; any other
/// closing tag is an error.
fn parse_block(
    source: &str,
    mut delimiters: Delimiters,
    start: usize,
    enclosing: Option<&str>,
    depth: usize,
) -> Result<Block, ParseError> {
    let mut nodes = Vec::new();
    let mut index = start;

    while index < source.len() {
        let Some(tag) = next_tag(source, &delimiters, index)? else {
            break;
        };

        if tag.span.start > index {
            nodes.push(Node::Literal(source[index..tag.span.start].to_string()));
        }

        match tag.kind {
            TagKind::Close => {
                if enclosing != Some(tag.key.as_str()) {
                    return Err(unopened(&tag, source));
                }
                return Ok(Block {
                    nodes,
                    delimiters,
                    closing: Some(tag),
                });
            }
            TagKind::Section | TagKind::Inverted => {
                if depth >= MAX_NESTING_DEPTH {
                    return Err(ParseError::new(
                        ParseErrorKind::NestingTooDeep {
                            limit: MAX_NESTING_DEPTH,
                        },
                        tag.token,
                        source,
                    ));
                }
                trace!(key = %tag.key, depth, "opening section");
                let inner = parse_block(
                    source,
                    delimiters.clone(),
                    tag.span.end,
                    Some(tag.key.as_str()),
                    depth + 1,
                )?;
                let Some(closing) = inner.closing else {
                    return Err(ParseError::new(
                        ParseErrorKind::UnclosedSection {
                            tag: format!("{}{}", tag.kind.sigil(), tag.key),
                        },
                        tag.span,
                        source,
                    ));
                };
                trace!(key = %tag.key, depth, "closed section");

                nodes.push(Node::Section(Section {
                    inverted: tag.kind == TagKind::Inverted,
                    raw: source[tag.span.end..closing.span.start].to_string(),
                    key: tag.key,
                    body: inner.nodes,
                    delimiters,
                }));
                delimiters = inner.delimiters;
                index = closing.span.end;
                continue;
            }
            TagKind::SetDelimiters(new) => {
                nodes.push(Node::DelimiterChange(new.clone()));
                delimiters = new;
            }
            TagKind::Variable => nodes.push(Node::Interpolation {
                key: tag.key,
                escaped: true,
            }),
            TagKind::Unescaped => nodes.push(Node::Interpolation {
                key: tag.key,
                escaped: false,
            }),
            TagKind::Partial | TagKind::DynamicPartial => nodes.push(Node::Partial {
                dynamic: tag.kind == TagKind::DynamicPartial,
                key: tag.key,
                indent: tag.indent,
            }),
            TagKind::Comment => nodes.push(Node::Comment),
        }

        index = tag.span.end;
    }

    if index < source.len() {
        nodes.push(Node::Literal(source[index..].to_string()));
    }

    Ok(Block {
        nodes,
        delimiters,
        closing: None,
    })
}

fn unopened(tag: &Tag, source: &str) -> ParseError {
    ParseError::new(
        ParseErrorKind::UnopenedSection {
            tag: format!("/{}", tag.key),
        },
        tag.token,
        source,
    )
}
