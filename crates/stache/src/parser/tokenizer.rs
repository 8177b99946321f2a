//! Tag scanner.
//!
//! Finds the next tag under the active delimiters, classifies its sigil and
//! decides whether it stands alone on its line.

use tracing::trace;
use winnow::combinator::{delimited, eof, opt, preceded, separated_pair};
use winnow::prelude::*;
use winnow::token::{one_of, rest, take_till, take_until, take_while};

use super::ast::Delimiters;
use super::error::{ParseError, ParseErrorKind};
use super::span::Span;

/// What a tag does, selected by its sigil.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagKind {
    /// `{{key}}`
    Variable,
    /// `{{&key}}` or `{{{key}}}`
    Unescaped,
    /// `{{#key}}`
    Section,
    /// `{{^key}}`
    Inverted,
    /// `{{/key}}`
    Close,
    /// `{{>name}}`
    Partial,
    /// `{{>*name}}` or `{{*name}}`
    DynamicPartial,
    /// `{{=open close=}}`
    SetDelimiters(Delimiters),
    /// `{{! text }}`
    Comment,
}

impl TagKind {
    /// Interpolations are never trimmed as standalone lines.
    pub fn is_interpolation(&self) -> bool {
        matches!(self, TagKind::Variable | TagKind::Unescaped)
    }

    /// The sigil that introduces this kind of tag, if any.
    pub fn sigil(&self) -> &'static str {
        match self {
            TagKind::Variable => "",
            TagKind::Unescaped => "&",
            TagKind::Section => "#",
            TagKind::Inverted => "^",
            TagKind::Close => "/",
            TagKind::Partial => ">",
            TagKind::DynamicPartial => ">*",
            TagKind::SetDelimiters(_) => "=",
            TagKind::Comment => "!",
        }
    }
}

/// A scanned tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub kind: TagKind,
    /// Key with whitespace and sigil removed.
    pub key: String,
    /// The tag text itself, delimiters included.
    pub token: Span,
    /// Range the tag removes from the output: the whole line when the tag is
    /// standalone, otherwise `token`.
    pub span: Span,
    /// Whitespace preceding a standalone tag on its line.
    pub indent: String,
    pub standalone: bool,
}

/// Find the next tag at or after `from`.
///
/// Returns `Ok(None)` when the rest of the template is plain text.
pub fn next_tag(
    source: &str,
    delimiters: &Delimiters,
    from: usize,
) -> Result<Option<Tag>, ParseError> {
    let mut input = &source[from..];
    if text_before(&mut input, &delimiters.open).is_err() {
        return Ok(None);
    }
    let start = source.len() - input.len();

    let content = tag_content(&mut input, delimiters).map_err(|_| {
        ParseError::new(
            ParseErrorKind::UnclosedTag {
                close: delimiters.close.clone(),
            },
            Span::new(start, source.len()),
            source,
        )
    })?;
    let mut end = source.len() - input.len();

    let (sigil, rest) = tag_head.parse(content).unwrap_or((None, content));
    let rest = rest.trim();

    let (kind, key) = match sigil {
        None => (TagKind::Variable, rest),
        Some('&') => (TagKind::Unescaped, rest),
        Some('{') if delimiters.is_default() => {
            if triple_close(&mut input).is_err() {
                return Err(ParseError::new(
                    ParseErrorKind::ExpectedTripleClose,
                    Span::new(start, end),
                    source,
                ));
            }
            end = source.len() - input.len();
            (TagKind::Unescaped, rest)
        }
        Some('{') => (
            TagKind::Unescaped,
            rest.strip_suffix('}').map_or(rest, str::trim_end),
        ),
        Some('#') => (TagKind::Section, rest),
        Some('^') => (TagKind::Inverted, rest),
        Some('/') => (TagKind::Close, rest),
        Some('>') => match partial_name.parse(rest) {
            Ok((true, name)) => (TagKind::DynamicPartial, name),
            _ => (TagKind::Partial, rest),
        },
        Some('*') => (TagKind::DynamicPartial, rest),
        Some('=') => {
            let token = Span::new(start, end);
            (TagKind::SetDelimiters(new_delimiters(content, rest, source, token)?), "")
        }
        Some(_) => (TagKind::Comment, rest),
    };

    let token = Span::new(start, end);
    let line = Span::new(
        source[..start].rfind('\n').map_or(0, |i| i + 1),
        source[end..].find('\n').map_or(source.len(), |i| end + i + 1),
    );
    let before = &source[line.start..start];
    let after = &source[end..line.end];
    let standalone =
        before.chars().all(char::is_whitespace) && after.chars().all(char::is_whitespace);
    let trimmed = standalone && !kind.is_interpolation();

    let tag = Tag {
        kind,
        key: key.to_string(),
        token,
        span: if trimmed { line } else { token },
        indent: if trimmed { before.to_string() } else { String::new() },
        standalone,
    };
    trace!(kind = ?tag.kind, key = %tag.key, start = tag.token.start, standalone, "scanned tag");
    Ok(Some(tag))
}

/// Build the delimiters of a `{{=open close=}}` directive.
///
/// `content` is the whole tag body and `rest` the part after the `=` sigil.
fn new_delimiters(
    content: &str,
    rest: &str,
    source: &str,
    token: Span,
) -> Result<Delimiters, ParseError> {
    if !content.ends_with('=') {
        return Err(ParseError::new(
            ParseErrorKind::ExpectedDelimiterTerminator,
            token,
            source,
        ));
    }
    let inner = rest.strip_suffix('=').unwrap_or_default();
    delimiter_pair
        .parse(inner)
        .map(|(open, close)| Delimiters::new(open, close))
        .map_err(|_| ParseError::new(ParseErrorKind::InvalidDelimiters, token, source))
}

const SIGILS: [char; 9] = ['&', '{', '#', '^', '/', '>', '*', '=', '!'];

/// Skip plain text up to (not including) `open`.
fn text_before<'i>(input: &mut &'i str, open: &str) -> ModalResult<&'i str> {
    take_until(0.., open).parse_next(input)
}

/// A whole tag, returning the text between its delimiters.
fn tag_content<'i>(input: &mut &'i str, delimiters: &Delimiters) -> ModalResult<&'i str> {
    let open = delimiters.open.as_str();
    let close = delimiters.close.as_str();
    delimited(open, take_until(0.., close), close).parse_next(input)
}

/// The brace ending `{{{key}}}` after the closing delimiter.
fn triple_close(input: &mut &str) -> ModalResult<char> {
    '}'.parse_next(input)
}

/// Optional sigil after leading whitespace, then the rest of the tag body.
fn tag_head<'i>(input: &mut &'i str) -> ModalResult<(Option<char>, &'i str)> {
    (preceded(whitespace, opt(one_of(SIGILS))), rest).parse_next(input)
}

/// Partial name with its optional `*` dynamic marker.
fn partial_name<'i>(input: &mut &'i str) -> ModalResult<(bool, &'i str)> {
    (opt('*').map(|star| star.is_some()), preceded(whitespace, rest)).parse_next(input)
}

/// Exactly two whitespace separated delimiters.
fn delimiter_pair<'i>(input: &mut &'i str) -> ModalResult<(&'i str, &'i str)> {
    delimited(
        whitespace,
        separated_pair(word, take_while(1.., char::is_whitespace), word),
        (whitespace, eof),
    )
    .parse_next(input)
}

fn word<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    take_till(1.., char::is_whitespace).parse_next(input)
}

fn whitespace<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    take_while(0.., char::is_whitespace).parse_next(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn head_splits_sigil_after_whitespace() {
        assert_eq!(tag_head.parse(" # items ").unwrap(), (Some('#'), " items "));
        assert_eq!(tag_head.parse("name").unwrap(), (None, "name"));
        assert_eq!(tag_head.parse("").unwrap(), (None, ""));
    }

    #[test]
    fn partial_name_reads_dynamic_marker() {
        assert_eq!(partial_name.parse("* dynamic").unwrap(), (true, "dynamic"));
        assert_eq!(partial_name.parse("**dynamic").unwrap(), (true, "*dynamic"));
        assert_eq!(partial_name.parse("plain").unwrap(), (false, "plain"));
    }

    #[test]
    fn delimiter_pair_needs_exactly_two_words() {
        assert_eq!(delimiter_pair.parse(" <%   %> ").unwrap(), ("<%", "%>"));
        assert_eq!(delimiter_pair.parse("|\t|").unwrap(), ("|", "|"));
        assert!(delimiter_pair.parse("<%").is_err());
        assert!(delimiter_pair.parse("a b c").is_err());
        assert!(delimiter_pair.parse("").is_err());
    }

    #[test]
    fn tag_content_stops_at_first_close() {
        let delimiters = Delimiters::default();
        let mut input = "{{ a }}}rest";
        assert_eq!(tag_content(&mut input, &delimiters).unwrap(), " a ");
        assert_eq!(input, "}rest");
    }

    #[test]
    fn triple_mustache_consumes_extra_brace() {
        let tag = next_tag("x{{{a}}}y", &Delimiters::default(), 0).unwrap().unwrap();
        assert_eq!(tag.kind, TagKind::Unescaped);
        assert_eq!(tag.key, "a");
        assert_eq!(tag.token, Span::new(1, 8));
    }

    #[test]
    fn directive_without_pair_is_invalid() {
        let err = next_tag("{{=}}", &Delimiters::default(), 0).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::InvalidDelimiters);
        let err = next_tag("{{=<% %> }}", &Delimiters::default(), 0).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::ExpectedDelimiterTerminator);
    }

    #[test]
    fn plain_text_has_no_tag() {
        assert_eq!(next_tag("no tags here", &Delimiters::default(), 0).unwrap(), None);
    }
}
