//! Template string tokenizer using winnow.
//!
//! For a style with head `<`, tail `>`, separator `:` and escape `\`:
//! - `\<`, `\>` and `\\` produce the escaped character literally
//! - `<name:arg:arg>` is a placeholder; a part wrapped in single quotes is
//!   taken verbatim, so `<if:'<b>':x>` has the argument `<b>`
//! - a `<` that is not closed before the next unescaped `<` or the end of
//!   input is literal text, and scanning resumes right after it
//! - an escape character in front of any other character, or at the end of
//!   input, is literal text
//!
//! Inside a placeholder the separator and `'` may be escaped as well. A
//! placeholder keeps its source text for output when nothing resolves it,
//! with escapes removed: `<x:a\:b>` is emitted as `<x:a:b>`.

use winnow::combinator::{alt, delimited, peek, preceded, repeat};
use winnow::prelude::*;
use winnow::token::{any, none_of, one_of};

use super::ast::{Segment, Template};
use super::style::PlaceholderStyle;

const QUOTE: char = '\'';

/// Parse a template string into segments.
///
/// Parsing is total and deterministic: every input produces a template, and
/// the same input and style always produce equal templates.
pub fn parse_template(input: &str, style: &PlaceholderStyle) -> Template {
    let mut remaining = input;
    let mut segments = Vec::new();
    // `segment` only fails once the input is exhausted.
    while let Ok(segment) = segment(&mut remaining, style) {
        segments.push(segment);
    }
    Template {
        segments: merge_literals(segments),
    }
}

/// Merge adjacent Literal segments into single segments.
fn merge_literals(segments: Vec<Segment>) -> Vec<Segment> {
    let mut result = Vec::with_capacity(segments.len());

    for segment in segments {
        match segment {
            Segment::Literal(text) => {
                if let Some(Segment::Literal(prev)) = result.last_mut() {
                    prev.push_str(&text);
                } else {
                    result.push(Segment::Literal(text));
                }
            }
            other @ Segment::Placeholder { .. } => result.push(other),
        }
    }

    result
}

/// Parse a single segment (escape, placeholder, or literal character).
fn segment(input: &mut &str, style: &PlaceholderStyle) -> ModalResult<Segment> {
    alt((
        |i: &mut &str| escape_sequence(i, style),
        |i: &mut &str| placeholder(i, style),
        literal_char,
    ))
    .parse_next(input)
}

/// Parse an escaped head, tail or escape character.
fn escape_sequence(input: &mut &str, style: &PlaceholderStyle) -> ModalResult<Segment> {
    preceded(style.escape, one_of([style.head, style.tail, style.escape]))
        .map(|c: char| Segment::Literal(c.to_string()))
        .parse_next(input)
}

/// Parse any single character as literal text.
fn literal_char(input: &mut &str) -> ModalResult<Segment> {
    any.map(|c: char| Segment::Literal(c.to_string()))
        .parse_next(input)
}

/// Parse a delimited placeholder: head name (separator argument)* tail
fn placeholder(input: &mut &str, style: &PlaceholderStyle) -> ModalResult<Segment> {
    let start = *input;
    one_of(style.head).parse_next(input)?;
    let name = part(input, style)?;
    let arguments: Vec<String> =
        repeat(0.., preceded(style.separator, |i: &mut &str| part(i, style))).parse_next(input)?;
    one_of(style.tail).parse_next(input)?;

    let raw = unescape(&start[..start.len() - input.len()], style);
    Ok(Segment::Placeholder {
        name,
        arguments,
        raw,
    })
}

/// Parse the name or one argument of a placeholder.
fn part(input: &mut &str, style: &PlaceholderStyle) -> ModalResult<String> {
    alt((
        |i: &mut &str| quoted_part(i, style),
        |i: &mut &str| plain_part(i, style),
    ))
    .parse_next(input)
}

/// Parse a part wrapped in single quotes. The closing quote must end the part.
fn quoted_part(input: &mut &str, style: &PlaceholderStyle) -> ModalResult<String> {
    let text = delimited(
        QUOTE,
        repeat(
            0..,
            alt((
                |i: &mut &str| body_escape(i, style),
                none_of([QUOTE, style.escape]),
            )),
        ),
        QUOTE,
    )
    .parse_next(input)?;
    peek(one_of([style.separator, style.tail])).parse_next(input)?;
    Ok(text)
}

/// Parse an unquoted part, stopping at any unescaped syntax character.
fn plain_part(input: &mut &str, style: &PlaceholderStyle) -> ModalResult<String> {
    repeat(
        0..,
        alt((
            |i: &mut &str| body_escape(i, style),
            none_of([style.head, style.tail, style.separator, style.escape]),
        )),
    )
    .parse_next(input)
}

/// Drops each escape character that precedes a syntax character.
fn unescape(source: &str, style: &PlaceholderStyle) -> String {
    let escapable = [style.head, style.tail, style.escape, style.separator, QUOTE];
    let mut output = String::with_capacity(source.len());
    let mut chars = source.chars().peekable();
    while let Some(c) = chars.next() {
        match chars.peek() {
            Some(next) if c == style.escape && escapable.contains(next) => {
                output.push(*next);
                chars.next();
            }
            _ => output.push(c),
        }
    }
    output
}

/// Parse an escape inside a placeholder body.
///
/// An escape character that does not precede a syntax character is itself literal.
fn body_escape(input: &mut &str, style: &PlaceholderStyle) -> ModalResult<char> {
    let escapable = [style.head, style.tail, style.escape, style.separator, QUOTE];
    alt((preceded(style.escape, one_of(escapable)), one_of(style.escape))).parse_next(input)
}
