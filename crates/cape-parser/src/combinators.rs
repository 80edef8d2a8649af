//! Token-level parsers shared by the expression grammar

use cape_ast::Literal;
use cape_diagnostics::Span;
use rust_decimal::Decimal;
use std::str::FromStr;
use winnow::error::{ContextError, ErrMode};
use winnow::prelude::*;
use winnow::stream::{Stateful, Stream};
use winnow::token::{literal, take, take_while};

/// Deepest allowed nesting of parentheses and prefix `not`
pub const MAX_NESTING: usize = 128;

/// State carried alongside the input
#[derive(Debug, Clone, Copy)]
pub struct ParseState {
    /// Total length of the text, so byte offsets can be recovered from the
    /// remaining slice
    pub source_len: usize,
    pub depth: usize,
    /// Set when parsing stopped at the nesting limit
    pub too_deep: bool,
}

pub type Input<'a> = Stateful<&'a str, ParseState>;

pub type PResult<T> = winnow::ModalResult<T>;

/// Words that can never be variable names
pub const KEYWORDS: &[&str] = &[
    "and", "or", "not", "in", "true", "false", "null", "True", "False", "None",
];

pub fn new_input(source: &str) -> Input<'_> {
    Stateful {
        input: source,
        state: ParseState {
            source_len: source.len(),
            depth: 0,
            too_deep: false,
        },
    }
}

/// Byte offset of the next unconsumed character
pub fn offset(input: &Input<'_>) -> usize {
    input.state.source_len - input.input.len()
}

pub fn span_from(input: &Input<'_>, start: usize) -> Span {
    Span::new(start, offset(input))
}

pub fn backtrack<T>() -> PResult<T> {
    Err(ErrMode::Backtrack(ContextError::new()))
}

pub fn cut<T>() -> PResult<T> {
    Err(ErrMode::Cut(ContextError::new()))
}

/// Run `parser` one nesting level deeper, failing hard past [`MAX_NESTING`]
pub fn nested<'a, T>(
    input: &mut Input<'a>,
    parser: impl FnOnce(&mut Input<'a>) -> PResult<T>,
) -> PResult<T> {
    if input.state.depth >= MAX_NESTING {
        input.state.too_deep = true;
        return cut();
    }
    input.state.depth += 1;
    let result = parser(input);
    input.state.depth -= 1;
    result
}

/// Skip whitespace (including newlines from multi-line YAML strings)
pub fn ws(input: &mut Input<'_>) -> PResult<()> {
    take_while(0.., |c: char| c.is_whitespace())
        .void()
        .parse_next(input)
}

/// Match an exact piece of punctuation
pub fn lit<'a>(input: &mut Input<'a>, text: &'static str) -> PResult<&'a str> {
    literal(text).parse_next(input)
}

/// One or more characters matching `pred`
pub fn take_while1<'a>(input: &mut Input<'a>, pred: impl Fn(char) -> bool) -> PResult<&'a str> {
    take_while(1.., pred).parse_next(input)
}

/// Consume `n` bytes unconditionally
pub fn advance(input: &mut Input<'_>, n: usize) -> PResult<()> {
    take(n).void().parse_next(input)
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Match a keyword that is not the prefix of a longer identifier
pub fn keyword<'a>(input: &mut Input<'a>, word: &'static str) -> PResult<&'a str> {
    let checkpoint = input.checkpoint();
    let matched = lit(input, word)?;
    if input.input.chars().next().is_some_and(is_ident_char) {
        input.reset(&checkpoint);
        return backtrack();
    }
    Ok(matched)
}

/// Keyword surrounded by optional whitespace
pub fn padded_keyword<'a>(input: &mut Input<'a>, word: &'static str) -> PResult<&'a str> {
    let checkpoint = input.checkpoint();
    ws(input)?;
    match keyword(input, word) {
        Ok(matched) => {
            ws(input)?;
            Ok(matched)
        }
        Err(e) => {
            input.reset(&checkpoint);
            Err(e)
        }
    }
}

/// Parse a bare identifier that is not a keyword
pub fn identifier_parser<'a>(input: &mut Input<'a>) -> PResult<&'a str> {
    if !input.input.chars().next().is_some_and(is_ident_start) {
        return backtrack();
    }
    let checkpoint = input.checkpoint();
    let name = take_while1(input, is_ident_char)?;
    if KEYWORDS.contains(&name) {
        input.reset(&checkpoint);
        return backtrack();
    }
    Ok(name)
}

/// Parse a single- or double-quoted string with backslash escapes
///
/// An opening quote without a matching close is a hard (cut) failure and leaves
/// the input positioned on the opening quote.
pub fn string_parser(input: &mut Input<'_>) -> PResult<String> {
    let quote = match input.input.chars().next() {
        Some(q @ ('\'' | '"')) => q,
        _ => return backtrack(),
    };

    let mut value = String::new();
    let mut escaped = false;
    let mut consumed = None;
    for (i, c) in input.input.char_indices().skip(1) {
        if escaped {
            value.push(c);
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == quote {
            consumed = Some(i + c.len_utf8());
            break;
        } else {
            value.push(c);
        }
    }

    match consumed {
        Some(n) => {
            advance(input, n)?;
            Ok(value)
        }
        None => cut(),
    }
}

/// Parse an integer or decimal number with an optional leading minus
pub fn number_parser(input: &mut Input<'_>) -> PResult<Decimal> {
    let checkpoint = input.checkpoint();
    let negative = lit(input, "-").is_ok();
    if !input.input.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        input.reset(&checkpoint);
        return backtrack();
    }
    let digits = take_while1(input, |c| c.is_ascii_digit() || c == '.')?;
    let text = if negative {
        format!("-{digits}")
    } else {
        digits.to_string()
    };
    match Decimal::from_str(&text) {
        Ok(n) => Ok(n),
        Err(_) => {
            input.reset(&checkpoint);
            cut()
        }
    }
}

/// Parse any literal value
pub fn literal_parser(input: &mut Input<'_>) -> PResult<Literal> {
    if keyword(input, "true").is_ok() || keyword(input, "True").is_ok() {
        return Ok(Literal::Boolean(true));
    }
    if keyword(input, "false").is_ok() || keyword(input, "False").is_ok() {
        return Ok(Literal::Boolean(false));
    }
    if keyword(input, "null").is_ok() || keyword(input, "None").is_ok() {
        return Ok(Literal::Null);
    }
    if let Some('\'' | '"') = input.input.chars().next() {
        return string_parser(input).map(Literal::String);
    }
    number_parser(input).map(Literal::Number)
}
