//! Parser for CAPE rule predicates
//!
//! Output rules and visibility conditions are written in a small, restricted
//! boolean language:
//!
//! ```text
//! high_bleeding_risk_ncs == 'yes' and (pci_lt_1m == 'yes' or acs_lt_3m == 'yes')
//! p2y12_agent not in ['ticagrelor', 'prasugrel']
//! ```
//!
//! Only comparisons, membership against literal lists, `and`, `or`, `not` and
//! parentheses are accepted. There are no function calls, attribute access or
//! arithmetic, so a predicate can never do anything but read answers.

mod combinators;
mod expression;

use cape_ast::{Expression, Spanned};
use cape_diagnostics::{
    CapeError, Result, SourceLocation, Span, CAPE0001, CAPE0002, CAPE0003, CAPE0004, CAPE0005,
    CAPE0006, CAPE0007,
};
use combinators::{new_input, offset, ws};
use expression::expression_parser;

pub use combinators::{KEYWORDS, MAX_NESTING};

/// Parse a predicate expression, rejecting anything left unconsumed
pub fn parse_expression(source: &str) -> Result<Spanned<Expression>> {
    log::trace!("parsing predicate {source:?}");

    if source.trim().is_empty() {
        return Err(CapeError::parse_at(
            CAPE0005,
            "expected an expression, found empty text",
            source,
            SourceLocation::from_span(Span::point(0), source),
        ));
    }

    let mut input = new_input(source);
    let _ = ws(&mut input);

    match expression_parser(&mut input) {
        Ok(expr) => {
            let _ = ws(&mut input);
            if input.input.is_empty() {
                Ok(expr)
            } else {
                let pos = offset(&input);
                Err(CapeError::parse_at(
                    CAPE0006,
                    format!("unexpected {} after complete expression", describe(input.input)),
                    source,
                    location(source, pos, input.input),
                ))
            }
        }
        Err(_) if input.state.too_deep => {
            let pos = offset(&input);
            Err(CapeError::parse_at(
                CAPE0007,
                format!("expression nests deeper than {MAX_NESTING} levels"),
                source,
                SourceLocation::from_span(Span::point(pos), source),
            ))
        }
        Err(_) => {
            let pos = offset(&input);
            Err(classify_failure(source, pos))
        }
    }
}

/// Whether `source` parses as a predicate
pub fn is_valid(source: &str) -> bool {
    parse_expression(source).is_ok()
}

fn classify_failure(source: &str, pos: usize) -> CapeError {
    let rest = source.get(pos..).unwrap_or_default();
    let trimmed = rest.trim_start();
    let pos = pos + (rest.len() - trimmed.len());

    let (code, message) = match trimmed.chars().next() {
        None => (CAPE0002, "unexpected end of input".to_string()),
        Some('\'' | '"') if !string_closes(trimmed) => {
            (CAPE0003, "string literal is never closed".to_string())
        }
        Some(c) if c.is_ascii_digit() || c == '-' => {
            (CAPE0004, format!("invalid number literal {}", describe(trimmed)))
        }
        Some(_) => (CAPE0001, format!("unexpected {}", describe(trimmed))),
    };
    CapeError::parse_at(code, message, source, location(source, pos, trimmed))
}

fn string_closes(text: &str) -> bool {
    let mut chars = text.chars();
    let Some(quote) = chars.next() else {
        return false;
    };
    let mut escaped = false;
    for c in chars {
        match c {
            _ if escaped => escaped = false,
            '\\' => escaped = true,
            c if c == quote => return true,
            _ => {}
        }
    }
    false
}

fn token_len(rest: &str) -> usize {
    rest.find(char::is_whitespace).unwrap_or(rest.len()).max(1)
}

fn describe(rest: &str) -> String {
    let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
    format!("'{}'", &rest[..end])
}

fn location(source: &str, pos: usize, rest: &str) -> SourceLocation {
    let len = token_len(rest).min(rest.len().max(1));
    SourceLocation::from_span(Span::new(pos, pos + len), source)
}
