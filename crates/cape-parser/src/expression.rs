//! Predicate expression parser using precedence climbing
//!
//! Precedence (lowest to highest):
//! 1. or
//! 2. and
//! 3. not (prefix)
//! 4. comparison (==, !=, <, <=, >, >=) and membership (in, not in)
//! 5. atoms: parenthesized expression, literal, identifier
//!
//! Comparisons do not chain: `a < b < c` leaves `< c` unconsumed. Runs of the
//! same logical operator parse into one flat [`LogicalExpr`], so a long
//! disjunction never deepens the tree. Parentheses and `not` nest at most
//! [`MAX_NESTING`](crate::MAX_NESTING) levels.

use crate::combinators::{
    identifier_parser, keyword, lit, literal_parser, nested, offset, padded_keyword, span_from, ws,
    Input, PResult,
};
use cape_ast::{
    BinaryOp, BinaryOpExpr, Expression, Literal, LogicalExpr, MembershipExpr, Spanned, UnaryOp,
    UnaryOpExpr, VariableRef,
};
use cape_diagnostics::Span;
use winnow::error::ErrMode;
use winnow::stream::Stream;

/// Promote a soft failure to a hard one once an operator has committed us
fn required<T>(result: PResult<T>) -> PResult<T> {
    result.map_err(|e| match e {
        ErrMode::Backtrack(ctx) => ErrMode::Cut(ctx),
        other => other,
    })
}

fn binary(left: Spanned<Expression>, op: BinaryOp, right: Spanned<Expression>) -> Spanned<Expression> {
    let span = left.span.merge(right.span);
    Spanned::new(
        Expression::BinaryOp(BinaryOpExpr {
            left: Box::new(left),
            op,
            right: Box::new(right),
        }),
        span,
    )
}

/// Entry point: a full predicate expression
pub fn expression_parser(input: &mut Input<'_>) -> PResult<Spanned<Expression>> {
    or_expression(input)
}

/// A run of one logical operator; a single operand is returned as is
fn logical_chain(
    input: &mut Input<'_>,
    op: BinaryOp,
    operand: fn(&mut Input<'_>) -> PResult<Spanned<Expression>>,
) -> PResult<Spanned<Expression>> {
    let first = operand(input)?;
    if padded_keyword(input, op.as_str()).is_err() {
        return Ok(first);
    }

    let start = first.span;
    let mut operands = vec![first];
    loop {
        operands.push(required(operand(input))?);
        if padded_keyword(input, op.as_str()).is_err() {
            break;
        }
    }
    let span = operands.last().map_or(start, |last| start.merge(last.span));
    Ok(Spanned::new(Expression::Logical(LogicalExpr { op, operands }), span))
}

/// Level 1: `a or b or ...`
fn or_expression(input: &mut Input<'_>) -> PResult<Spanned<Expression>> {
    logical_chain(input, BinaryOp::Or, and_expression)
}

/// Level 2: `a and b and ...`
fn and_expression(input: &mut Input<'_>) -> PResult<Spanned<Expression>> {
    logical_chain(input, BinaryOp::And, not_expression)
}

/// Level 3: prefix `not`
fn not_expression(input: &mut Input<'_>) -> PResult<Spanned<Expression>> {
    let start = offset(input);
    if keyword(input, "not").is_ok() {
        ws(input)?;
        let operand = required(nested(input, not_expression))?;
        let span = Span::new(start, operand.span.end);
        return Ok(Spanned::new(
            Expression::UnaryOp(UnaryOpExpr {
                op: UnaryOp::Not,
                operand: Box::new(operand),
            }),
            span,
        ));
    }
    comparison_expression(input)
}

fn comparison_op(input: &mut Input<'_>) -> Option<BinaryOp> {
    // Two-character operators first so `<=` is not read as `<` followed by `=`
    const OPS: &[(&str, BinaryOp)] = &[
        ("==", BinaryOp::Equal),
        ("!=", BinaryOp::NotEqual),
        ("<=", BinaryOp::LessOrEqual),
        (">=", BinaryOp::GreaterOrEqual),
        ("<", BinaryOp::Less),
        (">", BinaryOp::Greater),
    ];
    OPS.iter()
        .find(|(text, _)| lit(input, text).is_ok())
        .map(|(_, op)| *op)
}

/// Level 4: a single comparison or membership test
fn comparison_expression(input: &mut Input<'_>) -> PResult<Spanned<Expression>> {
    let left = atom(input)?;

    let checkpoint = input.checkpoint();
    ws(input)?;

    if let Some(op) = comparison_op(input) {
        ws(input)?;
        let right = required(atom(input))?;
        return Ok(binary(left, op, right));
    }

    if keyword(input, "in").is_ok() {
        ws(input)?;
        return membership(input, left, false);
    }

    if keyword(input, "not").is_ok() {
        ws(input)?;
        if keyword(input, "in").is_ok() {
            ws(input)?;
            return membership(input, left, true);
        }
    }

    input.reset(&checkpoint);
    Ok(left)
}

fn membership(
    input: &mut Input<'_>,
    operand: Spanned<Expression>,
    negated: bool,
) -> PResult<Spanned<Expression>> {
    let (items, list_span) = required(list_parser(input))?;
    let span = operand.span.merge(list_span);
    Ok(Spanned::new(
        Expression::Membership(MembershipExpr {
            operand: Box::new(operand),
            items,
            negated,
        }),
        span,
    ))
}

/// `[lit, lit, ...]`, possibly empty, trailing comma allowed
fn list_parser(input: &mut Input<'_>) -> PResult<(Vec<Spanned<Literal>>, Span)> {
    let start = offset(input);
    lit(input, "[")?;
    ws(input)?;

    let mut items = Vec::new();
    loop {
        if lit(input, "]").is_ok() {
            return Ok((items, span_from(input, start)));
        }

        let item_start = offset(input);
        let item = required(literal_parser(input))?;
        items.push(Spanned::new(item, span_from(input, item_start)));
        ws(input)?;

        if lit(input, ",").is_ok() {
            ws(input)?;
        } else if lit(input, "]").is_ok() {
            return Ok((items, span_from(input, start)));
        } else {
            return required(lit(input, "]")).map(|_| (items, span_from(input, start)));
        }
    }
}

/// Level 5: parenthesized expression, literal or variable reference
fn atom(input: &mut Input<'_>) -> PResult<Spanned<Expression>> {
    let start = offset(input);

    if lit(input, "(").is_ok() {
        let inner = nested(input, |input| {
            ws(input)?;
            let inner = required(expression_parser(input))?;
            ws(input)?;
            required(lit(input, ")"))?;
            Ok(inner)
        })?;
        return Ok(Spanned::new(inner.inner, span_from(input, start)));
    }

    match literal_parser(input) {
        Ok(value) => return Ok(Spanned::new(Expression::Literal(value), span_from(input, start))),
        Err(ErrMode::Backtrack(_)) => {}
        Err(e) => return Err(e),
    }

    let name = identifier_parser(input)?;
    let span = span_from(input, start);
    Ok(Spanned::new(Expression::Variable(VariableRef::new(name, span)), span))
}
