//! Predicate evaluator
//!
//! Walks a parsed predicate against an [`EvaluationContext`]. Every operator
//! implementation lives under [`crate::operators`]; this module only dispatches.

use crate::context::EvaluationContext;
use crate::error::{EvalError, EvalResult};
use crate::Value;
use cape_ast::{Expression, Spanned};

/// Stateless evaluator for parsed predicates
#[derive(Debug, Clone, Copy, Default)]
pub struct PredicateEngine;

impl PredicateEngine {
    pub fn new() -> Self {
        Self
    }

    /// Evaluate an expression to a value
    pub fn evaluate(&self, expr: &Spanned<Expression>, ctx: &EvaluationContext<'_>) -> EvalResult<Value> {
        match &expr.inner {
            Expression::Literal(lit) => Ok(Value::from(lit)),
            Expression::Variable(var) => {
                if !ctx.namespace.contains(&var.name) {
                    return Err(EvalError::undeclared(&var.name, var.span));
                }
                Ok(ctx.values.lookup(&var.name).cloned().unwrap_or(Value::Null))
            }
            Expression::UnaryOp(e) => self.eval_not(e, ctx),
            Expression::Logical(e) => self.eval_logical(e, ctx),
            Expression::BinaryOp(e) => self.eval_comparison(e, expr.span, ctx),
            Expression::Membership(e) => self.eval_membership(e, expr.span, ctx),
        }
    }

    /// Evaluate a whole predicate: the result must be Boolean or null
    ///
    /// Returns `true` only when the predicate is boolean `true`.
    pub fn is_satisfied(&self, expr: &Spanned<Expression>, ctx: &EvaluationContext<'_>) -> EvalResult<bool> {
        match self.evaluate(expr, ctx)? {
            Value::Boolean(b) => Ok(b),
            Value::Null => Ok(false),
            other => Err(EvalError::non_boolean(other.type_name(), expr.span)),
        }
    }
}
