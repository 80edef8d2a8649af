//! Logical operators: and, or, not
//!
//! All three use three-valued logic. Chains are evaluated left to right in a
//! loop and stop at the first operand that decides the result, so
//! `false and x` never looks at `x`.

use crate::context::EvaluationContext;
use crate::engine::PredicateEngine;
use crate::error::{EvalError, EvalResult};
use crate::Value;
use cape_ast::{BinaryOp, Expression, LogicalExpr, Spanned, UnaryOpExpr};

fn as_logical(value: Value, operand: &Spanned<Expression>) -> EvalResult<Option<bool>> {
    match value {
        Value::Boolean(b) => Ok(Some(b)),
        Value::Null => Ok(None),
        other => Err(EvalError::non_boolean(other.type_name(), operand.span)),
    }
}

fn to_value(b: Option<bool>) -> Value {
    b.map(Value::Boolean).unwrap_or(Value::Null)
}

impl PredicateEngine {
    /// Evaluate an `and` / `or` chain
    ///
    /// Truth table:
    /// | A     | B     | A and B | A or B |
    /// |-------|-------|---------|--------|
    /// | true  | true  | true    | true   |
    /// | true  | false | false   | true   |
    /// | true  | null  | null    | true   |
    /// | false | true  | false   | true   |
    /// | false | false | false   | false  |
    /// | false | null  | false   | null   |
    /// | null  | true  | null    | true   |
    /// | null  | false | false   | null   |
    /// | null  | null  | null    | null   |
    pub fn eval_logical(&self, expr: &LogicalExpr, ctx: &EvaluationContext<'_>) -> EvalResult<Value> {
        // `true` decides an `or`, `false` decides an `and`
        let dominant = expr.op == BinaryOp::Or;
        let mut saw_null = false;
        for operand in &expr.operands {
            match as_logical(self.evaluate(operand, ctx)?, operand)? {
                Some(b) if b == dominant => return Ok(Value::Boolean(dominant)),
                Some(_) => {}
                None => saw_null = true,
            }
        }
        Ok(if saw_null { Value::Null } else { Value::Boolean(!dominant) })
    }

    /// Evaluate `not`: null stays null
    pub fn eval_not(&self, expr: &UnaryOpExpr, ctx: &EvaluationContext<'_>) -> EvalResult<Value> {
        let operand = as_logical(self.evaluate(&expr.operand, ctx)?, &expr.operand)?;
        Ok(to_value(operand.map(|b| !b)))
    }
}
