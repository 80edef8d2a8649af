//! Comparison and membership operators
//!
//! Comparisons involving null yield null. A string compared with a number is
//! read as a number when it parses as one; otherwise the comparison is a type
//! mismatch. Booleans support only `==` and `!=`.

use crate::context::EvaluationContext;
use crate::engine::PredicateEngine;
use crate::error::{EvalError, EvalResult};
use crate::Value;
use cape_ast::{BinaryOp, BinaryOpExpr, MembershipExpr};
use cape_diagnostics::Span;
use rust_decimal::Decimal;
use std::cmp::Ordering;

fn mismatch(op: BinaryOp, left: &Value, right: &Value, span: Span) -> EvalError {
    EvalError::type_mismatch(op.as_str(), left.type_name(), right.type_name(), span)
}

fn numeric_pair(left: &Value, right: &Value) -> Option<(Decimal, Decimal)> {
    Some((left.as_number()?, right.as_number()?))
}

/// Apply a comparison operator to two values
pub fn compare_values(op: BinaryOp, left: &Value, right: &Value, span: Span) -> EvalResult<Value> {
    let ordering: Ordering = match (left, right) {
        (Value::Null, _) | (_, Value::Null) => return Ok(Value::Null),
        (Value::String(a), Value::String(b)) => a.cmp(b),
        (Value::Boolean(a), Value::Boolean(b)) => {
            return match op {
                BinaryOp::Equal => Ok(Value::Boolean(a == b)),
                BinaryOp::NotEqual => Ok(Value::Boolean(a != b)),
                _ => Err(mismatch(op, left, right, span)),
            };
        }
        (Value::Number(_), Value::Number(_) | Value::String(_))
        | (Value::String(_), Value::Number(_)) => match numeric_pair(left, right) {
            Some((a, b)) => a.cmp(&b),
            None => return Err(mismatch(op, left, right, span)),
        },
        _ => return Err(mismatch(op, left, right, span)),
    };

    let result = match op {
        BinaryOp::Equal => ordering == Ordering::Equal,
        BinaryOp::NotEqual => ordering != Ordering::Equal,
        BinaryOp::Less => ordering == Ordering::Less,
        BinaryOp::LessOrEqual => ordering != Ordering::Greater,
        BinaryOp::Greater => ordering == Ordering::Greater,
        BinaryOp::GreaterOrEqual => ordering != Ordering::Less,
        BinaryOp::And | BinaryOp::Or => return Err(mismatch(op, left, right, span)),
    };
    Ok(Value::Boolean(result))
}

impl PredicateEngine {
    /// Evaluate `a <op> b` for a comparison operator
    pub fn eval_comparison(
        &self,
        expr: &BinaryOpExpr,
        span: Span,
        ctx: &EvaluationContext<'_>,
    ) -> EvalResult<Value> {
        let left = self.evaluate(&expr.left, ctx)?;
        let right = self.evaluate(&expr.right, ctx)?;
        compare_values(expr.op, &left, &right, span)
    }

    /// Evaluate `a in [..]` / `a not in [..]`
    ///
    /// A null operand yields null; null list members never match.
    pub fn eval_membership(
        &self,
        expr: &MembershipExpr,
        span: Span,
        ctx: &EvaluationContext<'_>,
    ) -> EvalResult<Value> {
        let operand = self.evaluate(&expr.operand, ctx)?;
        if operand.is_null() {
            return Ok(Value::Null);
        }

        let mut found = false;
        for item in &expr.items {
            let item_value = Value::from(&item.inner);
            if compare_values(BinaryOp::Equal, &operand, &item_value, span)?.is_true() {
                found = true;
                break;
            }
        }
        Ok(Value::Boolean(found != expr.negated))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cmp(op: BinaryOp, l: impl Into<Value>, r: impl Into<Value>) -> EvalResult<Value> {
        compare_values(op, &l.into(), &r.into(), Span::default())
    }

    #[test]
    fn test_null_propagates() {
        assert_eq!(cmp(BinaryOp::Equal, Value::Null, "yes"), Ok(Value::Null));
        assert_eq!(cmp(BinaryOp::NotEqual, "yes", Value::Null), Ok(Value::Null));
    }

    #[test]
    fn test_numeric_string_coercion() {
        assert_eq!(cmp(BinaryOp::Less, "45", 50), Ok(Value::Boolean(true)));
        assert_eq!(cmp(BinaryOp::GreaterOrEqual, 30, " 30 "), Ok(Value::Boolean(true)));
        assert!(matches!(
            cmp(BinaryOp::Less, "yes", 50),
            Err(EvalError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_boolean_ordering_is_rejected() {
        assert_eq!(cmp(BinaryOp::Equal, true, true), Ok(Value::Boolean(true)));
        assert!(cmp(BinaryOp::Less, true, false).is_err());
        assert!(cmp(BinaryOp::Equal, true, "yes").is_err());
    }

    #[test]
    fn test_strings_compare_exactly() {
        assert_eq!(cmp(BinaryOp::Equal, "yes", "Yes"), Ok(Value::Boolean(false)));
        assert_eq!(cmp(BinaryOp::NotEqual, "yes", "no"), Ok(Value::Boolean(true)));
    }
}
