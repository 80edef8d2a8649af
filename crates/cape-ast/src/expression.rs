//! Expression AST nodes

use crate::{BinaryOp, BoxExpr, Literal, Spanned, UnaryOp};
use cape_diagnostics::Span;
use serde::Serialize;

/// A predicate expression
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Expression {
    /// Literal value
    Literal(Literal),
    /// Lookup of a named variable (question id, declared or derived variable)
    Variable(VariableRef),
    /// Prefix operator
    UnaryOp(UnaryOpExpr),
    /// Comparison
    BinaryOp(BinaryOpExpr),
    /// Same-operator `and` / `or` chain
    Logical(LogicalExpr),
    /// `x in ['a', 'b']` / `x not in ['a', 'b']`
    Membership(MembershipExpr),
}

/// A reference to a variable by name
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VariableRef {
    pub name: String,
    pub span: Span,
}

impl VariableRef {
    pub fn new(name: impl Into<String>, span: Span) -> Self {
        Self {
            name: name.into(),
            span,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnaryOpExpr {
    pub op: UnaryOp,
    pub operand: BoxExpr,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BinaryOpExpr {
    pub left: BoxExpr,
    pub op: BinaryOp,
    pub right: BoxExpr,
}

/// `a and b and c` kept flat: operands in source order, at least two
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogicalExpr {
    /// `BinaryOp::And` or `BinaryOp::Or`
    pub op: BinaryOp,
    pub operands: Vec<Spanned<Expression>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MembershipExpr {
    pub operand: BoxExpr,
    /// Literal list members in source order
    pub items: Vec<Spanned<Literal>>,
    /// True for `not in`
    pub negated: bool,
}

impl Expression {
    /// Every variable reference in the tree, in left-to-right source order
    pub fn variables(&self) -> Vec<&VariableRef> {
        let mut out = Vec::new();
        self.collect_variables(&mut out);
        out
    }

    fn collect_variables<'a>(&'a self, out: &mut Vec<&'a VariableRef>) {
        match self {
            Expression::Literal(_) => {}
            Expression::Variable(var) => out.push(var),
            Expression::UnaryOp(expr) => expr.operand.collect_variables(out),
            Expression::BinaryOp(expr) => {
                expr.left.collect_variables(out);
                expr.right.collect_variables(out);
            }
            Expression::Logical(expr) => {
                for operand in &expr.operands {
                    operand.collect_variables(out);
                }
            }
            Expression::Membership(expr) => expr.operand.collect_variables(out),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn var(name: &str, start: usize) -> BoxExpr {
        Box::new(Spanned::new(
            Expression::Variable(VariableRef::new(name, Span::new(start, start + name.len()))),
            Span::new(start, start + name.len()),
        ))
    }

    #[test]
    fn test_variables_in_source_order() {
        let expr = Expression::Logical(LogicalExpr {
            op: BinaryOp::And,
            operands: vec![
                *var("a", 0),
                Spanned::new(
                    Expression::UnaryOp(UnaryOpExpr {
                        op: UnaryOp::Not,
                        operand: var("b", 10),
                    }),
                    Span::new(6, 11),
                ),
                *var("c", 16),
            ],
        });

        let names: Vec<_> = expr.variables().iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }
}
