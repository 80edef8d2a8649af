//! Operator parsing and precedence for rule predicates

use cape_ast::*;
use cape_diagnostics::{CAPE0001, CAPE0002, CAPE0006};
use cape_parser::parse_expression;
use pretty_assertions::assert_eq;
use rstest::rstest;

fn parse_expr(input: &str) -> Expression {
    parse_expression(input)
        .unwrap_or_else(|e| panic!("Failed to parse '{}': {:?}", input, e))
        .inner
}

fn assert_binary_op(expr: &Expression) -> (&Expression, BinaryOp, &Expression) {
    match expr {
        Expression::BinaryOp(b) => (&b.left.inner, b.op, &b.right.inner),
        other => panic!("Expected BinaryOp, got: {:?}", other),
    }
}

fn assert_logical(expr: &Expression) -> (BinaryOp, Vec<&Expression>) {
    match expr {
        Expression::Logical(l) => (l.op, l.operands.iter().map(|o| &o.inner).collect()),
        other => panic!("Expected Logical, got: {:?}", other),
    }
}

fn var_name(expr: &Expression) -> &str {
    match expr {
        Expression::Variable(v) => &v.name,
        other => panic!("Expected Variable, got: {:?}", other),
    }
}

#[rstest]
#[case("a == 'yes'", BinaryOp::Equal)]
#[case("a != 'yes'", BinaryOp::NotEqual)]
#[case("egfr < 30", BinaryOp::Less)]
#[case("egfr <= 30", BinaryOp::LessOrEqual)]
#[case("egfr > 30", BinaryOp::Greater)]
#[case("egfr >= 30", BinaryOp::GreaterOrEqual)]
#[case("egfr>=30", BinaryOp::GreaterOrEqual)]
fn test_comparison_operators(#[case] source: &str, #[case] expected: BinaryOp) {
    let expr = parse_expr(source);
    let (_, op, _) = assert_binary_op(&expr);
    assert_eq!(op, expected);
}

#[test]
fn test_and_binds_tighter_than_or() {
    let expr = parse_expr("a == 'yes' or b == 'yes' and c == 'yes'");
    let (op, operands) = assert_logical(&expr);
    assert_eq!(op, BinaryOp::Or);
    assert_eq!(assert_binary_op(operands[0]).1, BinaryOp::Equal);
    assert_eq!(assert_logical(operands[1]).0, BinaryOp::And);
}

#[test]
fn test_parentheses_override_precedence() {
    let expr = parse_expr("(a == 'yes' or b == 'yes') and c == 'yes'");
    let (op, operands) = assert_logical(&expr);
    assert_eq!(op, BinaryOp::And);
    assert_eq!(assert_logical(operands[0]).0, BinaryOp::Or);
}

#[test]
fn test_or_chain_is_flat() {
    let expr = parse_expr("a or b or c");
    let (op, operands) = assert_logical(&expr);
    assert_eq!(op, BinaryOp::Or);
    let names: Vec<_> = operands.into_iter().map(var_name).collect();
    assert_eq!(names, vec!["a", "b", "c"]);
}

#[test]
fn test_mixed_chain_splits_at_or() {
    let expr = parse_expr("a and b or c and d and e or f");
    let (op, operands) = assert_logical(&expr);
    assert_eq!(op, BinaryOp::Or);
    assert_eq!(operands.len(), 3);
    assert_eq!(assert_logical(operands[0]).1.len(), 2);
    assert_eq!(assert_logical(operands[1]).1.len(), 3);
    assert_eq!(var_name(operands[2]), "f");
}

#[test]
fn test_chain_span_covers_all_operands() {
    let expr = parse_expression("a or b or c").unwrap();
    assert_eq!((expr.span.start, expr.span.end), (0, 11));
}

#[test]
fn test_not_applies_to_whole_comparison() {
    let expr = parse_expr("not a == 'yes'");
    match expr {
        Expression::UnaryOp(u) => {
            assert_eq!(u.op, UnaryOp::Not);
            assert_eq!(assert_binary_op(&u.operand.inner).1, BinaryOp::Equal);
        }
        other => panic!("Expected UnaryOp, got: {:?}", other),
    }
}

#[test]
fn test_not_binds_tighter_than_and() {
    let expr = parse_expr("not a and b");
    let (op, operands) = assert_logical(&expr);
    assert_eq!(op, BinaryOp::And);
    assert!(matches!(operands[0], Expression::UnaryOp(_)));
}

#[test]
fn test_double_not() {
    let expr = parse_expr("not not a");
    match expr {
        Expression::UnaryOp(outer) => assert!(matches!(outer.operand.inner, Expression::UnaryOp(_))),
        other => panic!("Expected UnaryOp, got: {:?}", other),
    }
}

#[test]
fn test_membership() {
    let expr = parse_expr("p2y12_agent in ['ticagrelor', 'prasugrel']");
    match expr {
        Expression::Membership(m) => {
            assert!(!m.negated);
            assert_eq!(var_name(&m.operand.inner), "p2y12_agent");
            let items: Vec<_> = m.items.iter().map(|i| i.inner.clone()).collect();
            assert_eq!(items, vec![Literal::string("ticagrelor"), Literal::string("prasugrel")]);
        }
        other => panic!("Expected Membership, got: {:?}", other),
    }
}

#[test]
fn test_negated_membership() {
    let expr = parse_expr("agent not in ['a', 'b',]");
    match expr {
        Expression::Membership(m) => {
            assert!(m.negated);
            assert_eq!(m.items.len(), 2);
        }
        other => panic!("Expected Membership, got: {:?}", other),
    }
}

#[test]
fn test_empty_list() {
    match parse_expr("a in []") {
        Expression::Membership(m) => assert!(m.items.is_empty()),
        other => panic!("Expected Membership, got: {:?}", other),
    }
}

#[test]
fn test_keyword_prefixed_identifiers() {
    let expr = parse_expr("order == 1 and notes != 'x' and inr > 2");
    let vars: Vec<_> = expr.variables().iter().map(|v| v.name.clone()).collect();
    assert_eq!(vars, vec!["order", "notes", "inr"]);
}

#[test]
fn test_multiline_predicate() {
    let expr = parse_expr("high_bleeding_risk_ncs == 'yes'\n  and high_thrombotic_risk == 'no'");
    assert_eq!(assert_logical(&expr).0, BinaryOp::And);
}

#[test]
fn test_variable_spans() {
    let expr = parse_expression("a == 'x' and bb == 'y'").unwrap();
    let spans: Vec<_> = expr.variables().iter().map(|v| (v.span.start, v.span.end)).collect();
    assert_eq!(spans, vec![(0, 1), (13, 15)]);
}

#[rstest]
#[case("a == ")]
#[case("a and")]
#[case("(a == 'yes'")]
#[case("not")]
fn test_truncated_input(#[case] source: &str) {
    let err = parse_expression(source).unwrap_err();
    assert_eq!(err.code(), CAPE0002, "{source}");
}

#[rstest]
#[case("a == b == c")]
#[case("a = 'yes'")]
#[case("len(a) > 1")]
#[case("a.b == 1")]
#[case("a == 1 )")]
fn test_trailing_input_rejected(#[case] source: &str) {
    let err = parse_expression(source).unwrap_err();
    assert_eq!(err.code(), CAPE0006, "{source}");
}

#[rstest]
#[case("and == 1")]
#[case("a in 'x'")]
#[case("a in [b]")]
#[case("a == +1")]
fn test_unexpected_token(#[case] source: &str) {
    let err = parse_expression(source).unwrap_err();
    assert_eq!(err.code(), CAPE0001, "{source}");
}

#[test]
fn test_error_location_points_at_token() {
    let err = parse_expression("a == 1 and or").unwrap_err();
    let loc = err.location().cloned().unwrap();
    assert_eq!(err.code(), CAPE0001);
    assert_eq!(loc.offset, 11);
    assert_eq!(loc.column, 12);
}
