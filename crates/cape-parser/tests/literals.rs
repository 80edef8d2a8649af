//! Literal parsing for rule predicates

use cape_ast::*;
use cape_diagnostics::{CAPE0003, CAPE0004};
use cape_parser::parse_expression;
use pretty_assertions::assert_eq;
use rstest::rstest;
use rust_decimal::Decimal;
use std::str::FromStr;

fn parse_literal(input: &str) -> Literal {
    match parse_expression(input)
        .unwrap_or_else(|e| panic!("Failed to parse '{}': {:?}", input, e))
        .inner
    {
        Expression::Literal(lit) => lit,
        other => panic!("Expected Literal, got: {:?}", other),
    }
}

#[rstest]
#[case("true", Literal::Boolean(true))]
#[case("True", Literal::Boolean(true))]
#[case("false", Literal::Boolean(false))]
#[case("False", Literal::Boolean(false))]
#[case("null", Literal::Null)]
#[case("None", Literal::Null)]
fn test_keyword_literals(#[case] source: &str, #[case] expected: Literal) {
    assert_eq!(parse_literal(source), expected);
}

#[rstest]
#[case("30", "30")]
#[case("2.0", "2.0")]
#[case("-1.5", "-1.5")]
#[case("0", "0")]
fn test_number_literals(#[case] source: &str, #[case] expected: &str) {
    assert_eq!(
        parse_literal(source),
        Literal::Number(Decimal::from_str(expected).unwrap())
    );
}

#[test]
fn test_single_and_double_quotes() {
    assert_eq!(parse_literal("'yes'"), Literal::string("yes"));
    assert_eq!(parse_literal("\"yes\""), Literal::string("yes"));
}

#[test]
fn test_string_escapes() {
    assert_eq!(parse_literal(r"'it\'s'"), Literal::string("it's"));
    assert_eq!(parse_literal(r#""say \"hi\"""#), Literal::string("say \"hi\""));
    assert_eq!(parse_literal("'a \"b\"'"), Literal::string("a \"b\""));
}

#[test]
fn test_unicode_string() {
    assert_eq!(parse_literal("'evet ğüşıöç'"), Literal::string("evet ğüşıöç"));
}

#[test]
fn test_boolean_prefixed_identifier_is_variable() {
    let expr = parse_expression("true_positive == 1").unwrap();
    let names: Vec<_> = expr.variables().iter().map(|v| v.name.clone()).collect();
    assert_eq!(names, vec!["true_positive"]);
}

#[rstest]
#[case("a == 'yes")]
#[case("a == \"yes")]
#[case("a in ['x', 'y]")]
fn test_unterminated_string(#[case] source: &str) {
    let err = parse_expression(source).unwrap_err();
    assert_eq!(err.code(), CAPE0003, "{source}");
}

#[rstest]
#[case("a > 1.2.3")]
#[case("a in [1..2]")]
fn test_invalid_number(#[case] source: &str) {
    let err = parse_expression(source).unwrap_err();
    assert_eq!(err.code(), CAPE0004, "{source}");
}
