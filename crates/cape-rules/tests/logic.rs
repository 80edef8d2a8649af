//! Three-valued logic and operator semantics through the full engine

use cape_rules::{AnswerContext, Namespace, PredicateEngine, Value};
use cape_rules::{EnrichedContext, EvaluationContext, RuleEngine};
use pretty_assertions::assert_eq;
use rstest::rstest;

/// Evaluate `when` with `t`/`f` answered true/false, `s` = 'yes', `x` = 45 and
/// `n` declared but unanswered
fn eval(when: &str) -> Value {
    let engine = RuleEngine::from_yaml_str("tool_id: logic\nvariables: [t, f, n, s, x]\n").unwrap();
    let answers = AnswerContext::new()
        .with("t", true)
        .with("f", false)
        .with("s", "yes")
        .with("x", 45);
    let enriched: EnrichedContext = engine.derive(&answers);
    let namespace = Namespace::new(["t", "f", "n", "s", "x", "high_thrombotic_risk"]);
    let ctx = EvaluationContext::new(&namespace, &enriched);
    let expr = cape_parser::parse_expression(when).unwrap();
    PredicateEngine::new().evaluate(&expr, &ctx).unwrap()
}

const T: Value = Value::Boolean(true);
const F: Value = Value::Boolean(false);
const N: Value = Value::Null;

#[rstest]
#[case("t and t", T)]
#[case("t and f", F)]
#[case("t and n", N)]
#[case("f and t", F)]
#[case("f and f", F)]
#[case("f and n", F)]
#[case("n and t", N)]
#[case("n and f", F)]
#[case("n and n", N)]
fn test_and_truth_table(#[case] when: &str, #[case] expected: Value) {
    assert_eq!(eval(when), expected);
}

#[rstest]
#[case("t or t", T)]
#[case("t or f", T)]
#[case("t or n", T)]
#[case("f or t", T)]
#[case("f or f", F)]
#[case("f or n", N)]
#[case("n or t", T)]
#[case("n or f", N)]
#[case("n or n", N)]
fn test_or_truth_table(#[case] when: &str, #[case] expected: Value) {
    assert_eq!(eval(when), expected);
}

#[rstest]
#[case("not t", F)]
#[case("not f", T)]
#[case("not n", N)]
#[case("n == 'yes'", N)]
#[case("n != 'yes'", N)]
#[case("n in ['yes']", N)]
#[case("s in ['no', 'yes']", T)]
#[case("s not in ['no', 'yes']", F)]
#[case("s in []", F)]
#[case("x >= 45 and x < 50", T)]
#[case("x == 45.0", T)]
#[case("x in [30, 45]", T)]
#[case("t == True", T)]
#[case("n == None", N)]
#[case("not (s == 'yes' and x > 100)", T)]
fn test_operator_semantics(#[case] when: &str, #[case] expected: Value) {
    assert_eq!(eval(when), expected);
}

#[test]
fn test_short_circuit_skips_undeclared_operand() {
    let engine = RuleEngine::from_yaml_str(
        "tool_id: t\nvariables: [a]\noutputs:\n  - { id: o, when: \"a == 1 or ghost == 2\", recommendation_text: x }\n",
    )
    .unwrap();
    let ctx = AnswerContext::new().with("a", 1);
    assert_eq!(engine.evaluate(&ctx).unwrap().rule_id, "o");

    let ctx = AnswerContext::new().with("a", 2);
    assert!(engine.evaluate(&ctx).is_err());
}
