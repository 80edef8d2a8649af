//! Answer validation at the engine boundary

mod common;

use cape_diagnostics::{CapeError, CAPE0301, CAPE0302, CAPE0303};
use cape_rules::{AnswerContext, Value};
use common::{answers, dapt};
use pretty_assertions::assert_eq;

#[test]
fn test_out_of_option_answer_is_rejected() {
    let engine = dapt();
    let err = engine.evaluate(&answers(&[("pci_lt_1m", "maybe")])).unwrap_err();
    match err {
        CapeError::Validation { code, question_id, value, .. } => {
            assert_eq!(code, CAPE0301);
            assert_eq!(question_id, "pci_lt_1m");
            assert_eq!(value.as_deref(), Some("maybe"));
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn test_option_match_is_case_sensitive() {
    let engine = dapt();
    let err = engine.validate_answers(&answers(&[("pci_lt_1m", "Yes")])).unwrap_err();
    assert_eq!(err.code(), CAPE0301);
}

#[test]
fn test_unknown_id_is_rejected() {
    let engine = dapt();
    let err = engine.validate_answers(&answers(&[("pci_lt_6m", "yes")])).unwrap_err();
    assert_eq!(err.code(), CAPE0302);
}

#[test]
fn test_derived_variable_cannot_be_supplied() {
    let engine = dapt();
    let err = engine
        .evaluate(&answers(&[("high_thrombotic_risk", "yes")]))
        .unwrap_err();
    assert_eq!(err.code(), CAPE0303);
    assert!(err.is_recoverable());
}

#[test]
fn test_declared_variables_are_free_form() {
    let engine = dapt();
    let ctx = answers(&[("p2y12_agent", "ticagrelor"), ("aspirin_dose", "100 mg/day")]);
    assert!(engine.validate_answers(&ctx).is_ok());
}

#[test]
fn test_null_answer_means_unanswered() {
    let engine = dapt();
    let mut ctx = AnswerContext::new();
    ctx.set("pci_lt_1m", Value::Null);
    assert!(engine.validate_answers(&ctx).is_ok());
}

#[test]
fn test_every_rejection_is_reported() {
    let engine = dapt();
    let ctx = answers(&[("pci_lt_1m", "maybe"), ("nope", "x"), ("high_thrombotic_risk", "no")]);
    match engine.validate_answers(&ctx).unwrap_err() {
        CapeError::Multiple(errors) => {
            let codes: Vec<_> = errors.iter().map(CapeError::code).collect();
            assert_eq!(codes, vec![CAPE0301, CAPE0302, CAPE0303]);
        }
        other => panic!("unexpected {other:?}"),
    }
}
