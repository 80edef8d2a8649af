//! Scenarios over the bundled DAPT rule set

mod common;

use cape_rules::{AnswerContext, Value, NO_MATCH_ID};
use common::{answers, dapt, yn};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rstest::rstest;

fn flags(hbr: bool, pci: bool, acs: bool, st: bool) -> AnswerContext {
    answers(&[
        ("pci_lt_1m", yn(pci)),
        ("acs_lt_3m", yn(acs)),
        ("high_stent_thrombosis_risk", yn(st)),
        ("high_bleeding_risk_ncs", yn(hbr)),
    ])
}

#[test]
fn test_bundled_rule_set_is_clean() {
    let engine = dapt();
    assert_eq!(engine.tool_id(), "dapt");
    assert!(engine.check_predicates().is_empty(), "{:?}", engine.check_predicates());
}

#[test]
fn test_deferrable_question_only_after_high_bleeding_risk() {
    let engine = dapt();
    let visible = |ctx: &AnswerContext| engine.visible_questions(ctx).len();
    assert_eq!(visible(&flags(false, true, false, false)), 4);
    assert_eq!(visible(&flags(true, true, false, false)), 5);
}

#[rstest]
#[case::low_bleeding(flags(false, true, true, true), "continue_dapt")]
#[case::high_bleeding_high_thrombotic(flags(true, true, false, false), "hbr_high_thrombotic_risk")]
#[case::high_bleeding_only(flags(true, false, false, false), "hbr_stop_p2y12")]
#[case::deferrable(
    flags(true, false, true, false).with("surgery_deferrable", "yes"),
    "defer_surgery"
)]
#[case::not_deferrable(
    flags(true, false, true, false).with("surgery_deferrable", "no"),
    "hbr_high_thrombotic_risk"
)]
#[case::ticagrelor(
    flags(true, false, false, false).with("p2y12_agent", "ticagrelor"),
    "hbr_stop_ticagrelor"
)]
#[case::tikagrelor(
    flags(true, false, false, false).with("p2y12_agent", "Tikagrelor"),
    "hbr_stop_ticagrelor"
)]
#[case::prasugrel(
    flags(true, false, false, false).with("p2y12_agent", "prasugrel"),
    "hbr_stop_prasugrel"
)]
#[case::clopidogrel(
    flags(true, false, false, false).with("p2y12_agent", "clopidogrel"),
    "hbr_stop_p2y12"
)]
#[case::unanswered(AnswerContext::new(), NO_MATCH_ID)]
fn test_scenarios(#[case] ctx: AnswerContext, #[case] expected: &str) {
    let outcome = dapt().evaluate(&ctx).unwrap();
    assert_eq!(outcome.rule_id, expected);
}

#[test]
fn test_derived_value_reported_with_outcome() {
    let outcome = dapt().evaluate(&flags(false, true, true, true)).unwrap();
    assert_eq!(outcome.derived.get("high_thrombotic_risk"), Some(&Value::string("no")));
}

proptest! {
    #[test]
    fn prop_high_thrombotic_risk_truth_table(hbr: bool, pci: bool, acs: bool, st: bool) {
        let engine = dapt();
        let derived = engine.derive(&flags(hbr, pci, acs, st));
        let expected = yn(hbr && (pci || acs || st));
        prop_assert_eq!(derived.lookup("high_thrombotic_risk"), Some(&Value::string(expected)));
    }

    #[test]
    fn prop_every_complete_answer_set_selects_a_rule(
        hbr: bool, pci: bool, acs: bool, st: bool, deferrable: bool
    ) {
        let ctx = flags(hbr, pci, acs, st).with("surgery_deferrable", yn(deferrable));
        let outcome = dapt().evaluate(&ctx).unwrap();
        prop_assert!(outcome.is_match());
        if !hbr {
            prop_assert_eq!(outcome.rule_id.as_str(), "continue_dapt");
        }
    }
}
