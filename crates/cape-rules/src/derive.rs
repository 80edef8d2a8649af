//! Derived variables
//!
//! A derived variable is computed from the raw answers on every evaluation and
//! is never accepted from the caller. Derivations are pure: they read an
//! [`AnswerContext`] and return a value, and [`derive_variables`] assembles the
//! results into a new [`EnrichedContext`].

use crate::config::BooleanCoding;
use crate::{AnswerContext, EnrichedContext, Value};
use indexmap::IndexMap;

/// A variable computed from the raw answers
pub trait Derivation: Send + Sync {
    /// Name under which predicates see the derived value
    fn name(&self) -> &str;

    /// Compute the value from the raw answers
    fn derive(&self, answers: &AnswerContext, coding: &BooleanCoding) -> Value;
}

/// `high_thrombotic_risk`: only assessed when the planned surgery carries a high
/// bleeding risk
///
/// | high_bleeding_risk_ncs | any thrombotic sub-condition | result |
/// |------------------------|------------------------------|--------|
/// | yes                    | yes                          | yes    |
/// | yes                    | no                           | no     |
/// | not yes                | (not examined)               | no     |
#[derive(Debug, Clone, Copy, Default)]
pub struct HighThromboticRisk;

impl HighThromboticRisk {
    pub const NAME: &'static str = "high_thrombotic_risk";
    pub const GOVERNING: &'static str = "high_bleeding_risk_ncs";
    pub const SUB_CONDITIONS: [&'static str; 3] =
        ["pci_lt_1m", "acs_lt_3m", "high_stent_thrombosis_risk"];
}

impl Derivation for HighThromboticRisk {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn derive(&self, answers: &AnswerContext, coding: &BooleanCoding) -> Value {
        if !coding.is_yes(answers.get(Self::GOVERNING)) {
            return coding.no_value();
        }
        let any = Self::SUB_CONDITIONS
            .iter()
            .any(|id| coding.is_yes(answers.get(id)));
        coding.encode(any)
    }
}

/// Derivations every rule set gets
pub fn default_derivations() -> Vec<Box<dyn Derivation>> {
    vec![Box::new(HighThromboticRisk)]
}

/// Build a fresh enriched context; `raw` is cloned, never mutated
pub fn derive_variables(
    raw: &AnswerContext,
    derivations: &[Box<dyn Derivation>],
    coding: &BooleanCoding,
) -> EnrichedContext {
    let derived: IndexMap<String, Value> = derivations
        .iter()
        .map(|d| (d.name().to_string(), d.derive(raw, coding)))
        .collect();
    EnrichedContext::new(raw.clone(), derived)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yn(b: bool) -> &'static str {
        if b { "yes" } else { "no" }
    }

    #[test]
    fn test_all_sixteen_combinations() {
        let coding = BooleanCoding::default();
        for bits in 0u8..16 {
            let hbr = bits & 1 != 0;
            let pci = bits & 2 != 0;
            let acs = bits & 4 != 0;
            let st = bits & 8 != 0;
            let answers = AnswerContext::new()
                .with("high_bleeding_risk_ncs", yn(hbr))
                .with("pci_lt_1m", yn(pci))
                .with("acs_lt_3m", yn(acs))
                .with("high_stent_thrombosis_risk", yn(st));

            let expected = hbr && (pci || acs || st);
            assert_eq!(
                HighThromboticRisk.derive(&answers, &coding),
                Value::string(yn(expected)),
                "hbr={hbr} pci={pci} acs={acs} st={st}"
            );
        }
    }

    #[test]
    fn test_unanswered_governing_flag_is_no() {
        let answers = AnswerContext::new().with("pci_lt_1m", "yes");
        let value = HighThromboticRisk.derive(&answers, &BooleanCoding::default());
        assert_eq!(value, Value::string("no"));
    }

    #[test]
    fn test_custom_coding() {
        let coding = BooleanCoding::new("Evet", "Hayır");
        let answers = AnswerContext::new()
            .with("high_bleeding_risk_ncs", "Evet")
            .with("acs_lt_3m", "Evet");
        assert_eq!(HighThromboticRisk.derive(&answers, &coding), Value::string("Evet"));
    }

    #[test]
    fn test_derive_variables_leaves_raw_untouched() {
        let raw = AnswerContext::new().with("high_bleeding_risk_ncs", "yes");
        let enriched = derive_variables(&raw, &default_derivations(), &BooleanCoding::default());
        assert!(!raw.contains(HighThromboticRisk::NAME));
        assert_eq!(enriched.lookup(HighThromboticRisk::NAME), Some(&Value::string("no")));
    }
}
