//! Whole-record assessment combined with the DAPT rule set

use cape_clinical::{
    assess, AntiplateletAgent, AntithromboticStrategy, ClinicalAssessment, DrugVocabulary, PatientClinicalRecord,
};
use cape_diagnostics::Result;
use cape_rules::{AnswerContext, RuleEngine, RuleOutcome};
use serde::Serialize;

const P2Y12_AGENT: &str = "p2y12_agent";

/// Calculator outputs plus the DAPT outcome when the DAPT tool applies
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssessmentReport {
    pub assessment: ClinicalAssessment,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dapt: Option<RuleOutcome>,
}

/// Run every calculator, then the DAPT rule set when the record calls for it
///
/// The rule set only runs for the DAPT strategy and when answers were given.
/// A recorded clopidogrel prescription fills `p2y12_agent` if the rule set
/// declares it and the answers leave it unset.
pub fn assess_with_dapt(
    record: &PatientClinicalRecord,
    vocabulary: &DrugVocabulary,
    engine: &RuleEngine,
    answers: Option<&AnswerContext>,
) -> Result<AssessmentReport> {
    let assessment = assess(record, vocabulary);

    let dapt = match answers {
        Some(answers) if assessment.strategy == AntithromboticStrategy::Dapt => {
            let mut answers = answers.clone();
            let declares_agent = engine.variables().any(|name| name == P2Y12_AGENT);
            if declares_agent && !answers.contains(P2Y12_AGENT) && record.antiplatelet == AntiplateletAgent::Clopidogrel {
                answers.set(P2Y12_AGENT, AntiplateletAgent::Clopidogrel.as_str());
            }
            Some(engine.evaluate(&answers)?)
        }
        Some(_) => {
            log::info!("DAPT answers ignored: strategy is {:?}", assessment.strategy);
            None
        }
        None => None,
    };

    Ok(AssessmentReport { assessment, dapt })
}
