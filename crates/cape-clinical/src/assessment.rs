//! Every calculator over one patient record

use crate::antithrombotic::{
    antiplatelet_monotherapy_plan, oac_monotherapy_hint, strategy_for, AntiplateletPlan,
    AntithromboticStrategy,
};
use crate::device::{select_device_mode, DeviceMode};
use crate::doac::{dose_warnings, DoseInputs, DoseWarning};
use crate::oac::{plan_anticoagulation, OacInputs, OacPlan};
use crate::pathway::{synthesize_pathway, PathwayInputs, PathwayResult};
use crate::postop::{postop_af_risk, PostopAfAssessment};
use crate::rate_control::{assess_rate_control, RateControlAssessment, RateControlInputs};
use crate::rcri::{rcri_score, RcriFlags, RiskScore};
use crate::record::{PatientClinicalRecord, SurgeryRisk};
use crate::valve::{vka_protocol, ValveProtocol};
use crate::vocabulary::DrugVocabulary;
use serde::Serialize;

/// Calculator outputs for one record
///
/// Sections that do not apply to the patient are `None`: anticoagulation only
/// with AF or a mechanical valve, the valve protocol only with a valve.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClinicalAssessment {
    pub surgery_risk: SurgeryRisk,
    pub rcri: RiskScore,
    pub pathway: PathwayResult,
    pub strategy: AntithromboticStrategy,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub antiplatelet_plan: Option<AntiplateletPlan>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oac_monotherapy: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anticoagulation: Option<OacPlan>,
    pub dose_warnings: Vec<DoseWarning>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valve_protocol: Option<ValveProtocol>,
    pub device: DeviceMode,
    pub rate_control: RateControlAssessment,
    pub postop_af: PostopAfAssessment,
    /// Medications that are not in the drug vocabulary
    pub unlisted_medications: Vec<String>,
}

pub fn assess(record: &PatientClinicalRecord, vocabulary: &DrugVocabulary) -> ClinicalAssessment {
    let surgery_risk = record.effective_surgery_risk();
    let rcri = rcri_score(&RcriFlags::from_record(record));
    let pathway = synthesize_pathway(&PathwayInputs::from_record(record, &rcri));
    let strategy = strategy_for(record);

    let antiplatelet_plan = (strategy == AntithromboticStrategy::AntiplateletMonotherapy)
        .then(|| antiplatelet_monotherapy_plan(record.antiplatelet, surgery_risk));
    let oac_monotherapy =
        (strategy == AntithromboticStrategy::OacMonotherapy).then(|| oac_monotherapy_hint(record.anticoagulant));

    let anticoagulated = record.atrial_fibrillation || record.mechanical_valve;
    let anticoagulation = anticoagulated.then(|| plan_anticoagulation(&OacInputs::from_record(record)));
    let dose_warnings = if anticoagulated {
        dose_warnings(&DoseInputs::from_record(record))
    } else {
        Vec::new()
    };
    let valve_protocol = record.mechanical_valve.then(vka_protocol);

    let unlisted_medications: Vec<String> = vocabulary
        .unlisted(&record.medications)
        .into_iter()
        .map(str::to_string)
        .collect();
    if !unlisted_medications.is_empty() {
        log::warn!("medications not in the drug vocabulary: {}", unlisted_medications.join(", "));
    }

    ClinicalAssessment {
        surgery_risk,
        rcri,
        pathway,
        strategy,
        antiplatelet_plan,
        oac_monotherapy,
        anticoagulation,
        dose_warnings,
        valve_protocol,
        device: select_device_mode(record.device.as_ref()),
        rate_control: assess_rate_control(&RateControlInputs::from_record(record)),
        postop_af: postop_af_risk(record),
        unlisted_medications,
    }
}
