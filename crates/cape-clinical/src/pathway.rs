//! ESC pre-operative workup pathway
//!
//! Branches are tried in a fixed order and the first that applies decides the
//! workup:
//!
//! 1. emergency surgery
//! 2. active cardiac symptoms
//! 3. low surgical risk, RCRI 0 and at least 4 METs
//! 4. any risk-increasing factor
//! 5. baseline ECG only
//!
//! Every item added in branch 4 is gated on a condition under which its
//! result would change management.

use crate::record::{FunctionalCapacity, PatientClinicalRecord, SurgeryRisk, Symptom, Urgency};
use crate::rcri::RiskScore;
use serde::Serialize;

/// A recommended test or assessment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum WorkupItem {
    EmergencyAssessment,
    CardiologyEvaluation,
    Echocardiography,
    HsTroponin,
    NatriureticPeptide,
    BaselineEcg,
    IschemiaTesting,
}

impl WorkupItem {
    pub const fn label(&self) -> &'static str {
        match self {
            Self::EmergencyAssessment => "12-lead ECG and clinical assessment (emergency)",
            Self::CardiologyEvaluation => "Cardiology evaluation (management-changing approach)",
            Self::Echocardiography => {
                "Transthoracic echocardiography as indicated (priority with dyspnea, murmur or unknown EF)"
            }
            Self::HsTroponin => "hs-troponin at baseline and 48-72 h after surgery",
            Self::NatriureticPeptide => "BNP/NT-proBNP for risk stratification",
            Self::BaselineEcg => "Baseline 12-lead ECG",
            Self::IschemiaTesting => {
                "Non-invasive ischemia testing, only if the result would change management"
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PathwayBranch {
    Emergency,
    ActiveSymptoms,
    NoAdditionalTesting,
    RiskFactors,
    Baseline,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathwayResult {
    pub branch: PathwayBranch,
    pub rationale: String,
    pub workup: Vec<WorkupItem>,
    /// Inputs that were unspecified and how they were handled
    pub notes: Vec<String>,
}

impl PathwayResult {
    fn new(branch: PathwayBranch, rationale: impl Into<String>, workup: Vec<WorkupItem>) -> Self {
        Self {
            branch,
            rationale: rationale.into(),
            workup,
            notes: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PathwayInputs<'a> {
    pub surgery_risk: SurgeryRisk,
    pub rcri_score: u8,
    pub functional_capacity: FunctionalCapacity,
    pub symptoms: &'a [Symptom],
    pub urgency: Urgency,
}

impl<'a> PathwayInputs<'a> {
    pub fn from_record(record: &'a PatientClinicalRecord, score: &RiskScore) -> Self {
        Self {
            surgery_risk: record.effective_surgery_risk(),
            rcri_score: score.score,
            functional_capacity: record.functional_capacity,
            symptoms: &record.symptoms,
            urgency: record.urgency,
        }
    }
}

pub fn synthesize_pathway(inputs: &PathwayInputs<'_>) -> PathwayResult {
    let mut notes = Vec::new();

    // An unlisted procedure gates tests like an intermediate-risk one and can
    // never qualify for the no-testing branch.
    let risk = match inputs.surgery_risk {
        SurgeryRisk::Unspecified => {
            notes.push("Surgical risk unspecified; tests gated as for intermediate risk.".to_string());
            SurgeryRisk::Intermediate
        }
        specified => specified,
    };
    if inputs.symptoms.contains(&Symptom::Unspecified) {
        notes.push("Unrecognized symptom entries were not counted as active symptoms.".to_string());
    }
    if !inputs.functional_capacity.is_specified() {
        notes.push("Functional capacity unspecified; record >=4 METs, <4 METs or unknown.".to_string());
    }

    let mut result = select_branch(inputs, risk);
    log::debug!(
        "pathway branch {:?} (risk={}, rcri={})",
        result.branch,
        inputs.surgery_risk,
        inputs.rcri_score
    );
    result.notes = notes;
    result
}

fn select_branch(inputs: &PathwayInputs<'_>, risk: SurgeryRisk) -> PathwayResult {
    let capacity_limited = inputs.functional_capacity.is_poor_or_unknown();

    if inputs.urgency.is_emergency() {
        return PathwayResult::new(
            PathwayBranch::Emergency,
            "Emergency surgery: time-limited, only management-changing tests.",
            vec![WorkupItem::EmergencyAssessment],
        );
    }

    if inputs.symptoms.iter().any(Symptom::is_active) {
        let mut workup = vec![WorkupItem::CardiologyEvaluation, WorkupItem::Echocardiography];
        if risk.is_at_least_intermediate() {
            workup.push(WorkupItem::HsTroponin);
            workup.push(WorkupItem::NatriureticPeptide);
        }
        return PathwayResult::new(
            PathwayBranch::ActiveSymptoms,
            "Active cardiac symptoms: cardiac stabilization first, further evaluation as indicated.",
            workup,
        );
    }

    if risk == SurgeryRisk::Low
        && inputs.rcri_score == 0
        && inputs.functional_capacity == FunctionalCapacity::AtLeastFourMets
    {
        return PathwayResult::new(
            PathwayBranch::NoAdditionalTesting,
            "Low surgical risk, RCRI 0 and >=4 METs: no additional cardiac testing.",
            vec![WorkupItem::BaselineEcg],
        );
    }

    if risk.is_at_least_intermediate() || inputs.rcri_score >= 1 || capacity_limited {
        let high_or_scored = risk.is_high() || inputs.rcri_score >= 2;

        let mut workup = vec![WorkupItem::BaselineEcg];
        if risk.is_at_least_intermediate() {
            workup.push(WorkupItem::HsTroponin);
        }
        if risk.is_at_least_intermediate() || capacity_limited {
            workup.push(WorkupItem::Echocardiography);
        }
        if high_or_scored || capacity_limited {
            workup.push(WorkupItem::NatriureticPeptide);
        }
        if high_or_scored && capacity_limited && !inputs.urgency.is_emergency() {
            workup.push(WorkupItem::IschemiaTesting);
        }

        let rationale = format!(
            "Risk factors: surgery={}, RCRI={}, METs={}. Tests only if management-changing.",
            inputs.surgery_risk, inputs.rcri_score, inputs.functional_capacity
        );
        return PathwayResult::new(PathwayBranch::RiskFactors, rationale, workup);
    }

    PathwayResult::new(
        PathwayBranch::Baseline,
        "Low-moderate risk profile: clinical assessment and baseline ECG.",
        vec![WorkupItem::BaselineEcg],
    )
}
