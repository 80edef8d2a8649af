//! DOAC dose warnings from renal function, age and co-medication

use crate::record::{AnticoagulantAgent, BleedingRisk, PatientClinicalRecord};
use crate::tables::{
    AGE_DABIGATRAN_REVIEW, AGE_ELDERLY, EDOXABAN_INTERACTIONS, EGFR_DOAC_AVOID, EGFR_DOAC_MODERATE_UPPER,
    EGFR_DOAC_SEVERE, EGFR_RIVAROXABAN_MODERATE_UPPER, VERAPAMIL,
};
use crate::vocabulary::contains_any;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum WarningSeverity {
    /// Do not use, or stop
    Avoid,
    Reduce,
    /// Dose decided individually
    Consider,
    Notice,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DoseWarning {
    pub severity: WarningSeverity,
    pub message: String,
}

impl DoseWarning {
    fn new(severity: WarningSeverity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct DoseInputs<'a> {
    pub agent: AnticoagulantAgent,
    pub age: Option<u32>,
    pub egfr: Option<f64>,
    pub medications: &'a [String],
    pub bleeding_risk: BleedingRisk,
    pub very_high_bleeding_risk: bool,
}

impl<'a> DoseInputs<'a> {
    pub fn from_record(record: &'a PatientClinicalRecord) -> Self {
        Self {
            agent: record.anticoagulant,
            age: record.age,
            egfr: record.measured_egfr(),
            medications: &record.medications,
            bleeding_risk: record.bleeding_risk,
            very_high_bleeding_risk: record.very_high_bleeding_risk,
        }
    }
}

/// Warnings for the selected agent, in rule order
///
/// Warfarin and unspecified agents produce none. Without a measured eGFR the
/// renal rules are skipped and a single notice says so.
pub fn dose_warnings(inputs: &DoseInputs<'_>) -> Vec<DoseWarning> {
    if !inputs.agent.is_direct() {
        return Vec::new();
    }

    let egfr = inputs.egfr.filter(|v| *v > 0.0);
    let age = inputs.age.unwrap_or(0);
    let mut warnings = Vec::new();

    if egfr.is_none() {
        warnings.push(DoseWarning::new(
            WarningSeverity::Notice,
            format!("{}: renal function unknown; renal dose checks skipped.", agent_name(inputs.agent)),
        ));
    }

    match inputs.agent {
        AnticoagulantAgent::Apixaban => {
            if let Some(egfr) = egfr {
                if egfr < EGFR_DOAC_AVOID {
                    warnings.push(DoseWarning::new(WarningSeverity::Avoid, "Apixaban: eGFR < 15, avoid or stop."));
                } else if age >= AGE_ELDERLY && egfr < EGFR_DOAC_SEVERE {
                    warnings.push(DoseWarning::new(
                        WarningSeverity::Reduce,
                        "Apixaban: age >= 80 and eGFR < 30, reduce dose.",
                    ));
                } else if egfr < EGFR_DOAC_SEVERE {
                    warnings.push(DoseWarning::new(WarningSeverity::Reduce, "Apixaban: eGFR < 30, reduce dose."));
                }
            }
        }
        AnticoagulantAgent::Dabigatran => {
            let has_verapamil = contains_any(inputs.medications, &[VERAPAMIL]);
            let high_bleeding = inputs.bleeding_risk == BleedingRisk::High || inputs.very_high_bleeding_risk;

            if egfr.is_some_and(|v| v < EGFR_DOAC_SEVERE) {
                warnings.push(DoseWarning::new(WarningSeverity::Avoid, "Dabigatran: eGFR < 30, avoid or stop."));
            }
            if age >= AGE_ELDERLY || has_verapamil {
                warnings.push(DoseWarning::new(
                    WarningSeverity::Reduce,
                    "Dabigatran: age >= 80 or concomitant verapamil, reduce dose.",
                ));
            }
            let moderate_renal = egfr.is_some_and(|v| (EGFR_DOAC_SEVERE..=EGFR_DOAC_MODERATE_UPPER).contains(&v));
            if (AGE_DABIGATRAN_REVIEW..AGE_ELDERLY).contains(&age) || moderate_renal || high_bleeding {
                warnings.push(DoseWarning::new(
                    WarningSeverity::Consider,
                    "Dabigatran: age 75-80, eGFR 30-50 or high bleeding risk, decide dose reduction individually.",
                ));
            }
        }
        AnticoagulantAgent::Edoxaban => {
            if let Some(egfr) = egfr {
                if egfr < EGFR_DOAC_AVOID {
                    warnings.push(DoseWarning::new(WarningSeverity::Avoid, "Edoxaban: eGFR < 15, avoid or stop."));
                } else if egfr <= EGFR_DOAC_MODERATE_UPPER {
                    warnings.push(DoseWarning::new(WarningSeverity::Reduce, "Edoxaban: eGFR 15-50, reduce dose."));
                }
            }
            if contains_any(inputs.medications, &EDOXABAN_INTERACTIONS) {
                warnings.push(DoseWarning::new(
                    WarningSeverity::Reduce,
                    "Edoxaban: interacting drug (ciclosporin, dronedarone, erythromycin, ketoconazole), reduce dose.",
                ));
            }
        }
        AnticoagulantAgent::Rivaroxaban => {
            if let Some(egfr) = egfr {
                if egfr < EGFR_DOAC_AVOID {
                    warnings.push(DoseWarning::new(
                        WarningSeverity::Avoid,
                        "Rivaroxaban: eGFR < 15, avoid or stop.",
                    ));
                } else if egfr <= EGFR_RIVAROXABAN_MODERATE_UPPER {
                    warnings.push(DoseWarning::new(
                        WarningSeverity::Reduce,
                        "Rivaroxaban: eGFR 15-49, reduce dose.",
                    ));
                }
            }
        }
        AnticoagulantAgent::Warfarin | AnticoagulantAgent::Unspecified => {}
    }

    warnings
}

fn agent_name(agent: AnticoagulantAgent) -> &'static str {
    match agent {
        AnticoagulantAgent::Apixaban => "Apixaban",
        AnticoagulantAgent::Rivaroxaban => "Rivaroxaban",
        AnticoagulantAgent::Edoxaban => "Edoxaban",
        AnticoagulantAgent::Dabigatran => "Dabigatran",
        AnticoagulantAgent::Warfarin => "Warfarin",
        AnticoagulantAgent::Unspecified => "Anticoagulant",
    }
}
