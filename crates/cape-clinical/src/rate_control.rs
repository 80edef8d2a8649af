//! AF rate control and bradycardia interaction

use crate::record::PatientClinicalRecord;
use crate::tables::{
    BETA_BLOCKERS, BRADYCARDIA_BPM, NON_DHP_CALCIUM_BLOCKERS, RATE_PARTIAL_BPM, RATE_UNCONTROLLED_BPM,
};
use crate::vocabulary::contains_any;
use serde::Serialize;

/// Ventricular response band
///
/// | heart rate | band         |
/// |------------|--------------|
/// | >= 110     | Uncontrolled |
/// | 90 to 109  | Partial      |
/// | < 90       | Controlled   |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RateBand {
    Uncontrolled,
    Partial,
    Controlled,
}

impl RateBand {
    pub const fn from_heart_rate(bpm: u32) -> Self {
        if bpm >= RATE_UNCONTROLLED_BPM {
            Self::Uncontrolled
        } else if bpm >= RATE_PARTIAL_BPM {
            Self::Partial
        } else {
            Self::Controlled
        }
    }

    const fn describe(&self) -> &'static str {
        match self {
            Self::Uncontrolled => "uncontrolled (rapid ventricular response)",
            Self::Partial => "partially controlled",
            Self::Controlled => "controlled",
        }
    }
}

/// Bradycardia with a rate-lowering agent on the medication list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum BradycardiaNote {
    /// No heart failure
    HoldRateLowering,
    /// Heart failure on a beta-blocker
    ReduceBetaBlocker,
    /// Heart failure on a non-dihydropyridine calcium blocker only
    ReduceRateLoweringAgents,
}

impl BradycardiaNote {
    pub const fn text(&self) -> &'static str {
        match self {
            Self::HoldRateLowering => {
                "Bradycardia (HR < 60/min) on rate-lowering therapy: if hemodynamics allow, reduce or temporarily hold the beta-blocker and/or non-DHP calcium blocker."
            }
            Self::ReduceBetaBlocker => {
                "Bradycardia (HR < 60/min) with heart failure: reduce or temporarily hold the beta-blocker according to hemodynamics."
            }
            Self::ReduceRateLoweringAgents => {
                "Bradycardia (HR < 60/min): consider reducing or temporarily holding rate-lowering agents according to hemodynamics."
            }
        }
    }
}

/// Gated purely on heart rate below 60 and a rate-lowering agent being present
pub fn bradycardia_note(
    heart_rate: Option<u32>,
    heart_failure: bool,
    medications: &[String],
) -> Option<BradycardiaNote> {
    let bpm = heart_rate?;
    if bpm >= BRADYCARDIA_BPM {
        return None;
    }
    let on_beta_blocker = contains_any(medications, &BETA_BLOCKERS);
    let on_non_dhp = contains_any(medications, &NON_DHP_CALCIUM_BLOCKERS);

    match (on_beta_blocker, on_non_dhp, heart_failure) {
        (false, false, _) => None,
        (_, _, false) => Some(BradycardiaNote::HoldRateLowering),
        (true, _, true) => Some(BradycardiaNote::ReduceBetaBlocker),
        (false, true, true) => Some(BradycardiaNote::ReduceRateLoweringAgents),
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RateControlInputs<'a> {
    pub atrial_fibrillation: bool,
    pub heart_rate: Option<u32>,
    pub heart_failure: bool,
    pub reduced_ejection_fraction: bool,
    pub medications: &'a [String],
}

impl<'a> RateControlInputs<'a> {
    pub fn from_record(record: &'a PatientClinicalRecord) -> Self {
        Self {
            atrial_fibrillation: record.atrial_fibrillation,
            heart_rate: record.heart_rate,
            heart_failure: record.heart_failure,
            reduced_ejection_fraction: record.has_reduced_ejection_fraction(),
            medications: &record.medications,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RateControlAssessment {
    pub indicated: bool,
    pub band: Option<RateBand>,
    pub guidance: Vec<String>,
    pub bradycardia: Option<BradycardiaNote>,
}

pub fn assess_rate_control(inputs: &RateControlInputs<'_>) -> RateControlAssessment {
    let bradycardia = bradycardia_note(inputs.heart_rate, inputs.heart_failure, inputs.medications);
    let mut guidance = Vec::new();

    if !inputs.atrial_fibrillation {
        guidance.push("AF rate control: not indicated.".to_string());
        if let Some(note) = bradycardia {
            guidance.push(note.text().to_string());
        }
        return RateControlAssessment {
            indicated: false,
            band: None,
            guidance,
            bradycardia,
        };
    }

    let band = inputs.heart_rate.map(RateBand::from_heart_rate);
    match (band, inputs.heart_rate) {
        (Some(band), Some(bpm)) => guidance.push(format!(
            "AF rate control: ventricular response {} (≈{bpm}/min).",
            band.describe()
        )),
        _ => guidance.push("AF rate control: heart rate not recorded; rate band cannot be assessed.".to_string()),
    }

    if contains_any(inputs.medications, &BETA_BLOCKERS) {
        guidance.push(
            "Beta-blocker on the medication list: continue peri-operatively as far as hemodynamics allow."
                .to_string(),
        );
    }
    if contains_any(inputs.medications, &NON_DHP_CALCIUM_BLOCKERS) {
        if inputs.reduced_ejection_fraction {
            guidance.push(
                "Non-DHP calcium blocker (verapamil/diltiazem) with LVEF < 40%: use caution or avoid because of negative inotropy."
                    .to_string(),
            );
        } else {
            guidance.push(
                "Non-DHP calcium blocker (verapamil/diltiazem): usable for rate control; monitor for hypotension and bradycardia."
                    .to_string(),
            );
        }
    }

    if inputs.reduced_ejection_fraction {
        guidance.push(
            "HFrEF: avoid non-DHP calcium blockers; rate control with beta-blocker with or without digoxin; amiodarone for instability by multidisciplinary decision."
                .to_string(),
        );
    } else {
        guidance.push(
            "Hemodynamically stable: beta-blocker or non-DHP calcium blocker for rate control; prioritize stabilization if unstable."
                .to_string(),
        );
    }

    if let Some(note) = bradycardia {
        guidance.push(note.text().to_string());
    }

    RateControlAssessment {
        indicated: true,
        band,
        guidance,
        bradycardia,
    }
}
