//! Mechanical-valve warfarin protocol

use crate::record::AnticoagulantAgent;
use crate::tables::{self, HourRange, InrRange};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InrTarget {
    pub indication: &'static str,
    pub range: InrRange,
}

/// Fixed peri-operative protocol for a patient with a mechanical valve on warfarin
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValveProtocol {
    pub stop_days_before: u32,
    /// INR on the morning of surgery must be below this
    pub preoperative_inr_below: f64,
    pub endocarditis_prophylaxis: &'static str,
    pub penicillin_allergy_prophylaxis: &'static str,
    pub restart_window: HourRange,
    pub restart_window_major_bleeding: HourRange,
    pub inr_targets: Vec<InrTarget>,
    /// LMWH continues until INR exceeds this
    pub bridging_until_inr_above: f64,
}

pub fn vka_protocol() -> ValveProtocol {
    ValveProtocol {
        stop_days_before: tables::VKA_STOP_DAYS,
        preoperative_inr_below: tables::INR_PREOPERATIVE_MAX,
        endocarditis_prophylaxis: "Amoxicillin 2 g PO 30-60 min before the procedure",
        penicillin_allergy_prophylaxis: "Clindamycin 600 mg PO or azithromycin 500 mg PO",
        restart_window: tables::VKA_RESTART_STANDARD,
        restart_window_major_bleeding: tables::VKA_RESTART_EXTENDED,
        inr_targets: vec![
            InrTarget {
                indication: "Mechanical mitral valve",
                range: tables::INR_MECHANICAL_MITRAL,
            },
            InrTarget {
                indication: "Mechanical aortic valve",
                range: tables::INR_MECHANICAL_AORTIC,
            },
            InrTarget {
                indication: "Atrial fibrillation",
                range: tables::INR_ATRIAL_FIBRILLATION,
            },
        ],
        bridging_until_inr_above: tables::INR_BRIDGING_END,
    }
}

impl ValveProtocol {
    /// Protocol as ordered text fragments
    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec![
            format!("Stop warfarin {} days before surgery.", self.stop_days_before),
            format!(
                "Plan for INR < {:.1} on the morning of surgery; check INR the day before.",
                self.preoperative_inr_below
            ),
            format!("Endocarditis prophylaxis: {}.", self.endocarditis_prophylaxis),
            format!("Penicillin allergy: {}.", self.penicillin_allergy_prophylaxis),
            format!(
                "Restart warfarin {} after surgery once hemostasis is secured ({} with major bleeding risk), at the previous stable dose.",
                self.restart_window, self.restart_window_major_bleeding
            ),
        ];
        lines.extend(
            self.inr_targets
                .iter()
                .map(|t| format!("INR target, {}: {}.", t.indication.to_lowercase(), t.range)),
        );
        lines.push(format!(
            "Bridge with LMWH until INR > {:.1}, then stop LMWH.",
            self.bridging_until_inr_above
        ));
        lines
    }
}

/// Direct agents are contraindicated with a mechanical valve
pub const fn direct_agent_warning(agent: AnticoagulantAgent) -> Option<&'static str> {
    if agent.is_direct() {
        Some("Direct oral anticoagulants are contraindicated with a mechanical valve; use a vitamin K antagonist.")
    } else {
        None
    }
}
