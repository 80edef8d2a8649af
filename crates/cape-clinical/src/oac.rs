//! Oral anticoagulant timing, bridging and restart
//!
//! Emergency surgery takes precedence over everything else. Otherwise the
//! agent family selects the plan: direct agents use the renal stop-window
//! tables, vitamin K antagonists a fixed lead time. Numbers come from
//! [`crate::tables`].

use crate::record::{AnticoagulantAgent, BleedingRisk, PatientClinicalRecord, Urgency};
use crate::recommendation::ClinicalRecommendation;
use crate::tables::{
    self, HourRange, RenalStopTable, StopHours, DABIGATRAN_STOP_HOURS, XA_INHIBITOR_STOP_HOURS,
};
use crate::valve;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DirectFamily {
    Dabigatran,
    XaInhibitor,
}

impl DirectFamily {
    fn stop_table(&self) -> &'static RenalStopTable {
        match self {
            Self::Dabigatran => &DABIGATRAN_STOP_HOURS,
            Self::XaInhibitor => &XA_INHIBITOR_STOP_HOURS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum AgentFamily {
    Direct(DirectFamily),
    VitaminK,
    Unknown,
}

impl AgentFamily {
    pub const fn of(agent: AnticoagulantAgent) -> Self {
        match agent {
            AnticoagulantAgent::Dabigatran => Self::Direct(DirectFamily::Dabigatran),
            AnticoagulantAgent::Apixaban
            | AnticoagulantAgent::Rivaroxaban
            | AnticoagulantAgent::Edoxaban => Self::Direct(DirectFamily::XaInhibitor),
            AnticoagulantAgent::Warfarin => Self::VitaminK,
            AnticoagulantAgent::Unspecified => Self::Unknown,
        }
    }
}

/// Renal function band for stop-window selection
///
/// | eGFR (ml/min) | band     |
/// |---------------|----------|
/// | >= 50         | Normal   |
/// | 30 to < 50    | Moderate |
/// | < 30          | Severe   |
/// | missing, <= 0 | Unknown  |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RenalBand {
    Normal,
    Moderate,
    Severe,
    Unknown,
}

impl RenalBand {
    pub fn from_egfr(egfr: Option<f64>) -> Self {
        match egfr {
            Some(v) if v >= tables::EGFR_RENAL_NORMAL => Self::Normal,
            Some(v) if v >= tables::EGFR_RENAL_MODERATE => Self::Moderate,
            Some(v) if v > 0.0 => Self::Severe,
            _ => Self::Unknown,
        }
    }

    pub const fn is_normal(&self) -> bool {
        matches!(self, Self::Normal)
    }
}

/// Bleeding tier used for timing
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum BleedingTier {
    Standard,
    High,
    VeryHigh,
}

impl BleedingTier {
    /// The very-high flag overrides the procedural tier; `None` when neither is known
    pub const fn classify(risk: BleedingRisk, very_high: bool) -> Option<Self> {
        if very_high {
            return Some(Self::VeryHigh);
        }
        match risk {
            BleedingRisk::Minor | BleedingRisk::LowModerate => Some(Self::Standard),
            BleedingRisk::High => Some(Self::High),
            BleedingRisk::Unspecified => None,
        }
    }

    const fn label(&self) -> &'static str {
        match self {
            Self::Standard => "low-moderate",
            Self::High => "high",
            Self::VeryHigh => "very high",
        }
    }
}

/// Last-dose lead time for a direct agent
pub fn direct_stop_hours(family: DirectFamily, band: RenalBand, tier: BleedingTier) -> u32 {
    if tier == BleedingTier::VeryHigh {
        return match family {
            DirectFamily::Dabigatran if !band.is_normal() => tables::VERY_HIGH_BLEEDING_STOP_HOURS_RENAL,
            _ => tables::VERY_HIGH_BLEEDING_STOP_HOURS,
        };
    }

    let table = family.stop_table();
    let row: StopHours = match band {
        RenalBand::Normal => table.normal,
        RenalBand::Moderate => table.moderate,
        RenalBand::Severe | RenalBand::Unknown => table.reduced,
    };
    match tier {
        BleedingTier::Standard => row.standard,
        _ => row.high,
    }
}

/// Restart window after surgery once hemostasis is secured
pub const fn restart_window(family: AgentFamily, tier: BleedingTier) -> Option<HourRange> {
    match (family, tier) {
        (AgentFamily::Direct(_), BleedingTier::Standard) => Some(tables::DOAC_RESTART_STANDARD),
        (AgentFamily::Direct(_), _) => Some(tables::DOAC_RESTART_HIGH),
        (AgentFamily::VitaminK, BleedingTier::Standard) => Some(tables::VKA_RESTART_STANDARD),
        (AgentFamily::VitaminK, _) => Some(tables::VKA_RESTART_EXTENDED),
        (AgentFamily::Unknown, _) => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "hours", rename_all = "kebab-case")]
pub enum StopTiming {
    Immediately,
    HoursBefore(u32),
    /// Agent or bleeding tier missing
    Undetermined,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Bridging {
    /// Direct agents never bridge
    NotApplicable,
    Recommended,
    Discouraged,
    Undetermined,
}

impl Bridging {
    pub const fn decide(family: AgentFamily, mechanical_valve: bool, high_thromboembolic_risk: bool) -> Self {
        match family {
            AgentFamily::Direct(_) => Self::NotApplicable,
            AgentFamily::VitaminK if mechanical_valve && high_thromboembolic_risk => Self::Recommended,
            AgentFamily::VitaminK => Self::Discouraged,
            AgentFamily::Unknown => Self::Undetermined,
        }
    }

    pub const fn text(&self) -> &'static str {
        match self {
            Self::NotApplicable => "No routine bridging for patients on a direct oral anticoagulant.",
            Self::Recommended => {
                "Mechanical valve with high thromboembolic risk: bridging with UFH/LMWH by multidisciplinary decision."
            }
            Self::Discouraged => "Bridging is not recommended at low-moderate thrombotic risk.",
            Self::Undetermined => "Bridging cannot be assessed until the anticoagulant agent is specified.",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OacInputs {
    pub agent: AnticoagulantAgent,
    pub urgency: Urgency,
    pub bleeding_risk: BleedingRisk,
    pub very_high_bleeding_risk: bool,
    pub egfr: Option<f64>,
    pub mechanical_valve: bool,
    pub high_thromboembolic_risk: bool,
}

impl OacInputs {
    pub fn from_record(record: &PatientClinicalRecord) -> Self {
        Self {
            agent: record.anticoagulant,
            urgency: record.urgency,
            bleeding_risk: record.bleeding_risk,
            very_high_bleeding_risk: record.very_high_bleeding_risk,
            egfr: record.egfr,
            mechanical_valve: record.mechanical_valve,
            high_thromboembolic_risk: record.high_thromboembolic_risk,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OacPlan {
    pub recommendation: ClinicalRecommendation,
    pub family: AgentFamily,
    pub renal_band: RenalBand,
    pub bleeding_tier: Option<BleedingTier>,
    pub stop: StopTiming,
    pub restart_window: Option<HourRange>,
    pub bridging: Bridging,
}

const CLASS_EMERGENCY: &str = "emergency-reversal";
const CLASS_AGENT_UNSPECIFIED: &str = "agent-unspecified";
const CLASS_BLEEDING_UNSPECIFIED: &str = "bleeding-risk-unspecified";
const CLASS_DOAC: &str = "doac-timed-interruption";
const CLASS_VKA_BRIDGING: &str = "vka-bridging";
const CLASS_VKA_NO_BRIDGING: &str = "vka-no-bridging";

const BLEEDING_UNSPECIFIED_TEXT: &str =
    "Timing cannot be determined until the procedural bleeding risk is specified.";

pub fn plan_anticoagulation(inputs: &OacInputs) -> OacPlan {
    let family = AgentFamily::of(inputs.agent);
    let renal_band = RenalBand::from_egfr(inputs.egfr);
    let bleeding_tier = BleedingTier::classify(inputs.bleeding_risk, inputs.very_high_bleeding_risk);
    let bridging = Bridging::decide(family, inputs.mechanical_valve, inputs.high_thromboembolic_risk);

    let mut plan = if inputs.urgency.is_emergency() {
        emergency_plan(inputs.agent, bridging)
    } else {
        match family {
            AgentFamily::Direct(direct) => direct_plan(inputs, direct, renal_band, bleeding_tier),
            AgentFamily::VitaminK => vka_plan(bleeding_tier, bridging),
            AgentFamily::Unknown => unknown_agent_plan(),
        }
    };

    if inputs.mechanical_valve {
        if let Some(warning) = valve::direct_agent_warning(inputs.agent) {
            plan.recommendation.warnings.push(warning.to_string());
        }
    }

    log::debug!(
        "anticoagulation plan for {}: {:?} ({})",
        inputs.agent,
        plan.stop,
        plan.recommendation.classification
    );

    OacPlan {
        recommendation: plan.recommendation,
        family,
        renal_band,
        bleeding_tier,
        stop: plan.stop,
        restart_window: plan.restart_window,
        bridging,
    }
}

struct PartialPlan {
    recommendation: ClinicalRecommendation,
    stop: StopTiming,
    restart_window: Option<HourRange>,
}

fn emergency_plan(agent: AnticoagulantAgent, bridging: Bridging) -> PartialPlan {
    let recommendation = ClinicalRecommendation::new(format!(
        "Anticoagulation: {agent}. Emergency surgery planned."
    ))
    .with_stop_plan(
        "Discontinue immediately; consider reversal (antidote/PCC) if bleeding risk is high, by multidisciplinary decision.",
    )
    .with_restart_plan(
        "Plan resumption with the surgical team once hemostasis is secured, weighing bleeding risk.",
    )
    .with_bridging_plan(bridging.text())
    .with_caution("Decision support only; manage rapidly together with haematology and anaesthesia.")
    .with_classification(CLASS_EMERGENCY);

    PartialPlan {
        recommendation,
        stop: StopTiming::Immediately,
        restart_window: None,
    }
}

fn direct_plan(
    inputs: &OacInputs,
    family: DirectFamily,
    band: RenalBand,
    tier: Option<BleedingTier>,
) -> PartialPlan {
    let mut recommendation = ClinicalRecommendation::new(format!(
        "Anticoagulation: {} (direct oral anticoagulant).",
        inputs.agent
    ))
    .with_bridging_plan(Bridging::NotApplicable.text())
    .with_caution(
        "With very high bleeding risk (e.g. spinal/epidural) decide longer interruption and restart together with surgery and anaesthesia.",
    );

    if band == RenalBand::Unknown {
        recommendation = recommendation.with_caution(
            "Renal function unknown: the reduced-function stop window was applied; measure eGFR to refine.",
        );
    }

    let Some(tier) = tier else {
        let recommendation = recommendation
            .with_stop_plan(BLEEDING_UNSPECIFIED_TEXT)
            .with_restart_plan(BLEEDING_UNSPECIFIED_TEXT)
            .with_classification(CLASS_BLEEDING_UNSPECIFIED);
        return PartialPlan {
            recommendation,
            stop: StopTiming::Undetermined,
            restart_window: None,
        };
    };

    let hours = direct_stop_hours(family, band, tier);
    let restart = restart_window(AgentFamily::Direct(family), tier);
    let egfr = match inputs.egfr.filter(|v| *v > 0.0) {
        Some(v) => format!("{v:.0}"),
        None => "unknown".to_string(),
    };

    let recommendation = recommendation
        .with_stop_plan(format!(
            "Last dose {} before elective surgery ({} bleeding risk, eGFR {}).",
            format_lead_time(hours),
            tier.label(),
            egfr
        ))
        .with_restart_plan(match restart {
            Some(window) => format!("If hemostasis is secured, resume the full dose after {window}."),
            None => BLEEDING_UNSPECIFIED_TEXT.to_string(),
        })
        .with_classification(CLASS_DOAC);

    PartialPlan {
        recommendation,
        stop: StopTiming::HoursBefore(hours),
        restart_window: restart,
    }
}

fn vka_plan(tier: Option<BleedingTier>, bridging: Bridging) -> PartialPlan {
    let restart = tier.and_then(|t| restart_window(AgentFamily::VitaminK, t));
    let restart_plan = match restart {
        Some(window) => format!(
            "Resume warfarin {window} after surgery once bleeding is controlled; assess bridging until the INR is therapeutic."
        ),
        None => BLEEDING_UNSPECIFIED_TEXT.to_string(),
    };
    let classification = match (tier, bridging) {
        (None, _) => CLASS_BLEEDING_UNSPECIFIED,
        (Some(_), Bridging::Recommended) => CLASS_VKA_BRIDGING,
        (Some(_), _) => CLASS_VKA_NO_BRIDGING,
    };

    let recommendation = ClinicalRecommendation::new("Anticoagulation: warfarin (vitamin K antagonist).")
        .with_stop_plan(format!(
            "Stop warfarin {} days before elective surgery; confirm the target INR for the procedure.",
            tables::VKA_STOP_DAYS
        ))
        .with_restart_plan(restart_plan)
        .with_bridging_plan(bridging.text())
        .with_caution(
            "INR monitoring and the bridging decision balance thrombotic and bleeding risk, together with surgery and anaesthesia.",
        )
        .with_classification(classification);

    PartialPlan {
        recommendation,
        stop: StopTiming::HoursBefore(tables::VKA_STOP_DAYS * 24),
        restart_window: restart,
    }
}

fn unknown_agent_plan() -> PartialPlan {
    let recommendation = ClinicalRecommendation::new("Anticoagulant agent not specified.")
        .with_stop_plan("Specify the anticoagulant agent; interruption timing depends on the agent.")
        .with_restart_plan("Specify the anticoagulant agent to plan resumption.")
        .with_bridging_plan(Bridging::Undetermined.text())
        .with_classification(CLASS_AGENT_UNSPECIFIED);

    PartialPlan {
        recommendation,
        stop: StopTiming::Undetermined,
        restart_window: None,
    }
}

/// `48` → "48 h (2 days)", `36` → "36 h"
fn format_lead_time(hours: u32) -> String {
    match (hours / 24, hours % 24) {
        (1, 0) => format!("{hours} h (1 day)"),
        (days, 0) => format!("{hours} h ({days} days)"),
        _ => format!("{hours} h"),
    }
}
