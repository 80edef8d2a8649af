//! Clinical value tables and deterministic perioperative calculators
//!
//! Each calculator is a pure function of a typed input and the static
//! [`tables`]. Categorical inputs are closed enumerations with an explicit
//! `Unspecified` variant, so unrecognized text always reaches a fallback
//! branch instead of a guess.
//!
//! ```
//! use cape_clinical::{plan_anticoagulation, AnticoagulantAgent, BleedingRisk, OacInputs, StopTiming, Urgency};
//!
//! let plan = plan_anticoagulation(&OacInputs {
//!     agent: AnticoagulantAgent::Apixaban,
//!     urgency: Urgency::Elective,
//!     bleeding_risk: BleedingRisk::High,
//!     very_high_bleeding_risk: false,
//!     egfr: Some(45.0),
//!     mechanical_valve: false,
//!     high_thromboembolic_risk: false,
//! });
//! assert_eq!(plan.stop, StopTiming::HoursBefore(48));
//! ```

pub mod antithrombotic;
pub mod assessment;
pub mod device;
pub mod doac;
pub mod oac;
pub mod pathway;
pub mod postop;
pub mod rate_control;
pub mod rcri;
pub mod record;
pub mod recommendation;
pub mod tables;
pub mod valve;
pub mod vocabulary;

pub use antithrombotic::{
    antiplatelet_monotherapy_plan, oac_monotherapy_hint, select_strategy, AntiplateletAction,
    AntiplateletPlan, AntithromboticStrategy,
};
pub use assessment::{assess, ClinicalAssessment};
pub use device::{select_device_mode, DeviceMode, PacingMode};
pub use doac::{dose_warnings, DoseInputs, DoseWarning, WarningSeverity};
pub use oac::{
    direct_stop_hours, plan_anticoagulation, AgentFamily, BleedingTier, Bridging, DirectFamily,
    OacInputs, OacPlan, RenalBand, StopTiming,
};
pub use pathway::{synthesize_pathway, PathwayBranch, PathwayInputs, PathwayResult, WorkupItem};
pub use postop::{postop_af_risk, PostopAfAssessment, PostopAfRisk};
pub use rate_control::{
    assess_rate_control, bradycardia_note, BradycardiaNote, RateBand, RateControlAssessment,
    RateControlInputs,
};
pub use rcri::{rcri_score, RcriCriterion, RcriFlags, RiskScore};
pub use record::{
    AnticoagulantAgent, AntiplateletAgent, BleedingRisk, CardiacDevice, DeviceType,
    FunctionalCapacity, LvefBand, Nyha, PaceDependency, PatientClinicalRecord, PciTiming, Sex,
    SurgeryRisk, Symptom, Urgency,
};
pub use recommendation::ClinicalRecommendation;
pub use tables::HourRange;
pub use valve::{vka_protocol, ValveProtocol};
pub use vocabulary::{DrugVocabulary, VocabularySource};
