//! Clinical value tables
//!
//! Static reference data for the calculators: the surgical risk table, the
//! built-in drug vocabulary, medication classes and every numeric cutoff a
//! calculator compares against.

use crate::record::SurgeryRisk;
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use serde::Serialize;
use std::fmt;

// ---------------------------------------------------------------------------
// Surgical risk

/// Named procedures and their surgical cardiac risk tier, in display order
pub const SURGICAL_RISK_TABLE: [(&str, SurgeryRisk); 31] = [
    ("Breast surgery", SurgeryRisk::Low),
    ("Dental procedures", SurgeryRisk::Low),
    ("Endocrine: thyroid", SurgeryRisk::Low),
    ("Eye surgery", SurgeryRisk::Low),
    ("Gynaecological: minor", SurgeryRisk::Low),
    ("Orthopaedic minor: meniscectomy", SurgeryRisk::Low),
    ("Reconstructive surgery", SurgeryRisk::Low),
    ("Superficial surgery", SurgeryRisk::Low),
    ("Urological minor: transurethral resection of prostate", SurgeryRisk::Low),
    ("VATS minor lung resection", SurgeryRisk::Low),
    ("Carotid asymptomatic: CEA or CAS", SurgeryRisk::Intermediate),
    ("Carotid symptomatic: CEA", SurgeryRisk::Intermediate),
    ("Endovascular aortic aneurysm repair", SurgeryRisk::Intermediate),
    ("Head or neck surgery", SurgeryRisk::Intermediate),
    ("Intraperitoneal: splenectomy, hiatal hernia repair, cholecystectomy", SurgeryRisk::Intermediate),
    ("Intrathoracic: non-major", SurgeryRisk::Intermediate),
    ("Neurological or orthopaedic major: hip and spine surgery", SurgeryRisk::Intermediate),
    ("Peripheral arterial angioplasty", SurgeryRisk::Intermediate),
    ("Renal transplant", SurgeryRisk::Intermediate),
    ("Urological or gynaecological: major", SurgeryRisk::Intermediate),
    ("Adrenal resection", SurgeryRisk::High),
    ("Aortic and major vascular surgery", SurgeryRisk::High),
    ("Carotid symptomatic: CAS", SurgeryRisk::High),
    ("Duodenal-pancreatic surgery", SurgeryRisk::High),
    ("Liver resection or bile duct surgery", SurgeryRisk::High),
    ("Oesophagectomy", SurgeryRisk::High),
    ("Open lower limb revascularisation for acute ischaemia or amputation", SurgeryRisk::High),
    ("Pneumonectomy (VATS or open)", SurgeryRisk::High),
    ("Pulmonary or liver transplant", SurgeryRisk::High),
    ("Repair of perforated bowel", SurgeryRisk::High),
    ("Total cystectomy", SurgeryRisk::High),
];

static PROCEDURE_INDEX: Lazy<IndexMap<String, SurgeryRisk>> = Lazy::new(|| {
    SURGICAL_RISK_TABLE
        .iter()
        .map(|(name, risk)| (name.to_lowercase(), *risk))
        .collect()
});

/// Risk tier of a procedure; lookup ignores case and surrounding whitespace
pub fn procedure_risk(name: &str) -> SurgeryRisk {
    PROCEDURE_INDEX
        .get(&name.trim().to_lowercase())
        .copied()
        .unwrap_or(SurgeryRisk::Unspecified)
}

/// Procedure names in table order
pub fn procedures() -> impl Iterator<Item = &'static str> {
    SURGICAL_RISK_TABLE.iter().map(|(name, _)| *name)
}

// ---------------------------------------------------------------------------
// Medications

/// Built-in drug vocabulary, sorted
pub const DEFAULT_DRUG_NAMES: [&str; 38] = [
    "Amiodaron",
    "Amlodipin",
    "Apiksaban",
    "Aspirin",
    "Atorvastatin",
    "Bisoprolol",
    "Carvedilol",
    "Dabigatran",
    "Dalteparin",
    "Dapagliflozin",
    "Digoksin",
    "Diltiazem",
    "Edoksaban",
    "Empagliflozin",
    "Enalapril",
    "Enoksaparin",
    "Eplerenon",
    "Fondaparinuks",
    "Furosemid",
    "Klopidogrel",
    "Losartan",
    "Metoprolol",
    "Nebivolol",
    "Omeprazol",
    "Pantoprazol",
    "Perindopril",
    "Prasugrel",
    "Propranolol",
    "Ramipril",
    "Rivaroksaban",
    "Rosuvastatin",
    "Sacubitril/Valsartan",
    "Spironolakton",
    "Tikagrelor",
    "Torasemid",
    "Valsartan",
    "Verapamil",
    "Warfarin",
];

pub const BETA_BLOCKERS: [&str; 5] = ["metoprolol", "bisoprolol", "nebivolol", "carvedilol", "propranolol"];

pub const NON_DHP_CALCIUM_BLOCKERS: [&str; 2] = ["diltiazem", "verapamil"];

/// Co-medications that call for an edoxaban dose reduction
pub const EDOXABAN_INTERACTIONS: [&str; 7] = [
    "siklosporin",
    "cyclosporine",
    "dronedarone",
    "eritromisin",
    "erythromycin",
    "ketokonazol",
    "ketoconazole",
];

pub const VERAPAMIL: &str = "verapamil";

// ---------------------------------------------------------------------------
// Risk scores and heart rate

/// RCRI renal criterion: creatinine strictly above this (≈177 µmol/L)
pub const CREATININE_CUTOFF_MG_DL: f64 = 2.0;

pub const RATE_UNCONTROLLED_BPM: u32 = 110;
pub const RATE_PARTIAL_BPM: u32 = 90;
/// Heart rate strictly below this is bradycardia
pub const BRADYCARDIA_BPM: u32 = 60;

pub const POSTOP_AF_AGE: u32 = 70;
pub const POSTOP_AF_HEART_RATE_BPM: u32 = 100;
pub const POSTOP_AF_INCREASED_FLAGS: u8 = 3;
pub const POSTOP_AF_MODERATE_FLAGS: u8 = 2;

// ---------------------------------------------------------------------------
// DOAC dosing

pub const EGFR_DOAC_AVOID: f64 = 15.0;
pub const EGFR_DOAC_SEVERE: f64 = 30.0;
/// Inclusive upper bound of the dabigatran and edoxaban reduced-dose range
pub const EGFR_DOAC_MODERATE_UPPER: f64 = 50.0;
/// Inclusive upper bound of the rivaroxaban reduced-dose range
pub const EGFR_RIVAROXABAN_MODERATE_UPPER: f64 = 49.0;

pub const AGE_DABIGATRAN_REVIEW: u32 = 75;
pub const AGE_ELDERLY: u32 = 80;

// ---------------------------------------------------------------------------
// Anticoagulant timing

/// Renal band lower bounds for stop-window selection
pub const EGFR_RENAL_NORMAL: f64 = 50.0;
pub const EGFR_RENAL_MODERATE: f64 = 30.0;

/// Last-dose lead time in hours before surgery, by bleeding tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StopHours {
    pub standard: u32,
    pub high: u32,
}

impl StopHours {
    const fn new(standard: u32, high: u32) -> Self {
        Self { standard, high }
    }
}

/// Stop windows for one agent family across the renal bands
///
/// Reduced applies below 30 ml/min and whenever renal function is unknown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RenalStopTable {
    pub normal: StopHours,
    pub moderate: StopHours,
    pub reduced: StopHours,
}

pub const DABIGATRAN_STOP_HOURS: RenalStopTable = RenalStopTable {
    normal: StopHours::new(24, 48),
    moderate: StopHours::new(48, 96),
    reduced: StopHours::new(96, 120),
};

pub const XA_INHIBITOR_STOP_HOURS: RenalStopTable = RenalStopTable {
    normal: StopHours::new(24, 48),
    moderate: StopHours::new(24, 48),
    reduced: StopHours::new(48, 72),
};

/// Very high bleeding risk (neuraxial, intracranial, vitreoretinal)
pub const VERY_HIGH_BLEEDING_STOP_HOURS: u32 = 96;
/// Dabigatran with eGFR below the normal band, or unknown
pub const VERY_HIGH_BLEEDING_STOP_HOURS_RENAL: u32 = 120;

/// An interval in hours after surgery
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HourRange {
    pub from: u32,
    pub to: u32,
}

impl HourRange {
    pub const fn new(from: u32, to: u32) -> Self {
        Self { from, to }
    }
}

impl fmt::Display for HourRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.from == self.to {
            write!(f, "{} h", self.from)
        } else {
            write!(f, "{}-{} h", self.from, self.to)
        }
    }
}

pub const DOAC_RESTART_STANDARD: HourRange = HourRange::new(24, 24);
pub const DOAC_RESTART_HIGH: HourRange = HourRange::new(48, 72);

pub const VKA_STOP_DAYS: u32 = 5;
pub const VKA_RESTART_STANDARD: HourRange = HourRange::new(12, 24);
pub const VKA_RESTART_EXTENDED: HourRange = HourRange::new(48, 72);

// ---------------------------------------------------------------------------
// INR

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct InrRange {
    pub low: f64,
    pub high: f64,
}

impl fmt::Display for InrRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}-{:.1}", self.low, self.high)
    }
}

pub const INR_MECHANICAL_MITRAL: InrRange = InrRange { low: 2.5, high: 3.5 };
pub const INR_MECHANICAL_AORTIC: InrRange = InrRange { low: 2.0, high: 3.0 };
pub const INR_ATRIAL_FIBRILLATION: InrRange = InrRange { low: 2.0, high: 3.0 };
/// Target on the morning of surgery: INR strictly below this
pub const INR_PREOPERATIVE_MAX: f64 = 1.5;
/// LMWH bridging continues until INR exceeds this
pub const INR_BRIDGING_END: f64 = 2.0;

// ---------------------------------------------------------------------------
// Antiplatelet monotherapy

pub const ASPIRIN_HOLD_DAYS: u32 = 7;
pub const CLOPIDOGREL_HOLD_DAYS: u32 = 5;

// ---------------------------------------------------------------------------
// Device programming

pub const ASYNCHRONOUS_PACING_RATE_BPM: u32 = 80;
pub const BACKUP_PACING_RATE_BPM: u32 = 40;
