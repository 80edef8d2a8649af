//! Typed calculator inputs
//!
//! Every categorical field is a closed enumeration with an `Unspecified`
//! variant. Text that is not one of the recognized spellings becomes
//! `Unspecified` rather than a load error, and each calculator handles that
//! variant in an explicit fallback branch.

use crate::tables;
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Deserialized form of a categorical field before recognition
///
/// Booleans and numbers are accepted and turned into text so that `true` and
/// `2` can be recognized the same way as `"yes"` and `"II"`.
struct CategoryText(Option<String>);

struct CategoryTextVisitor;

impl<'de> Visitor<'de> for CategoryTextVisitor {
    type Value = CategoryText;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a category name")
    }

    fn visit_unit<E: de::Error>(self) -> Result<CategoryText, E> {
        Ok(CategoryText(None))
    }

    fn visit_none<E: de::Error>(self) -> Result<CategoryText, E> {
        Ok(CategoryText(None))
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<CategoryText, D::Error> {
        deserializer.deserialize_any(CategoryTextVisitor)
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<CategoryText, E> {
        Ok(CategoryText(Some(v.to_string())))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<CategoryText, E> {
        Ok(CategoryText(Some(v.to_string())))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<CategoryText, E> {
        Ok(CategoryText(Some(v.to_string())))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<CategoryText, E> {
        Ok(CategoryText(Some(v.to_string())))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<CategoryText, E> {
        Ok(CategoryText(Some(v.to_string())))
    }
}

impl<'de> Deserialize<'de> for CategoryText {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(CategoryTextVisitor)
    }
}

/// Declare a categorical input with its recognized spellings
///
/// The first spelling is canonical and is what the value serializes to.
/// Matching ignores case and surrounding whitespace.
macro_rules! recognized_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $(
                $(#[$vmeta:meta])*
                $variant:ident => [$canonical:literal $(, $alias:literal)* $(,)?]
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
        pub enum $name {
            $($(#[$vmeta])* $variant,)+
            /// Missing, or not one of the recognized spellings
            #[default]
            Unspecified,
        }

        impl $name {
            /// Recognized variants in declaration order
            pub const RECOGNIZED: &'static [Self] = &[$(Self::$variant),+];

            pub fn recognize(text: &str) -> Self {
                let text = text.trim().to_lowercase();
                $(
                    if [$canonical $(, $alias)*]
                        .iter()
                        .any(|spelling| spelling.to_lowercase() == text)
                    {
                        return Self::$variant;
                    }
                )+
                Self::Unspecified
            }

            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $canonical,)+
                    Self::Unspecified => "unspecified",
                }
            }

            pub const fn is_specified(&self) -> bool {
                !matches!(self, Self::Unspecified)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = std::convert::Infallible;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self::recognize(s))
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let CategoryText(text) = CategoryText::deserialize(deserializer)?;
                Ok(text.as_deref().map_or(Self::Unspecified, Self::recognize))
            }
        }
    };
}

recognized_enum! {
    pub enum Sex {
        Male => ["male", "m", "erkek"],
        Female => ["female", "f", "kadın", "kadin"],
    }
}

recognized_enum! {
    /// Surgical cardiac risk tier
    pub enum SurgeryRisk {
        Low => ["low", "düşük", "dusuk"],
        Intermediate => ["intermediate", "moderate", "orta"],
        High => ["high", "yüksek", "yuksek"],
    }
}

impl SurgeryRisk {
    /// Risk tier of a named procedure, `Unspecified` for unlisted names
    pub fn for_procedure(name: &str) -> Self {
        tables::procedure_risk(name)
    }

    pub const fn is_high(&self) -> bool {
        matches!(self, Self::High)
    }

    pub const fn is_at_least_intermediate(&self) -> bool {
        matches!(self, Self::Intermediate | Self::High)
    }
}

recognized_enum! {
    pub enum Urgency {
        Elective => ["elective", "elektif"],
        TimeSensitive => ["time-sensitive", "time sensitive", "time_sensitive"],
        Emergency => ["emergency", "acil"],
    }
}

impl Urgency {
    pub const fn is_emergency(&self) -> bool {
        matches!(self, Self::Emergency)
    }
}

recognized_enum! {
    /// Functional capacity in metabolic equivalents
    pub enum FunctionalCapacity {
        AtLeastFourMets => [">=4 mets", ">=4 met", "≥4 met", "≥4 mets", "good"],
        BelowFourMets => ["<4 mets", "<4 met", "poor"],
        Unknown => ["unknown", "bilinmiyor"],
    }
}

impl FunctionalCapacity {
    /// Below 4 METs or not assessed; `Unspecified` is neither
    pub const fn is_poor_or_unknown(&self) -> bool {
        matches!(self, Self::BelowFourMets | Self::Unknown)
    }
}

recognized_enum! {
    pub enum Symptom {
        Angina => ["angina", "anjina"],
        Dyspnea => ["dyspnea", "dyspnoea", "dispne"],
        Syncope => ["syncope", "senkop"],
        HeartFailure => ["heart-failure", "heart failure symptoms", "kalp yetersizliği semptomu"],
        NoSymptoms => ["none", "yok"],
    }
}

impl Symptom {
    /// Whether the symptom counts as an active cardiac symptom
    pub const fn is_active(&self) -> bool {
        matches!(
            self,
            Self::Angina | Self::Dyspnea | Self::Syncope | Self::HeartFailure
        )
    }
}

recognized_enum! {
    pub enum Nyha {
        I => ["I", "1"],
        II => ["II", "2"],
        III => ["III", "3"],
        IV => ["IV", "4"],
    }
}

recognized_enum! {
    /// Left ventricular ejection fraction band
    pub enum LvefBand {
        Preserved => [">=50%", "≥50%", "preserved"],
        MildlyReduced => ["40-49%", "40–49%", "mildly-reduced"],
        Reduced => ["<40%", "reduced"],
    }
}

recognized_enum! {
    pub enum DeviceType {
        Pacemaker => ["pacemaker", "permanent pacemaker", "ppm"],
        Icd => ["icd"],
        Crt => ["crt", "crt-d", "crt-p"],
    }
}

recognized_enum! {
    pub enum PaceDependency {
        Dependent => ["dependent", "yes", "true", "evet"],
        NotDependent => ["not-dependent", "no", "false", "hayır", "hayir"],
    }
}

recognized_enum! {
    /// Procedural bleeding risk
    pub enum BleedingRisk {
        Minor => ["minor", "minör"],
        LowModerate => ["low-moderate", "low", "düşük-orta"],
        High => ["high", "yüksek"],
    }
}

recognized_enum! {
    pub enum AnticoagulantAgent {
        Warfarin => ["warfarin", "vka"],
        Apixaban => ["apixaban", "apiksaban"],
        Rivaroxaban => ["rivaroxaban", "rivaroksaban"],
        Edoxaban => ["edoxaban", "edoksaban"],
        Dabigatran => ["dabigatran", "dabigatran etexilate", "dabigatran eteksilat"],
    }
}

impl AnticoagulantAgent {
    /// Direct oral anticoagulants; warfarin and unspecified agents are not
    pub const fn is_direct(&self) -> bool {
        matches!(
            self,
            Self::Apixaban | Self::Rivaroxaban | Self::Edoxaban | Self::Dabigatran
        )
    }
}

recognized_enum! {
    pub enum AntiplateletAgent {
        Aspirin => ["aspirin", "asa"],
        Clopidogrel => ["clopidogrel", "klopidogrel"],
    }
}

recognized_enum! {
    /// Time since the last PCI or acute coronary syndrome
    pub enum PciTiming {
        WithinOneYear => ["<1 year", "<1 yıl", "within-one-year"],
        OverOneYear => [">=1 year", "≥1 year", "≥1 yıl", "over-one-year"],
    }
}

/// An implanted rhythm device
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CardiacDevice {
    #[serde(rename = "type")]
    pub device_type: DeviceType,
    pub pace_dependency: PaceDependency,
}

/// Snapshot of one patient, as consumed by the calculators
///
/// Absent fields take their defaults: flags are `false`, categories are
/// `Unspecified` and measurements are missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PatientClinicalRecord {
    pub age: Option<u32>,
    pub sex: Sex,
    /// Planned procedure; supplies the risk tier when `surgery_risk` is unspecified
    pub procedure: Option<String>,
    pub surgery_risk: SurgeryRisk,
    pub urgency: Urgency,
    pub heart_rate: Option<u32>,
    pub systolic_bp: Option<u32>,
    pub diastolic_bp: Option<u32>,
    pub symptoms: Vec<Symptom>,
    pub functional_capacity: FunctionalCapacity,
    pub heart_failure: bool,
    pub nyha: Nyha,
    pub lvef: LvefBand,
    pub atrial_fibrillation: bool,
    pub chronic_kidney_disease: bool,
    /// ml/min/1.73m²; zero or negative means not measured
    pub egfr: Option<f64>,
    pub creatinine_mg_dl: Option<f64>,
    pub diabetes: bool,
    pub insulin_treated_diabetes: bool,
    pub hypertension: bool,
    pub coronary_artery_disease: bool,
    pub pci_timing: PciTiming,
    pub cerebrovascular_disease: bool,
    pub mechanical_valve: bool,
    pub high_thromboembolic_risk: bool,
    pub device: Option<CardiacDevice>,
    pub medications: Vec<String>,
    pub anticoagulant: AnticoagulantAgent,
    pub antiplatelet: AntiplateletAgent,
    pub bleeding_risk: BleedingRisk,
    pub very_high_bleeding_risk: bool,
}

impl PatientClinicalRecord {
    /// Stated risk tier, or the tier of the named procedure
    pub fn effective_surgery_risk(&self) -> SurgeryRisk {
        if self.surgery_risk.is_specified() {
            return self.surgery_risk;
        }
        self.procedure
            .as_deref()
            .map_or(SurgeryRisk::Unspecified, SurgeryRisk::for_procedure)
    }

    pub fn has_active_symptoms(&self) -> bool {
        self.symptoms.iter().any(Symptom::is_active)
    }

    /// Heart failure with LVEF below 40%
    pub fn has_reduced_ejection_fraction(&self) -> bool {
        self.heart_failure && self.lvef == LvefBand::Reduced
    }

    /// eGFR if it was actually measured
    pub fn measured_egfr(&self) -> Option<f64> {
        self.egfr.filter(|v| *v > 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_recognize_aliases() {
        assert_eq!(SurgeryRisk::recognize("Yüksek"), SurgeryRisk::High);
        assert_eq!(SurgeryRisk::recognize("  intermediate "), SurgeryRisk::Intermediate);
        assert_eq!(Urgency::recognize("Acil"), Urgency::Emergency);
        assert_eq!(AnticoagulantAgent::recognize("Apiksaban"), AnticoagulantAgent::Apixaban);
        assert_eq!(FunctionalCapacity::recognize("≥4 MET"), FunctionalCapacity::AtLeastFourMets);
        assert_eq!(Nyha::recognize("iii"), Nyha::III);
    }

    #[test]
    fn test_unrecognized_text_is_unspecified() {
        assert_eq!(DeviceType::recognize("loop recorder"), DeviceType::Unspecified);
        assert_eq!(BleedingRisk::recognize(""), BleedingRisk::Unspecified);
        assert!(!Urgency::recognize("soon").is_specified());
    }

    #[test]
    fn test_serialize_canonical_spelling() {
        let json = serde_json::to_string(&AnticoagulantAgent::recognize("rivaroksaban")).unwrap();
        assert_eq!(json, r#""rivaroxaban""#);
        let json = serde_json::to_string(&PaceDependency::Unspecified).unwrap();
        assert_eq!(json, r#""unspecified""#);
    }

    #[test]
    fn test_record_from_json() {
        let record: PatientClinicalRecord = serde_json::from_str(
            r#"{
                "age": 82,
                "procedure": "Total cystectomy",
                "urgency": "Elektif",
                "symptoms": ["Yok"],
                "nyha": 2,
                "egfr": 0,
                "device": {"type": "ICD", "pace_dependency": true},
                "anticoagulant": "something else"
            }"#,
        )
        .unwrap();

        assert_eq!(record.age, Some(82));
        assert_eq!(record.surgery_risk, SurgeryRisk::Unspecified);
        assert_eq!(record.effective_surgery_risk(), SurgeryRisk::High);
        assert_eq!(record.urgency, Urgency::Elective);
        assert_eq!(record.symptoms, vec![Symptom::NoSymptoms]);
        assert!(!record.has_active_symptoms());
        assert_eq!(record.nyha, Nyha::II);
        assert_eq!(record.measured_egfr(), None);
        assert_eq!(
            record.device,
            Some(CardiacDevice {
                device_type: DeviceType::Icd,
                pace_dependency: PaceDependency::Dependent,
            })
        );
        assert_eq!(record.anticoagulant, AnticoagulantAgent::Unspecified);
        assert!(!record.mechanical_valve);
    }

    #[test]
    fn test_unknown_record_field_is_rejected() {
        let err = serde_json::from_str::<PatientClinicalRecord>(r#"{"agee": 50}"#).unwrap_err();
        assert!(err.to_string().contains("agee"));
    }
}
