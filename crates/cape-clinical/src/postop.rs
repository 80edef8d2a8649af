//! Post-operative AF risk

use crate::record::PatientClinicalRecord;
use crate::tables::{
    POSTOP_AF_AGE, POSTOP_AF_HEART_RATE_BPM, POSTOP_AF_INCREASED_FLAGS, POSTOP_AF_MODERATE_FLAGS,
};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PostopAfRisk {
    LowModerate,
    Moderate,
    Increased,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostopAfAssessment {
    /// How many of age >= 70, heart failure, CKD, high-risk surgery and HR >= 100 hold
    pub risk_factors: u8,
    pub risk: PostopAfRisk,
    pub text: String,
}

pub fn postop_af_risk(record: &PatientClinicalRecord) -> PostopAfAssessment {
    let risk_factors = [
        record.age.is_some_and(|age| age >= POSTOP_AF_AGE),
        record.heart_failure,
        record.chronic_kidney_disease,
        record.effective_surgery_risk().is_high(),
        record.heart_rate.is_some_and(|hr| hr >= POSTOP_AF_HEART_RATE_BPM),
    ]
    .into_iter()
    .filter(|flag| *flag)
    .count() as u8;

    let (risk, label) = if risk_factors >= POSTOP_AF_INCREASED_FLAGS {
        (PostopAfRisk::Increased, "increased")
    } else if risk_factors == POSTOP_AF_MODERATE_FLAGS {
        (PostopAfRisk::Moderate, "moderate")
    } else {
        (PostopAfRisk::LowModerate, "low-moderate")
    };

    PostopAfAssessment {
        risk_factors,
        risk,
        text: format!(
            "Post-operative AF/arrhythmia risk: {label}. Monitor rhythm, heart rate and electrolytes closely for the first 48-72 h."
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::SurgeryRisk;

    #[test]
    fn test_risk_levels() {
        let mut record = PatientClinicalRecord::default();
        assert_eq!(postop_af_risk(&record).risk, PostopAfRisk::LowModerate);

        record.age = Some(74);
        record.heart_failure = true;
        let result = postop_af_risk(&record);
        assert_eq!(result.risk_factors, 2);
        assert_eq!(result.risk, PostopAfRisk::Moderate);

        record.surgery_risk = SurgeryRisk::High;
        record.heart_rate = Some(100);
        let result = postop_af_risk(&record);
        assert_eq!(result.risk_factors, 4);
        assert_eq!(result.risk, PostopAfRisk::Increased);
        assert!(result.text.contains("increased"));
    }

    #[test]
    fn test_age_cutoff_is_inclusive() {
        let record = PatientClinicalRecord {
            age: Some(69),
            chronic_kidney_disease: true,
            ..Default::default()
        };
        assert_eq!(postop_af_risk(&record).risk_factors, 1);
        let record = PatientClinicalRecord { age: Some(70), ..record };
        assert_eq!(postop_af_risk(&record).risk_factors, 2);
    }
}
