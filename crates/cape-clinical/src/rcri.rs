//! Revised Cardiac Risk Index

use crate::record::PatientClinicalRecord;
use crate::tables::CREATININE_CUTOFF_MG_DL;
use serde::{Deserialize, Serialize};

/// The six RCRI criteria, in table order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RcriCriterion {
    HighRiskSurgery,
    IschemicHeartDisease,
    HeartFailure,
    CerebrovascularDisease,
    InsulinTreatedDiabetes,
    ElevatedCreatinine,
}

impl RcriCriterion {
    pub const ALL: [Self; 6] = [
        Self::HighRiskSurgery,
        Self::IschemicHeartDisease,
        Self::HeartFailure,
        Self::CerebrovascularDisease,
        Self::InsulinTreatedDiabetes,
        Self::ElevatedCreatinine,
    ];

    pub const fn label(&self) -> &'static str {
        match self {
            Self::HighRiskSurgery => {
                "High-risk surgery (intraperitoneal, intrathoracic or suprainguinal vascular)"
            }
            Self::IschemicHeartDisease => {
                "Ischemic heart disease (MI, angina, positive stress test, nitrates, Q waves)"
            }
            Self::HeartFailure => "History of heart failure (pulmonary edema, PND, S3, rales)",
            Self::CerebrovascularDisease => "Cerebrovascular disease (stroke or TIA)",
            Self::InsulinTreatedDiabetes => "Insulin-treated diabetes",
            Self::ElevatedCreatinine => "Creatinine > 2.0 mg/dL (≈177 µmol/L)",
        }
    }
}

/// Criterion flags, each evaluated independently
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RcriFlags {
    pub high_risk_surgery: bool,
    pub ischemic_heart_disease: bool,
    pub heart_failure: bool,
    pub cerebrovascular_disease: bool,
    pub insulin_treated_diabetes: bool,
    pub elevated_creatinine: bool,
}

impl RcriFlags {
    /// High-risk surgery follows the surgical tier, ischemic heart disease the
    /// coronary disease flag
    pub fn from_record(record: &PatientClinicalRecord) -> Self {
        Self {
            high_risk_surgery: record.effective_surgery_risk().is_high(),
            ischemic_heart_disease: record.coronary_artery_disease,
            heart_failure: record.heart_failure,
            cerebrovascular_disease: record.cerebrovascular_disease,
            insulin_treated_diabetes: record.insulin_treated_diabetes,
            elevated_creatinine: record
                .creatinine_mg_dl
                .is_some_and(|cr| cr > CREATININE_CUTOFF_MG_DL),
        }
    }

    pub const fn is_set(&self, criterion: RcriCriterion) -> bool {
        match criterion {
            RcriCriterion::HighRiskSurgery => self.high_risk_surgery,
            RcriCriterion::IschemicHeartDisease => self.ischemic_heart_disease,
            RcriCriterion::HeartFailure => self.heart_failure,
            RcriCriterion::CerebrovascularDisease => self.cerebrovascular_disease,
            RcriCriterion::InsulinTreatedDiabetes => self.insulin_treated_diabetes,
            RcriCriterion::ElevatedCreatinine => self.elevated_creatinine,
        }
    }
}

/// RCRI score and the criteria that produced it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RiskScore {
    pub score: u8,
    pub positives: Vec<RcriCriterion>,
}

pub fn rcri_score(flags: &RcriFlags) -> RiskScore {
    let positives: Vec<RcriCriterion> = RcriCriterion::ALL
        .into_iter()
        .filter(|c| flags.is_set(*c))
        .collect();
    RiskScore {
        score: positives.len() as u8,
        positives,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::SurgeryRisk;
    use pretty_assertions::assert_eq;

    fn flags_from_bits(bits: u8) -> RcriFlags {
        RcriFlags {
            high_risk_surgery: bits & 1 != 0,
            ischemic_heart_disease: bits & 2 != 0,
            heart_failure: bits & 4 != 0,
            cerebrovascular_disease: bits & 8 != 0,
            insulin_treated_diabetes: bits & 16 != 0,
            elevated_creatinine: bits & 32 != 0,
        }
    }

    #[test]
    fn test_all_sixty_four_combinations() {
        for bits in 0u8..64 {
            let result = rcri_score(&flags_from_bits(bits));
            assert_eq!(result.score as u32, bits.count_ones(), "bits={bits:06b}");

            let expected: Vec<_> = RcriCriterion::ALL
                .into_iter()
                .enumerate()
                .filter(|(i, _)| bits & (1 << i) != 0)
                .map(|(_, c)| c)
                .collect();
            assert_eq!(result.positives, expected, "bits={bits:06b}");
        }
    }

    #[test]
    fn test_flags_from_record() {
        let record = PatientClinicalRecord {
            surgery_risk: SurgeryRisk::High,
            coronary_artery_disease: true,
            creatinine_mg_dl: Some(2.0),
            ..Default::default()
        };
        let flags = RcriFlags::from_record(&record);
        assert!(flags.high_risk_surgery);
        assert!(flags.ischemic_heart_disease);
        assert!(!flags.elevated_creatinine, "cutoff is strict");

        let record = PatientClinicalRecord {
            creatinine_mg_dl: Some(2.1),
            ..record
        };
        assert_eq!(rcri_score(&RcriFlags::from_record(&record)).score, 3);
    }
}
