use cape_clinical::{
    assess, AntiplateletAction, AntithromboticStrategy, DeviceMode, DrugVocabulary, PacingMode,
    PathwayBranch, PatientClinicalRecord, RateBand, RcriCriterion, StopTiming, SurgeryRisk, WorkupItem,
};
use pretty_assertions::assert_eq;

fn record(json: &str) -> PatientClinicalRecord {
    serde_json::from_str(json).unwrap()
}

#[test]
fn test_af_patient_on_apixaban() {
    let record = record(
        r#"{
            "age": 78,
            "procedure": "Aortic and major vascular surgery",
            "urgency": "elective",
            "heart_rate": 104,
            "symptoms": ["none"],
            "functional_capacity": "<4 METs",
            "heart_failure": true,
            "lvef": "<40%",
            "atrial_fibrillation": true,
            "egfr": 45,
            "coronary_artery_disease": true,
            "pci_timing": ">=1 year",
            "medications": ["Bisoprolol", "Apiksaban", "Atorvastatin"],
            "anticoagulant": "apixaban",
            "bleeding_risk": "high"
        }"#,
    );
    let result = assess(&record, &DrugVocabulary::built_in());

    assert_eq!(result.surgery_risk, SurgeryRisk::High);
    assert_eq!(
        result.rcri.positives,
        vec![
            RcriCriterion::HighRiskSurgery,
            RcriCriterion::IschemicHeartDisease,
            RcriCriterion::HeartFailure,
        ]
    );
    assert_eq!(result.pathway.branch, PathwayBranch::RiskFactors);
    assert!(result.pathway.workup.contains(&WorkupItem::IschemiaTesting));
    assert_eq!(result.strategy, AntithromboticStrategy::OacMonotherapy);
    assert!(result.oac_monotherapy.is_some());
    assert_eq!(result.antiplatelet_plan, None);

    let anticoagulation = result.anticoagulation.as_ref().unwrap();
    assert_eq!(anticoagulation.stop, StopTiming::HoursBefore(48));
    assert!(result.dose_warnings.is_empty());
    assert_eq!(result.valve_protocol, None);

    assert_eq!(result.rate_control.band, Some(RateBand::Partial));
    assert_eq!(result.postop_af.risk_factors, 4);
    assert_eq!(result.device, DeviceMode::NoDevice);
    assert!(result.unlisted_medications.is_empty());
}

#[test]
fn test_valve_patient_with_device() {
    let record = record(
        r#"{
            "surgery_risk": "low",
            "urgency": "time-sensitive",
            "functional_capacity": ">=4 METs",
            "mechanical_valve": true,
            "high_thromboembolic_risk": true,
            "anticoagulant": "warfarin",
            "bleeding_risk": "minor",
            "device": {"type": "pacemaker", "pace_dependency": "no"},
            "medications": ["Warfarin", "Herbal tea"]
        }"#,
    );
    let result = assess(&record, &DrugVocabulary::built_in());

    assert_eq!(result.pathway.branch, PathwayBranch::NoAdditionalTesting);
    assert_eq!(result.strategy, AntithromboticStrategy::NotIndicated);
    let anticoagulation = result.anticoagulation.as_ref().unwrap();
    assert_eq!(anticoagulation.recommendation.classification, "vka-bridging");
    assert!(result.valve_protocol.is_some());
    assert_eq!(
        result.device,
        DeviceMode::Program {
            device_type: cape_clinical::DeviceType::Pacemaker,
            mode: PacingMode::Vvi,
            rate_bpm: 40,
            disable_tachy_therapies: false,
        }
    );
    assert!(!result.rate_control.indicated);
    assert_eq!(result.unlisted_medications, vec!["Herbal tea".to_string()]);
}

#[test]
fn test_antiplatelet_monotherapy_and_no_anticoagulation() {
    let record = record(
        r#"{
            "surgery_risk": "high",
            "coronary_artery_disease": true,
            "pci_timing": ">=1 year",
            "antiplatelet": "Klopidogrel"
        }"#,
    );
    let result = assess(&record, &DrugVocabulary::default());
    assert_eq!(result.strategy, AntithromboticStrategy::AntiplateletMonotherapy);
    assert_eq!(
        result.antiplatelet_plan.map(|p| p.action),
        Some(AntiplateletAction::StopDaysBefore(5))
    );
    assert_eq!(result.anticoagulation, None);
    assert!(result.dose_warnings.is_empty());
}

#[test]
fn test_assessment_serializes() {
    let result = assess(&PatientClinicalRecord::default(), &DrugVocabulary::built_in());
    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["surgery_risk"], "unspecified");
    assert_eq!(json["device"]["kind"], "no-device");
    assert_eq!(json["pathway"]["branch"], "risk-factors");
    assert!(json.get("anticoagulation").is_none());
}
