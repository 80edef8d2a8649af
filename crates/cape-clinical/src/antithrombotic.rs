//! Antithrombotic strategy selection and monotherapy plans

use crate::record::{AnticoagulantAgent, AntiplateletAgent, PatientClinicalRecord, PciTiming, SurgeryRisk};
use crate::tables::{ASPIRIN_HOLD_DAYS, CLOPIDOGREL_HOLD_DAYS};
use serde::Serialize;

/// Which antithrombotic tool applies to the patient
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum AntithromboticStrategy {
    /// No coronary disease or PCI history
    NotIndicated,
    /// PCI or ACS within a year; decided by the DAPT rule set
    Dapt,
    /// More than a year after PCI, with AF
    OacMonotherapy,
    /// More than a year after PCI, without AF
    AntiplateletMonotherapy,
    /// Coronary disease with PCI timing not recorded
    Unspecified,
}

pub const fn select_strategy(
    coronary_artery_disease: bool,
    pci_timing: PciTiming,
    atrial_fibrillation: bool,
) -> AntithromboticStrategy {
    if !coronary_artery_disease {
        return AntithromboticStrategy::NotIndicated;
    }
    match (pci_timing, atrial_fibrillation) {
        (PciTiming::WithinOneYear, _) => AntithromboticStrategy::Dapt,
        (PciTiming::OverOneYear, true) => AntithromboticStrategy::OacMonotherapy,
        (PciTiming::OverOneYear, false) => AntithromboticStrategy::AntiplateletMonotherapy,
        (PciTiming::Unspecified, _) => AntithromboticStrategy::Unspecified,
    }
}

pub fn strategy_for(record: &PatientClinicalRecord) -> AntithromboticStrategy {
    select_strategy(
        record.coronary_artery_disease,
        record.pci_timing,
        record.atrial_fibrillation,
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "days", rename_all = "kebab-case")]
pub enum AntiplateletAction {
    Continue,
    StopDaysBefore(u32),
    Unspecified,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AntiplateletPlan {
    pub action: AntiplateletAction,
    pub text: String,
}

/// Single antiplatelet agent: continued at low or intermediate surgical risk,
/// held before high-risk surgery
pub fn antiplatelet_monotherapy_plan(agent: AntiplateletAgent, surgery_risk: SurgeryRisk) -> AntiplateletPlan {
    let (action, text) = match (surgery_risk, agent) {
        (SurgeryRisk::Low | SurgeryRisk::Intermediate, _) => (
            AntiplateletAction::Continue,
            format!("Antiplatelet monotherapy ({agent}): low/intermediate surgical risk, continue without interruption."),
        ),
        (SurgeryRisk::High, AntiplateletAgent::Aspirin) => (
            AntiplateletAction::StopDaysBefore(ASPIRIN_HOLD_DAYS),
            format!("Antiplatelet monotherapy (aspirin): high surgical risk, stop {ASPIRIN_HOLD_DAYS} days before surgery."),
        ),
        (SurgeryRisk::High, AntiplateletAgent::Clopidogrel) => (
            AntiplateletAction::StopDaysBefore(CLOPIDOGREL_HOLD_DAYS),
            format!(
                "Antiplatelet monotherapy (clopidogrel): high surgical risk, stop {CLOPIDOGREL_HOLD_DAYS} days before surgery."
            ),
        ),
        (SurgeryRisk::High, AntiplateletAgent::Unspecified) => (
            AntiplateletAction::Unspecified,
            "Antiplatelet monotherapy: agent not specified (high surgical risk).".to_string(),
        ),
        (SurgeryRisk::Unspecified, _) => (
            AntiplateletAction::Unspecified,
            "Antiplatelet monotherapy: surgical risk could not be determined.".to_string(),
        ),
    };
    AntiplateletPlan { action, text }
}

pub fn oac_monotherapy_hint(agent: AnticoagulantAgent) -> String {
    if agent.is_specified() {
        format!("OAC monotherapy: {agent}; interruption, bridging and restart follow the anticoagulation plan.")
    } else {
        let choices = AnticoagulantAgent::RECOGNIZED
            .iter()
            .map(AnticoagulantAgent::as_str)
            .collect::<Vec<_>>()
            .join("/");
        format!("OAC monotherapy: agent not selected; choose one of {choices}.")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(false, PciTiming::WithinOneYear, true, AntithromboticStrategy::NotIndicated)]
    #[case(true, PciTiming::WithinOneYear, true, AntithromboticStrategy::Dapt)]
    #[case(true, PciTiming::OverOneYear, true, AntithromboticStrategy::OacMonotherapy)]
    #[case(true, PciTiming::OverOneYear, false, AntithromboticStrategy::AntiplateletMonotherapy)]
    #[case(true, PciTiming::Unspecified, false, AntithromboticStrategy::Unspecified)]
    fn test_strategy(
        #[case] cad: bool,
        #[case] timing: PciTiming,
        #[case] af: bool,
        #[case] expected: AntithromboticStrategy,
    ) {
        assert_eq!(select_strategy(cad, timing, af), expected);
    }

    #[rstest]
    #[case(AntiplateletAgent::Aspirin, SurgeryRisk::Intermediate, AntiplateletAction::Continue)]
    #[case(AntiplateletAgent::Aspirin, SurgeryRisk::High, AntiplateletAction::StopDaysBefore(7))]
    #[case(AntiplateletAgent::Clopidogrel, SurgeryRisk::High, AntiplateletAction::StopDaysBefore(5))]
    #[case(AntiplateletAgent::Unspecified, SurgeryRisk::High, AntiplateletAction::Unspecified)]
    #[case(AntiplateletAgent::Clopidogrel, SurgeryRisk::Unspecified, AntiplateletAction::Unspecified)]
    fn test_antiplatelet_plan(
        #[case] agent: AntiplateletAgent,
        #[case] risk: SurgeryRisk,
        #[case] action: AntiplateletAction,
    ) {
        assert_eq!(antiplatelet_monotherapy_plan(agent, risk).action, action);
    }

    #[test]
    fn test_oac_hint() {
        assert_eq!(
            oac_monotherapy_hint(AnticoagulantAgent::Unspecified),
            "OAC monotherapy: agent not selected; choose one of warfarin/apixaban/rivaroxaban/edoxaban/dabigatran."
        );
        assert!(oac_monotherapy_hint(AnticoagulantAgent::Edoxaban).starts_with("OAC monotherapy: edoxaban;"));
    }
}
