//! Properties of the anticoagulation calculator over its whole input space

use cape_clinical::{
    direct_stop_hours, plan_anticoagulation, AnticoagulantAgent, BleedingRisk, BleedingTier, DirectFamily,
    OacInputs, RenalBand, StopTiming, Urgency,
};
use proptest::prelude::*;

fn any_agent() -> impl Strategy<Value = AnticoagulantAgent> {
    prop_oneof![
        Just(AnticoagulantAgent::Warfarin),
        Just(AnticoagulantAgent::Apixaban),
        Just(AnticoagulantAgent::Rivaroxaban),
        Just(AnticoagulantAgent::Edoxaban),
        Just(AnticoagulantAgent::Dabigatran),
        Just(AnticoagulantAgent::Unspecified),
    ]
}

fn any_bleeding_risk() -> impl Strategy<Value = BleedingRisk> {
    prop_oneof![
        Just(BleedingRisk::Minor),
        Just(BleedingRisk::LowModerate),
        Just(BleedingRisk::High),
        Just(BleedingRisk::Unspecified),
    ]
}

fn any_egfr() -> impl Strategy<Value = Option<f64>> {
    prop_oneof![Just(None), (-5.0f64..150.0).prop_map(Some)]
}

fn any_direct_family() -> impl Strategy<Value = DirectFamily> {
    prop_oneof![Just(DirectFamily::Dabigatran), Just(DirectFamily::XaInhibitor)]
}

proptest! {
    #[test]
    fn emergency_always_discontinues_immediately(
        agent in any_agent(),
        bleeding_risk in any_bleeding_risk(),
        very_high in any::<bool>(),
        egfr in any_egfr(),
        valve in any::<bool>(),
        high_te in any::<bool>(),
    ) {
        let plan = plan_anticoagulation(&OacInputs {
            agent,
            urgency: Urgency::Emergency,
            bleeding_risk,
            very_high_bleeding_risk: very_high,
            egfr,
            mechanical_valve: valve,
            high_thromboembolic_risk: high_te,
        });
        prop_assert_eq!(plan.stop, StopTiming::Immediately);
        prop_assert!(plan.recommendation.stop_plan.starts_with("Discontinue immediately"));
        prop_assert_eq!(plan.recommendation.classification.as_str(), "emergency-reversal");
    }

    #[test]
    fn stop_window_never_shrinks_with_bleeding_tier(family in any_direct_family(), egfr in any_egfr()) {
        let band = RenalBand::from_egfr(egfr);
        let standard = direct_stop_hours(family, band, BleedingTier::Standard);
        let high = direct_stop_hours(family, band, BleedingTier::High);
        let very_high = direct_stop_hours(family, band, BleedingTier::VeryHigh);
        prop_assert!(standard <= high, "{family:?} {band:?}: {standard} > {high}");
        prop_assert!(high <= very_high, "{family:?} {band:?}: {high} > {very_high}");
    }

    #[test]
    fn every_renal_value_maps_to_one_window(family in any_direct_family(), egfr in any_egfr()) {
        // Unknown renal function selects the same row as severe impairment
        let band = RenalBand::from_egfr(egfr);
        let expected_band = if band == RenalBand::Unknown { RenalBand::Severe } else { band };
        for tier in [BleedingTier::Standard, BleedingTier::High, BleedingTier::VeryHigh] {
            prop_assert_eq!(
                direct_stop_hours(family, band, tier),
                direct_stop_hours(family, expected_band, tier)
            );
        }
    }

    #[test]
    fn elective_plan_matches_direct_table(
        egfr in any_egfr(),
        bleeding_risk in prop_oneof![Just(BleedingRisk::LowModerate), Just(BleedingRisk::High)],
    ) {
        let plan = plan_anticoagulation(&OacInputs {
            agent: AnticoagulantAgent::Rivaroxaban,
            urgency: Urgency::Elective,
            bleeding_risk,
            very_high_bleeding_risk: false,
            egfr,
            mechanical_valve: false,
            high_thromboembolic_risk: false,
        });
        let tier = if bleeding_risk == BleedingRisk::High { BleedingTier::High } else { BleedingTier::Standard };
        let expected = direct_stop_hours(DirectFamily::XaInhibitor, RenalBand::from_egfr(egfr), tier);
        prop_assert_eq!(plan.stop, StopTiming::HoursBefore(expected));
    }
}
