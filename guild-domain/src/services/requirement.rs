use std::collections::HashMap;

use crate::entities::{Donation, ManualOverride, PricedDonation, RequirementDecision};
use crate::entities::DEFAULT_DONATION_THRESHOLD;
use crate::value_objects::ItemKey;

/// Attaches price and baseline to each donation. Unknown items price at 0
/// and have a baseline of 0.
pub fn price_donations(
    donations: &[Donation],
    prices: &HashMap<ItemKey, i64>,
    initial_quantities: &HashMap<ItemKey, i64>,
) -> Vec<PricedDonation> {
    donations
        .iter()
        .map(|donation| {
            let key = ItemKey::from_name(&donation.item);
            PricedDonation::new(
                donation.item.clone(),
                donation.quantity,
                prices.get(&key).copied().unwrap_or_default(),
                initial_quantities.get(&key).copied().unwrap_or_default(),
            )
        })
        .collect()
}

/// Saturates at `i64::MAX` instead of overflowing.
pub fn donations_gold(donations: &[PricedDonation]) -> i64 {
    donations
        .iter()
        .map(|donation| donation.total)
        .fold(0i64, i64::saturating_add)
}

/// A member meets the daily requirement through gold, a single item
/// reaching half its baseline, or a reviewer override.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequirementEvaluator {
    donation_threshold: i64,
}

impl Default for RequirementEvaluator {
    fn default() -> Self {
        Self {
            donation_threshold: DEFAULT_DONATION_THRESHOLD,
        }
    }
}

impl RequirementEvaluator {
    pub fn new(donation_threshold: i64) -> Self {
        if donation_threshold <= 0 {
            return Self::default();
        }
        Self { donation_threshold }
    }

    pub fn donation_threshold(&self) -> i64 {
        self.donation_threshold
    }

    pub fn meets_gold_requirement(&self, total_gold: i64) -> bool {
        total_gold >= self.donation_threshold
    }

    pub fn meets_item_requirement(&self, donations: &[PricedDonation]) -> bool {
        donations.iter().any(PricedDonation::meets_half_of_initial)
    }

    pub fn evaluate(
        &self,
        total_gold: i64,
        donations: &[PricedDonation],
        manual_override: Option<&ManualOverride>,
    ) -> RequirementDecision {
        combine(
            self.meets_gold_requirement(total_gold),
            self.meets_item_requirement(donations),
            manual_override.is_some(),
        )
    }

    /// Gold edits only touch the gold condition; the stored item condition
    /// is carried over as-is.
    pub fn reevaluate_gold(
        &self,
        previous: RequirementDecision,
        total_gold: i64,
        manual_override: Option<&ManualOverride>,
    ) -> RequirementDecision {
        combine(
            self.meets_gold_requirement(total_gold),
            previous.meets_item_requirement,
            manual_override.is_some(),
        )
    }
}

pub fn combine(gold: bool, item: bool, manual_override: bool) -> RequirementDecision {
    RequirementDecision {
        meets_gold_requirement: gold,
        meets_item_requirement: item,
        manual_override,
        final_met: gold || item || manual_override,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn priced(quantity: i64, initial_quantity: i64) -> PricedDonation {
        PricedDonation::new("Iron Ore", quantity, 10, initial_quantity)
    }

    fn reviewer() -> ManualOverride {
        ManualOverride {
            set_by: "officer-1".to_string(),
            note: Some("was on vacation".to_string()),
            set_at: 0,
        }
    }

    #[test]
    fn test_item_condition_satisfies_when_gold_falls_short() {
        let decision = RequirementEvaluator::new(5000).evaluate(4000, &[priced(60, 100)], None);
        assert!(!decision.meets_gold_requirement);
        assert!(decision.meets_item_requirement);
        assert!(decision.final_met);
    }

    #[test]
    fn test_exact_half_boundary() {
        let evaluator = RequirementEvaluator::default();
        assert!(evaluator.meets_item_requirement(&[priced(50, 100)]));
        assert!(!evaluator.meets_item_requirement(&[priced(49, 100)]));
        assert!(evaluator.meets_item_requirement(&[priced(2, 3)]));
        assert!(!evaluator.meets_item_requirement(&[priced(1, 3)]));
    }

    #[test]
    fn test_zero_baseline_never_satisfies_item_condition() {
        let evaluator = RequirementEvaluator::default();
        assert!(!evaluator.meets_item_requirement(&[priced(1_000_000, 0)]));
        assert!(!evaluator.meets_item_requirement(&[]));
    }

    #[test]
    fn test_gold_threshold_is_inclusive() {
        let evaluator = RequirementEvaluator::new(5000);
        assert!(evaluator.evaluate(5000, &[], None).final_met);
        assert!(!evaluator.evaluate(4999, &[], None).final_met);
    }

    #[test]
    fn test_manual_override_alone_meets_requirement() {
        let decision = RequirementEvaluator::new(5000).evaluate(0, &[], Some(&reviewer()));
        assert!(!decision.meets_gold_requirement);
        assert!(!decision.meets_item_requirement);
        assert!(decision.manual_override);
        assert!(decision.final_met);
    }

    #[test]
    fn test_reevaluate_gold_keeps_item_condition() {
        let evaluator = RequirementEvaluator::new(5000);
        let original = evaluator.evaluate(100, &[priced(80, 100)], None);
        assert!(original.meets_item_requirement);

        let updated = evaluator.reevaluate_gold(original, 6000, None);
        assert!(updated.meets_gold_requirement);
        assert!(updated.meets_item_requirement);

        let lowered = evaluator.reevaluate_gold(combine(true, false, false), 10, None);
        assert!(!lowered.final_met);
    }

    #[test]
    fn test_price_donations_uses_lowercase_keys() {
        let prices = HashMap::from([(ItemKey::from_name("iron ore"), 12)]);
        let baselines = HashMap::from([(ItemKey::from_name("IRON ORE"), 300)]);
        let donations = vec![
            Donation {
                item: "Iron Ore".to_string(),
                quantity: 100,
            },
            Donation {
                item: "Gem".to_string(),
                quantity: 3,
            },
        ];
        let priced = price_donations(&donations, &prices, &baselines);
        assert_eq!(priced[0].price, 12);
        assert_eq!(priced[0].total, 1200);
        assert_eq!(priced[0].initial_quantity, 300);
        assert_eq!(priced[0].percentage_of_initial, 33);
        assert_eq!(priced[1].price, 0);
        assert_eq!(priced[1].total, 0);
        assert_eq!(priced[1].percentage_of_initial, 0);
        assert_eq!(donations_gold(&priced), 1200);
    }

    #[test]
    fn test_huge_parsed_quantities_saturate_gold() {
        let parsed = crate::services::parse_activity_log(
            "* Ann\nContributed 9,000,000,000,000,000,000 Iron Ore\nContributed 9000000000000000000 Iron Ore",
        );
        let prices = HashMap::from([(ItemKey::from_name("Iron Ore"), 2)]);
        let priced = price_donations(&parsed.members["Ann"].donations, &prices, &HashMap::new());
        assert_eq!(priced.len(), 2);
        assert!(priced.iter().all(|donation| donation.total == i64::MAX));

        let total = donations_gold(&priced);
        assert_eq!(total, i64::MAX);
        assert!(RequirementEvaluator::new(5000).evaluate(total, &priced, None).final_met);
    }

    #[test]
    fn test_percentage_rounds_to_nearest() {
        assert_eq!(priced(1, 200).percentage_of_initial, 1);
        assert_eq!(priced(2, 3).percentage_of_initial, 67);
        assert_eq!(priced(150, 100).percentage_of_initial, 150);
    }
}
