// Requirement entities
// Priced donations and the decision derived from them

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricedDonation {
    pub item: String,
    pub quantity: i64,
    pub price: i64,
    pub total: i64,
    pub initial_quantity: i64,
    pub percentage_of_initial: i64,
}

impl PricedDonation {
    pub fn new(item: impl Into<String>, quantity: i64, price: i64, initial_quantity: i64) -> Self {
        let percentage_of_initial = if initial_quantity > 0 {
            (quantity as f64 / initial_quantity as f64 * 100.0).round() as i64
        } else {
            0
        };
        Self {
            item: item.into(),
            quantity,
            price,
            total: quantity.saturating_mul(price),
            initial_quantity,
            percentage_of_initial,
        }
    }

    /// Exact half of the baseline qualifies; no rounding is applied.
    pub fn meets_half_of_initial(&self) -> bool {
        self.initial_quantity > 0
            && (self.quantity as i128) * 2 >= self.initial_quantity as i128
    }
}

/// Human escape hatch, kept apart from the computed conditions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManualOverride {
    pub set_by: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub set_at: i64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequirementDecision {
    pub meets_gold_requirement: bool,
    pub meets_item_requirement: bool,
    pub manual_override: bool,
    #[serde(rename = "final")]
    pub final_met: bool,
}
