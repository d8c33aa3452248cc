// Guild challenge entities

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeItemEntry {
    pub name: String,
    pub quantity: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricedChallengeItem {
    pub name: String,
    pub quantity: i64,
    pub price: i64,
    pub total: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChallengeCost {
    pub items: Vec<PricedChallengeItem>,
    pub total: i64,
}

impl ChallengeCost {
    pub fn from_items(items: Vec<PricedChallengeItem>) -> Self {
        let total = items.iter().map(|item| item.total).fold(0i64, i64::saturating_add);
        Self { items, total }
    }
}
