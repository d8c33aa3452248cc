// Daily activity record entity
// One record per member per log date

use serde::{Deserialize, Serialize};

use crate::entities::{ManualOverride, PricedDonation, RequirementDecision};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyActivityRecord {
    pub id: String,
    pub guild_id: String,
    pub ign: String,
    pub date: String,
    pub raids: u32,
    pub challenge_gold: i64,
    pub deposits_gold: i64,
    pub total_gold: i64,
    pub donations: Vec<PricedDonation>,
    pub meets_gold_requirement: bool,
    pub meets_item_requirement: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manual_override: Option<ManualOverride>,
    pub met_requirement: bool,
    pub updated_at: i64,
}

impl DailyActivityRecord {
    pub fn decision(&self) -> RequirementDecision {
        RequirementDecision {
            meets_gold_requirement: self.meets_gold_requirement,
            meets_item_requirement: self.meets_item_requirement,
            manual_override: self.manual_override.is_some(),
            final_met: self.met_requirement,
        }
    }

    pub fn apply_decision(&mut self, decision: RequirementDecision) {
        self.meets_gold_requirement = decision.meets_gold_requirement;
        self.meets_item_requirement = decision.meets_item_requirement;
        self.met_requirement = decision.final_met;
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DailyLogQuery {
    pub date: Option<String>,
    pub ign: Option<String>,
}
