// Guild settings entity
// Donation threshold and challenge baselines per guild

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::value_objects::ItemKey;

pub const DEFAULT_DONATION_THRESHOLD: i64 = 5000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeItemConfig {
    pub name: String,
    pub initial_quantity: i64,
}

impl ChallengeItemConfig {
    pub fn normalized(&self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            initial_quantity: self.initial_quantity,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuildSettings {
    pub guild_id: String,
    #[serde(default = "default_threshold")]
    pub donation_threshold: i64,
    #[serde(default)]
    pub challenge_items: Vec<ChallengeItemConfig>,
}

fn default_threshold() -> i64 {
    DEFAULT_DONATION_THRESHOLD
}

impl GuildSettings {
    pub fn new(guild_id: impl Into<String>, donation_threshold: i64) -> Self {
        Self {
            guild_id: guild_id.into(),
            donation_threshold,
            challenge_items: Vec::new(),
        }
    }

    pub fn effective_threshold(&self) -> i64 {
        if self.donation_threshold <= 0 {
            DEFAULT_DONATION_THRESHOLD
        } else {
            self.donation_threshold
        }
    }

    /// Lower-cased item name to baseline. Later duplicates win.
    pub fn initial_quantities(&self) -> HashMap<ItemKey, i64> {
        self.challenge_items
            .iter()
            .map(|item| (ItemKey::from_name(&item.name), item.initial_quantity.max(0)))
            .collect()
    }

    /// Configured as zero is still configured; only absent names count.
    pub fn unconfigured_items(&self, names: &[String]) -> Vec<String> {
        let configured = self.initial_quantities();
        let mut missing: Vec<String> = Vec::new();
        for name in names {
            let key = ItemKey::from_name(name);
            if configured.contains_key(&key) {
                continue;
            }
            if !missing.iter().any(|seen| ItemKey::from_name(seen) == key) {
                missing.push(name.clone());
            }
        }
        missing
    }

    pub fn upsert_items(&mut self, items: Vec<ChallengeItemConfig>) {
        for item in items {
            let key = ItemKey::from_name(&item.name);
            match self
                .challenge_items
                .iter_mut()
                .find(|existing| ItemKey::from_name(&existing.name) == key)
            {
                Some(existing) => *existing = item,
                None => self.challenge_items.push(item),
            }
        }
        self.challenge_items
            .sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
    }
}
