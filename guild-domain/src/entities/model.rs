use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::entities::{ChallengeItemConfig, DailyActivityRecord, MemberStatusChange};
use crate::value_objects::Role;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessToken {
    pub token: String,
    pub user_id: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guild_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedPrice {
    pub item_key: String,
    pub price: i64,
    pub updated_at: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ActivityLogSubmission {
    #[serde(default)]
    pub date: Option<String>,
    pub text: String,
    #[serde(default)]
    pub deposits: HashMap<String, i64>,
}

#[derive(Debug, Serialize, Clone)]
pub struct ActivityLogSummary {
    pub date: String,
    pub members_recorded: usize,
    pub met_count: usize,
    pub status_changes: Vec<MemberStatusChange>,
    pub records: Vec<DailyActivityRecord>,
}

#[derive(Debug, Serialize, Clone)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ActivityLogOutcome {
    NothingFound { message: String },
    MissingConfiguration { items: Vec<String> },
    Saved(ActivityLogSummary),
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct GoldUpdate {
    #[serde(default)]
    pub challenge_gold: Option<i64>,
    #[serde(default)]
    pub deposits_gold: Option<i64>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct OverrideUpdate {
    pub enabled: bool,
    #[serde(default)]
    pub note: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChallengeTextPayload {
    pub text: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ThresholdUpdate {
    pub donation_threshold: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChallengeItemsPayload {
    pub items: Vec<ChallengeItemConfig>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ChallengeItemsUpdateQuery {
    pub mode: Option<String>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct LeaderboardQuery {
    pub from: Option<String>,
    pub to: Option<String>,
    pub sort_by: Option<String>,
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct LeaderboardEntry {
    pub ign: String,
    pub raids: u64,
    pub total_gold: i64,
    pub days_met: u32,
    pub days_logged: u32,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct InactivityQuery {
    pub as_of: Option<String>,
    pub days: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct InactiveMember {
    pub ign: String,
    pub last_seen: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_met: Option<String>,
    pub days_missed: u32,
}

#[derive(Debug, Serialize, Clone, Default, PartialEq, Eq)]
pub struct ReportSummary {
    pub members: u64,
    pub met: u64,
    pub not_met: u64,
    pub total_gold: i64,
}

impl ReportSummary {
    pub fn from_records(records: &[DailyActivityRecord]) -> Self {
        let met = records.iter().filter(|record| record.met_requirement).count() as u64;
        Self {
            members: records.len() as u64,
            met,
            not_met: records.len() as u64 - met,
            total_gold: records
                .iter()
                .map(|record| record.total_gold)
                .fold(0i64, i64::saturating_add),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub bind_addr: String,
    pub default_guild_id: String,
    pub access_tokens: Vec<AccessToken>,
    pub data_dir: String,
    pub settings_path: String,
    pub report_dir: String,
    pub public_base_url: String,
    pub market_api_url: Option<String>,
    pub market_api_key: Option<String>,
    pub price_cache_ttl_hours: u64,
    pub price_lookup_delay_ms: u64,
    pub default_donation_threshold: i64,
    pub inactivity_days: u32,
    pub webhook_url: Option<String>,
    pub webhook_template: Option<String>,
    pub max_body_bytes: u64,
    pub request_timeout_seconds: u64,
    pub report_hour: u32,
    pub report_minute: u32,
}
