// Leaderboard ordering value object

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeaderboardSort {
    #[default]
    Gold,
    Raids,
    Met,
}

impl From<&str> for LeaderboardSort {
    fn from(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "raids" => LeaderboardSort::Raids,
            "met" | "days_met" => LeaderboardSort::Met,
            _ => LeaderboardSort::Gold,
        }
    }
}
