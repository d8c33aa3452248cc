// Guild member roster entity

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub guild_id: String,
    pub ign: String,
    pub active: bool,
    pub first_seen: String,
    pub last_seen: String,
}

impl Member {
    pub fn new(guild_id: impl Into<String>, ign: impl Into<String>, date: &str) -> Self {
        Self {
            guild_id: guild_id.into(),
            ign: ign.into(),
            active: true,
            first_seen: date.to_string(),
            last_seen: date.to_string(),
        }
    }

    /// Dates are `YYYY-MM-DD`, so string order is calendar order.
    pub fn observe(&mut self, date: &str) {
        if date < self.first_seen.as_str() {
            self.first_seen = date.to_string();
        }
        if date > self.last_seen.as_str() {
            self.last_seen = date.to_string();
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MemberQuery {
    pub active: Option<bool>,
}
