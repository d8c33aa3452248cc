// Membership status change value object

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusAction {
    Joined,
    Left,
    Kicked,
}

impl StatusAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusAction::Joined => "joined",
            StatusAction::Left => "left",
            StatusAction::Kicked => "kicked",
        }
    }

    pub fn keeps_active(&self) -> bool {
        matches!(self, StatusAction::Joined)
    }
}
