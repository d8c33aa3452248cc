// Activity log entities
// Produced by the activity log parser, one result per pasted log

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::value_objects::StatusAction;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Donation {
    pub item: String,
    pub quantity: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedMember {
    pub ign: String,
    pub raids: u32,
    pub donations: Vec<Donation>,
}

impl ParsedMember {
    pub fn new(ign: impl Into<String>) -> Self {
        Self {
            ign: ign.into(),
            raids: 0,
            donations: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberStatusChange {
    pub ign: String,
    pub action: StatusAction,
}

/// Members keep first-seen order; keys are the IGN exactly as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseResult {
    pub members: IndexMap<String, ParsedMember>,
    pub member_status_changes: Vec<MemberStatusChange>,
}

impl ParseResult {
    pub fn is_empty(&self) -> bool {
        self.members.is_empty() && self.member_status_changes.is_empty()
    }
}
