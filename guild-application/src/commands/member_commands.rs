use std::collections::HashMap;

use tracing::info;

use guild_domain::{Member, MemberStatusChange, StatusAction};

use crate::{AppError, AppState};

/// Brings the roster in line with one processed log: everyone recorded is
/// observed on `date`, then status changes are applied in log order.
pub async fn reconcile_roster(
    state: &AppState,
    guild_id: &str,
    date: &str,
    igns: &[String],
    changes: &[MemberStatusChange],
) -> Result<Vec<Member>, AppError> {
    let existing = state
        .member_repo
        .list_members(guild_id)
        .await
        .map_err(AppError::Internal)?;
    let mut roster: HashMap<String, Member> = existing
        .into_iter()
        .map(|member| (member.ign.clone(), member))
        .collect();

    let mut touched: Vec<String> = Vec::new();
    for ign in igns {
        observe(&mut roster, guild_id, ign, date);
        if !touched.contains(ign) {
            touched.push(ign.clone());
        }
    }

    for change in changes {
        let member = observe(&mut roster, guild_id, &change.ign, date);
        apply_status(member, change.action, date);
        info!("{} {} on {}", change.ign, change.action.as_str(), date);
        if !touched.contains(&change.ign) {
            touched.push(change.ign.clone());
        }
    }

    let updated: Vec<Member> = touched
        .iter()
        .filter_map(|ign| roster.get(ign).cloned())
        .collect();
    if !updated.is_empty() {
        state
            .member_repo
            .upsert_members(&updated)
            .await
            .map_err(AppError::Internal)?;
    }
    Ok(updated)
}

fn observe<'a>(
    roster: &'a mut HashMap<String, Member>,
    guild_id: &str,
    ign: &str,
    date: &str,
) -> &'a mut Member {
    let member = roster
        .entry(ign.to_string())
        .or_insert_with(|| Member::new(guild_id, ign, date));
    member.observe(date);
    member
}

/// A join restarts membership on `date`; leaving or being kicked
/// deactivates the member but keeps their history.
pub fn apply_status(member: &mut Member, action: StatusAction, date: &str) {
    if action.keeps_active() {
        member.active = true;
        member.first_seen = date.to_string();
    } else {
        member.active = false;
    }
}
