use std::collections::HashMap;

use tracing::error;

use guild_domain::{
    normalize_date, parse_date, shift_date, today, DailyActivityRecord, InactiveMember, InactivityQuery,
    LeaderboardEntry, LeaderboardQuery, LeaderboardSort, Member, Role,
};

use crate::{AppError, AppState, RequestContext};

const DEFAULT_LEADERBOARD_DAYS: i64 = 7;
const LAST_MET_LOOKBACK_DAYS: i64 = 365;

pub async fn leaderboard(
    state: &AppState,
    ctx: &RequestContext,
    query: LeaderboardQuery,
) -> Result<Vec<LeaderboardEntry>, AppError> {
    ctx.require(Role::Member)?;
    let to = match query.to.as_deref() {
        Some(date) => normalize_date(date).map_err(|err| AppError::BadRequest(format!("invalid to: {}", err)))?,
        None => today(),
    };
    let from = match query.from.as_deref() {
        Some(date) => normalize_date(date).map_err(|err| AppError::BadRequest(format!("invalid from: {}", err)))?,
        None => shift_date(&to, 1 - DEFAULT_LEADERBOARD_DAYS).map_err(AppError::Internal)?,
    };
    if from > to {
        return Err(AppError::BadRequest("from must not be after to".to_string()));
    }
    let sort = query
        .sort_by
        .as_deref()
        .map(LeaderboardSort::from)
        .unwrap_or_default();
    let limit = query.limit.unwrap_or(50).clamp(1, 500);

    let records = state
        .daily_log_repo
        .list_records(&ctx.guild_id, &from, &to)
        .await
        .map_err(|err| {
            error!("failed to fetch records for leaderboard: {}", err);
            AppError::Internal(err)
        })?;
    Ok(aggregate_leaderboard(&records, sort, limit))
}

pub fn aggregate_leaderboard(
    records: &[DailyActivityRecord],
    sort: LeaderboardSort,
    limit: usize,
) -> Vec<LeaderboardEntry> {
    let mut totals: HashMap<&str, LeaderboardEntry> = HashMap::new();
    for record in records {
        let entry = totals.entry(record.ign.as_str()).or_insert_with(|| LeaderboardEntry {
            ign: record.ign.clone(),
            raids: 0,
            total_gold: 0,
            days_met: 0,
            days_logged: 0,
        });
        entry.raids += u64::from(record.raids);
        entry.total_gold = entry.total_gold.saturating_add(record.total_gold);
        entry.days_logged += 1;
        if record.met_requirement {
            entry.days_met += 1;
        }
    }

    let mut entries: Vec<LeaderboardEntry> = totals.into_values().collect();
    entries.sort_by(|a, b| {
        let primary = match sort {
            LeaderboardSort::Gold => b.total_gold.cmp(&a.total_gold),
            LeaderboardSort::Raids => b.raids.cmp(&a.raids),
            LeaderboardSort::Met => b.days_met.cmp(&a.days_met),
        };
        primary.then_with(|| a.ign.to_lowercase().cmp(&b.ign.to_lowercase()))
    });
    entries.truncate(limit);
    entries
}

pub async fn inactivity(
    state: &AppState,
    ctx: &RequestContext,
    query: InactivityQuery,
) -> Result<Vec<InactiveMember>, AppError> {
    ctx.require(Role::Member)?;
    let as_of = match query.as_of.as_deref() {
        Some(date) => normalize_date(date).map_err(|err| AppError::BadRequest(format!("invalid as_of: {}", err)))?,
        None => today(),
    };
    let days = query.days.unwrap_or(state.config.inactivity_days).clamp(1, 90);

    let members = state
        .member_repo
        .list_members(&ctx.guild_id)
        .await
        .map_err(AppError::Internal)?;
    let from = shift_date(&as_of, -LAST_MET_LOOKBACK_DAYS).map_err(AppError::Internal)?;
    let records = state
        .daily_log_repo
        .list_records(&ctx.guild_id, &from, &as_of)
        .await
        .map_err(|err| {
            error!("failed to fetch records for inactivity: {}", err);
            AppError::Internal(err)
        })?;
    find_inactive(&members, &records, &as_of, days).map_err(AppError::Internal)
}

/// Active members with no met requirement in the `days` ending at `as_of`.
/// Members who joined inside the window are not reported yet.
pub fn find_inactive(
    members: &[Member],
    records: &[DailyActivityRecord],
    as_of: &str,
    days: u32,
) -> anyhow::Result<Vec<InactiveMember>> {
    let window_start = shift_date(as_of, 1 - i64::from(days))?;
    let as_of_date = parse_date(as_of)?;

    let mut last_met: HashMap<&str, &str> = HashMap::new();
    for record in records {
        if !record.met_requirement || record.date.as_str() > as_of {
            continue;
        }
        let entry = last_met.entry(record.ign.as_str()).or_insert(record.date.as_str());
        if record.date.as_str() > *entry {
            *entry = record.date.as_str();
        }
    }

    let mut inactive = Vec::new();
    for member in members {
        if !member.active || member.first_seen > window_start {
            continue;
        }
        let met = last_met.get(member.ign.as_str()).copied();
        if met.is_some_and(|date| date >= window_start.as_str()) {
            continue;
        }
        let since = match met {
            Some(date) => parse_date(date)?,
            None => parse_date(&member.first_seen)?.pred_opt().unwrap_or(as_of_date),
        };
        inactive.push(InactiveMember {
            ign: member.ign.clone(),
            last_seen: member.last_seen.clone(),
            last_met: met.map(ToString::to_string),
            days_missed: (as_of_date - since).num_days().max(0) as u32,
        });
    }
    inactive.sort_by(|a, b| {
        b.days_missed
            .cmp(&a.days_missed)
            .then_with(|| a.ign.to_lowercase().cmp(&b.ign.to_lowercase()))
    });
    Ok(inactive)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(ign: &str, date: &str, raids: u32, gold: i64, met: bool) -> DailyActivityRecord {
        DailyActivityRecord {
            id: format!("{}-{}", ign, date),
            guild_id: "main".to_string(),
            ign: ign.to_string(),
            date: date.to_string(),
            raids,
            challenge_gold: gold,
            deposits_gold: 0,
            total_gold: gold,
            donations: Vec::new(),
            meets_gold_requirement: met,
            meets_item_requirement: false,
            manual_override: None,
            met_requirement: met,
            updated_at: 0,
        }
    }

    #[test]
    fn test_leaderboard_sums_and_sorts() {
        let records = vec![
            record("Ann", "2024-03-01", 1, 3000, false),
            record("Ann", "2024-03-02", 2, 6000, true),
            record("Ben", "2024-03-01", 5, 5000, true),
            record("cal", "2024-03-01", 5, 100, false),
        ];
        let by_gold = aggregate_leaderboard(&records, LeaderboardSort::Gold, 10);
        assert_eq!(by_gold[0].ign, "Ann");
        assert_eq!(by_gold[0].total_gold, 9000);
        assert_eq!(by_gold[0].raids, 3);
        assert_eq!(by_gold[0].days_logged, 2);
        assert_eq!(by_gold[0].days_met, 1);

        let by_raids = aggregate_leaderboard(&records, LeaderboardSort::Raids, 2);
        let names: Vec<&str> = by_raids.iter().map(|entry| entry.ign.as_str()).collect();
        assert_eq!(names, vec!["Ben", "cal"]);
    }

    #[test]
    fn test_leaderboard_gold_saturates_across_days() {
        let records = vec![
            record("Ann", "2024-03-01", 1, i64::MAX, true),
            record("Ann", "2024-03-02", 1, i64::MAX, true),
            record("ann", "2024-03-02", 1, 10, false),
        ];
        let board = aggregate_leaderboard(&records, LeaderboardSort::Gold, 10);
        assert_eq!(board.len(), 2);
        assert_eq!(board[0].ign, "Ann");
        assert_eq!(board[0].total_gold, i64::MAX);
        assert_eq!(board[1].total_gold, 10);
    }

    #[test]
    fn test_find_inactive_reports_missed_days() {
        let members = vec![
            Member::new("main", "Ann", "2024-02-01"),
            Member::new("main", "Ben", "2024-02-01"),
            Member::new("main", "New", "2024-03-09"),
            Member {
                active: false,
                ..Member::new("main", "Gone", "2024-01-01")
            },
            Member::new("main", "Never", "2024-03-01"),
        ];
        let records = vec![
            record("Ann", "2024-03-09", 1, 6000, true),
            record("Ben", "2024-03-05", 1, 6000, true),
            record("Ben", "2024-03-09", 0, 0, false),
        ];
        let inactive = find_inactive(&members, &records, "2024-03-10", 3).unwrap();
        let names: Vec<&str> = inactive.iter().map(|member| member.ign.as_str()).collect();
        assert_eq!(names, vec!["Never", "Ben"]);
        assert_eq!(inactive[0].days_missed, 10);
        assert_eq!(inactive[0].last_met, None);
        assert_eq!(inactive[1].days_missed, 5);
        assert_eq!(inactive[1].last_met.as_deref(), Some("2024-03-05"));
    }
}
