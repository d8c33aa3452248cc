use std::collections::{BTreeMap, HashMap};

use tracing::{info, warn};
use uuid::Uuid;

use guild_domain::{
    current_millis, donations_gold, get_unique_items, normalize_date, parse_activity_log, price_donations,
    today, ActivityLogOutcome, ActivityLogSubmission, ActivityLogSummary, DailyActivityRecord, ParsedMember,
    PricedDonation, RequirementEvaluator, Role,
};

use crate::commands::member_commands;
use crate::pricing::resolve_prices;
use crate::{AppError, AppState, RequestContext};

const NOTHING_FOUND_MESSAGE: &str = "No members or activity were found in the pasted log.";

pub async fn process_activity_log(
    state: &AppState,
    ctx: &RequestContext,
    submission: ActivityLogSubmission,
) -> Result<ActivityLogOutcome, AppError> {
    ctx.require(Role::Officer)?;

    let date = match submission.date.as_deref() {
        Some(date) => normalize_date(date).map_err(|err| AppError::BadRequest(format!("invalid date: {}", err)))?,
        None => today(),
    };
    let deposits = normalize_deposits(submission.deposits)?;

    let parsed = parse_activity_log(&submission.text);
    if parsed.is_empty() && deposits.is_empty() {
        info!("activity log for {} on {} had nothing to record", ctx.guild_id, date);
        return Ok(ActivityLogOutcome::NothingFound {
            message: NOTHING_FOUND_MESSAGE.to_string(),
        });
    }

    let mut members: Vec<(ParsedMember, i64)> = parsed
        .members
        .values()
        .map(|member| (member.clone(), 0))
        .collect();
    assign_deposits(&mut members, deposits)?;

    let settings = state.settings_for(&ctx.guild_id).await;
    let items = get_unique_items(&parsed);
    let missing = settings.unconfigured_items(&items);
    if !missing.is_empty() {
        warn!(
            "activity log for {} on {} halted, {} items lack a challenge baseline",
            ctx.guild_id,
            date,
            missing.len()
        );
        state.metrics.record_missing_config();
        return Ok(ActivityLogOutcome::MissingConfiguration { items: missing });
    }

    let prices = resolve_prices(state, &items).await;
    let baselines = settings.initial_quantities();
    let evaluator = RequirementEvaluator::new(settings.effective_threshold());
    let now = current_millis();

    let mut records = Vec::with_capacity(members.len());
    for (member, deposits_gold) in members {
        let existing = state
            .daily_log_repo
            .get_record(&ctx.guild_id, &date, &member.ign)
            .await
            .map_err(AppError::Internal)?;
        let donations = price_donations(&member.donations, &prices, &baselines);
        records.push(build_record(
            &ctx.guild_id,
            &date,
            &member,
            donations,
            deposits_gold,
            &evaluator,
            existing,
            now,
        ));
    }

    state
        .daily_log_repo
        .upsert_records(&records)
        .await
        .map_err(AppError::Internal)?;

    let igns: Vec<String> = records.iter().map(|record| record.ign.clone()).collect();
    member_commands::reconcile_roster(state, &ctx.guild_id, &date, &igns, &parsed.member_status_changes)
        .await?;

    state.metrics.record_log(records.len());
    let met_count = records.iter().filter(|record| record.met_requirement).count();
    info!(
        "recorded {} members for {} on {} ({} met requirement)",
        records.len(),
        ctx.guild_id,
        date,
        met_count
    );

    Ok(ActivityLogOutcome::Saved(ActivityLogSummary {
        date,
        members_recorded: records.len(),
        met_count,
        status_changes: parsed.member_status_changes,
        records,
    }))
}

/// Trimmed deposits summed per exact IGN, in IGN order.
fn normalize_deposits(deposits: HashMap<String, i64>) -> Result<Vec<(String, i64)>, AppError> {
    let mut out: BTreeMap<String, i64> = BTreeMap::new();
    for (ign, gold) in deposits {
        let ign = ign.trim().to_string();
        if ign.is_empty() {
            continue;
        }
        if gold < 0 {
            return Err(AppError::BadRequest(format!("deposit for '{}' must not be negative", ign)));
        }
        let total = out.entry(ign.clone()).or_insert(0);
        *total = add_gold(*total, gold, &ign)?;
    }
    Ok(out.into_iter().collect())
}

/// A deposit goes to the parsed member with the same IGN, else to the first
/// parsed member matching it case-insensitively, else to a record of its own.
fn assign_deposits(members: &mut Vec<(ParsedMember, i64)>, deposits: Vec<(String, i64)>) -> Result<(), AppError> {
    let parsed_count = members.len();
    for (ign, gold) in deposits {
        let parsed = &members[..parsed_count];
        let target = parsed
            .iter()
            .position(|(member, _)| member.ign == ign)
            .or_else(|| {
                let wanted = ign.to_lowercase();
                parsed.iter().position(|(member, _)| member.ign.to_lowercase() == wanted)
            });
        match target {
            Some(index) => {
                let (member, total) = &mut members[index];
                *total = add_gold(*total, gold, &member.ign)?;
            }
            None => members.push((ParsedMember::new(ign), gold)),
        }
    }
    Ok(())
}

fn add_gold(total: i64, gold: i64, ign: &str) -> Result<i64, AppError> {
    total
        .checked_add(gold)
        .ok_or_else(|| AppError::BadRequest(format!("deposits for '{}' exceed the gold range", ign)))
}

#[allow(clippy::too_many_arguments)]
pub fn build_record(
    guild_id: &str,
    date: &str,
    member: &ParsedMember,
    donations: Vec<PricedDonation>,
    deposits_gold: i64,
    evaluator: &RequirementEvaluator,
    existing: Option<DailyActivityRecord>,
    now: i64,
) -> DailyActivityRecord {
    let challenge_gold = donations_gold(&donations);
    let total_gold = challenge_gold.saturating_add(deposits_gold);
    let (id, manual_override) = match existing {
        Some(record) => (record.id, record.manual_override),
        None => (Uuid::new_v4().to_string(), None),
    };
    let decision = evaluator.evaluate(total_gold, &donations, manual_override.as_ref());
    DailyActivityRecord {
        id,
        guild_id: guild_id.to_string(),
        ign: member.ign.clone(),
        date: date.to_string(),
        raids: member.raids,
        challenge_gold,
        deposits_gold,
        total_gold,
        donations,
        meets_gold_requirement: decision.meets_gold_requirement,
        meets_item_requirement: decision.meets_item_requirement,
        manual_override,
        met_requirement: decision.final_met,
        updated_at: now,
    }
}
