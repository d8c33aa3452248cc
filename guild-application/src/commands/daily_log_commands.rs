use tracing::info;

use guild_domain::{
    combine, current_millis, normalize_date, DailyActivityRecord, GoldUpdate, ItemKey, ManualOverride,
    OverrideUpdate, PricedDonation, RequirementEvaluator, Role,
};

use crate::{AppError, AppState, RequestContext};

/// Edits the gold figures of a saved record. Only the gold condition is
/// re-derived; the item condition stays as it was computed at parse time.
pub async fn update_gold(
    state: &AppState,
    ctx: &RequestContext,
    date: &str,
    ign: &str,
    update: GoldUpdate,
) -> Result<DailyActivityRecord, AppError> {
    ctx.require(Role::Officer)?;
    if update.challenge_gold.is_some_and(|gold| gold < 0)
        || update.deposits_gold.is_some_and(|gold| gold < 0)
    {
        return Err(AppError::BadRequest("gold values must not be negative".to_string()));
    }

    let mut record = load_record(state, ctx, date, ign).await?;
    if let Some(gold) = update.challenge_gold {
        record.challenge_gold = gold;
    }
    if let Some(gold) = update.deposits_gold {
        record.deposits_gold = gold;
    }
    record.total_gold = record
        .challenge_gold
        .checked_add(record.deposits_gold)
        .ok_or_else(|| AppError::BadRequest("gold values exceed the gold range".to_string()))?;

    let settings = state.settings_for(&ctx.guild_id).await;
    let evaluator = RequirementEvaluator::new(settings.effective_threshold());
    let decision = evaluator.reevaluate_gold(record.decision(), record.total_gold, record.manual_override.as_ref());
    record.apply_decision(decision);

    save_record(state, record).await
}

pub async fn set_manual_override(
    state: &AppState,
    ctx: &RequestContext,
    date: &str,
    ign: &str,
    update: OverrideUpdate,
) -> Result<DailyActivityRecord, AppError> {
    ctx.require(Role::Officer)?;
    let mut record = load_record(state, ctx, date, ign).await?;

    record.manual_override = if update.enabled {
        Some(ManualOverride {
            set_by: ctx.user_id.clone(),
            note: update
                .note
                .map(|note| note.trim().to_string())
                .filter(|note| !note.is_empty()),
            set_at: current_millis(),
        })
    } else {
        None
    };
    record.apply_decision(combine(
        record.meets_gold_requirement,
        record.meets_item_requirement,
        record.manual_override.is_some(),
    ));
    info!(
        "manual override for {} on {} {} by {}",
        record.ign,
        record.date,
        if update.enabled { "set" } else { "cleared" },
        ctx.user_id
    );

    save_record(state, record).await
}

/// Re-derives baselines, percentages and the item condition from the
/// guild's current challenge settings. Prices and gold stay untouched.
pub async fn recompute_item_requirement(
    state: &AppState,
    ctx: &RequestContext,
    date: &str,
    ign: &str,
) -> Result<DailyActivityRecord, AppError> {
    ctx.require(Role::Officer)?;
    let mut record = load_record(state, ctx, date, ign).await?;

    let settings = state.settings_for(&ctx.guild_id).await;
    let baselines = settings.initial_quantities();
    record.donations = record
        .donations
        .iter()
        .map(|donation| {
            let key = ItemKey::from_name(&donation.item);
            PricedDonation::new(
                donation.item.clone(),
                donation.quantity,
                donation.price,
                baselines.get(&key).copied().unwrap_or_default(),
            )
        })
        .collect();

    let evaluator = RequirementEvaluator::new(settings.effective_threshold());
    record.apply_decision(combine(
        record.meets_gold_requirement,
        evaluator.meets_item_requirement(&record.donations),
        record.manual_override.is_some(),
    ));

    save_record(state, record).await
}

/// Exact IGN first. A different spelling is accepted only when it matches
/// a single record of the day case-insensitively.
async fn load_record(
    state: &AppState,
    ctx: &RequestContext,
    date: &str,
    ign: &str,
) -> Result<DailyActivityRecord, AppError> {
    let date = normalize_date(date).map_err(|err| AppError::BadRequest(format!("invalid date: {}", err)))?;
    let ign = ign.trim();
    if ign.is_empty() {
        return Err(AppError::BadRequest("ign must not be empty".to_string()));
    }
    if let Some(record) = state
        .daily_log_repo
        .get_record(&ctx.guild_id, &date, ign)
        .await
        .map_err(AppError::Internal)?
    {
        return Ok(record);
    }

    let wanted = ign.to_lowercase();
    let mut candidates: Vec<DailyActivityRecord> = state
        .daily_log_repo
        .list_records(&ctx.guild_id, &date, &date)
        .await
        .map_err(AppError::Internal)?
        .into_iter()
        .filter(|record| record.ign.to_lowercase() == wanted)
        .collect();
    match candidates.len() {
        0 => Err(AppError::NotFound(format!("no activity for '{}' on {}", ign, date))),
        1 => Ok(candidates.remove(0)),
        _ => Err(AppError::BadRequest(format!(
            "'{}' matches several members on {}, use the exact spelling",
            ign, date
        ))),
    }
}

async fn save_record(
    state: &AppState,
    mut record: DailyActivityRecord,
) -> Result<DailyActivityRecord, AppError> {
    record.updated_at = current_millis();
    state
        .daily_log_repo
        .upsert_records(std::slice::from_ref(&record))
        .await
        .map_err(AppError::Internal)?;
    Ok(record)
}
