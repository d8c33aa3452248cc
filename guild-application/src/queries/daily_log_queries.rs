use tracing::error;

use guild_domain::{normalize_date, today, DailyActivityRecord, DailyLogQuery, Role};

use crate::{AppError, AppState, RequestContext};

pub async fn list_daily_logs(
    state: &AppState,
    ctx: &RequestContext,
    query: DailyLogQuery,
) -> Result<Vec<DailyActivityRecord>, AppError> {
    ctx.require(Role::Member)?;
    let date = match query.date.as_deref() {
        Some(date) => normalize_date(date).map_err(|err| AppError::BadRequest(format!("invalid date: {}", err)))?,
        None => today(),
    };
    let ign = query.ign.map(|ign| ign.trim().to_lowercase()).filter(|ign| !ign.is_empty());

    let rows = state
        .daily_log_repo
        .list_records(&ctx.guild_id, &date, &date)
        .await
        .map_err(|err| {
            error!("failed to fetch daily logs: {}", err);
            AppError::Internal(err)
        })?;
    Ok(rows
        .into_iter()
        .filter(|record| {
            ign.as_deref()
                .map(|ign| record.ign.to_lowercase() == ign)
                .unwrap_or(true)
        })
        .collect())
}
