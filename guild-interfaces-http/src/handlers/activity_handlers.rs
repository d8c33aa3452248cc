use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::Json;
use tracing::error;

use guild_application::commands::{activity_log_commands, daily_log_commands};
use guild_application::queries::daily_log_queries;
use guild_application::AppState;
use guild_domain::{
    ActivityLogOutcome, ActivityLogSubmission, DailyActivityRecord, DailyLogQuery, GoldUpdate, OverrideUpdate,
};

use crate::error::HttpError;
use crate::middleware::{authorize, parse_json_body};

pub async fn submit_activity_log(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: axum::body::Bytes,
) -> Result<Json<ActivityLogOutcome>, HttpError> {
    let ctx = authorize(&state, &headers)?;
    let submission: ActivityLogSubmission = parse_json_body(&headers, &body).map_err(|err| {
        error!("failed to parse activity log body: {}", err);
        HttpError::BadRequest(err.to_string())
    })?;
    let outcome = activity_log_commands::process_activity_log(&state, &ctx, submission).await?;
    Ok(Json(outcome))
}

pub async fn list_activity_logs(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<DailyLogQuery>,
) -> Result<Json<Vec<DailyActivityRecord>>, HttpError> {
    let ctx = authorize(&state, &headers)?;
    let records = daily_log_queries::list_daily_logs(&state, &ctx, query).await?;
    Ok(Json(records))
}

pub async fn update_gold(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path((date, ign)): Path<(String, String)>,
    Json(payload): Json<GoldUpdate>,
) -> Result<Json<DailyActivityRecord>, HttpError> {
    let ctx = authorize(&state, &headers)?;
    let record = daily_log_commands::update_gold(&state, &ctx, &date, &ign, payload).await?;
    Ok(Json(record))
}

pub async fn set_override(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path((date, ign)): Path<(String, String)>,
    Json(payload): Json<OverrideUpdate>,
) -> Result<Json<DailyActivityRecord>, HttpError> {
    let ctx = authorize(&state, &headers)?;
    let record = daily_log_commands::set_manual_override(&state, &ctx, &date, &ign, payload).await?;
    Ok(Json(record))
}

pub async fn recompute_item_requirement(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path((date, ign)): Path<(String, String)>,
) -> Result<Json<DailyActivityRecord>, HttpError> {
    let ctx = authorize(&state, &headers)?;
    let record = daily_log_commands::recompute_item_requirement(&state, &ctx, &date, &ign).await?;
    Ok(Json(record))
}
