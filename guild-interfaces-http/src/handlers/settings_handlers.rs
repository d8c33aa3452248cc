use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::Json;

use guild_application::commands::settings_commands;
use guild_application::queries::settings_queries;
use guild_application::AppState;
use guild_domain::{ChallengeItemsPayload, ChallengeItemsUpdateQuery, GuildSettings, ThresholdUpdate};

use crate::error::HttpError;
use crate::middleware::authorize;

pub async fn get_settings(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<GuildSettings>, HttpError> {
    let ctx = authorize(&state, &headers)?;
    let settings = settings_queries::get_settings(&state, &ctx).await?;
    Ok(Json(settings))
}

pub async fn update_threshold(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<ThresholdUpdate>,
) -> Result<Json<GuildSettings>, HttpError> {
    let ctx = authorize(&state, &headers)?;
    let settings = settings_commands::update_threshold(&state, &ctx, payload).await?;
    Ok(Json(settings))
}

pub async fn update_challenge_items(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<ChallengeItemsUpdateQuery>,
    Json(payload): Json<ChallengeItemsPayload>,
) -> Result<Json<GuildSettings>, HttpError> {
    let ctx = authorize(&state, &headers)?;
    let settings = settings_commands::update_challenge_items(&state, &ctx, query, payload).await?;
    Ok(Json(settings))
}
