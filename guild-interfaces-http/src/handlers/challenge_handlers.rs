use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;

use guild_application::commands::settings_commands;
use guild_application::queries::challenge_queries;
use guild_application::AppState;
use guild_domain::{ChallengeCost, ChallengeTextPayload, GuildSettings};

use crate::error::HttpError;
use crate::middleware::authorize;

pub async fn calculate_cost(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<ChallengeTextPayload>,
) -> Result<Json<ChallengeCost>, HttpError> {
    let ctx = authorize(&state, &headers)?;
    let cost = challenge_queries::calculate_challenge_cost(&state, &ctx, &payload.text).await?;
    Ok(Json(cost))
}

pub async fn import_challenge(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<ChallengeTextPayload>,
) -> Result<Json<GuildSettings>, HttpError> {
    let ctx = authorize(&state, &headers)?;
    let settings = settings_commands::import_challenge(&state, &ctx, &payload.text).await?;
    Ok(Json(settings))
}
