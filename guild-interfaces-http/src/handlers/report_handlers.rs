use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::Json;

use guild_application::queries::report_queries;
use guild_application::AppState;
use guild_domain::{InactiveMember, InactivityQuery, LeaderboardEntry, LeaderboardQuery};

use crate::error::HttpError;
use crate::middleware::authorize;

pub async fn leaderboard(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<LeaderboardQuery>,
) -> Result<Json<Vec<LeaderboardEntry>>, HttpError> {
    let ctx = authorize(&state, &headers)?;
    let entries = report_queries::leaderboard(&state, &ctx, query).await?;
    Ok(Json(entries))
}

pub async fn inactivity(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<InactivityQuery>,
) -> Result<Json<Vec<InactiveMember>>, HttpError> {
    let ctx = authorize(&state, &headers)?;
    let members = report_queries::inactivity(&state, &ctx, query).await?;
    Ok(Json(members))
}
