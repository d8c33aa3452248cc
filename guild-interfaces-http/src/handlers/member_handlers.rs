use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::Json;

use guild_application::queries::member_queries;
use guild_application::AppState;
use guild_domain::{Member, MemberQuery};

use crate::error::HttpError;
use crate::middleware::authorize;

pub async fn list_members(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<MemberQuery>,
) -> Result<Json<Vec<Member>>, HttpError> {
    let ctx = authorize(&state, &headers)?;
    let members = member_queries::list_members(&state, &ctx, query).await?;
    Ok(Json(members))
}
