use guild_domain::{Member, MemberQuery, Role};

use crate::{AppError, AppState, RequestContext};

pub async fn list_members(
    state: &AppState,
    ctx: &RequestContext,
    query: MemberQuery,
) -> Result<Vec<Member>, AppError> {
    ctx.require(Role::Member)?;
    let mut members = state
        .member_repo
        .list_members(&ctx.guild_id)
        .await
        .map_err(AppError::Internal)?;
    if let Some(active) = query.active {
        members.retain(|member| member.active == active);
    }
    members.sort_by(|a, b| a.ign.to_lowercase().cmp(&b.ign.to_lowercase()));
    Ok(members)
}
