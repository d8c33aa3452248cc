use guild_domain::{GuildSettings, Role};

use crate::{AppError, AppState, RequestContext};

pub async fn get_settings(state: &AppState, ctx: &RequestContext) -> Result<GuildSettings, AppError> {
    ctx.require(Role::Member)?;
    Ok(state.settings_for(&ctx.guild_id).await)
}
