use tracing::info;

use guild_domain::{
    parse_challenge_data, ChallengeItemConfig, ChallengeItemsPayload, ChallengeItemsUpdateQuery,
    GuildSettings, ItemKey, Role, ThresholdUpdate,
};

use crate::{AppError, AppState, RequestContext};

pub async fn update_threshold(
    state: &AppState,
    ctx: &RequestContext,
    update: ThresholdUpdate,
) -> Result<GuildSettings, AppError> {
    ctx.require(Role::Admin)?;
    if update.donation_threshold <= 0 {
        return Err(AppError::BadRequest(
            "donation_threshold must be > 0".to_string(),
        ));
    }
    let mut settings = state.settings_for(&ctx.guild_id).await;
    settings.donation_threshold = update.donation_threshold;
    save_settings(state, settings).await
}

pub async fn update_challenge_items(
    state: &AppState,
    ctx: &RequestContext,
    query: ChallengeItemsUpdateQuery,
    payload: ChallengeItemsPayload,
) -> Result<GuildSettings, AppError> {
    ctx.require(Role::Admin)?;
    let mut incoming = Vec::new();
    for item in payload.items.into_iter() {
        let normalized = item.normalized();
        if normalized.name.is_empty() {
            return Err(AppError::BadRequest("item name is required".to_string()));
        }
        if normalized.initial_quantity < 0 {
            return Err(AppError::BadRequest(format!(
                "initial_quantity must be >= 0 for '{}'",
                normalized.name
            )));
        }
        incoming.push(normalized);
    }

    let mode = query.mode.unwrap_or_else(|| "replace".to_string());
    let mut settings = state.settings_for(&ctx.guild_id).await;
    match mode.as_str() {
        "replace" => settings.challenge_items.clear(),
        "append" => {}
        other => {
            return Err(AppError::BadRequest(format!(
                "invalid mode '{}', expected replace or append",
                other
            )))
        }
    }
    settings.upsert_items(incoming);
    save_settings(state, settings).await
}

/// Uses the quantities shown on a pasted challenge panel as the baselines
/// for those items. Other configured items are kept.
pub async fn import_challenge(
    state: &AppState,
    ctx: &RequestContext,
    text: &str,
) -> Result<GuildSettings, AppError> {
    ctx.require(Role::Admin)?;
    let entries = parse_challenge_data(text);
    if entries.is_empty() {
        return Err(AppError::BadRequest(
            "no challenge items found in the pasted text".to_string(),
        ));
    }

    let mut items: Vec<ChallengeItemConfig> = Vec::new();
    for entry in entries {
        let key = ItemKey::from_name(&entry.name);
        match items
            .iter_mut()
            .find(|item| ItemKey::from_name(&item.name) == key)
        {
            Some(existing) => existing.initial_quantity += entry.quantity,
            None => items.push(ChallengeItemConfig {
                name: entry.name,
                initial_quantity: entry.quantity,
            }),
        }
    }

    let mut settings = state.settings_for(&ctx.guild_id).await;
    settings.upsert_items(items);
    save_settings(state, settings).await
}

async fn save_settings(state: &AppState, settings: GuildSettings) -> Result<GuildSettings, AppError> {
    let mut all: Vec<GuildSettings> = {
        let cache = state.guild_settings.read().await;
        cache
            .values()
            .filter(|existing| existing.guild_id != settings.guild_id)
            .cloned()
            .collect()
    };
    all.push(settings.clone());
    all.sort_by(|a, b| a.guild_id.cmp(&b.guild_id));

    state
        .config_repo
        .save_guild_settings(&state.config.settings_path, &all)
        .await
        .map_err(AppError::Internal)?;
    state
        .guild_settings
        .write()
        .await
        .insert(settings.guild_id.clone(), settings.clone());
    info!(
        "saved settings for {} (threshold {}, {} challenge items)",
        settings.guild_id,
        settings.donation_threshold,
        settings.challenge_items.len()
    );
    Ok(settings)
}
