use std::collections::HashMap;
use std::sync::Arc;

use guild_domain::ports::{
    ConfigRepository, DailyLogRepository, HealthCheckService, MarketPriceService, MemberRepository,
    PriceCacheRepository,
};
use guild_domain::{GuildSettings, RuntimeConfig};
use tokio::sync::RwLock;

use crate::Metrics;

#[derive(Clone)]
pub struct AppState {
    pub config: RuntimeConfig,
    pub member_repo: Arc<dyn MemberRepository>,
    pub daily_log_repo: Arc<dyn DailyLogRepository>,
    pub price_cache: Arc<dyn PriceCacheRepository>,
    pub config_repo: Arc<dyn ConfigRepository>,
    pub market: Arc<dyn MarketPriceService>,
    pub health: Arc<dyn HealthCheckService>,
    pub guild_settings: Arc<RwLock<HashMap<String, GuildSettings>>>,
    pub metrics: Arc<Metrics>,
}

impl AppState {
    /// Settings for a guild, falling back to the configured threshold and
    /// no challenge baselines.
    pub async fn settings_for(&self, guild_id: &str) -> GuildSettings {
        let cached = self.guild_settings.read().await.get(guild_id).cloned();
        cached.unwrap_or_else(|| GuildSettings::new(guild_id, self.config.default_donation_threshold))
    }
}
