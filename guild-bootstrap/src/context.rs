use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use tokio::sync::RwLock;
use tracing::{info, warn};

use guild_application::{AppState, Metrics};
use guild_domain::ConfigRepository;
use guild_infrastructure::{
    AppConfig, ConfigFileRepository, DefaultHealthService, HttpMarketService, JsonFileStore,
};

pub struct AppContext {
    pub state: AppState,
}

impl AppContext {
    pub async fn new(config: &AppConfig) -> Result<Self> {
        let runtime_config = config.to_runtime_config();

        let store = Arc::new(JsonFileStore::new(&runtime_config.data_dir));
        let config_repo = Arc::new(ConfigFileRepository::new());
        let settings = config_repo
            .load_guild_settings(&runtime_config.settings_path)
            .await
            .unwrap_or_else(|err| {
                warn!("failed to load guild settings from {}: {}", runtime_config.settings_path, err);
                Vec::new()
            });
        info!("loaded settings for {} guilds", settings.len());
        let guild_settings: HashMap<_, _> = settings
            .into_iter()
            .map(|settings| (settings.guild_id.clone(), settings))
            .collect();

        let market = Arc::new(HttpMarketService::new(&runtime_config));
        if runtime_config.market_api_url.is_none() {
            warn!("market_api_url not configured, unknown items will price at 0");
        }
        if runtime_config.access_tokens.is_empty() {
            warn!("no access_tokens configured, every caller is treated as admin");
        }

        let state = AppState {
            config: runtime_config,
            member_repo: store.clone(),
            daily_log_repo: store.clone(),
            price_cache: store.clone(),
            config_repo,
            market: market.clone(),
            health: Arc::new(DefaultHealthService::new(store, market)),
            guild_settings: Arc::new(RwLock::new(guild_settings)),
            metrics: Arc::new(Metrics::default()),
        };

        Ok(Self { state })
    }
}
