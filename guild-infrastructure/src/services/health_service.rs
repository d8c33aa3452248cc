use std::sync::Arc;

use async_trait::async_trait;
use guild_domain::ports::{HealthCheckService, MarketPriceService};
use guild_domain::DailyLogRepository;

pub struct DefaultHealthService {
    daily_log_repo: Arc<dyn DailyLogRepository>,
    market: Arc<dyn MarketPriceService>,
}

impl DefaultHealthService {
    pub fn new(daily_log_repo: Arc<dyn DailyLogRepository>, market: Arc<dyn MarketPriceService>) -> Self {
        Self { daily_log_repo, market }
    }
}

#[async_trait]
impl HealthCheckService for DefaultHealthService {
    async fn check_storage(&self) -> anyhow::Result<bool> {
        self.daily_log_repo.ping().await.map(|_| true)
    }

    async fn check_market(&self) -> anyhow::Result<bool> {
        self.market.ping().await.map(|_| true)
    }
}
