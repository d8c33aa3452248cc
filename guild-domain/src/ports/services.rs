use async_trait::async_trait;

#[async_trait]
pub trait MarketPriceService: Send + Sync {
    /// Gold per unit for an item, `None` when the market knows nothing.
    async fn lookup_price(&self, item_name: &str) -> anyhow::Result<Option<i64>>;
    async fn ping(&self) -> anyhow::Result<()>;
}

#[async_trait]
pub trait HealthCheckService: Send + Sync {
    async fn check_storage(&self) -> anyhow::Result<bool>;
    async fn check_market(&self) -> anyhow::Result<bool>;
}
