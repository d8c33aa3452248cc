use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use guild_domain::ports::MarketPriceService;
use guild_domain::RuntimeConfig;

/// Market lookup over HTTP: search by name, resolve the item id, then
/// read its price statistics.
pub struct HttpMarketService {
    client: Client,
    base_url: Option<String>,
    api_key: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MarketSearchResponse {
    #[serde(default)]
    items: Vec<MarketItemSummary>,
}

#[derive(Debug, Deserialize)]
struct MarketItemSummary {
    id: serde_json::Value,
    name: String,
}

#[derive(Debug, Default, Deserialize, PartialEq)]
pub struct MarketPriceStats {
    #[serde(default, alias = "currentListing", alias = "lowest_listing")]
    pub current_listing: Option<f64>,
    #[serde(default, alias = "recentSale", alias = "last_sale")]
    pub recent_sale: Option<f64>,
    #[serde(default, alias = "historicalAverage", alias = "average")]
    pub historical_average: Option<f64>,
}

impl MarketPriceStats {
    /// Current listing, then the most recent sale, then the historical
    /// average. Missing or non-positive figures are skipped.
    pub fn best_price(&self) -> Option<i64> {
        [self.current_listing, self.recent_sale, self.historical_average]
            .into_iter()
            .flatten()
            .find(|price| price.is_finite() && *price > 0.0)
            .map(|price| price.round() as i64)
    }
}

impl HttpMarketService {
    pub fn new(config: &RuntimeConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds.max(3)))
            .build()
            .unwrap_or_else(|_| Client::new());
        Self {
            client,
            base_url: config.market_api_url.clone(),
            api_key: config.market_api_key.clone(),
        }
    }

    fn get(&self, url: String) -> reqwest::RequestBuilder {
        let request = self.client.get(url);
        match &self.api_key {
            Some(key) => request.header("x-api-key", key),
            None => request,
        }
    }

    async fn find_item_id(&self, base_url: &str, item_name: &str) -> Result<Option<String>> {
        let response: MarketSearchResponse = self
            .get(format!("{}/items/search", base_url))
            .query(&[("name", item_name)])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(pick_item(&response.items, item_name))
    }

    async fn fetch_stats(&self, base_url: &str, item_id: &str) -> Result<MarketPriceStats> {
        let stats = self
            .get(format!("{}/items/{}/prices", base_url, item_id))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(stats)
    }
}

/// Exact (case-insensitive) name match first, otherwise the top result.
fn pick_item(items: &[MarketItemSummary], item_name: &str) -> Option<String> {
    let wanted = item_name.trim().to_lowercase();
    items
        .iter()
        .find(|item| item.name.trim().to_lowercase() == wanted)
        .or_else(|| items.first())
        .and_then(|item| match &item.id {
            serde_json::Value::String(id) if !id.is_empty() => Some(id.clone()),
            serde_json::Value::Number(id) => Some(id.to_string()),
            _ => None,
        })
}

#[async_trait]
impl MarketPriceService for HttpMarketService {
    async fn lookup_price(&self, item_name: &str) -> Result<Option<i64>> {
        let Some(base_url) = self.base_url.as_deref() else {
            return Ok(None);
        };
        let Some(item_id) = self.find_item_id(base_url, item_name).await? else {
            debug!("market has no item named '{}'", item_name);
            return Ok(None);
        };
        let stats = self.fetch_stats(base_url, &item_id).await?;
        Ok(stats.best_price())
    }

    async fn ping(&self) -> Result<()> {
        let Some(base_url) = self.base_url.as_deref() else {
            return Ok(());
        };
        let response = self.get(base_url.to_string()).send().await?;
        if response.status().is_server_error() {
            return Err(anyhow!("market api responded {}", response.status()));
        }
        Ok(())
    }
}
