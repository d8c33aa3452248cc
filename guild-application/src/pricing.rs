use std::collections::HashMap;
use std::time::Duration;

use tracing::{debug, warn};

use guild_domain::{current_millis, CachedPrice, ItemKey};

use crate::AppState;

/// Resolves gold prices for item names, keyed case-insensitively.
///
/// The cache is consulted first; stale or missing entries are fetched from
/// the market one at a time with a pause between calls, then written back.
/// Items the market cannot price resolve to 0.
pub async fn resolve_prices(state: &AppState, names: &[String]) -> HashMap<ItemKey, i64> {
    let mut keys: Vec<ItemKey> = Vec::new();
    for name in names {
        let key = ItemKey::from_name(name);
        if !key.as_str().is_empty() && !keys.contains(&key) {
            keys.push(key);
        }
    }
    if keys.is_empty() {
        return HashMap::new();
    }

    let cached = state.price_cache.get_prices(&keys).await.unwrap_or_else(|err| {
        warn!("price cache read failed: {}", err);
        HashMap::new()
    });

    let now = current_millis();
    let ttl_ms = (state.config.price_cache_ttl_hours as i64).saturating_mul(3_600_000);
    let delay = Duration::from_millis(state.config.price_lookup_delay_ms);

    let mut prices = HashMap::new();
    let mut fetched = Vec::new();
    let mut calls = 0usize;
    for key in keys {
        if let Some(entry) = cached.get(&key) {
            if ttl_ms == 0 || now - entry.updated_at <= ttl_ms {
                prices.insert(key, entry.price);
                continue;
            }
        }

        if calls > 0 && !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        calls += 1;
        state.metrics.record_price_lookup();
        let price = match state.market.lookup_price(key.as_str()).await {
            Ok(found) => found.unwrap_or_default().max(0),
            Err(err) => {
                warn!("market price lookup for '{}' failed: {}", key, err);
                state.metrics.record_price_lookup_error();
                prices.insert(key, 0);
                continue;
            }
        };
        debug!("market price for '{}' is {}", key, price);
        fetched.push(CachedPrice {
            item_key: key.0.clone(),
            price,
            updated_at: now,
        });
        prices.insert(key, price);
    }

    if !fetched.is_empty() {
        if let Err(err) = state.price_cache.put_prices(&fetched).await {
            warn!("price cache write failed: {}", err);
        }
    }
    prices
}
