use tracing::info;

use guild_domain::{parse_challenge_data, ChallengeCost, ItemKey, PricedChallengeItem, Role};

use crate::pricing::resolve_prices;
use crate::{AppError, AppState, RequestContext};

/// Prices a pasted challenge panel. Unparsable text yields an empty cost.
pub async fn calculate_challenge_cost(
    state: &AppState,
    ctx: &RequestContext,
    text: &str,
) -> Result<ChallengeCost, AppError> {
    ctx.require(Role::Member)?;
    let entries = parse_challenge_data(text);
    if entries.is_empty() {
        return Ok(ChallengeCost::default());
    }

    let names: Vec<String> = entries.iter().map(|entry| entry.name.clone()).collect();
    let prices = resolve_prices(state, &names).await;
    let items = entries
        .into_iter()
        .map(|entry| {
            let price = prices
                .get(&ItemKey::from_name(&entry.name))
                .copied()
                .unwrap_or_default();
            PricedChallengeItem {
                total: entry.quantity.saturating_mul(price),
                name: entry.name,
                quantity: entry.quantity,
                price,
            }
        })
        .collect();
    let cost = ChallengeCost::from_items(items);
    info!("challenge cost for {}: {} gold", ctx.guild_id, cost.total);
    Ok(cost)
}
