use axum::extract::State;
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use tokio::time::{timeout, Duration};
use tracing::{error, warn};

use guild_application::AppState;
use guild_domain::Role;

use crate::error::HttpError;
use crate::middleware::authorize;

#[derive(serde::Serialize)]
pub struct ReadyStatus {
    storage: &'static str,
    market: &'static str,
}

pub async fn health_live() -> StatusCode {
    StatusCode::OK
}

/// Storage must answer for the service to be ready. A failing market only
/// degrades pricing, so it is reported without failing the check.
pub async fn health_ready(State(state): State<AppState>) -> impl IntoResponse {
    let timeout_secs = state.config.request_timeout_seconds.max(1);
    let timeout_duration = Duration::from_secs(timeout_secs);

    let storage = match timeout(timeout_duration, state.health.check_storage()).await {
        Ok(Ok(true)) => "ok",
        Ok(Ok(false)) => "error",
        Ok(Err(err)) => {
            error!("storage ready check failed: {}", err);
            "error"
        }
        Err(_) => {
            error!("storage ready check timeout after {}s", timeout_secs);
            "timeout"
        }
    };
    let market = match timeout(timeout_duration, state.health.check_market()).await {
        Ok(Ok(true)) => "ok",
        Ok(Ok(false)) => "error",
        Ok(Err(err)) => {
            warn!("market ready check failed: {}", err);
            "error"
        }
        Err(_) => "timeout",
    };

    let status = if storage == "ok" {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(ReadyStatus { storage, market }))
}

pub async fn metrics_prometheus(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, HttpError> {
    let ctx = authorize(&state, &headers)?;
    ctx.require(Role::Admin)?;
    let payload = state.metrics.render_prometheus();
    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/plain; version=0.0.4; charset=utf-8"),
    );
    Ok((headers, payload))
}
