use axum::routing::{get, post, put};
use axum::Router;

use guild_application::AppState;

use crate::handlers::{
    activity_handlers, challenge_handlers, member_handlers, ops_handlers, report_handlers, settings_handlers,
};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/v1/activity-logs",
            post(activity_handlers::submit_activity_log).get(activity_handlers::list_activity_logs),
        )
        .route("/v1/activity-logs/:date/:ign/gold", put(activity_handlers::update_gold))
        .route("/v1/activity-logs/:date/:ign/override", put(activity_handlers::set_override))
        .route(
            "/v1/activity-logs/:date/:ign/recompute",
            post(activity_handlers::recompute_item_requirement),
        )
        .route("/v1/challenges/cost", post(challenge_handlers::calculate_cost))
        .route("/v1/challenges/import", post(challenge_handlers::import_challenge))
        .route("/v1/settings", get(settings_handlers::get_settings))
        .route("/v1/settings/threshold", put(settings_handlers::update_threshold))
        .route(
            "/v1/settings/challenge-items",
            put(settings_handlers::update_challenge_items),
        )
        .route("/v1/members", get(member_handlers::list_members))
        .route("/v1/reports/leaderboard", get(report_handlers::leaderboard))
        .route("/v1/reports/inactivity", get(report_handlers::inactivity))
        .route("/v1/ops/health/live", get(ops_handlers::health_live))
        .route("/v1/ops/health/ready", get(ops_handlers::health_ready))
        .route("/v1/ops/metrics/prometheus", get(ops_handlers::metrics_prometheus))
        .with_state(state)
}
