use crate::http::handlers;
use crate::http::state::AppState;
use axum::{
    Router,
    routing::{delete, get, post},
};
use tower_http::trace::TraceLayer;

/// Build and configure the application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        // Analytics
        .route("/api/get_hit_streaks", get(handlers::get_hit_streaks))
        .route("/api/mispriced-odds", get(handlers::get_mispriced_odds))
        .route("/api/debug/mispriced-odds", get(handlers::debug_mispriced_odds))
        .route("/api/landing/top-ev", get(handlers::get_top_ev))
        // Props
        .route("/api/props/markets", get(handlers::get_markets))
        .route("/api/props/alternates", get(handlers::alternates_without_sid))
        .route("/api/props/alternates/", get(handlers::alternates_without_sid))
        .route("/api/props/alternates/{sid}", get(handlers::get_alternates))
        .route("/api/props/rows", post(handlers::post_prop_rows))
        // Raw cache access
        .route("/api/redis/get", get(handlers::get_raw_key))
        .route("/api/redis/del", delete(handlers::delete_raw_key))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
