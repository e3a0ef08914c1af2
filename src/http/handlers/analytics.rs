use crate::datasets::{hit_streaks, mispriced_odds};
use crate::envelope::{ApiError, CachePolicy, ok_json, ok_json_cached};
use crate::http::state::AppState;
use axum::extract::State;
use axum::response::Response;

/// Hit streaks change once a day; let the edge hold them briefly.
const HIT_STREAKS_POLICY: CachePolicy = CachePolicy::edge(300, 600);

/// GET /api/get_hit_streaks
pub async fn get_hit_streaks(State(state): State<AppState>) -> Result<Response, ApiError> {
    let fetched =
        hit_streaks::read(state.cache.as_ref(), state.source.as_ref(), &state.datasets).await?;
    debug_log!(origin = ?fetched.origin, "hit streaks served");
    let cache_hit = fetched.cache_hit();
    Ok(ok_json_cached(&fetched.payload, HIT_STREAKS_POLICY, cache_hit))
}

/// GET /api/mispriced-odds
pub async fn get_mispriced_odds(State(state): State<AppState>) -> Result<Response, ApiError> {
    let response = mispriced_odds::read(state.cache.as_ref()).await?;
    Ok(ok_json(&response, CachePolicy::NoStore))
}

/// GET /api/debug/mispriced-odds
pub async fn debug_mispriced_odds(State(state): State<AppState>) -> Result<Response, ApiError> {
    let status = mispriced_odds::status(state.cache.as_ref()).await?;
    Ok(ok_json(&status, CachePolicy::NoStore))
}
