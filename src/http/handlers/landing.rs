use crate::datasets::top_ev;
use crate::envelope::{CachePolicy, ok_json};
use crate::http::state::AppState;
use axum::extract::State;
use axum::response::Response;

/// GET /api/landing/top-ev
pub async fn get_top_ev(State(state): State<AppState>) -> Response {
    let response = top_ev::read(state.cache.as_ref()).await;
    ok_json(&response, CachePolicy::edge(60, 300))
}
