use crate::datasets::alternates::{self, AlternatesResponse};
use crate::datasets::markets;
use crate::datasets::props_rows::{self, RowsRequest};
use crate::envelope::{ApiError, CachePolicy, ok_json};
use crate::http::state::AppState;
use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::HeaderValue;
use axum::response::Response;
use serde::Deserialize;

/// Set on `/api/props/rows` replies assembled with per-field HGET
pub const X_PROPS_HMGET_FALLBACK: &str = "x-props-hmget-fallback";

#[derive(Debug, Deserialize)]
pub struct MarketsQuery {
    pub sport: Option<String>,
}

/// GET /api/props/markets?sport=
pub async fn get_markets(
    State(state): State<AppState>,
    Query(query): Query<MarketsQuery>,
) -> Response {
    let (response, _) =
        markets::read(state.cache.as_ref(), query.sport.as_deref(), &state.datasets).await;
    ok_json(&response, CachePolicy::edge(300, 600))
}

/// GET /api/props/alternates/{sid}
pub async fn get_alternates(
    State(state): State<AppState>,
    Path(sid): Path<String>,
) -> Result<Response, ApiError> {
    let sid = alternates::normalize_sid(Some(&sid))
        .ok_or_else(|| ApiError::missing_input("sid_required"))?;
    let fetched =
        alternates::read(state.cache.as_ref(), state.source.as_ref(), &state.datasets, sid)
            .await?;
    Ok(ok_json(
        &AlternatesResponse::from_fetched(fetched),
        CachePolicy::NoStore,
    ))
}

/// GET /api/props/alternates with no sid segment
pub async fn alternates_without_sid() -> ApiError {
    ApiError::missing_input("sid_required")
}

/// POST /api/props/rows
pub async fn post_prop_rows(State(state): State<AppState>, body: Bytes) -> Result<Response, ApiError> {
    let ids = RowsRequest::from_body(&body).into_ids();
    let response = props_rows::read(state.cache.as_ref(), &ids).await?;
    let mut reply = ok_json(&response, CachePolicy::NoStore);
    if response.hmget_fallback {
        reply
            .headers_mut()
            .insert(X_PROPS_HMGET_FALLBACK, HeaderValue::from_static("1"));
    }
    Ok(reply)
}
