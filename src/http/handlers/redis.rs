//! Raw cache key access
//!
//! The lookup is open; invalidation requires the configured admin bearer token.

use crate::datasets::raw_key;
use crate::envelope::{ApiError, CachePolicy, ok_json};
use crate::http::state::AppState;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, header};
use axum::response::Response;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

#[derive(Debug, Deserialize)]
pub struct KeyQuery {
    pub key: Option<String>,
}

impl KeyQuery {
    fn required_key(&self) -> Result<&str, ApiError> {
        self.key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| ApiError::missing_input("key_required"))
    }
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub key: String,
    pub deleted: bool,
}

/// GET /api/redis/get?key=
pub async fn get_raw_key(
    State(state): State<AppState>,
    Query(query): Query<KeyQuery>,
) -> Result<Response, ApiError> {
    let key = query.required_key()?;
    let response = raw_key::read(state.cache.as_ref(), key).await?;
    Ok(ok_json(&response, CachePolicy::NoStore))
}

/// DELETE /api/redis/del?key=
pub async fn delete_raw_key(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<KeyQuery>,
) -> Result<Response, ApiError> {
    let Some(expected) = state.admin_token.as_deref() else {
        return Err(ApiError::admin_disabled());
    };
    let presented = bearer_token(&headers).unwrap_or_default();
    if !timing_safe_eq(presented.as_bytes(), expected.as_bytes()) {
        return Err(ApiError::unauthorized());
    }

    let key = query.required_key()?;
    let deleted = state.cache.delete(key).await.map_err(|e| {
        error!(key, error = %e, "cache delete failed");
        ApiError::cache_unavailable(e.to_string())
    })?;
    info!(key, deleted, "cache key invalidated");

    Ok(ok_json(
        &DeleteResponse {
            key: key.to_string(),
            deleted,
        },
        CachePolicy::NoStore,
    ))
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
}

/// Compare without short-circuiting on the first differing byte
pub fn timing_safe_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_timing_safe_eq() {
        assert!(timing_safe_eq(b"secret", b"secret"));
        assert!(!timing_safe_eq(b"secret", b"wrong!"));
        assert!(!timing_safe_eq(b"short", b"longer-value"));
    }

    #[test]
    fn test_bearer_token_parsing() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert_eq!(bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer tok "));
        assert_eq!(bearer_token(&headers), Some("tok"));
    }

    #[test]
    fn test_blank_key_is_rejected() {
        let query = KeyQuery {
            key: Some("  ".into()),
        };
        assert_eq!(query.required_key().unwrap_err().kind(), "key_required");
    }
}
