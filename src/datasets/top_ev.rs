//! Landing-page top EV plays
//!
//! Read-only: the EV scanner writes the list. The landing page must render even when the
//! cache is unreachable, so every failure degrades to an empty list.

use crate::keys::CacheKey;
use crate::read_through::{CachedFetch, Payload};
use cache_system::CacheStore;
use serde::Serialize;
use serde_json::Value;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopEvResponse {
    pub data: Vec<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
}

pub async fn read(cache: &dyn CacheStore) -> TopEvResponse {
    let key = CacheKey::top_ev();
    let cached = match CachedFetch::<Vec<Value>>::new(cache, &key).cached().await {
        Ok(cached) => cached,
        Err(err) => {
            warn!(key = %key, error = %err, "top EV unavailable, serving empty list");
            None
        }
    };

    match cached.map(|fetched| fetched.payload) {
        Some(Payload::Decoded(data)) => TopEvResponse { data, raw: None },
        Some(Payload::Raw(raw)) => TopEvResponse {
            data: Vec::new(),
            raw: Some(raw),
        },
        None => TopEvResponse {
            data: Vec::new(),
            raw: None,
        },
    }
}
