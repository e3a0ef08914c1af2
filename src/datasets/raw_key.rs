//! Arbitrary key lookup for diagnostics

use crate::keys::CacheKey;
use crate::read_through::{CachedFetch, Payload, ReadThroughError};
use cache_system::{CacheStore, CachedValue, DecodeMismatch};
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RawKeyResponse {
    pub key: String,
    /// Decoded JSON, the stored text when it is not JSON, or `null` when absent
    pub value: Value,
}

/// Arbitrary keys often hold plain text; that is not a decode failure here
fn json_or_text(value: &CachedValue) -> Result<Value, DecodeMismatch> {
    Ok(value
        .decode::<Value>()
        .unwrap_or_else(|_| Value::String(value.as_text().into_owned())))
}

pub async fn read(cache: &dyn CacheStore, key: &str) -> Result<RawKeyResponse, ReadThroughError> {
    let key = CacheKey::raw(key);
    let cached = CachedFetch::<Value>::new(cache, &key)
        .decode_with(json_or_text)
        .cached()
        .await?;

    let value = match cached.map(|fetched| fetched.payload) {
        Some(Payload::Decoded(value)) => value,
        Some(Payload::Raw(text)) => Value::String(text),
        None => Value::Null,
    };

    Ok(RawKeyResponse {
        key: key.to_string(),
        value,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use cache_system::MemoryCache;
    use serde_json::json;

    #[tokio::test]
    async fn test_plain_text_is_returned_as_string() {
        let cache = MemoryCache::new();
        cache.set_raw("motd", b"hello", None).await.unwrap();

        let response = read(&cache, "motd").await.unwrap();
        assert_eq!(response.value, json!("hello"));
    }

    #[tokio::test]
    async fn test_json_is_decoded() {
        let cache = MemoryCache::new();
        cache.set_raw("cfg", br#"{"a":1}"#, None).await.unwrap();

        assert_eq!(read(&cache, "cfg").await.unwrap().value, json!({"a": 1}));
    }

    #[tokio::test]
    async fn test_absent_key_is_null() {
        let cache = MemoryCache::new();
        let response = read(&cache, "nope").await.unwrap();
        assert_eq!(serde_json::to_value(&response).unwrap(), json!({"key": "nope", "value": null}));
    }
}
