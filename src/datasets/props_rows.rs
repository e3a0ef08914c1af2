//! Bulk prop row lookup from the `props:rows:prim` hash

use crate::keys::PROP_ROWS_HASH;
use crate::read_through::ReadThroughError;
use cache_system::{CacheStore, CachedValue};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use tracing::warn;

/// Most ids served per request; extras are dropped.
pub const MAX_IDS: usize = 1000;
/// Fields per HMGET round trip
pub const CHUNK: usize = 300;

/// Request body. `sids` wins over `ids`; entries may be strings or numbers.
#[derive(Debug, Default, Deserialize)]
pub struct RowsRequest {
    #[serde(default)]
    pub sids: Option<Vec<Value>>,
    #[serde(default)]
    pub ids: Option<Vec<Value>>,
}

impl RowsRequest {
    /// Parse leniently: a malformed body is an empty request
    pub fn from_body(body: &[u8]) -> Self {
        serde_json::from_slice(body).unwrap_or_default()
    }

    pub fn into_ids(self) -> Vec<String> {
        normalize_ids(self.sids.or(self.ids).unwrap_or_default())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropRow {
    pub sid: String,
    pub row: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowsResponse {
    pub rows: Vec<PropRow>,
    /// Some chunk was answered field by field after a short HMGET reply
    #[serde(skip)]
    pub hmget_fallback: bool,
}

/// Stringify, trim, drop blanks and non-scalars, dedup keeping first occurrence, cap.
pub fn normalize_ids(input: Vec<Value>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut ordered: Vec<String> = Vec::new();
    for value in input {
        let id = match value {
            Value::String(s) => s.trim().to_string(),
            Value::Number(n) => n.to_string(),
            _ => continue,
        };
        if id.is_empty() || !seen.insert(id.clone()) {
            continue;
        }
        ordered.push(id);
        if ordered.len() == MAX_IDS {
            break;
        }
    }
    ordered
}

fn parse_row(value: Option<CachedValue>) -> Value {
    match value {
        Some(CachedValue::Structured(value)) => value,
        Some(CachedValue::Raw(bytes)) => serde_json::from_slice(&bytes).unwrap_or(Value::Null),
        None => Value::Null,
    }
}

pub async fn read(cache: &dyn CacheStore, ids: &[String]) -> Result<RowsResponse, ReadThroughError> {
    let mut rows = Vec::with_capacity(ids.len());
    let mut hmget_fallback = false;
    for chunk in ids.chunks(CHUNK) {
        let mut values = cache.hash_get_many(PROP_ROWS_HASH, chunk).await?;
        if values.len() != chunk.len() {
            warn!(
                expected = chunk.len(),
                got = values.len(),
                "HMGET reply misaligned, reading fields one by one"
            );
            hmget_fallback = true;
            values = Vec::with_capacity(chunk.len());
            for sid in chunk {
                values.push(cache.hash_get(PROP_ROWS_HASH, sid).await?);
            }
        }
        rows.extend(chunk.iter().zip(values).map(|(sid, value)| PropRow {
            sid: sid.clone(),
            row: parse_row(value),
        }));
    }
    Ok(RowsResponse {
        rows,
        hmget_fallback,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use cache_system::MemoryCache;
    use serde_json::json;

    #[test]
    fn test_normalize_ids() {
        let ids = normalize_ids(vec![
            json!(" a "),
            json!(42),
            json!("a"),
            json!(""),
            json!(null),
            json!({"x": 1}),
            json!("42"),
        ]);
        assert_eq!(ids, vec!["a", "42"]);
    }

    #[test]
    fn test_ids_are_capped() {
        let input = (0..1500).map(|i| json!(i)).collect();
        assert_eq!(normalize_ids(input).len(), MAX_IDS);
    }

    #[test]
    fn test_sids_take_precedence() {
        let request = RowsRequest::from_body(br#"{"sids": ["s1"], "ids": ["i1"]}"#);
        assert_eq!(request.into_ids(), vec!["s1"]);

        let request = RowsRequest::from_body(br#"{"ids": [7]}"#);
        assert_eq!(request.into_ids(), vec!["7"]);
    }

    #[test]
    fn test_malformed_body_is_empty() {
        assert!(RowsRequest::from_body(b"not json").into_ids().is_empty());
        assert!(RowsRequest::from_body(br#"{"sids": "s1"}"#).into_ids().is_empty());
    }

    #[tokio::test]
    async fn test_rows_follow_request_order_across_chunks() {
        let cache = MemoryCache::new();
        cache
            .hash_set(PROP_ROWS_HASH, "5", CachedValue::raw(r#"{"line": 5}"#))
            .unwrap();
        cache
            .hash_set(PROP_ROWS_HASH, "305", CachedValue::raw("{truncated"))
            .unwrap();

        let ids: Vec<String> = (0..400).map(|i| i.to_string()).collect();
        let response = read(&cache, &ids).await.unwrap();

        assert_eq!(response.rows.len(), 400);
        assert_eq!(response.rows[5].row, json!({"line": 5}));
        assert_eq!(response.rows[305].sid, "305");
        assert_eq!(response.rows[305].row, Value::Null);
        assert_eq!(response.rows[399].row, Value::Null);
        assert!(!response.hmget_fallback);
    }

    #[tokio::test]
    async fn test_short_hmget_reply_falls_back_to_hget() {
        let cache = MemoryCache::new();
        cache
            .hash_set(PROP_ROWS_HASH, "b", CachedValue::raw(r#"{"line": 2}"#))
            .unwrap();
        cache.short_bulk_reads(true);

        let ids = vec!["a".to_string(), "b".to_string()];
        let response = read(&cache, &ids).await.unwrap();

        assert!(response.hmget_fallback);
        assert_eq!(response.rows.len(), 2);
        assert_eq!(response.rows[0].row, Value::Null);
        assert_eq!(response.rows[1].sid, "b");
        assert_eq!(response.rows[1].row, json!({"line": 2}));
        assert!(!serde_json::to_value(&response).unwrap().as_object().unwrap().contains_key("hmget_fallback"));
    }
}
