//! Alternate lines for one prop family, keyed by stable id (sid)

use crate::keys::CacheKey;
use crate::read_through::{CachedFetch, Fetched, Payload, ReadThroughError};
use cache_system::CacheStore;
use config::DatasetConfig;
use record_source::SourceOfRecord;
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlternatesResponse {
    /// The family document, `null` when the sid is unknown
    pub family: Value,
}

impl AlternatesResponse {
    pub fn from_fetched(fetched: Fetched<Option<Value>>) -> Self {
        let family = match fetched.payload {
            Payload::Decoded(family) => family.unwrap_or(Value::Null),
            Payload::Raw(raw) => Value::String(raw),
        };
        Self { family }
    }
}

/// Returns `None` when `sid` is blank
pub fn normalize_sid(sid: Option<&str>) -> Option<&str> {
    sid.map(str::trim).filter(|s| !s.is_empty())
}

/// Read one family. Unknown sids are cached as `null` so repeat lookups stay off the
/// database until the entry expires.
pub async fn read(
    cache: &dyn CacheStore,
    source: &dyn SourceOfRecord,
    policy: &DatasetConfig,
    sid: &str,
) -> Result<Fetched<Option<Value>>, ReadThroughError> {
    let key = CacheKey::alternates(sid);
    CachedFetch::new(cache, &key)
        .ttl(policy.alternates_ttl_seconds)
        .get_or_fetch(|| {
            source.select_by_id(&policy.alternates_table, &policy.alternates_id_column, sid)
        })
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::read_through::Origin;
    use serde_json::json;

    #[test]
    fn test_blank_sid_is_rejected() {
        assert_eq!(normalize_sid(None), None);
        assert_eq!(normalize_sid(Some("   ")), None);
        assert_eq!(normalize_sid(Some(" abc ")), Some("abc"));
    }

    #[test]
    fn test_unknown_family_is_null() {
        let response = AlternatesResponse::from_fetched(Fetched {
            payload: Payload::Decoded(None),
            origin: Origin::Source,
        });
        assert_eq!(serde_json::to_value(&response).unwrap(), json!({"family": null}));
    }

    #[test]
    fn test_raw_family_is_text() {
        let response = AlternatesResponse::from_fetched(Fetched {
            payload: Payload::Raw("{broken".to_string()),
            origin: Origin::Cache,
        });
        assert_eq!(response.family, json!("{broken"));
    }
}
