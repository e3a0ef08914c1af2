//! Hit streaks, sourced from the `get_hit_streaks` database function

use crate::keys::CacheKey;
use crate::read_through::{CachedFetch, Fetched, ReadThroughError};
use cache_system::CacheStore;
use config::DatasetConfig;
use record_source::{SourceError, SourceOfRecord};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One row of the hit-streak function, kept exactly as Postgres produced it.
///
/// Identity and streak fields (`id`, `player_id`, `full_name`, `streak_length`, odds,
/// timestamps) may be null in `to_jsonb` output, so no field is required.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HitStreakRecord(pub Map<String, Value>);

pub async fn read(
    cache: &dyn CacheStore,
    source: &dyn SourceOfRecord,
    policy: &DatasetConfig,
) -> Result<Fetched<Vec<HitStreakRecord>>, ReadThroughError> {
    let key = CacheKey::hit_streaks();
    CachedFetch::new(cache, &key)
        .ttl(policy.hit_streaks_ttl_seconds)
        .get_or_fetch(|| fetch_from_source(source, &policy.hit_streaks_rpc))
        .await
}

async fn fetch_from_source(
    source: &dyn SourceOfRecord,
    function: &str,
) -> Result<Vec<HitStreakRecord>, SourceError> {
    let rows = source.rpc(function, &[]).await?;
    serde_json::from_value(Value::Array(rows)).map_err(|e| {
        SourceError::upstream(format!("{} returned rows of an unexpected shape: {}", function, e))
    })
}
