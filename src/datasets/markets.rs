//! Prop market list per sport
//!
//! Lookup order: the per-sport cache key, then the market index hash (back-filling the
//! cache key), then a static list. Neither layer being reachable still yields markets.

use crate::keys::{self, CacheKey, MARKETS_INDEX_HASH};
use crate::read_through::{CachedFetch, Payload};
use cache_system::CacheStore;
use config::DatasetConfig;
use serde::Serialize;
use tracing::warn;

/// Sport used when the request names none
pub const DEFAULT_SPORT: &str = "all";

pub const FALLBACK_MARKETS: [&str; 10] = [
    "passing_yards",
    "rushing_yards",
    "receiving_yards",
    "receptions",
    "points",
    "rebounds",
    "assists",
    "spread",
    "moneyline",
    "total_points",
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketsResponse {
    pub markets: Vec<String>,
}

/// Where the market list came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarketsOrigin {
    Cache,
    Index,
    Fallback,
}

pub fn fallback_markets() -> Vec<String> {
    FALLBACK_MARKETS.iter().map(|m| m.to_string()).collect()
}

pub async fn read(
    cache: &dyn CacheStore,
    sport: Option<&str>,
    policy: &DatasetConfig,
) -> (MarketsResponse, MarketsOrigin) {
    let sport = sport
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_SPORT);
    let key = CacheKey::markets(sport);
    let fetch = CachedFetch::<Vec<String>>::new(cache, &key).ttl(policy.markets_ttl_seconds);

    match fetch.cached().await {
        Ok(Some(fetched)) => {
            if let Payload::Decoded(markets) = fetched.payload {
                if !markets.is_empty() {
                    return (MarketsResponse { markets }, MarketsOrigin::Cache);
                }
            }
        }
        Ok(None) => {}
        Err(err) => {
            warn!(key = %key, error = %err, "market cache unavailable");
        }
    }

    match cache
        .hash_get(MARKETS_INDEX_HASH, &keys::sport_field(sport))
        .await
    {
        Ok(Some(value)) => match value.decode::<Vec<String>>() {
            Ok(markets) if !markets.is_empty() => {
                fetch.populate(&markets).await;
                return (MarketsResponse { markets }, MarketsOrigin::Index);
            }
            Ok(_) => {}
            Err(mismatch) => {
                warn!(sport, error = %mismatch, "market index entry is not a list");
            }
        },
        Ok(None) => {}
        Err(err) => {
            warn!(sport, error = %err, "market index unavailable");
        }
    }

    (
        MarketsResponse {
            markets: fallback_markets(),
        },
        MarketsOrigin::Fallback,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use cache_system::{CachedValue, MemoryCache};
    use serde_json::json;

    #[tokio::test]
    async fn test_empty_cache_and_index_fall_back() {
        let cache = MemoryCache::new();
        let (response, origin) = read(&cache, None, &DatasetConfig::default()).await;

        assert_eq!(origin, MarketsOrigin::Fallback);
        assert_eq!(response.markets, fallback_markets());
    }

    #[tokio::test]
    async fn test_index_backfills_cache() {
        let cache = MemoryCache::new();
        cache
            .hash_set(MARKETS_INDEX_HASH, "nba", CachedValue::raw(r#"["points","assists"]"#))
            .unwrap();

        let (response, origin) = read(&cache, Some("NBA"), &DatasetConfig::default()).await;
        assert_eq!(origin, MarketsOrigin::Index);
        assert_eq!(response.markets, vec!["points", "assists"]);
        assert_eq!(
            cache.get("props:markets:nba").await.unwrap(),
            Some(CachedValue::Structured(json!(["points", "assists"])))
        );

        let (_, origin) = read(&cache, Some("nba"), &DatasetConfig::default()).await;
        assert_eq!(origin, MarketsOrigin::Cache);
    }

    #[tokio::test]
    async fn test_unreachable_cache_falls_back() {
        let cache = MemoryCache::new();
        cache.fail_reads(true);

        let (response, origin) = read(&cache, Some("nfl"), &DatasetConfig::default()).await;
        assert_eq!(origin, MarketsOrigin::Fallback);
        assert_eq!(response.markets.len(), 10);
    }

    #[tokio::test]
    async fn test_malformed_cache_entry_falls_through() {
        let cache = MemoryCache::new();
        cache.set_raw("props:markets:nfl", b"garbage", None).await.unwrap();

        let (_, origin) = read(&cache, Some("nfl"), &DatasetConfig::default()).await;
        assert_eq!(origin, MarketsOrigin::Fallback);
    }
}
