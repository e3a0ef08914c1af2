//! Mispriced odds
//!
//! The scanner job writes one snapshot under `mispriced_odds:homepage`. There is no
//! source of record to fall back on: a missing snapshot means the job has not run yet.

use crate::keys::CacheKey;
use crate::read_through::{CachedFetch, Payload, ReadThroughError};
use cache_system::{CacheStore, KeyTtl};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

pub const NOT_YET_COMPUTED: &str =
    "Mispriced odds have not been computed yet; the scanner has not populated the cache";
pub const EMPTY_SCAN: &str = "The latest scan found no mispriced selections";
pub const UNDECODABLE: &str = "The cached mispriced odds snapshot could not be decoded";

/// One mispriced selection as produced by the scanner.
///
/// The scanner copies these from upstream odds feeds and may leave any of them out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player_id: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sport_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bet_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub best_sportsbook: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub best_odds: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_odds: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percentage_diff: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sportsbooks_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
    /// Event context (`event_id`, teams, `commence_time`) and anything newer
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The cached scanner output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MispricedOddsSnapshot {
    #[serde(default, deserialize_with = "selections_skipping_invalid")]
    pub selections: Vec<SelectionRecord>,
    #[serde(default)]
    pub generated_at: Option<String>,
    #[serde(default)]
    pub sports_scanned: Vec<String>,
    #[serde(default)]
    pub total_selections: Option<usize>,
}

/// Decode selections one at a time, dropping the ones of the wrong shape
fn selections_skipping_invalid<'de, D>(deserializer: D) -> Result<Vec<SelectionRecord>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Vec::<Value>::deserialize(deserializer)?;
    let total = raw.len();
    let selections: Vec<SelectionRecord> = raw
        .into_iter()
        .filter_map(|value| match serde_json::from_value(value) {
            Ok(selection) => Some(selection),
            Err(err) => {
                warn!(error = %err, "dropping malformed mispriced selection");
                None
            }
        })
        .collect();
    if selections.len() < total {
        warn!(kept = selections.len(), total, "mispriced snapshot had malformed selections");
    }
    Ok(selections)
}

impl MispricedOddsSnapshot {
    pub fn total(&self) -> usize {
        self.total_selections.unwrap_or(self.selections.len())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MispricedOddsResponse {
    pub selections: Vec<SelectionRecord>,
    pub generated_at: Option<String>,
    pub sports_scanned: Vec<String>,
    pub total_selections: usize,
    pub cache_hit: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// The cached text, when it could not be decoded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
}

impl MispricedOddsResponse {
    fn empty(cache_hit: bool, message: &str) -> Self {
        Self {
            selections: Vec::new(),
            generated_at: None,
            sports_scanned: Vec::new(),
            total_selections: 0,
            cache_hit,
            message: Some(message.to_string()),
            raw: None,
        }
    }

    fn from_snapshot(snapshot: MispricedOddsSnapshot) -> Self {
        let total_selections = snapshot.total();
        let message = snapshot.selections.is_empty().then(|| EMPTY_SCAN.to_string());
        Self {
            selections: snapshot.selections,
            generated_at: snapshot.generated_at,
            sports_scanned: snapshot.sports_scanned,
            total_selections,
            cache_hit: true,
            message,
            raw: None,
        }
    }
}

pub async fn read(cache: &dyn CacheStore) -> Result<MispricedOddsResponse, ReadThroughError> {
    let key = CacheKey::mispriced_odds();
    let cached = CachedFetch::<MispricedOddsSnapshot>::new(cache, &key)
        .cached()
        .await?;

    Ok(match cached.map(|fetched| fetched.payload) {
        None => MispricedOddsResponse::empty(false, NOT_YET_COMPUTED),
        Some(Payload::Decoded(snapshot)) => MispricedOddsResponse::from_snapshot(snapshot),
        Some(Payload::Raw(raw)) => MispricedOddsResponse {
            raw: Some(raw),
            ..MispricedOddsResponse::empty(true, UNDECODABLE)
        },
    })
}

/// Cache diagnostics for the snapshot key
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SnapshotStatus {
    pub cache_key: String,
    pub data_found: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_selections: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sports_scanned: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generated_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_ttl_seconds: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_expires_in: Option<String>,
}

pub async fn status(cache: &dyn CacheStore) -> Result<SnapshotStatus, ReadThroughError> {
    let key = CacheKey::mispriced_odds();
    let cached = CachedFetch::<MispricedOddsSnapshot>::new(cache, &key)
        .cached()
        .await?;

    let Some(fetched) = cached else {
        return Ok(SnapshotStatus {
            cache_key: key.to_string(),
            data_found: false,
            message: Some(NOT_YET_COMPUTED.to_string()),
            total_selections: None,
            sports_scanned: None,
            generated_at: None,
            cache_ttl_seconds: None,
            cache_expires_in: None,
        });
    };

    let ttl = cache.ttl(key.as_str()).await?;
    let (total_selections, sports_scanned, generated_at, message) = match fetched.payload {
        Payload::Decoded(snapshot) => (
            Some(snapshot.total()),
            Some(snapshot.sports_scanned),
            snapshot.generated_at,
            None,
        ),
        Payload::Raw(_) => (None, None, None, Some(UNDECODABLE.to_string())),
    };

    Ok(SnapshotStatus {
        cache_key: key.to_string(),
        data_found: true,
        message,
        total_selections,
        sports_scanned,
        generated_at,
        cache_ttl_seconds: Some(match ttl {
            KeyTtl::Expires(seconds) => seconds as i64,
            KeyTtl::Persistent => -1,
            KeyTtl::Missing => -2,
        }),
        cache_expires_in: Some(describe_ttl(ttl)),
    })
}

fn describe_ttl(ttl: KeyTtl) -> String {
    match ttl {
        KeyTtl::Expires(seconds) if seconds > 0 => {
            format!("{} minutes {} seconds", seconds / 60, seconds % 60)
        }
        _ => "Never".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cache_system::MemoryCache;
    use serde_json::json;

    fn snapshot_json() -> Value {
        json!({
            "selections": [{
                "player_id": "abc",
                "player_name": "Jalen Hurts",
                "sport_key": "americanfootball_nfl",
                "market": "player_pass_yds",
                "line": 224.5,
                "bet_type": "over",
                "event_id": "evt1",
                "home_team": "PHI",
                "away_team": "DAL",
                "best_sportsbook": "fanduel",
                "best_odds": 125.0,
                "average_odds": 105.0,
                "percentage_diff": 19.0,
                "sportsbooks_count": 6,
                "value_score": 22.8,
                "last_updated": "2025-01-01T00:00:00Z"
            }],
            "generated_at": "2025-01-01T00:05:00Z",
            "sports_scanned": ["americanfootball_nfl"],
            "total_selections": 1
        })
    }

    #[tokio::test]
    async fn test_missing_snapshot_is_not_yet_computed() {
        let cache = MemoryCache::new();
        let response = read(&cache).await.unwrap();

        assert_eq!(response.total_selections, 0);
        assert!(!response.cache_hit);
        assert_eq!(response.message.as_deref(), Some(NOT_YET_COMPUTED));
    }

    #[tokio::test]
    async fn test_snapshot_is_forwarded() {
        let cache = MemoryCache::new();
        cache
            .set_raw(CacheKey::mispriced_odds().as_str(), snapshot_json().to_string().as_bytes(), Some(900))
            .await
            .unwrap();

        let response = read(&cache).await.unwrap();
        assert!(response.cache_hit);
        assert_eq!(response.total_selections, 1);
        assert!(response.message.is_none());
        assert_eq!(response.selections[0].extra["home_team"], json!("PHI"));
    }

    #[tokio::test]
    async fn test_malformed_snapshot_is_returned_raw() {
        let cache = MemoryCache::new();
        cache
            .set_raw(CacheKey::mispriced_odds().as_str(), b"{\"selections\": [", None)
            .await
            .unwrap();

        let response = read(&cache).await.unwrap();
        assert!(response.cache_hit);
        assert_eq!(response.raw.as_deref(), Some("{\"selections\": ["));
        assert_eq!(response.message.as_deref(), Some(UNDECODABLE));
    }

    #[tokio::test]
    async fn test_total_falls_back_to_selection_count() {
        let mut snapshot = snapshot_json();
        snapshot.as_object_mut().unwrap().remove("total_selections");
        let decoded: MispricedOddsSnapshot = serde_json::from_value(snapshot).unwrap();
        assert_eq!(decoded.total(), 1);
    }

    #[tokio::test]
    async fn test_selection_without_player_name_is_kept() {
        let mut snapshot = snapshot_json();
        snapshot["selections"][0]
            .as_object_mut()
            .unwrap()
            .remove("player_name");
        let cache = MemoryCache::new();
        cache
            .set(CacheKey::mispriced_odds().as_str(), &snapshot, None)
            .await
            .unwrap();

        let response = read(&cache).await.unwrap();
        assert!(response.raw.is_none());
        assert_eq!(response.selections.len(), 1);
        assert_eq!(response.selections[0].player_name, None);
        assert_eq!(response.selections[0].best_sportsbook.as_deref(), Some("fanduel"));
    }

    #[tokio::test]
    async fn test_malformed_selection_does_not_discard_the_rest() {
        let mut snapshot = snapshot_json();
        snapshot["selections"]
            .as_array_mut()
            .unwrap()
            .push(json!({"player_name": "Dak Prescott", "line": "over 250"}));
        let cache = MemoryCache::new();
        cache
            .set(CacheKey::mispriced_odds().as_str(), &snapshot, None)
            .await
            .unwrap();

        let response = read(&cache).await.unwrap();
        assert!(response.message.is_none());
        assert_eq!(response.selections.len(), 1);
        assert_eq!(response.selections[0].player_name.as_deref(), Some("Jalen Hurts"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_status_reports_ttl() {
        let cache = MemoryCache::new();
        cache
            .set(CacheKey::mispriced_odds().as_str(), &snapshot_json(), Some(900))
            .await
            .unwrap();

        let status = status(&cache).await.unwrap();
        assert!(status.data_found);
        assert_eq!(status.total_selections, Some(1));
        assert_eq!(status.cache_expires_in.as_deref(), Some("15 minutes 0 seconds"));
    }

    #[test]
    fn test_describe_ttl() {
        assert_eq!(describe_ttl(KeyTtl::Expires(125)), "2 minutes 5 seconds");
        assert_eq!(describe_ttl(KeyTtl::Persistent), "Never");
    }
}
