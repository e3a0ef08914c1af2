//! Cache key policy
//!
//! Every dataset owns one namespace prefix and embeds its parameters positionally after
//! it, `:`-separated. Keys are a pure function of the logical request. Parameter
//! segments are trimmed and `%`/`:` are percent-escaped, so distinct parameters can never
//! produce the same key.

use std::fmt;

/// Hash holding the per-sport market index, one field per sport
pub const MARKETS_INDEX_HASH: &str = "props:markets_index";

/// Hash holding primary prop rows, one field per selection id
pub const PROP_ROWS_HASH: &str = "props:rows:prim";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Build a key from a dataset namespace and its parameters
    pub fn build(dataset: Dataset, params: &[&str]) -> Self {
        let mut key = dataset.namespace().to_string();
        for param in params {
            key.push(':');
            key.push_str(&escape_segment(&dataset.normalize(param)));
        }
        Self(key)
    }

    /// Use a caller-supplied key verbatim
    pub fn raw(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn hit_streaks() -> Self {
        Self::build(Dataset::HitStreaks, &[])
    }

    pub fn mispriced_odds() -> Self {
        Self::build(Dataset::MispricedOdds, &[])
    }

    pub fn top_ev() -> Self {
        Self::build(Dataset::TopEv, &[])
    }

    pub fn markets(sport: &str) -> Self {
        Self::build(Dataset::Markets, &[sport])
    }

    pub fn alternates(sid: &str) -> Self {
        Self::build(Dataset::Alternates, &[sid])
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CacheKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Logical datasets served through the cache
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dataset {
    HitStreaks,
    MispricedOdds,
    TopEv,
    Markets,
    Alternates,
}

impl Dataset {
    /// Namespace prefix shared with the external producers that write these keys
    pub const fn namespace(self) -> &'static str {
        match self {
            Dataset::HitStreaks => "hit_sheets:hit_streaks",
            Dataset::MispricedOdds => "mispriced_odds:homepage",
            Dataset::TopEv => "landing:top_ev",
            Dataset::Markets => "props:markets",
            Dataset::Alternates => "props:alt",
        }
    }

    /// Sports are case-insensitive; selection ids are opaque and keep their case
    fn normalize(self, param: &str) -> String {
        let trimmed = param.trim();
        match self {
            Dataset::Alternates => trimmed.to_string(),
            _ => trimmed.to_ascii_lowercase(),
        }
    }
}

/// Normalize a sport parameter the same way market keys do
pub fn sport_field(sport: &str) -> String {
    escape_segment(&Dataset::Markets.normalize(sport))
}

fn escape_segment(segment: &str) -> String {
    let mut escaped = String::with_capacity(segment.len());
    for c in segment.chars() {
        match c {
            '%' => escaped.push_str("%25"),
            ':' => escaped.push_str("%3A"),
            other => escaped.push(other),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_fixed_keys_match_producers() {
        assert_eq!(CacheKey::hit_streaks().as_str(), "hit_sheets:hit_streaks");
        assert_eq!(CacheKey::mispriced_odds().as_str(), "mispriced_odds:homepage");
        assert_eq!(CacheKey::top_ev().as_str(), "landing:top_ev");
    }

    #[test]
    fn test_parameters_are_positional() {
        assert_eq!(CacheKey::markets("nfl").as_str(), "props:markets:nfl");
        assert_eq!(CacheKey::alternates("abc123").as_str(), "props:alt:abc123");
    }

    #[test]
    fn test_same_request_same_key() {
        assert_eq!(CacheKey::markets(" NFL "), CacheKey::markets("nfl"));
        assert_eq!(CacheKey::alternates("sid-1"), CacheKey::alternates("sid-1"));
    }

    #[test]
    fn test_selection_ids_keep_case() {
        assert_ne!(CacheKey::alternates("AbC"), CacheKey::alternates("abc"));
    }

    #[test]
    fn test_separator_in_parameter_cannot_collide() {
        let nested = CacheKey::build(Dataset::Alternates, &["a:b"]);
        let split = CacheKey::build(Dataset::Alternates, &["a", "b"]);
        assert_ne!(nested, split);
        assert_eq!(nested.as_str(), "props:alt:a%3Ab");

        let literal = CacheKey::build(Dataset::Alternates, &["a%3Ab"]);
        assert_ne!(literal, nested);
    }

    #[test]
    fn test_datasets_do_not_share_keys() {
        let keys: HashSet<CacheKey> = [
            CacheKey::hit_streaks(),
            CacheKey::mispriced_odds(),
            CacheKey::top_ev(),
            CacheKey::markets("alt"),
            CacheKey::alternates("markets"),
            CacheKey::raw(MARKETS_INDEX_HASH),
            CacheKey::raw(PROP_ROWS_HASH),
        ]
        .into_iter()
        .collect();
        assert_eq!(keys.len(), 7);
    }

    #[test]
    fn test_sport_field_matches_key_segment() {
        assert_eq!(sport_field(" NBA "), "nba");
        assert_eq!(CacheKey::markets(" NBA ").as_str(), format!("props:markets:{}", sport_field(" NBA ")));
    }
}
