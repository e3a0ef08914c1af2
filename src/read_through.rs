//! Read-through cache access
//!
//! [`CachedFetch`] is the one place that decides hit versus miss: it reads the cache,
//! decodes what it finds (falling back to the raw text when decoding fails), and on a
//! miss calls the source of record once and writes the result back.

use crate::keys::CacheKey;
use cache_system::{CacheError, CacheStore, CachedValue, DecodeMismatch};
use record_source::SourceError;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::future::Future;
use thiserror::Error;
use tracing::warn;

/// Turns a cached value into `T`
pub type Decoder<T> = fn(&CachedValue) -> Result<T, DecodeMismatch>;

#[derive(Debug, Error)]
pub enum ReadThroughError {
    #[error("cache backend unavailable: {0}")]
    Cache(#[from] CacheError),

    #[error("source of record unavailable: {0}")]
    Source(#[from] SourceError),
}

/// A value as served: decoded, or the raw cached text when decoding failed
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Payload<T> {
    Decoded(T),
    Raw(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    Cache,
    Source,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Fetched<T> {
    pub payload: Payload<T>,
    pub origin: Origin,
}

impl<T> Fetched<T> {
    pub fn cache_hit(&self) -> bool {
        self.origin == Origin::Cache
    }
}

/// Cache-aside access to one key
pub struct CachedFetch<'a, T> {
    cache: &'a dyn CacheStore,
    key: &'a CacheKey,
    ttl: Option<u64>,
    decode: Decoder<T>,
}

impl<'a, T> CachedFetch<'a, T>
where
    T: DeserializeOwned + Serialize,
{
    /// Access `key` with JSON decoding; back-filled entries never expire unless
    /// [`CachedFetch::ttl`] is set
    pub fn new(cache: &'a dyn CacheStore, key: &'a CacheKey) -> Self {
        Self {
            cache,
            key,
            ttl: None,
            decode: CachedValue::decode::<T>,
        }
    }

    /// Expiry, in seconds, for back-filled entries
    pub fn ttl(mut self, ttl: u64) -> Self {
        self.ttl = Some(ttl);
        self
    }

    pub fn decode_with(mut self, decode: Decoder<T>) -> Self {
        self.decode = decode;
        self
    }

    fn decode_entry(&self, value: CachedValue) -> Payload<T> {
        match (self.decode)(&value) {
            Ok(decoded) => Payload::Decoded(decoded),
            Err(mismatch) => {
                warn!(key = %self.key, error = %mismatch, "serving undecodable cache entry raw");
                Payload::Raw(value.as_text().into_owned())
            }
        }
    }

    /// Cache-only lookup; `Ok(None)` is a miss
    pub async fn cached(&self) -> Result<Option<Fetched<T>>, ReadThroughError> {
        let entry = self.cache.get(self.key.as_str()).await?;
        trace_log!(key = %self.key, hit = entry.is_some(), "cache lookup");
        Ok(entry.map(|value| Fetched {
            payload: self.decode_entry(value),
            origin: Origin::Cache,
        }))
    }

    /// Serve from cache or fetch from the source of record and back-fill.
    ///
    /// A cache read failure counts as a miss. A source failure is returned as-is and
    /// nothing is written.
    pub async fn get_or_fetch<F, Fut>(&self, fetch: F) -> Result<Fetched<T>, ReadThroughError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, SourceError>>,
    {
        match self.cache.get(self.key.as_str()).await {
            Ok(Some(value)) => {
                debug_log!(key = %self.key, "cache hit");
                return Ok(Fetched {
                    payload: self.decode_entry(value),
                    origin: Origin::Cache,
                });
            }
            Ok(None) => {
                debug_log!(key = %self.key, "cache miss");
            }
            Err(err) => {
                warn!(key = %self.key, error = %err, "cache read failed, querying source of record");
            }
        }

        let value = fetch().await?;
        self.populate(&value).await;

        Ok(Fetched {
            payload: Payload::Decoded(value),
            origin: Origin::Source,
        })
    }

    /// Write `value` under this key. Failures are logged, never returned: the caller
    /// already holds the value it is serving.
    pub async fn populate(&self, value: &T) {
        let json = match serde_json::to_value(value) {
            Ok(json) => json,
            Err(err) => {
                warn!(key = %self.key, error = %err, "could not serialize value for cache");
                return;
            }
        };

        match self.cache.set(self.key.as_str(), &json, self.ttl).await {
            Ok(()) => {
                debug_log!(key = %self.key, ttl = ?self.ttl, "cache populated");
            }
            Err(err) => {
                warn!(key = %self.key, error = %err, "cache write failed");
            }
        }
    }
}
