//! In-process cache store
//!
//! [`MemoryCache`] implements [`CacheStore`] on plain maps with TTL bookkeeping. It backs
//! the integration tests and local runs without Redis, and can be switched into failure
//! modes to exercise degraded paths.

use crate::errors::CacheError;
use crate::store::{self, CacheStore, KeyTtl};
use crate::value::CachedValue;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::RwLock;
use tokio::time::{Duration, Instant};

#[derive(Debug, Clone)]
struct Entry {
    value: CachedValue,
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.is_none_or(|at| at > now)
    }
}

#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<String, Entry>>,
    hashes: RwLock<HashMap<String, HashMap<String, CachedValue>>>,
    reads_fail: AtomicBool,
    writes_fail: AtomicBool,
    bulk_reads_short: AtomicBool,
    writes: AtomicUsize,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every read fail with a connection error
    pub fn fail_reads(&self, fail: bool) {
        self.reads_fail.store(fail, Ordering::SeqCst);
    }

    /// Make every write fail with a connection error
    pub fn fail_writes(&self, fail: bool) {
        self.writes_fail.store(fail, Ordering::SeqCst);
    }

    /// Make `hash_get_many` answer with an empty reply, as a misbehaving server would
    pub fn short_bulk_reads(&self, short: bool) {
        self.bulk_reads_short.store(short, Ordering::SeqCst);
    }

    /// Number of successful key writes
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Set a hash field
    pub fn hash_set(&self, hash: &str, field: &str, value: CachedValue) -> Result<(), CacheError> {
        self.check_writes()?;
        let mut hashes = self.hashes.write().map_err(lock_error)?;
        hashes
            .entry(hash.to_string())
            .or_default()
            .insert(field.to_string(), value);
        Ok(())
    }

    fn check_reads(&self) -> Result<(), CacheError> {
        if self.reads_fail.load(Ordering::SeqCst) {
            return Err(CacheError::Connection("memory cache reads disabled".into()));
        }
        Ok(())
    }

    fn check_writes(&self) -> Result<(), CacheError> {
        if self.writes_fail.load(Ordering::SeqCst) {
            return Err(CacheError::Connection("memory cache writes disabled".into()));
        }
        Ok(())
    }

    fn insert(&self, key: &str, value: CachedValue, ttl: Option<u64>) -> Result<(), CacheError> {
        self.check_writes()?;
        let expires_at =
            store::expiry(ttl).map(|seconds| Instant::now() + Duration::from_secs(seconds));
        let mut entries = self.entries.write().map_err(lock_error)?;
        entries.insert(key.to_string(), Entry { value, expires_at });
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn live_entry(&self, key: &str) -> Result<Option<Entry>, CacheError> {
        let now = Instant::now();
        let entries = self.entries.read().map_err(lock_error)?;
        Ok(entries.get(key).filter(|entry| entry.is_live(now)).cloned())
    }
}

fn lock_error<T>(_: std::sync::PoisonError<T>) -> CacheError {
    CacheError::General("memory cache lock poisoned".into())
}

#[async_trait]
impl CacheStore for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<CachedValue>, CacheError> {
        self.check_reads()?;
        Ok(self.live_entry(key)?.map(|entry| entry.value))
    }

    async fn set(&self, key: &str, value: &Value, ttl: Option<u64>) -> Result<(), CacheError> {
        self.insert(key, CachedValue::Structured(value.clone()), ttl)
    }

    async fn set_raw(&self, key: &str, value: &[u8], ttl: Option<u64>) -> Result<(), CacheError> {
        self.insert(key, CachedValue::raw(value), ttl)
    }

    async fn hash_get(&self, hash: &str, field: &str) -> Result<Option<CachedValue>, CacheError> {
        self.check_reads()?;
        let hashes = self.hashes.read().map_err(lock_error)?;
        Ok(hashes.get(hash).and_then(|fields| fields.get(field)).cloned())
    }

    async fn hash_get_many(
        &self,
        hash: &str,
        fields: &[String],
    ) -> Result<Vec<Option<CachedValue>>, CacheError> {
        self.check_reads()?;
        if self.bulk_reads_short.load(Ordering::SeqCst) {
            return Ok(Vec::new());
        }
        let hashes = self.hashes.read().map_err(lock_error)?;
        let stored = hashes.get(hash);
        Ok(fields
            .iter()
            .map(|field| stored.and_then(|values| values.get(field)).cloned())
            .collect())
    }

    async fn ttl(&self, key: &str) -> Result<KeyTtl, CacheError> {
        self.check_reads()?;
        let now = Instant::now();
        Ok(match self.live_entry(key)? {
            None => KeyTtl::Missing,
            Some(Entry {
                expires_at: None, ..
            }) => KeyTtl::Persistent,
            Some(Entry {
                expires_at: Some(at),
                ..
            }) => KeyTtl::Expires(at.saturating_duration_since(now).as_secs()),
        })
    }

    async fn delete(&self, key: &str) -> Result<bool, CacheError> {
        self.check_writes()?;
        let now = Instant::now();
        let mut entries = self.entries.write().map_err(lock_error)?;
        Ok(entries.remove(key).is_some_and(|entry| entry.is_live(now)))
    }

    async fn ping(&self) -> Result<String, CacheError> {
        self.check_reads()?;
        Ok("PONG".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_set_then_get_structured() {
        let cache = MemoryCache::new();
        cache.set("k", &json!([1, 2]), None).await.unwrap();

        let value = cache.get("k").await.unwrap();
        assert_eq!(value, Some(CachedValue::Structured(json!([1, 2]))));
        assert_eq!(cache.write_count(), 1);
    }

    #[tokio::test]
    async fn test_missing_key_is_none() {
        let cache = MemoryCache::new();
        assert_eq!(cache.get("absent").await.unwrap(), None);
        assert_eq!(cache.ttl("absent").await.unwrap(), KeyTtl::Missing);
    }

    #[tokio::test(start_paused = true)]
    async fn test_entries_expire() {
        let cache = MemoryCache::new();
        cache.set_raw("k", b"v", Some(10)).await.unwrap();
        assert_eq!(cache.ttl("k").await.unwrap(), KeyTtl::Expires(10));

        tokio::time::advance(Duration::from_secs(11)).await;
        assert_eq!(cache.get("k").await.unwrap(), None);
        assert_eq!(cache.ttl("k").await.unwrap(), KeyTtl::Missing);
    }

    #[tokio::test]
    async fn test_no_ttl_is_persistent() {
        let cache = MemoryCache::new();
        cache.set_raw("k", b"v", None).await.unwrap();
        assert_eq!(cache.ttl("k").await.unwrap(), KeyTtl::Persistent);
    }

    #[tokio::test]
    async fn test_hash_get_many_is_aligned() {
        let cache = MemoryCache::new();
        cache.hash_set("h", "a", CachedValue::raw("1")).unwrap();
        cache.hash_set("h", "c", CachedValue::raw("3")).unwrap();

        let fields = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let values = cache.hash_get_many("h", &fields).await.unwrap();
        assert_eq!(
            values,
            vec![Some(CachedValue::raw("1")), None, Some(CachedValue::raw("3"))]
        );
    }

    #[tokio::test]
    async fn test_failure_modes() {
        let cache = MemoryCache::new();
        cache.fail_writes(true);
        assert!(cache.set("k", &json!(1), None).await.is_err());
        assert_eq!(cache.write_count(), 0);

        cache.fail_reads(true);
        assert!(cache.get("k").await.is_err());
        assert!(cache.ping().await.is_err());
    }

    #[tokio::test]
    async fn test_delete_reports_existence() {
        let cache = MemoryCache::new();
        cache.set_raw("k", b"v", None).await.unwrap();
        assert!(cache.delete("k").await.unwrap());
        assert!(!cache.delete("k").await.unwrap());
    }
}
