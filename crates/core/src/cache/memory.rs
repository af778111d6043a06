//! In-process cache implementations.

use std::collections::HashMap;
use std::sync::RwLock;
use std::time::Duration;

use chrono::Utc;

use super::{CacheError, CachedResponse, ResponseCache};
use crate::finder::Candidate;

/// Cache backed by a map, lost on restart.
///
/// Without a max age the map keeps every key it has seen.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<String, CachedResponse>>,
    max_age: Option<Duration>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cache that drops entries older than `max_age` whenever a new one is stored.
    pub fn with_max_age(max_age: Duration) -> Self {
        Self {
            entries: RwLock::default(),
            max_age: Some(max_age),
        }
    }

    /// Number of cached keys.
    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ResponseCache for MemoryCache {
    fn get(&self, key: &str) -> Result<Option<CachedResponse>, CacheError> {
        let entries = self
            .entries
            .read()
            .map_err(|e| CacheError::Internal(e.to_string()))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, candidates: &[Candidate]) -> Result<(), CacheError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| CacheError::Internal(e.to_string()))?;
        if let Some(max_age) = self.max_age {
            entries.retain(|_, entry| entry.is_fresh(max_age));
        }
        entries.insert(
            key.to_string(),
            CachedResponse {
                candidates: candidates.to_vec(),
                created_at: Utc::now(),
            },
        );
        Ok(())
    }
}

/// Cache that never stores anything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopCache;

impl ResponseCache for NoopCache {
    fn get(&self, _key: &str) -> Result<Option<CachedResponse>, CacheError> {
        Ok(None)
    }

    fn set(&self, _key: &str, _candidates: &[Candidate]) -> Result<(), CacheError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures;

    #[test]
    fn test_memory_cache_miss() {
        let cache = MemoryCache::new();
        assert!(cache.get("missing").unwrap().is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_memory_cache_set_then_get() {
        let cache = MemoryCache::new();
        cache
            .set("tt1-TPB", &fixtures::candidates(&["h1", "h2"]))
            .unwrap();

        let entry = cache.get("tt1-TPB").unwrap().unwrap();
        assert_eq!(entry.candidates.len(), 2);
        assert_eq!(entry.candidates[0].info_hash, "h1");
        assert!(entry.created_at <= Utc::now());
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_memory_cache_overwrites() {
        let cache = MemoryCache::new();
        cache.set("key", &fixtures::candidates(&["h1"])).unwrap();
        cache.set("key", &fixtures::candidates(&["h2", "h3"])).unwrap();

        let entry = cache.get("key").unwrap().unwrap();
        assert_eq!(entry.candidates.len(), 2);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_memory_cache_evicts_stale_entries_on_set() {
        let cache = MemoryCache::with_max_age(Duration::from_secs(60));
        cache.entries.write().unwrap().insert(
            "old".to_string(),
            CachedResponse {
                candidates: fixtures::candidates(&["h0"]),
                created_at: Utc::now() - chrono::Duration::hours(1),
            },
        );
        cache.set("recent", &fixtures::candidates(&["h1"])).unwrap();

        cache.set("new", &fixtures::candidates(&["h2"])).unwrap();

        assert!(cache.get("old").unwrap().is_none());
        assert!(cache.get("recent").unwrap().is_some());
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_memory_cache_without_max_age_keeps_stale_entries() {
        let cache = MemoryCache::new();
        cache.entries.write().unwrap().insert(
            "old".to_string(),
            CachedResponse {
                candidates: fixtures::candidates(&["h0"]),
                created_at: Utc::now() - chrono::Duration::days(30),
            },
        );

        cache.set("new", &fixtures::candidates(&["h1"])).unwrap();

        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_noop_cache_never_hits() {
        let cache = NoopCache;
        cache.set("key", &fixtures::candidates(&["h1"])).unwrap();
        assert!(cache.get("key").unwrap().is_none());
    }
}
