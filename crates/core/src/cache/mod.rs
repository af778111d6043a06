//! Response cache - memoizes a backend's candidate list per query.
//!
//! The cache only stores entries with their creation time. Deciding whether
//! an entry is still fresh enough to use is up to the backend.

mod memory;
mod sqlite;

pub use memory::{MemoryCache, NoopCache};
pub use sqlite::SqliteCache;

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::finder::Candidate;

/// A cached candidate list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedResponse {
    pub candidates: Vec<Candidate>,
    pub created_at: DateTime<Utc>,
}

impl CachedResponse {
    /// Whether the entry is at most `max_age` old.
    pub fn is_fresh(&self, max_age: Duration) -> bool {
        self.is_fresh_at(Utc::now(), max_age)
    }

    fn is_fresh_at(&self, now: DateTime<Utc>, max_age: Duration) -> bool {
        match chrono::Duration::from_std(max_age) {
            Ok(max_age) => now.signed_duration_since(self.created_at) <= max_age,
            // Larger than chrono can represent, never stale.
            Err(_) => true,
        }
    }
}

/// Errors for cache operations.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Trait for response cache storage.
pub trait ResponseCache: Send + Sync {
    /// Look up a cached response.
    fn get(&self, key: &str) -> Result<Option<CachedResponse>, CacheError>;

    /// Store a response, replacing any previous entry for the key.
    fn set(&self, key: &str, candidates: &[Candidate]) -> Result<(), CacheError>;
}
