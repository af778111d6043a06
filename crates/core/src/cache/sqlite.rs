//! SQLite-backed response cache implementation.

use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use super::{CacheError, CachedResponse, ResponseCache};
use crate::finder::Candidate;

/// SQLite-backed response cache.
///
/// Candidate lists are stored as JSON, one row per cache key.
pub struct SqliteCache {
    conn: Mutex<Connection>,
}

impl SqliteCache {
    /// Create a new SQLite cache, creating the database file and table if needed.
    pub fn new(path: &Path) -> Result<Self, CacheError> {
        let conn = Connection::open(path).map_err(|e| CacheError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory SQLite cache (useful for testing).
    pub fn in_memory() -> Result<Self, CacheError> {
        let conn =
            Connection::open_in_memory().map_err(|e| CacheError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn initialize_schema(conn: &Connection) -> Result<(), CacheError> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS response_cache (
                cache_key TEXT PRIMARY KEY,
                candidates TEXT NOT NULL,
                created_at TEXT NOT NULL
            );
            "#,
        )
        .map_err(|e| CacheError::Database(e.to_string()))?;

        Ok(())
    }

    /// Remove all cached entries.
    pub fn clear(&self) -> Result<(), CacheError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| CacheError::Internal(e.to_string()))?;
        conn.execute("DELETE FROM response_cache", [])
            .map_err(|e| CacheError::Database(e.to_string()))?;
        Ok(())
    }
}

impl ResponseCache for SqliteCache {
    fn get(&self, key: &str) -> Result<Option<CachedResponse>, CacheError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| CacheError::Internal(e.to_string()))?;

        let row: Option<(String, String)> = conn
            .query_row(
                "SELECT candidates, created_at FROM response_cache WHERE cache_key = ?",
                params![key],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()
            .map_err(|e| CacheError::Database(e.to_string()))?;

        let Some((candidates_json, created_at_str)) = row else {
            return Ok(None);
        };

        let candidates: Vec<Candidate> = serde_json::from_str(&candidates_json)
            .map_err(|e| CacheError::Serialization(e.to_string()))?;
        let created_at = DateTime::parse_from_rfc3339(&created_at_str)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| CacheError::Serialization(e.to_string()))?;

        Ok(Some(CachedResponse {
            candidates,
            created_at,
        }))
    }

    fn set(&self, key: &str, candidates: &[Candidate]) -> Result<(), CacheError> {
        let candidates_json = serde_json::to_string(candidates)
            .map_err(|e| CacheError::Serialization(e.to_string()))?;
        let now = Utc::now().to_rfc3339();

        let conn = self
            .conn
            .lock()
            .map_err(|e| CacheError::Internal(e.to_string()))?;
        conn.execute(
            "INSERT INTO response_cache (cache_key, candidates, created_at)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(cache_key) DO UPDATE SET
                candidates = excluded.candidates,
                created_at = excluded.created_at",
            params![key, candidates_json, now],
        )
        .map_err(|e| CacheError::Database(e.to_string()))?;

        Ok(())
    }
}
