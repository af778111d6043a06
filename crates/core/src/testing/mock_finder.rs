//! Mock magnet finder for testing.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::finder::{Candidate, FinderError, LookupRequest, MagnetFinder};

/// Mock implementation of the MagnetFinder trait.
///
/// Provides controllable behavior for testing:
/// - Return configurable candidates
/// - Track lookups for assertions
/// - Simulate failures and slow backends
///
/// # Example
///
/// ```rust,ignore
/// use magnetar_core::testing::{MockFinder, fixtures};
///
/// let finder = MockFinder::named("fast");
/// finder.set_results(fixtures::candidates(&["h1", "h2"])).await;
/// finder.set_delay(Duration::from_millis(100)).await;
///
/// let results = finder.find_movie("tt0133093").await?;
/// assert_eq!(results.len(), 2);
/// assert_eq!(finder.call_count().await, 1);
/// ```
#[derive(Debug)]
pub struct MockFinder {
    name: String,
    /// Configured candidates to return.
    results: Arc<RwLock<Vec<Candidate>>>,
    /// Recorded lookups.
    calls: Arc<RwLock<Vec<LookupRequest>>>,
    /// If set, every lookup fails with this message.
    error: Arc<RwLock<Option<String>>>,
    /// Simulated response latency.
    delay: Arc<RwLock<Option<Duration>>>,
}

impl Default for MockFinder {
    fn default() -> Self {
        Self::new()
    }
}

impl MockFinder {
    /// Create a mock finder called "mock" with no results.
    pub fn new() -> Self {
        Self::named("mock")
    }

    /// Create a mock finder with the given backend name.
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            results: Arc::new(RwLock::new(Vec::new())),
            calls: Arc::new(RwLock::new(Vec::new())),
            error: Arc::new(RwLock::new(None)),
            delay: Arc::new(RwLock::new(None)),
        }
    }

    /// Set the candidates to return for subsequent lookups.
    pub async fn set_results(&self, results: Vec<Candidate>) {
        *self.results.write().await = results;
    }

    /// Make every subsequent lookup fail with an API error.
    pub async fn set_error(&self, message: &str) {
        *self.error.write().await = Some(message.to_string());
    }

    /// Clear any configured error.
    pub async fn clear_error(&self) {
        *self.error.write().await = None;
    }

    /// Delay every response by the given duration.
    pub async fn set_delay(&self, delay: Duration) {
        *self.delay.write().await = Some(delay);
    }

    /// Get recorded lookups.
    pub async fn recorded_calls(&self) -> Vec<LookupRequest> {
        self.calls.read().await.clone()
    }

    /// Get the number of lookups performed.
    pub async fn call_count(&self) -> usize {
        self.calls.read().await.len()
    }

    async fn respond(&self, request: LookupRequest) -> Result<Vec<Candidate>, FinderError> {
        self.calls.write().await.push(request);

        let delay = *self.delay.read().await;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(message) = self.error.read().await.clone() {
            return Err(FinderError::ApiError(message));
        }

        Ok(self.results.read().await.clone())
    }
}

#[async_trait]
impl MagnetFinder for MockFinder {
    fn name(&self) -> &str {
        &self.name
    }

    async fn find_movie(&self, imdb_id: &str) -> Result<Vec<Candidate>, FinderError> {
        self.respond(LookupRequest::movie(imdb_id)).await
    }

    async fn find_episode(
        &self,
        imdb_id: &str,
        season: u32,
        episode: u32,
    ) -> Result<Vec<Candidate>, FinderError> {
        self.respond(LookupRequest::episode(imdb_id, season, episode))
            .await
    }
}
