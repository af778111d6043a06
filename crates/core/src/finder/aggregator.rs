//! Fan-out aggregation across all configured magnet finders.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::metrics::{BACKEND_DURATION, BACKEND_OUTCOMES, CANDIDATES_RETURNED};

use super::dedup::deduplicate_candidates;
use super::{BackendFailure, Candidate, FinderError, LookupError, LookupRequest, MagnetFinder};

/// Default per-backend time budget.
pub const DEFAULT_BACKEND_TIMEOUT: Duration = Duration::from_secs(5);

/// What a single backend produced for one lookup.
#[derive(Debug)]
enum Outcome {
    Success(Vec<Candidate>),
    Failed(FinderError),
    TimedOut,
    Cancelled,
}

impl Outcome {
    fn label(&self) -> &'static str {
        match self {
            Outcome::Success(_) => "success",
            Outcome::Failed(_) => "error",
            Outcome::TimedOut => "timeout",
            Outcome::Cancelled => "cancelled",
        }
    }
}

/// Queries every configured backend concurrently and merges their results.
///
/// Each backend gets the same fixed time budget. A backend that runs out of
/// time contributes nothing but is not counted as a failure; the lookup only
/// fails when every backend reports an error. Merged candidates keep
/// backend registration order and are deduplicated by info hash.
pub struct Aggregator {
    finders: Vec<Arc<dyn MagnetFinder>>,
    timeout: Duration,
}

impl Aggregator {
    pub fn new(finders: Vec<Arc<dyn MagnetFinder>>, timeout: Duration) -> Self {
        if finders.is_empty() {
            warn!("Aggregator created without backends, lookups will return no candidates");
        }
        Self { finders, timeout }
    }

    /// Per-backend time budget.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Names of the registered backends, in registration order.
    pub fn backend_names(&self) -> Vec<String> {
        self.finders.iter().map(|f| f.name().to_string()).collect()
    }

    pub async fn find_movie(
        &self,
        imdb_id: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<Candidate>, LookupError> {
        self.find(&LookupRequest::movie(imdb_id), cancel).await
    }

    pub async fn find_episode(
        &self,
        imdb_id: &str,
        season: u32,
        episode: u32,
        cancel: &CancellationToken,
    ) -> Result<Vec<Candidate>, LookupError> {
        self.find(&LookupRequest::episode(imdb_id, season, episode), cancel)
            .await
    }

    /// Run a lookup against all backends.
    ///
    /// Returns once every backend has answered, failed or timed out, or as
    /// soon as `cancel` fires. Cancellation wins over every other outcome.
    pub async fn find(
        &self,
        request: &LookupRequest,
        cancel: &CancellationToken,
    ) -> Result<Vec<Candidate>, LookupError> {
        let start = Instant::now();

        debug!(
            kind = request.kind(),
            id = %request.cache_id(),
            backends = self.finders.len(),
            "Starting fan-out lookup"
        );

        // join_all yields outcomes in registration order regardless of
        // completion order.
        let lookups = self
            .finders
            .iter()
            .map(|finder| self.query_backend(finder.as_ref(), request, cancel));
        let outcomes = futures::future::join_all(lookups).await;

        if cancel.is_cancelled() {
            debug!(id = %request.cache_id(), "Lookup cancelled");
            return Err(LookupError::Cancelled);
        }

        let mut merged: Vec<Candidate> = Vec::new();
        let mut failures: Vec<BackendFailure> = Vec::new();
        let mut dedup_required = false;

        for (finder, outcome) in self.finders.iter().zip(outcomes) {
            match outcome {
                Outcome::Success(mut candidates) => {
                    // Cross-backend duplicates are only possible once a second
                    // backend contributes a non-empty list.
                    if !merged.is_empty() && !candidates.is_empty() {
                        dedup_required = true;
                    }
                    merged.append(&mut candidates);
                }
                Outcome::Failed(error) => failures.push(BackendFailure {
                    backend: finder.name().to_string(),
                    error,
                }),
                Outcome::TimedOut => {}
                Outcome::Cancelled => return Err(LookupError::Cancelled),
            }
        }

        if !self.finders.is_empty() && failures.len() == self.finders.len() {
            return Err(LookupError::AllBackendsFailed(failures));
        }

        let candidates = if dedup_required {
            deduplicate_candidates(merged)
        } else {
            merged
        };

        CANDIDATES_RETURNED
            .with_label_values(&[request.kind()])
            .observe(candidates.len() as f64);

        debug!(
            id = %request.cache_id(),
            results = candidates.len(),
            failed = failures.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Lookup complete"
        );

        Ok(candidates)
    }

    /// Query one backend, racing it against the time budget and cancellation.
    async fn query_backend(
        &self,
        finder: &dyn MagnetFinder,
        request: &LookupRequest,
        cancel: &CancellationToken,
    ) -> Outcome {
        let start = Instant::now();
        let call = async {
            match request {
                LookupRequest::Movie { imdb_id } => finder.find_movie(imdb_id).await,
                LookupRequest::Episode {
                    imdb_id,
                    season,
                    episode,
                } => finder.find_episode(imdb_id, *season, *episode).await,
            }
        };

        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => Outcome::Cancelled,
            result = tokio::time::timeout(self.timeout, call) => match result {
                Ok(Ok(candidates)) => Outcome::Success(candidates),
                Ok(Err(e)) => {
                    warn!(backend = finder.name(), error = %e, "Backend lookup failed");
                    Outcome::Failed(e)
                }
                Err(_) => {
                    debug!(
                        backend = finder.name(),
                        timeout_ms = self.timeout.as_millis() as u64,
                        "Backend timed out, treating as empty"
                    );
                    Outcome::TimedOut
                }
            },
        };

        BACKEND_OUTCOMES
            .with_label_values(&[finder.name(), outcome.label()])
            .inc();
        BACKEND_DURATION
            .with_label_values(&[finder.name()])
            .observe(start.elapsed().as_secs_f64());

        outcome
    }
}
