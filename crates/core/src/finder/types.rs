//! Types for the magnet finder system.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A torrent discovered by a backend for a movie or episode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    /// Raw torrent name as reported by the backend.
    pub name: String,
    /// Canonical media title (from the metadata provider).
    pub title: String,
    /// Normalized quality tag, e.g. "1080p 10bit".
    pub quality: String,
    /// Info hash (lowercase hex) - used for deduplication.
    /// Empty string if unknown.
    pub info_hash: String,
    /// Magnet URI including tracker hints.
    pub magnet_url: String,
    /// Seeders reported by the backend.
    pub seeders: u32,
    /// Size in bytes.
    pub size: u64,
    /// Whether the query was a free-text title search rather than an exact ID search.
    #[serde(default)]
    pub fuzzy: bool,
}

/// What to look up: a movie, or a single episode of a series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LookupRequest {
    Movie {
        imdb_id: String,
    },
    Episode {
        imdb_id: String,
        season: u32,
        episode: u32,
    },
}

impl LookupRequest {
    pub fn movie(imdb_id: impl Into<String>) -> Self {
        Self::Movie {
            imdb_id: imdb_id.into(),
        }
    }

    pub fn episode(imdb_id: impl Into<String>, season: u32, episode: u32) -> Self {
        Self::Episode {
            imdb_id: imdb_id.into(),
            season,
            episode,
        }
    }

    pub fn imdb_id(&self) -> &str {
        match self {
            Self::Movie { imdb_id } | Self::Episode { imdb_id, .. } => imdb_id,
        }
    }

    /// Stable identity of the request, e.g. `tt0944947:1:2` for an episode.
    pub fn cache_id(&self) -> String {
        match self {
            Self::Movie { imdb_id } => imdb_id.clone(),
            Self::Episode {
                imdb_id,
                season,
                episode,
            } => format!("{}:{}:{}", imdb_id, season, episode),
        }
    }

    /// Label used for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Movie { .. } => "movie",
            Self::Episode { .. } => "episode",
        }
    }
}

/// Errors a single backend can report.
#[derive(Debug, Error)]
pub enum FinderError {
    #[error("Backend connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Backend API error: {0}")]
    ApiError(String),

    #[error("Metadata lookup failed: {0}")]
    Metadata(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<reqwest::Error> for FinderError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            FinderError::Timeout
        } else if e.is_connect() {
            FinderError::ConnectionFailed(e.to_string())
        } else {
            FinderError::ApiError(e.to_string())
        }
    }
}

/// A backend that reported an error during a lookup.
#[derive(Debug)]
pub struct BackendFailure {
    pub backend: String,
    pub error: FinderError,
}

/// Errors surfaced by the aggregator.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("{}", format_failures(.0))]
    AllBackendsFailed(Vec<BackendFailure>),

    #[error("Lookup cancelled")]
    Cancelled,
}

fn format_failures(failures: &[BackendFailure]) -> String {
    let listed: Vec<String> = failures
        .iter()
        .enumerate()
        .map(|(i, f)| format!("{}. {}: {}", i + 1, f.backend, f.error))
        .collect();
    format!("couldn't find torrents on any backend: {}", listed.join("; "))
}

/// A source of magnet candidates for movies and episodes.
///
/// Implementations resolve whatever metadata they need themselves, apply
/// their own caching, and return candidates that are already free of
/// duplicates and carry a validated 40-character lowercase info hash.
#[async_trait]
pub trait MagnetFinder: Send + Sync {
    /// Backend name for logging/metrics.
    fn name(&self) -> &str;

    /// Find torrents for a movie by IMDb ID.
    async fn find_movie(&self, imdb_id: &str) -> Result<Vec<Candidate>, FinderError>;

    /// Find torrents for one episode of a series by the series' IMDb ID.
    async fn find_episode(
        &self,
        imdb_id: &str,
        season: u32,
        episode: u32,
    ) -> Result<Vec<Candidate>, FinderError>;
}
