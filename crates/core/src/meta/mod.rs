//! Media metadata lookup.
//!
//! Backends use a `MetadataProvider` to turn an IMDb ID into the
//! human-readable title they need for query construction and display.

mod omdb;

pub use omdb::{OmdbClient, OmdbConfig};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Title and release year of a movie or series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaMeta {
    pub title: String,
    /// Zero when the upstream year is missing or malformed.
    pub year: u32,
}

/// Metadata of a single episode, linked to its series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodeMeta {
    /// IMDb ID of the series this episode belongs to.
    pub series_id: String,
    /// Episode title.
    pub title: String,
    pub season: u32,
    pub episode: u32,
    pub year: u32,
}

/// Errors that can occur when looking up metadata.
#[derive(Debug, Error)]
pub enum MetaError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Resource not found.
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// API returned an error.
    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    /// Failed to parse response.
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Client not configured (missing API key, etc.).
    #[error("Client not configured: {0}")]
    NotConfigured(String),
}

/// Resolves IMDb IDs to titles.
#[async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Get a movie's title and year.
    async fn get_movie(&self, imdb_id: &str) -> Result<MediaMeta, MetaError>;

    /// Get a series' title and first-air year.
    async fn get_series(&self, imdb_id: &str) -> Result<MediaMeta, MetaError>;

    /// Get an episode by its own IMDb ID.
    async fn get_episode(&self, imdb_id: &str) -> Result<EpisodeMeta, MetaError>;

    /// Get the series an episode belongs to.
    async fn get_series_by_episode(&self, episode_id: &str) -> Result<MediaMeta, MetaError> {
        let episode = self.get_episode(episode_id).await?;
        if episode.series_id.is_empty() {
            return Err(MetaError::NotFound(format!(
                "Series of episode {}",
                episode_id
            )));
        }
        self.get_series(&episode.series_id).await
    }
}

/// Parse a year field such as `1999`, `2008–2013` or `2019–`.
///
/// Malformed values yield zero instead of an error.
pub fn parse_year(raw: &str) -> u32 {
    raw.split(['–', '-'])
        .next()
        .and_then(|y| y.trim().parse().ok())
        .unwrap_or(0)
}
