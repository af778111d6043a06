//! Mock metadata provider for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::meta::{EpisodeMeta, MediaMeta, MetaError, MetadataProvider};

/// Mock implementation of the MetadataProvider trait.
///
/// Unknown IDs resolve to `MetaError::NotFound`.
#[derive(Debug)]
pub struct MockMetadataProvider {
    movies: Arc<RwLock<HashMap<String, MediaMeta>>>,
    series: Arc<RwLock<HashMap<String, MediaMeta>>>,
    episodes: Arc<RwLock<HashMap<String, EpisodeMeta>>>,
}

impl Default for MockMetadataProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MockMetadataProvider {
    /// Create an empty provider.
    pub fn new() -> Self {
        Self {
            movies: Arc::new(RwLock::new(HashMap::new())),
            series: Arc::new(RwLock::new(HashMap::new())),
            episodes: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub async fn add_movie(&self, imdb_id: &str, title: &str, year: u32) {
        self.movies.write().await.insert(
            imdb_id.to_string(),
            MediaMeta {
                title: title.to_string(),
                year,
            },
        );
    }

    pub async fn add_series(&self, imdb_id: &str, title: &str, year: u32) {
        self.series.write().await.insert(
            imdb_id.to_string(),
            MediaMeta {
                title: title.to_string(),
                year,
            },
        );
    }

    pub async fn add_episode(&self, imdb_id: &str, episode: EpisodeMeta) {
        self.episodes
            .write()
            .await
            .insert(imdb_id.to_string(), episode);
    }
}

#[async_trait]
impl MetadataProvider for MockMetadataProvider {
    async fn get_movie(&self, imdb_id: &str) -> Result<MediaMeta, MetaError> {
        self.movies
            .read()
            .await
            .get(imdb_id)
            .cloned()
            .ok_or_else(|| MetaError::NotFound(format!("Movie {}", imdb_id)))
    }

    async fn get_series(&self, imdb_id: &str) -> Result<MediaMeta, MetaError> {
        self.series
            .read()
            .await
            .get(imdb_id)
            .cloned()
            .ok_or_else(|| MetaError::NotFound(format!("Series {}", imdb_id)))
    }

    async fn get_episode(&self, imdb_id: &str) -> Result<EpisodeMeta, MetaError> {
        self.episodes
            .read()
            .await
            .get(imdb_id)
            .cloned()
            .ok_or_else(|| MetaError::NotFound(format!("Episode {}", imdb_id)))
    }
}
