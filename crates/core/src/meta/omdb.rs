//! OMDb (Open Movie Database) API client.
//!
//! OMDb requires an API key. Movies, series and episodes are all looked up
//! by IMDb ID through the same endpoint, distinguished by `type`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{parse_year, EpisodeMeta, MediaMeta, MetaError, MetadataProvider};

/// OMDb API client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OmdbConfig {
    /// OMDb API key (required).
    pub api_key: String,
    /// Base URL (default: https://www.omdbapi.com/).
    #[serde(default = "default_url")]
    pub url: String,
    /// Request timeout in seconds (default: 10).
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
}

fn default_url() -> String {
    "https://www.omdbapi.com/".to_string()
}

fn default_timeout() -> u32 {
    10
}

/// OMDb API client.
pub struct OmdbClient {
    client: Client,
    url: String,
    api_key: String,
}

impl OmdbClient {
    /// Create a new OMDb client.
    pub fn new(config: OmdbConfig) -> Result<Self, MetaError> {
        if config.api_key.is_empty() {
            return Err(MetaError::NotConfigured(
                "OMDb API key is required".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .build()?;

        Ok(Self {
            client,
            url: config.url,
            api_key: config.api_key,
        })
    }

    async fn request(&self, kind: &str, imdb_id: &str) -> Result<OmdbResponse, MetaError> {
        debug!("OMDb lookup: id={}, type={}", imdb_id, kind);

        let response = self
            .client
            .get(&self.url)
            .query(&[("i", imdb_id), ("type", kind), ("apikey", self.api_key.as_str())])
            .send()
            .await?;

        let status = response.status();
        if status == 401 {
            return Err(MetaError::NotConfigured("Invalid OMDb API key".to_string()));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MetaError::ApiError {
                status: status.as_u16(),
                message: body,
            });
        }

        let body: OmdbResponse = response.json().await.map_err(|e| {
            MetaError::ParseError(format!("Failed to parse OMDb response: {}", e))
        })?;

        if body.response.eq_ignore_ascii_case("false") {
            return Err(MetaError::NotFound(
                body.error
                    .unwrap_or_else(|| format!("{} {}", kind, imdb_id)),
            ));
        }

        Ok(body)
    }
}

#[async_trait]
impl MetadataProvider for OmdbClient {
    async fn get_movie(&self, imdb_id: &str) -> Result<MediaMeta, MetaError> {
        Ok(self.request("movie", imdb_id).await?.into())
    }

    async fn get_series(&self, imdb_id: &str) -> Result<MediaMeta, MetaError> {
        Ok(self.request("series", imdb_id).await?.into())
    }

    async fn get_episode(&self, imdb_id: &str) -> Result<EpisodeMeta, MetaError> {
        Ok(self.request("episode", imdb_id).await?.into())
    }
}

// OMDb API response type
#[derive(Debug, Deserialize)]
struct OmdbResponse {
    #[serde(rename = "Title", default)]
    title: String,
    #[serde(rename = "Year", default)]
    year: String,
    #[serde(rename = "Season", default)]
    season: Option<String>,
    #[serde(rename = "Episode", default)]
    episode: Option<String>,
    #[serde(rename = "seriesID", default)]
    series_id: Option<String>,
    #[serde(rename = "Response", default = "default_response")]
    response: String,
    #[serde(rename = "Error", default)]
    error: Option<String>,
}

fn default_response() -> String {
    "True".to_string()
}

fn parse_number(raw: Option<&str>) -> u32 {
    raw.and_then(|s| s.trim().parse().ok()).unwrap_or(0)
}

impl From<OmdbResponse> for MediaMeta {
    fn from(r: OmdbResponse) -> Self {
        Self {
            year: parse_year(&r.year),
            title: r.title,
        }
    }
}

impl From<OmdbResponse> for EpisodeMeta {
    fn from(r: OmdbResponse) -> Self {
        Self {
            series_id: r.series_id.unwrap_or_default(),
            season: parse_number(r.season.as_deref()),
            episode: parse_number(r.episode.as_deref()),
            year: parse_year(&r.year),
            title: r.title,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_requires_api_key() {
        let result = OmdbClient::new(OmdbConfig {
            api_key: String::new(),
            url: default_url(),
            timeout_secs: 10,
        });
        assert!(matches!(result, Err(MetaError::NotConfigured(_))));
    }

    #[test]
    fn test_config_defaults() {
        let config: OmdbConfig = serde_json::from_str(r#"{"api_key": "k"}"#).unwrap();
        assert_eq!(config.url, "https://www.omdbapi.com/");
        assert_eq!(config.timeout_secs, 10);
    }

    #[test]
    fn test_parse_movie_response() {
        let json = r#"{"Title": "The Matrix", "Year": "1999", "Response": "True"}"#;
        let response: OmdbResponse = serde_json::from_str(json).unwrap();
        let meta: MediaMeta = response.into();
        assert_eq!(meta.title, "The Matrix");
        assert_eq!(meta.year, 1999);
    }

    #[test]
    fn test_parse_series_year_range() {
        let json = r#"{"Title": "Game of Thrones", "Year": "2011–2019", "Response": "True"}"#;
        let response: OmdbResponse = serde_json::from_str(json).unwrap();
        let meta: MediaMeta = response.into();
        assert_eq!(meta.year, 2011);
    }

    #[test]
    fn test_parse_malformed_year_defaults_to_zero() {
        let json = r#"{"Title": "Unknown", "Year": "N/A"}"#;
        let response: OmdbResponse = serde_json::from_str(json).unwrap();
        let meta: MediaMeta = response.into();
        assert_eq!(meta.year, 0);
    }

    #[test]
    fn test_parse_episode_response() {
        let json = r#"{
            "Title": "Winter Is Coming",
            "Year": "2011",
            "Season": "1",
            "Episode": "1",
            "seriesID": "tt0944947",
            "Response": "True"
        }"#;
        let response: OmdbResponse = serde_json::from_str(json).unwrap();
        let meta: EpisodeMeta = response.into();
        assert_eq!(meta.series_id, "tt0944947");
        assert_eq!(meta.season, 1);
        assert_eq!(meta.episode, 1);
        assert_eq!(meta.title, "Winter Is Coming");
    }

    #[test]
    fn test_parse_error_response() {
        let json = r#"{"Response": "False", "Error": "Incorrect IMDb ID."}"#;
        let response: OmdbResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.response, "False");
        assert_eq!(response.error.as_deref(), Some("Incorrect IMDb ID."));
    }
}
