//! The Pirate Bay backend, via the apibay JSON API.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Proxy};
use serde::{Deserialize, Deserializer};
use tracing::{debug, error, warn};

use crate::cache::ResponseCache;
use crate::config::PirateBayConfig;
use crate::meta::MetadataProvider;

use super::magnet::{build_magnet_url, classify_quality, episode_query, normalize_info_hash};
use super::{Candidate, FinderError, LookupRequest, MagnetFinder};

/// apibay category for HD TV shows.
const TV_HD_CATEGORY: u32 = 208;

const TRACKERS: &[&str] = &[
    "udp://tracker.coppersurfer.tk:6969/announce",
    "udp://9.rarbg.to:2920/announce",
    "udp://tracker.opentrackr.org:1337",
    "udp://tracker.internetwarriors.net:1337/announce",
    "udp://tracker.leechers-paradise.org:6969/announce",
    "udp://tracker.pirateparty.gr:6969/announce",
    "udp://tracker.cyberia.is:6969/announce",
];

/// Pirate Bay magnet finder.
pub struct PirateBayFinder {
    client: Client,
    base_url: String,
    cache: Arc<dyn ResponseCache>,
    cache_age: Duration,
    metadata: Arc<dyn MetadataProvider>,
}

impl PirateBayFinder {
    /// Create a new PirateBayFinder with the given configuration.
    pub fn new(
        config: &PirateBayConfig,
        cache: Arc<dyn ResponseCache>,
        metadata: Arc<dyn MetadataProvider>,
    ) -> Result<Self, FinderError> {
        let mut builder =
            Client::builder().timeout(Duration::from_secs(config.timeout_secs as u64));
        if let Some(proxy) = &config.proxy {
            check_proxy_scheme(proxy)?;
            let proxy = Proxy::all(proxy)
                .map_err(|e| FinderError::Internal(format!("Invalid proxy {}: {}", proxy, e)))?;
            builder = builder.proxy(proxy);
        }
        let client = builder
            .build()
            .map_err(|e| FinderError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            cache,
            cache_age: Duration::from_secs(config.cache_age_secs),
            metadata,
        })
    }

    /// Build the apibay search URL for an already escaped query.
    fn build_search_url(&self, escaped_query: &str) -> String {
        format!("{}/q.php?q={}", self.base_url, escaped_query)
    }

    fn cache_key(request: &LookupRequest) -> String {
        format!("{}-TPB", request.cache_id())
    }

    async fn find(
        &self,
        request: &LookupRequest,
        title: &str,
        escaped_query: &str,
        fuzzy: bool,
    ) -> Result<Vec<Candidate>, FinderError> {
        let cache_key = Self::cache_key(request);
        match self.cache.get(&cache_key) {
            Ok(Some(cached)) if cached.is_fresh(self.cache_age) => {
                debug!(key = %cache_key, results = cached.candidates.len(), "Cache hit");
                return Ok(cached.candidates);
            }
            Ok(_) => {}
            Err(e) => warn!(key = %cache_key, error = %e, "Cache read failed"),
        }

        let url = self.build_search_url(escaped_query);
        debug!(id = %request.cache_id(), "Searching apibay");

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(FinderError::ApiError(format!(
                "HTTP {}: {}",
                status,
                body.chars().take(200).collect::<String>()
            )));
        }

        let entries: Vec<ApibayEntry> = response
            .json()
            .await
            .map_err(|e| FinderError::ApiError(format!("Failed to parse response: {}", e)))?;

        if entries.is_empty() {
            return Ok(Vec::new());
        }

        let candidates = parse_entries(entries, title, fuzzy);

        debug!(
            id = %request.cache_id(),
            results = candidates.len(),
            "apibay search complete"
        );

        if let Err(e) = self.cache.set(&cache_key, &candidates) {
            error!(key = %cache_key, error = %e, "Couldn't cache torrents");
        }

        Ok(candidates)
    }
}

#[async_trait]
impl MagnetFinder for PirateBayFinder {
    fn name(&self) -> &str {
        "pirate_bay"
    }

    async fn find_movie(&self, imdb_id: &str) -> Result<Vec<Candidate>, FinderError> {
        let meta = self.metadata.get_movie(imdb_id).await.map_err(|e| {
            FinderError::Metadata(format!(
                "couldn't get movie title for IMDb ID {}: {}",
                imdb_id, e
            ))
        })?;

        let request = LookupRequest::movie(imdb_id);
        let escaped = urlencoding::encode(imdb_id);
        self.find(&request, &meta.title, &escaped, false).await
    }

    async fn find_episode(
        &self,
        imdb_id: &str,
        season: u32,
        episode: u32,
    ) -> Result<Vec<Candidate>, FinderError> {
        let request = LookupRequest::episode(imdb_id, season, episode);
        let meta = self.metadata.get_series(imdb_id).await.map_err(|e| {
            FinderError::Metadata(format!(
                "couldn't get TV show title for ID {}: {}",
                request.cache_id(),
                e
            ))
        })?;

        let query = episode_query(&meta.title, season, episode);
        let escaped = format!("{}&cat={}", urlencoding::encode(&query), TV_HD_CATEGORY);
        self.find(&request, &meta.title, &escaped, true).await
    }
}

const PROXY_SCHEMES: &[&str] = &["http", "https", "socks5", "socks5h"];

/// Reject proxies reqwest would accept here but fail on at request time.
fn check_proxy_scheme(proxy: &str) -> Result<(), FinderError> {
    let url = reqwest::Url::parse(proxy)
        .map_err(|e| FinderError::Internal(format!("Invalid proxy {}: {}", proxy, e)))?;
    if !PROXY_SCHEMES.contains(&url.scheme()) {
        return Err(FinderError::Internal(format!(
            "Unsupported proxy scheme {:?} in {}",
            url.scheme(),
            proxy
        )));
    }
    Ok(())
}

/// Turn raw apibay entries into candidates.
///
/// Entries without a supported resolution or a valid info hash are skipped,
/// as are repeated hashes.
fn parse_entries(entries: Vec<ApibayEntry>, title: &str, fuzzy: bool) -> Vec<Candidate> {
    let mut seen = std::collections::HashSet::new();

    entries
        .into_iter()
        .filter_map(|entry| {
            let quality = classify_quality(&entry.name)?;
            let info_hash = normalize_info_hash(&entry.info_hash)?;
            if !seen.insert(info_hash.clone()) {
                return None;
            }
            Some(Candidate {
                magnet_url: build_magnet_url(&info_hash, title, TRACKERS),
                name: entry.name,
                title: title.to_string(),
                quality,
                info_hash,
                seeders: entry.seeders.min(u32::MAX as u64) as u32,
                size: entry.size,
                fuzzy,
            })
        })
        .collect()
}

// apibay API response type
#[derive(Debug, Deserialize)]
struct ApibayEntry {
    #[serde(default)]
    name: String,
    #[serde(default)]
    info_hash: String,
    #[serde(default, deserialize_with = "lenient_u64")]
    seeders: u64,
    #[serde(default, deserialize_with = "lenient_u64")]
    size: u64,
}

/// apibay sends numbers as strings; accept either and fall back to zero.
fn lenient_u64<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Number(n) => n.as_u64().unwrap_or(0),
        serde_json::Value::String(s) => s.trim().parse().unwrap_or(0),
        _ => 0,
    })
}
