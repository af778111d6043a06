//! IMDb watch-list clients.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use tracing::debug;

use super::{
    collect_pages, extract_list_id, extract_title_ids, normalize_user_id, parse_export_csv,
    parse_list_ref, ListRef, TitleKind, WatchlistConfig, WatchlistError, WatchlistItem,
};

fn build_client(config: &WatchlistConfig) -> Result<Client, WatchlistError> {
    Ok(Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs as u64))
        .build()?)
}

fn base_url(config: &WatchlistConfig) -> String {
    config.url.trim_end_matches('/').to_string()
}

async fn get_page(client: &Client, url: &str) -> Result<String, WatchlistError> {
    let response = client.get(url).send().await?;

    let status = response.status();
    if status == StatusCode::NOT_FOUND {
        return Err(WatchlistError::NotFound(url.to_string()));
    }
    if !status.is_success() {
        return Err(WatchlistError::ApiError {
            status: status.as_u16(),
        });
    }

    Ok(response.text().await?)
}

/// Scrapes a user's public watch-list pages.
pub struct ImdbUserWatchlist {
    client: Client,
    base_url: String,
    user_id: String,
}

impl ImdbUserWatchlist {
    pub fn new(config: &WatchlistConfig, user_id: &str) -> Result<Self, WatchlistError> {
        Ok(Self {
            client: build_client(config)?,
            base_url: base_url(config),
            user_id: normalize_user_id(user_id),
        })
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    fn page_url(&self, kind: TitleKind, page: u32) -> String {
        format!(
            "{}/user/{}/watchlist?sort={}&title_type={}&page={}",
            self.base_url,
            self.user_id,
            urlencoding::encode("date_added,desc"),
            kind.title_type(),
            page
        )
    }

    /// All title IDs of the given kind, most recently added first.
    pub async fn titles(&self, kind: TitleKind) -> Result<Vec<String>, WatchlistError> {
        collect_pages(|page| {
            let url = self.page_url(kind, page);
            async move {
                debug!("IMDb watch-list page: {}", url);
                let html = get_page(&self.client, &url).await?;
                Ok(extract_title_ids(&html))
            }
        })
        .await
    }

    pub async fn movies(&self) -> Result<Vec<String>, WatchlistError> {
        self.titles(TitleKind::Movie).await
    }

    pub async fn series(&self) -> Result<Vec<String>, WatchlistError> {
        self.titles(TitleKind::Series).await
    }
}

/// Downloads the CSV export of an IMDb list.
pub struct ImdbListExport {
    client: Client,
    base_url: String,
    list_id: String,
}

impl ImdbListExport {
    /// Create an exporter, resolving a user ID to that user's watch-list ID.
    pub async fn new(config: &WatchlistConfig, id: &str) -> Result<Self, WatchlistError> {
        let client = build_client(config)?;
        let base_url = base_url(config);
        let list_id = match parse_list_ref(id)? {
            ListRef::List(list_id) => list_id,
            ListRef::User(user_id) => {
                let url = format!("{}/user/{}/watchlist", base_url, user_id);
                let html = get_page(&client, &url).await?;
                extract_list_id(&html)
                    .ok_or_else(|| WatchlistError::NotFound(format!("user {}", user_id)))?
            }
        };

        Ok(Self {
            client,
            base_url,
            list_id,
        })
    }

    pub fn list_id(&self) -> &str {
        &self.list_id
    }

    fn export_url(&self) -> String {
        format!("{}/list/{}/export", self.base_url, self.list_id)
    }

    /// Download and parse the list export.
    pub async fn export(&self) -> Result<Vec<WatchlistItem>, WatchlistError> {
        let url = self.export_url();
        debug!("IMDb list export: {}", url);
        let body = get_page(&self.client, &url).await?;
        parse_export_csv(body.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> WatchlistConfig {
        WatchlistConfig {
            url: "http://127.0.0.1:9/".to_string(),
            timeout_secs: 1,
        }
    }

    #[test]
    fn test_user_watchlist_page_url() {
        let watchlist = ImdbUserWatchlist::new(&config(), "560188055").unwrap();
        assert_eq!(watchlist.user_id(), "ur560188055");
        assert_eq!(
            watchlist.page_url(TitleKind::Series, 2),
            "http://127.0.0.1:9/user/ur560188055/watchlist\
             ?sort=date_added%2Cdesc&title_type=tvSeries&page=2"
        );
    }

    #[test]
    fn test_page_url_without_trailing_slash() {
        let config = WatchlistConfig {
            url: "http://127.0.0.1:9".to_string(),
            timeout_secs: 1,
        };
        let watchlist = ImdbUserWatchlist::new(&config, "ur1").unwrap();
        assert!(watchlist
            .page_url(TitleKind::Movie, 1)
            .starts_with("http://127.0.0.1:9/user/ur1/watchlist?"));
    }

    #[tokio::test]
    async fn test_export_url_joins_base_without_trailing_slash() {
        let config = WatchlistConfig {
            url: "http://127.0.0.1:9".to_string(),
            timeout_secs: 1,
        };
        let export = ImdbListExport::new(&config, "ls42").await.unwrap();
        assert_eq!(export.base_url, "http://127.0.0.1:9");
        assert_eq!(export.export_url(), "http://127.0.0.1:9/list/ls42/export");
    }

    #[tokio::test]
    async fn test_list_export_uses_list_id_without_network() {
        let export = ImdbListExport::new(&config(), "560188055").await.unwrap();
        assert_eq!(export.list_id(), "ls560188055");
    }

    #[tokio::test]
    async fn test_list_export_rejects_empty_id() {
        let result = ImdbListExport::new(&config(), "").await;
        assert!(matches!(result, Err(WatchlistError::MissingId)));
    }

    #[tokio::test]
    async fn test_list_export_user_resolution_requires_network() {
        let result = ImdbListExport::new(&config(), "ur152083192").await;
        assert!(result.is_err());
    }
}
