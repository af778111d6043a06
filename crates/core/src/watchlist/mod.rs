//! IMDb watch-list export.
//!
//! Turns an IMDb user or list ID into the media IDs it contains, either by
//! scraping the paginated watch-list pages or by downloading a list's CSV
//! export. Independent of the finder; its output feeds lookups elsewhere.

mod imdb;

pub use imdb::{ImdbListExport, ImdbUserWatchlist};

use std::collections::HashSet;
use std::future::Future;

use once_cell::sync::Lazy;
use regex_lite::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

static TITLE_ID: Lazy<Regex> = Lazy::new(|| Regex::new(r"tt\d{7,}").expect("valid regex"));
static LIST_ID: Lazy<Regex> = Lazy::new(|| Regex::new(r"ls\d{9}").expect("valid regex"));

/// Upper bound on scraped pages, in case a page keeps yielding new IDs.
pub const MAX_PAGES: u32 = 100;

/// Watch-list client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchlistConfig {
    /// IMDb base URL (default: https://www.imdb.com/).
    #[serde(default = "default_url")]
    pub url: String,
    /// Request timeout in seconds (default: 10).
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
}

impl Default for WatchlistConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_url() -> String {
    "https://www.imdb.com/".to_string()
}

fn default_timeout() -> u32 {
    10
}

/// Which kind of titles to scrape from a user watch-list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TitleKind {
    #[default]
    Movie,
    Series,
}

impl TitleKind {
    /// Value of IMDb's `title_type` filter.
    pub fn title_type(&self) -> &'static str {
        match self {
            TitleKind::Movie => "movie",
            TitleKind::Series => "tvSeries",
        }
    }
}

/// One row of a list export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchlistItem {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
}

/// How a list export ID should be resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListRef {
    /// A list ID (`ls...`), usable directly.
    List(String),
    /// A user ID (`ur...`) whose watch-list ID must be looked up first.
    User(String),
}

/// Errors for watch-list operations.
#[derive(Debug, Error)]
pub enum WatchlistError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("API error: {status}")]
    ApiError { status: u16 },

    #[error("Failed to parse export: {0}")]
    ParseError(String),

    #[error("Missing watch-list or user ID")]
    MissingId,
}

/// Normalize a user ID: bare digits get the `ur` prefix.
pub fn normalize_user_id(id: &str) -> String {
    if id.contains("ur") {
        id.to_string()
    } else {
        format!("ur{}", id)
    }
}

/// Classify an ID given for a list export.
pub fn parse_list_ref(id: &str) -> Result<ListRef, WatchlistError> {
    let id = id.trim();
    if id.is_empty() {
        Err(WatchlistError::MissingId)
    } else if id.contains("ls") {
        Ok(ListRef::List(id.to_string()))
    } else if id.contains("ur") {
        Ok(ListRef::User(id.to_string()))
    } else {
        Ok(ListRef::List(format!("ls{}", id)))
    }
}

/// Extract unique title IDs from a page, in order of appearance.
pub fn extract_title_ids(html: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    TITLE_ID
        .find_iter(html)
        .map(|m| m.as_str().to_string())
        .filter(|id| seen.insert(id.clone()))
        .collect()
}

/// First list ID on a page, if any.
pub fn extract_list_id(html: &str) -> Option<String> {
    LIST_ID.find(html).map(|m| m.as_str().to_string())
}

/// Parse a list export CSV. The header row is skipped; columns 1, 5 and 7
/// hold the ID, name and title type.
pub fn parse_export_csv(data: &[u8]) -> Result<Vec<WatchlistItem>, WatchlistError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(data);

    let mut items = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| WatchlistError::ParseError(e.to_string()))?;
        let field = |i: usize| record.get(i).unwrap_or_default().to_string();
        items.push(WatchlistItem {
            id: field(1),
            name: field(5),
            kind: field(7),
        });
    }
    Ok(items)
}

/// Fetch pages until one yields no new IDs, returning IDs in first-seen order.
pub async fn collect_pages<F, Fut>(mut fetch: F) -> Result<Vec<String>, WatchlistError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<Vec<String>, WatchlistError>>,
{
    let mut seen = HashSet::new();
    let mut ids = Vec::new();

    for page in 1..=MAX_PAGES {
        let before = ids.len();
        for id in fetch(page).await? {
            if seen.insert(id.clone()) {
                ids.push(id);
            }
        }
        if ids.len() == before {
            break;
        }
    }

    Ok(ids)
}
