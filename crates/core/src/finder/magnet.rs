//! Helpers shared by backends: magnet URIs, episode queries and quality tags.

/// Build a magnet URI with a display name and tracker hints.
pub fn build_magnet_url(info_hash: &str, title: &str, trackers: &[&str]) -> String {
    let mut url = format!(
        "magnet:?xt=urn:btih:{}&dn={}",
        info_hash,
        urlencoding::encode(title)
    );
    for tracker in trackers {
        url.push_str("&tr=");
        url.push_str(&urlencoding::encode(tracker));
    }
    url
}

/// Free-text query for a single episode, e.g. `Game of Thrones S01E02`.
pub fn episode_query(title: &str, season: u32, episode: u32) -> String {
    format!("{} S{:02}E{:02}", title, season, episode)
}

/// Derive a quality tag from a torrent name.
///
/// Returns `None` when no supported resolution is present, in which case
/// the torrent should be skipped.
pub fn classify_quality(name: &str) -> Option<String> {
    let mut quality = ["720p", "1080p", "2160p"]
        .into_iter()
        .find(|res| name.contains(res))?
        .to_string();

    if name.contains("10bit") {
        quality.push_str(" 10bit");
    }
    if name.contains("HDCAM") {
        quality.push_str(" (⚠️cam)");
    } else if name.contains("HDTS") || name.contains("HD-TS") {
        quality.push_str(" (⚠️telesync)");
    }

    Some(quality)
}

/// Validate and normalize a hex info hash.
///
/// Anything that is not exactly 40 characters is rejected.
pub fn normalize_info_hash(hash: &str) -> Option<String> {
    let hash = hash.trim();
    if hash.len() != 40 || !hash.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    Some(hash.to_ascii_lowercase())
}
