//! Magnet candidate lookup.
//!
//! This module provides the `MagnetFinder` trait implemented by torrent index
//! backends, and the `Aggregator` that queries every configured backend
//! concurrently and merges their answers.

mod aggregator;
mod dedup;
mod magnet;
mod pirate_bay;
mod types;

pub use aggregator::{Aggregator, DEFAULT_BACKEND_TIMEOUT};
pub use dedup::deduplicate_candidates;
pub use magnet::{build_magnet_url, classify_quality, episode_query, normalize_info_hash};
pub use pirate_bay::PirateBayFinder;
pub use types::*;
