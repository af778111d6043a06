pub mod cache;
pub mod config;
pub mod finder;
pub mod meta;
pub mod metrics;
pub mod testing;
pub mod watchlist;

pub use cache::{CacheError, CachedResponse, MemoryCache, NoopCache, ResponseCache, SqliteCache};
pub use config::{
    load_config, load_config_from_str, validate_config, CacheBackend, Config, ConfigError,
    PirateBayConfig, SanitizedConfig,
};
pub use finder::{
    Aggregator, BackendFailure, Candidate, FinderError, LookupError, LookupRequest, MagnetFinder,
    PirateBayFinder,
};
pub use meta::{MetaError, MetadataProvider, OmdbClient, OmdbConfig};
pub use watchlist::{ImdbListExport, ImdbUserWatchlist, WatchlistConfig, WatchlistError};
