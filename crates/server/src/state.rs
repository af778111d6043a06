use std::sync::Arc;

use magnetar_core::{Aggregator, Config, SanitizedConfig, WatchlistConfig};
use tokio_util::sync::CancellationToken;

/// Shared application state
pub struct AppState {
    config: Config,
    aggregator: Arc<Aggregator>,
    shutdown: CancellationToken,
}

impl AppState {
    pub fn new(config: Config, aggregator: Arc<Aggregator>, shutdown: CancellationToken) -> Self {
        Self {
            config,
            aggregator,
            shutdown,
        }
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    pub fn aggregator(&self) -> &Aggregator {
        self.aggregator.as_ref()
    }

    pub fn watchlist_config(&self) -> &WatchlistConfig {
        &self.config.watchlist
    }

    /// Token for a single lookup, cancelled when the server shuts down.
    pub fn lookup_token(&self) -> CancellationToken {
        self.shutdown.child_token()
    }
}
