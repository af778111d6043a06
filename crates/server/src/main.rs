use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use magnetar_core::{
    load_config, validate_config, Aggregator, CacheBackend, Config, MagnetFinder, MemoryCache,
    MetadataProvider, NoopCache, OmdbClient, PirateBayFinder, ResponseCache, SqliteCache,
};
use magnetar_server::{api::create_router, state::AppState};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine config path
    let config_path = std::env::var("MAGNETAR_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));

    // Load configuration
    info!("Loading configuration from {:?}", config_path);
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    // Validate configuration
    validate_config(&config).context("Configuration validation failed")?;

    info!("Configuration loaded successfully");
    info!("Cache backend: {:?}", config.cache.backend);

    let aggregator = Arc::new(build_aggregator(&config)?);
    info!(
        "Aggregator ready with backends {:?} (timeout {:?})",
        aggregator.backend_names(),
        aggregator.timeout()
    );

    // Cancelled on shutdown; every lookup runs under a child token
    let shutdown = CancellationToken::new();

    // Create app state
    let state = Arc::new(AppState::new(
        config.clone(),
        aggregator,
        shutdown.clone(),
    ));

    // Create router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::new(config.server.host, config.server.port);
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown))
        .await
        .context("Server error")?;

    info!("Server stopped");
    Ok(())
}

/// Build the response cache and every enabled backend.
fn build_aggregator(config: &Config) -> Result<Aggregator> {
    let cache: Arc<dyn ResponseCache> = match config.cache.backend {
        CacheBackend::Memory => match &config.pirate_bay {
            Some(tpb_config) => Arc::new(MemoryCache::with_max_age(Duration::from_secs(
                tpb_config.cache_age_secs,
            ))),
            None => Arc::new(MemoryCache::new()),
        },
        CacheBackend::Sqlite => {
            info!("Opening response cache at {:?}", config.cache.path);
            Arc::new(
                SqliteCache::new(&config.cache.path)
                    .context("Failed to create response cache")?,
            )
        }
        CacheBackend::None => Arc::new(NoopCache),
    };

    let metadata: Option<Arc<dyn MetadataProvider>> = match &config.omdb {
        Some(omdb_config) => {
            info!("Initializing OMDb client");
            let client =
                OmdbClient::new(omdb_config.clone()).context("Failed to create OMDb client")?;
            Some(Arc::new(client) as Arc<dyn MetadataProvider>)
        }
        None => {
            info!("OMDb not configured");
            None
        }
    };

    let mut finders: Vec<Arc<dyn MagnetFinder>> = Vec::new();

    match &config.pirate_bay {
        Some(tpb_config) if tpb_config.enabled => {
            let metadata = metadata
                .clone()
                .context("Pirate Bay backend requires an OMDb client")?;
            info!("Initializing Pirate Bay backend at {}", tpb_config.base_url);
            let finder = PirateBayFinder::new(tpb_config, Arc::clone(&cache), metadata)
                .context("Failed to create Pirate Bay backend")?;
            finders.push(Arc::new(finder));
        }
        Some(_) => info!("Pirate Bay backend disabled in config"),
        None => info!("Pirate Bay backend not configured"),
    }

    Ok(Aggregator::new(
        finders,
        Duration::from_millis(config.finder.timeout_ms),
    ))
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM), then cancel in-flight lookups
async fn shutdown_signal(shutdown: CancellationToken) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, cancelling in-flight lookups");
    shutdown.cancel();
}
