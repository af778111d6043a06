use axum::{middleware, routing::get, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::{handlers, lookup, middleware::metrics_middleware, watchlist};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    // API routes
    let api_routes = Router::new()
        // Health and config
        .route("/health", get(handlers::health))
        .route("/config", get(handlers::get_config))
        // Lookups
        .route("/finder/status", get(lookup::get_status))
        .route("/movies/{imdb_id}/torrents", get(lookup::find_movie))
        .route(
            "/series/{imdb_id}/{season}/{episode}/torrents",
            get(lookup::find_episode),
        )
        // IMDb watch-lists
        .route("/watchlist/{user_id}", get(watchlist::get_watchlist))
        .route("/lists/{list_id}/export", get(watchlist::export_list))
        .with_state(state);

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/metrics", get(handlers::metrics))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
}
