//! Torrent lookup API handlers.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use magnetar_core::{Candidate, LookupError, LookupRequest};
use serde::Serialize;
use tracing::{info, warn};

use super::ErrorResponse;
use crate::state::AppState;

// ============================================================================
// Response types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct LookupResponse {
    pub candidates: Vec<Candidate>,
    pub duration_ms: u64,
}

#[derive(Debug, Serialize)]
pub struct FinderStatusResponse {
    pub backends: Vec<String>,
    pub timeout_ms: u64,
}

type LookupResult = Result<Json<LookupResponse>, (StatusCode, Json<ErrorResponse>)>;

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/v1/finder/status
///
/// Registered backends and the per-backend time budget.
pub async fn get_status(State(state): State<Arc<AppState>>) -> Json<FinderStatusResponse> {
    let aggregator = state.aggregator();
    Json(FinderStatusResponse {
        backends: aggregator.backend_names(),
        timeout_ms: aggregator.timeout().as_millis() as u64,
    })
}

/// GET /api/v1/movies/{imdb_id}/torrents
pub async fn find_movie(
    State(state): State<Arc<AppState>>,
    Path(imdb_id): Path<String>,
) -> LookupResult {
    lookup(&state, LookupRequest::movie(imdb_id)).await
}

/// GET /api/v1/series/{imdb_id}/{season}/{episode}/torrents
pub async fn find_episode(
    State(state): State<Arc<AppState>>,
    Path((imdb_id, season, episode)): Path<(String, u32, u32)>,
) -> LookupResult {
    lookup(&state, LookupRequest::episode(imdb_id, season, episode)).await
}

async fn lookup(state: &AppState, request: LookupRequest) -> LookupResult {
    let start = Instant::now();
    let token = state.lookup_token();

    match state.aggregator().find(&request, &token).await {
        Ok(candidates) => {
            let duration_ms = start.elapsed().as_millis() as u64;
            info!(
                id = %request.cache_id(),
                results = candidates.len(),
                duration_ms,
                "Lookup complete"
            );
            Ok(Json(LookupResponse {
                candidates,
                duration_ms,
            }))
        }
        Err(e) => {
            warn!(id = %request.cache_id(), error = %e, "Lookup failed");
            Err(error_response(e))
        }
    }
}

fn error_response(e: LookupError) -> (StatusCode, Json<ErrorResponse>) {
    let status = match e {
        LookupError::AllBackendsFailed(_) => StatusCode::BAD_GATEWAY,
        LookupError::Cancelled => StatusCode::SERVICE_UNAVAILABLE,
    };
    (
        status,
        Json(ErrorResponse {
            error: e.to_string(),
        }),
    )
}
