//! IMDb watch-list API handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use magnetar_core::watchlist::{TitleKind, WatchlistItem};
use magnetar_core::{ImdbListExport, ImdbUserWatchlist, WatchlistError};
use serde::{Deserialize, Serialize};

use super::ErrorResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct WatchlistQuery {
    #[serde(default)]
    pub kind: TitleKind,
}

#[derive(Debug, Serialize)]
pub struct WatchlistResponse {
    pub user_id: String,
    pub kind: TitleKind,
    pub ids: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ListExportResponse {
    pub list_id: String,
    pub items: Vec<WatchlistItem>,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn error_response(e: WatchlistError) -> ApiError {
    let status = match e {
        WatchlistError::NotFound(_) => StatusCode::NOT_FOUND,
        WatchlistError::MissingId => StatusCode::BAD_REQUEST,
        WatchlistError::HttpError(_)
        | WatchlistError::ApiError { .. }
        | WatchlistError::ParseError(_) => StatusCode::BAD_GATEWAY,
    };
    (
        status,
        Json(ErrorResponse {
            error: e.to_string(),
        }),
    )
}

/// GET /api/v1/watchlist/{user_id}?kind=movie|series
///
/// Title IDs on a user's public watch-list, most recently added first.
pub async fn get_watchlist(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    Query(query): Query<WatchlistQuery>,
) -> Result<Json<WatchlistResponse>, ApiError> {
    let watchlist =
        ImdbUserWatchlist::new(state.watchlist_config(), &user_id).map_err(error_response)?;
    let ids = watchlist
        .titles(query.kind)
        .await
        .map_err(error_response)?;

    Ok(Json(WatchlistResponse {
        user_id: watchlist.user_id().to_string(),
        kind: query.kind,
        ids,
    }))
}

/// GET /api/v1/lists/{list_id}/export
///
/// Items of an IMDb list; a user ID resolves to that user's watch-list.
pub async fn export_list(
    State(state): State<Arc<AppState>>,
    Path(list_id): Path<String>,
) -> Result<Json<ListExportResponse>, ApiError> {
    let export = ImdbListExport::new(state.watchlist_config(), &list_id)
        .await
        .map_err(error_response)?;
    let items = export.export().await.map_err(error_response)?;

    Ok(Json(ListExportResponse {
        list_id: export.list_id().to_string(),
        items,
    }))
}
