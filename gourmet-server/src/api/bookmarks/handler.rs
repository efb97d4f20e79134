//! Bookmark handlers
//!
//! The client toggles bookmarks: create when absent, delete when present.
//! DELETE always answers 200 with a success flag so the toggle stays
//! idempotent from the caller's side.

use axum::Json;
use axum::extract::{Path, State};
use serde::Serialize;

use shared::models::{Bookmark, BookmarkCreate, RestaurantWithStats};

use crate::auth::OwnerToken;
use crate::core::AppState;
use crate::utils::AppResult;

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckResponse {
    pub is_bookmarked: bool,
}

/// GET /api/bookmarks
pub async fn list(
    State(state): State<AppState>,
    OwnerToken(token): OwnerToken,
) -> AppResult<Json<Vec<RestaurantWithStats>>> {
    let restaurants = state.storage.bookmarked_restaurants(&token).await?;
    Ok(Json(restaurants))
}

/// POST /api/bookmarks
pub async fn create(
    State(state): State<AppState>,
    OwnerToken(token): OwnerToken,
    Json(data): Json<BookmarkCreate>,
) -> AppResult<Json<Bookmark>> {
    let bookmark = state
        .storage
        .create_bookmark(&token, data.restaurant_id)
        .await?;

    tracing::info!(
        bookmark_id = bookmark.id,
        restaurant_id = bookmark.restaurant_id,
        "Bookmark created"
    );

    Ok(Json(bookmark))
}

/// DELETE /api/bookmarks/{restaurant_id}
pub async fn delete(
    State(state): State<AppState>,
    OwnerToken(token): OwnerToken,
    Path(restaurant_id): Path<i64>,
) -> AppResult<Json<DeleteResponse>> {
    let success = state.storage.delete_bookmark(restaurant_id, &token).await?;
    Ok(Json(DeleteResponse { success }))
}

/// GET /api/bookmarks/{restaurant_id}/check
pub async fn check(
    State(state): State<AppState>,
    OwnerToken(token): OwnerToken,
    Path(restaurant_id): Path<i64>,
) -> AppResult<Json<CheckResponse>> {
    let is_bookmarked = state.storage.is_bookmarked(restaurant_id, &token).await?;
    Ok(Json(CheckResponse { is_bookmarked }))
}
