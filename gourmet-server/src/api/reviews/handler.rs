//! Review handlers
//!
//! Mutations match on `id AND owner_token` in storage; a miss comes back
//! as `None`/`false` and is surfaced as 404 without revealing whether the
//! review exists.

use axum::Json;
use axum::extract::{Path, State};
use serde::Serialize;

use shared::models::{Review, ReviewCreate, ReviewUpdate};

use crate::auth::OwnerToken;
use crate::core::AppState;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, validate_optional_text, validate_required_text,
};
use crate::utils::{AppError, AppResult};

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
}

/// POST /api/reviews
pub async fn create(
    State(state): State<AppState>,
    OwnerToken(token): OwnerToken,
    Json(data): Json<ReviewCreate>,
) -> AppResult<Json<Review>> {
    validate_required_text(&data.nickname, "nickname", MAX_NAME_LEN)?;
    validate_optional_text(&data.comment, "comment", MAX_NOTE_LEN)?;

    let review = state.storage.create_review(&token, data).await?;

    tracing::info!(
        review_id = review.id,
        restaurant_id = review.restaurant_id,
        rating = review.rating,
        "Review created"
    );

    Ok(Json(review))
}

/// GET /api/reviews/user
pub async fn list_mine(
    State(state): State<AppState>,
    OwnerToken(token): OwnerToken,
) -> AppResult<Json<Vec<Review>>> {
    let reviews = state.storage.reviews_by_owner(&token).await?;
    Ok(Json(reviews))
}

/// PUT /api/reviews/{id}
pub async fn update(
    State(state): State<AppState>,
    OwnerToken(token): OwnerToken,
    Path(id): Path<i64>,
    Json(data): Json<ReviewUpdate>,
) -> AppResult<Json<Review>> {
    if let Some(nickname) = &data.nickname {
        validate_required_text(nickname, "nickname", MAX_NAME_LEN)?;
    }
    validate_optional_text(&data.comment, "comment", MAX_NOTE_LEN)?;

    let review = state
        .storage
        .update_review(id, &token, data)
        .await?
        .ok_or_else(|| AppError::not_found_or_unauthorized("Review not found or unauthorized"))?;

    Ok(Json(review))
}

/// DELETE /api/reviews/{id}
pub async fn delete(
    State(state): State<AppState>,
    OwnerToken(token): OwnerToken,
    Path(id): Path<i64>,
) -> AppResult<Json<DeleteResponse>> {
    let deleted = state.storage.delete_review(id, &token).await?;
    if !deleted {
        return Err(AppError::not_found_or_unauthorized(
            "Review not found or unauthorized",
        ));
    }
    Ok(Json(DeleteResponse { success: true }))
}
