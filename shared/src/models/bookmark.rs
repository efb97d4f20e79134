//! Bookmark Model

use serde::{Deserialize, Serialize};

/// Bookmark entity
///
/// A (restaurant_id, owner_token) pair. Storage does not enforce
/// uniqueness; the read path dedupes by restaurant.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Bookmark {
    pub id: i64,
    pub restaurant_id: i64,
    pub owner_token: String,
    pub created_at: i64,
}

/// Create bookmark payload (owner token comes from the request header)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkCreate {
    pub restaurant_id: i64,
}
