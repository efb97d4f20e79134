//! Review Model

use serde::{Deserialize, Serialize};

/// Review entity (口コミ)
///
/// `owner_token` is the anonymous per-browser identity that created the
/// review; `nickname` is a display name independent of that identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Review {
    pub id: i64,
    pub restaurant_id: i64,
    pub owner_token: String,
    pub nickname: String,
    /// 1–5, enforced at write time
    pub rating: i64,
    pub comment: Option<String>,
    pub created_at: i64,
}

/// Create review payload (owner token comes from the request header)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewCreate {
    pub restaurant_id: i64,
    pub nickname: String,
    pub rating: i64,
    pub comment: Option<String>,
}

/// Update review payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewUpdate {
    pub nickname: Option<String>,
    pub rating: Option<i64>,
    pub comment: Option<String>,
}
