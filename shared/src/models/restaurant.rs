//! Restaurant Model

use serde::{Deserialize, Serialize};

use super::{MenuItem, Review};

/// Restaurant entity (店舗)
///
/// Globally visible, owned by no single user. Listings are crowd-sourced:
/// any client holding a token may create one.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Restaurant {
    pub id: i64,
    pub name: String,
    pub genre: String,
    pub address: String,
    pub phone: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub hours: Option<String>,
    pub price_range: Option<String>,
    /// Stored as JSON text in SQLite
    #[cfg_attr(feature = "db", sqlx(json))]
    pub features: Vec<String>,
    pub is_open: bool,
    pub created_at: i64,
}

/// Create restaurant payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantCreate {
    pub name: String,
    pub genre: String,
    pub address: String,
    pub phone: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub hours: Option<String>,
    pub price_range: Option<String>,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default = "default_is_open")]
    pub is_open: bool,
}

fn default_is_open() -> bool {
    true
}

/// Update restaurant payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantUpdate {
    pub name: Option<String>,
    pub genre: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub hours: Option<String>,
    pub price_range: Option<String>,
    pub features: Option<Vec<String>>,
    pub is_open: Option<bool>,
}

/// List filter — also the query-string shape of `GET /api/restaurants`
///
/// `genre` is an exact, case-sensitive match (`"all"` / empty = no filter);
/// `search` is a case-insensitive substring match, OR across
/// name / description / genre.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RestaurantFilter {
    pub genre: Option<String>,
    pub search: Option<String>,
}

/// Restaurant with derived statistics (not persisted — computed on every read)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantWithStats {
    #[serde(flatten)]
    pub restaurant: Restaurant,
    /// Mean of review ratings rounded to one decimal, 0 with no reviews
    pub average_rating: f64,
    pub review_count: i64,
    /// Only present in bookmark-context listings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_bookmarked: Option<bool>,
}

/// Restaurant detail view: stats plus full review and menu lists
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantWithDetails {
    #[serde(flatten)]
    pub stats: RestaurantWithStats,
    pub reviews: Vec<Review>,
    pub menu_items: Vec<MenuItem>,
}
