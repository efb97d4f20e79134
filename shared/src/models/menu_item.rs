//! Menu Item Model

use serde::{Deserialize, Serialize};

/// Menu item entity
///
/// Name is unique within a restaurant; price is in the smallest
/// currency unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct MenuItem {
    pub id: i64,
    pub restaurant_id: i64,
    pub name: String,
    pub price: i64,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub is_popular: bool,
}

/// Create menu item payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemCreate {
    pub name: String,
    pub price: i64,
    pub description: Option<String>,
    pub image_url: Option<String>,
    #[serde(default)]
    pub is_popular: bool,
}

/// Update menu item payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemUpdate {
    pub name: Option<String>,
    pub price: Option<i64>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub is_popular: Option<bool>,
}

/// Popular menu item joined with its restaurant name
///
/// `restaurant_name` falls back to "Unknown Restaurant" when the parent
/// record is gone (dangling reference).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PopularMenuItem {
    #[serde(flatten)]
    pub item: MenuItem,
    pub restaurant_name: String,
}
