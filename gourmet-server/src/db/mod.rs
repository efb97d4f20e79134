//! Storage layer
//!
//! One contract ([`Storage`]), two interchangeable backends:
//! [`MemStorage`] for fast iteration and tests, [`SqliteStorage`] for the
//! long-lived deployment. The behavioral contract test suite runs against
//! both, so every observable result — rounding of averages, NotFound
//! semantics, dangling-reference tolerance — must match exactly. Derived
//! statistics and list filtering therefore live in [`stats`] as pure
//! functions instead of SQL.

pub mod memory;
pub mod seed;
pub mod sqlite;
pub mod stats;

// Re-exports
pub use memory::MemStorage;
pub use sqlite::SqliteStorage;

use async_trait::async_trait;
use thiserror::Error;

use shared::models::{
    Bookmark, MenuItem, MenuItemCreate, MenuItemUpdate, PopularMenuItem, Restaurant,
    RestaurantCreate, RestaurantFilter, RestaurantUpdate, RestaurantWithDetails,
    RestaurantWithStats, Review, ReviewCreate, ReviewUpdate,
};

/// Storage error types
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        StorageError::Database(err.to_string())
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Fallback label for a menu item whose restaurant record is gone.
pub(crate) const UNKNOWN_RESTAURANT: &str = "Unknown Restaurant";

/// Validate a review rating. Lives here (not in the handlers) so the 1–5
/// invariant holds on every write path of every backend.
pub(crate) fn check_rating(rating: i64) -> StorageResult<()> {
    if !(1..=5).contains(&rating) {
        return Err(StorageError::Validation(format!(
            "Rating must be between 1 and 5, got {rating}"
        )));
    }
    Ok(())
}

/// Storage contract shared by the in-memory and SQLite backends.
///
/// Ownership rules are part of the contract: review mutations match on
/// `id AND owner_token` and report a miss as `None`/`false` without
/// distinguishing "absent" from "not yours". Bookmark creation never
/// dedupes; the read path does.
#[async_trait]
pub trait Storage: Send + Sync {
    // ── Restaurants ─────────────────────────────────────────────────

    /// All restaurants matching the filter, with stats, in insertion order.
    async fn list_restaurants(
        &self,
        filter: &RestaurantFilter,
    ) -> StorageResult<Vec<RestaurantWithStats>>;

    /// Full detail view: stats + reviews + menu items. `None` when absent.
    async fn get_restaurant(&self, id: i64) -> StorageResult<Option<RestaurantWithDetails>>;

    /// Create a restaurant. Duplicate (name, address) pairs are rejected.
    async fn create_restaurant(&self, data: RestaurantCreate) -> StorageResult<Restaurant>;

    /// Compound create: restaurant plus its initial menu items, all-or-nothing.
    async fn create_restaurant_with_menu(
        &self,
        data: RestaurantCreate,
        items: Vec<MenuItemCreate>,
    ) -> StorageResult<(Restaurant, Vec<MenuItem>)>;

    async fn update_restaurant(
        &self,
        id: i64,
        data: RestaurantUpdate,
    ) -> StorageResult<Option<Restaurant>>;

    /// Hard delete. Reviews / bookmarks / menu items are NOT cascaded;
    /// readers tolerate the resulting orphans.
    async fn delete_restaurant(&self, id: i64) -> StorageResult<bool>;

    // ── Reviews ─────────────────────────────────────────────────────

    async fn reviews_by_restaurant(&self, restaurant_id: i64) -> StorageResult<Vec<Review>>;

    async fn reviews_by_owner(&self, owner_token: &str) -> StorageResult<Vec<Review>>;

    /// Create a review. One review per (restaurant, owner token).
    async fn create_review(&self, owner_token: &str, data: ReviewCreate)
    -> StorageResult<Review>;

    /// `None` when the review is absent OR owned by someone else.
    async fn update_review(
        &self,
        id: i64,
        owner_token: &str,
        data: ReviewUpdate,
    ) -> StorageResult<Option<Review>>;

    /// `false` when the review is absent OR owned by someone else.
    async fn delete_review(&self, id: i64, owner_token: &str) -> StorageResult<bool>;

    // ── Bookmarks ───────────────────────────────────────────────────

    /// Bookmarked restaurants with stats, deduped by restaurant,
    /// `is_bookmarked = true`, skipping bookmarks whose restaurant is gone.
    async fn bookmarked_restaurants(
        &self,
        owner_token: &str,
    ) -> StorageResult<Vec<RestaurantWithStats>>;

    async fn create_bookmark(&self, owner_token: &str, restaurant_id: i64)
    -> StorageResult<Bookmark>;

    /// Removes every matching (restaurant, owner token) row.
    async fn delete_bookmark(&self, restaurant_id: i64, owner_token: &str) -> StorageResult<bool>;

    async fn is_bookmarked(&self, restaurant_id: i64, owner_token: &str) -> StorageResult<bool>;

    // ── Menu items ──────────────────────────────────────────────────

    async fn menu_items_by_restaurant(&self, restaurant_id: i64) -> StorageResult<Vec<MenuItem>>;

    /// Popular items joined with their restaurant name
    /// ("Unknown Restaurant" when the parent is gone).
    async fn popular_menu_items(&self) -> StorageResult<Vec<PopularMenuItem>>;

    /// Create a menu item. Name must be unique within the restaurant.
    async fn create_menu_item(
        &self,
        restaurant_id: i64,
        data: MenuItemCreate,
    ) -> StorageResult<MenuItem>;

    async fn update_menu_item(
        &self,
        id: i64,
        data: MenuItemUpdate,
    ) -> StorageResult<Option<MenuItem>>;

    async fn delete_menu_item(&self, id: i64) -> StorageResult<bool>;
}
