//! Restaurant handlers
//!
//! Listing creation is crowd-sourced: any caller presenting a token may
//! create a restaurant or menu item. The [`ListingToken`] extractor checks
//! presence only, never ownership.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use serde::Deserialize;

use shared::models::{
    MenuItem, MenuItemCreate, Restaurant, RestaurantCreate, RestaurantFilter,
    RestaurantWithDetails, RestaurantWithStats,
};

use crate::auth::ListingToken;
use crate::core::AppState;
use crate::utils::validation::{
    MAX_ADDRESS_LEN, MAX_NAME_LEN, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, MAX_URL_LEN,
    validate_optional_text, validate_price, validate_required_text,
};
use crate::utils::{AppError, AppResult};

/// Create payload: restaurant fields plus an optional initial menu.
/// A non-empty `menuItems` list turns the request into an atomic
/// compound create.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRestaurantRequest {
    #[serde(flatten)]
    pub restaurant: RestaurantCreate,
    #[serde(default)]
    pub menu_items: Vec<MenuItemCreate>,
}

fn validate_restaurant(data: &RestaurantCreate) -> AppResult<()> {
    validate_required_text(&data.name, "name", MAX_NAME_LEN)?;
    validate_required_text(&data.genre, "genre", MAX_NAME_LEN)?;
    validate_required_text(&data.address, "address", MAX_ADDRESS_LEN)?;
    validate_optional_text(&data.phone, "phone", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&data.description, "description", MAX_NOTE_LEN)?;
    validate_optional_text(&data.image_url, "imageUrl", MAX_URL_LEN)?;
    validate_optional_text(&data.hours, "hours", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&data.price_range, "priceRange", MAX_SHORT_TEXT_LEN)?;
    Ok(())
}

fn validate_menu_item(data: &MenuItemCreate) -> AppResult<()> {
    validate_required_text(&data.name, "name", MAX_NAME_LEN)?;
    validate_price(data.price, "price")?;
    validate_optional_text(&data.description, "description", MAX_NOTE_LEN)?;
    validate_optional_text(&data.image_url, "imageUrl", MAX_URL_LEN)?;
    Ok(())
}

/// GET /api/restaurants
pub async fn list(
    State(state): State<AppState>,
    Query(filter): Query<RestaurantFilter>,
) -> AppResult<Json<Vec<RestaurantWithStats>>> {
    let restaurants = state.storage.list_restaurants(&filter).await?;
    Ok(Json(restaurants))
}

/// GET /api/restaurants/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<RestaurantWithDetails>> {
    let details = state
        .storage
        .get_restaurant(id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Restaurant {id} not found")))?;
    Ok(Json(details))
}

/// POST /api/restaurants
pub async fn create(
    State(state): State<AppState>,
    _token: ListingToken,
    Json(request): Json<CreateRestaurantRequest>,
) -> AppResult<(StatusCode, Json<Restaurant>)> {
    validate_restaurant(&request.restaurant)?;
    for item in &request.menu_items {
        validate_menu_item(item)?;
    }

    let restaurant = if request.menu_items.is_empty() {
        state.storage.create_restaurant(request.restaurant).await?
    } else {
        let (restaurant, _items) = state
            .storage
            .create_restaurant_with_menu(request.restaurant, request.menu_items)
            .await?;
        restaurant
    };

    tracing::info!(
        restaurant_id = restaurant.id,
        name = %restaurant.name,
        "Restaurant created"
    );

    Ok((StatusCode::CREATED, Json(restaurant)))
}

/// GET /api/restaurants/{id}/menu-items
pub async fn list_menu_items(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Vec<MenuItem>>> {
    let items = state.storage.menu_items_by_restaurant(id).await?;
    Ok(Json(items))
}

/// POST /api/restaurants/{id}/menu-items
pub async fn create_menu_item(
    State(state): State<AppState>,
    _token: ListingToken,
    Path(id): Path<i64>,
    Json(data): Json<MenuItemCreate>,
) -> AppResult<(StatusCode, Json<MenuItem>)> {
    validate_menu_item(&data)?;
    let item = state.storage.create_menu_item(id, data).await?;

    tracing::info!(
        menu_item_id = item.id,
        restaurant_id = id,
        "Menu item created"
    );

    Ok((StatusCode::CREATED, Json(item)))
}
