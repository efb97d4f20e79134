//! In-memory storage backend
//!
//! Explicit state container used for development and as the reference
//! implementation in the contract tests. No process-wide singletons:
//! construct one per process (or per test) and pass it by handle.
//! Id counters are monotonically increasing, scoped per entity type.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashSet;

use shared::models::{
    Bookmark, MenuItem, MenuItemCreate, MenuItemUpdate, PopularMenuItem, Restaurant,
    RestaurantCreate, RestaurantFilter, RestaurantUpdate, RestaurantWithDetails,
    RestaurantWithStats, Review, ReviewCreate, ReviewUpdate,
};
use shared::util::now_millis;

use super::{Storage, StorageError, StorageResult, UNKNOWN_RESTAURANT, check_rating, stats};

/// All mutable state behind one lock. Vecs keep insertion order, which is
/// the contract's result order.
struct MemState {
    restaurants: Vec<Restaurant>,
    reviews: Vec<Review>,
    bookmarks: Vec<Bookmark>,
    menu_items: Vec<MenuItem>,
    next_restaurant_id: i64,
    next_review_id: i64,
    next_bookmark_id: i64,
    next_menu_item_id: i64,
}

impl MemState {
    fn new() -> Self {
        Self {
            restaurants: Vec::new(),
            reviews: Vec::new(),
            bookmarks: Vec::new(),
            menu_items: Vec::new(),
            next_restaurant_id: 1,
            next_review_id: 1,
            next_bookmark_id: 1,
            next_menu_item_id: 1,
        }
    }

    fn ratings_for(&self, restaurant_id: i64) -> Vec<i64> {
        self.reviews
            .iter()
            .filter(|r| r.restaurant_id == restaurant_id)
            .map(|r| r.rating)
            .collect()
    }

    fn has_restaurant(&self, name: &str, address: &str) -> bool {
        self.restaurants
            .iter()
            .any(|r| r.name == name && r.address == address)
    }

    fn has_menu_item(&self, restaurant_id: i64, name: &str) -> bool {
        self.menu_items
            .iter()
            .any(|m| m.restaurant_id == restaurant_id && m.name == name)
    }

    fn insert_restaurant(&mut self, data: RestaurantCreate) -> Restaurant {
        let restaurant = Restaurant {
            id: self.next_restaurant_id,
            name: data.name,
            genre: data.genre,
            address: data.address,
            phone: data.phone,
            description: data.description,
            image_url: data.image_url,
            latitude: data.latitude,
            longitude: data.longitude,
            hours: data.hours,
            price_range: data.price_range,
            features: data.features,
            is_open: data.is_open,
            created_at: now_millis(),
        };
        self.next_restaurant_id += 1;
        self.restaurants.push(restaurant.clone());
        restaurant
    }

    fn insert_menu_item(&mut self, restaurant_id: i64, data: MenuItemCreate) -> MenuItem {
        let item = MenuItem {
            id: self.next_menu_item_id,
            restaurant_id,
            name: data.name,
            price: data.price,
            description: data.description,
            image_url: data.image_url,
            is_popular: data.is_popular,
        };
        self.next_menu_item_id += 1;
        self.menu_items.push(item.clone());
        item
    }
}

/// In-memory [`Storage`] backend.
pub struct MemStorage {
    state: RwLock<MemState>,
}

impl MemStorage {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(MemState::new()),
        }
    }
}

impl Default for MemStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Storage for MemStorage {
    async fn list_restaurants(
        &self,
        filter: &RestaurantFilter,
    ) -> StorageResult<Vec<RestaurantWithStats>> {
        let state = self.state.read();
        Ok(state
            .restaurants
            .iter()
            .filter(|r| stats::matches_filter(r, filter))
            .map(|r| stats::with_stats(r.clone(), &state.ratings_for(r.id)))
            .collect())
    }

    async fn get_restaurant(&self, id: i64) -> StorageResult<Option<RestaurantWithDetails>> {
        let state = self.state.read();
        let Some(restaurant) = state.restaurants.iter().find(|r| r.id == id).cloned() else {
            return Ok(None);
        };
        let reviews: Vec<Review> = state
            .reviews
            .iter()
            .filter(|r| r.restaurant_id == id)
            .cloned()
            .collect();
        let menu_items: Vec<MenuItem> = state
            .menu_items
            .iter()
            .filter(|m| m.restaurant_id == id)
            .cloned()
            .collect();
        let ratings: Vec<i64> = reviews.iter().map(|r| r.rating).collect();
        Ok(Some(RestaurantWithDetails {
            stats: stats::with_stats(restaurant, &ratings),
            reviews,
            menu_items,
        }))
    }

    async fn create_restaurant(&self, data: RestaurantCreate) -> StorageResult<Restaurant> {
        let mut state = self.state.write();
        if state.has_restaurant(&data.name, &data.address) {
            return Err(StorageError::Duplicate(format!(
                "Restaurant '{}' already exists at this address",
                data.name
            )));
        }
        Ok(state.insert_restaurant(data))
    }

    async fn create_restaurant_with_menu(
        &self,
        data: RestaurantCreate,
        items: Vec<MenuItemCreate>,
    ) -> StorageResult<(Restaurant, Vec<MenuItem>)> {
        let mut state = self.state.write();

        // Validate the whole payload before mutating anything:
        // all-or-nothing without a transaction.
        if state.has_restaurant(&data.name, &data.address) {
            return Err(StorageError::Duplicate(format!(
                "Restaurant '{}' already exists at this address",
                data.name
            )));
        }
        let mut names = HashSet::new();
        for item in &items {
            if !names.insert(item.name.as_str()) {
                return Err(StorageError::Duplicate(format!(
                    "Menu item '{}' already exists for this restaurant",
                    item.name
                )));
            }
        }

        let restaurant = state.insert_restaurant(data);
        let restaurant_id = restaurant.id;
        let created = items
            .into_iter()
            .map(|item| state.insert_menu_item(restaurant_id, item))
            .collect();
        Ok((restaurant, created))
    }

    async fn update_restaurant(
        &self,
        id: i64,
        data: RestaurantUpdate,
    ) -> StorageResult<Option<Restaurant>> {
        let mut state = self.state.write();
        let Some(restaurant) = state.restaurants.iter_mut().find(|r| r.id == id) else {
            return Ok(None);
        };
        if let Some(name) = data.name {
            restaurant.name = name;
        }
        if let Some(genre) = data.genre {
            restaurant.genre = genre;
        }
        if let Some(address) = data.address {
            restaurant.address = address;
        }
        if let Some(phone) = data.phone {
            restaurant.phone = Some(phone);
        }
        if let Some(description) = data.description {
            restaurant.description = Some(description);
        }
        if let Some(image_url) = data.image_url {
            restaurant.image_url = Some(image_url);
        }
        if let Some(latitude) = data.latitude {
            restaurant.latitude = Some(latitude);
        }
        if let Some(longitude) = data.longitude {
            restaurant.longitude = Some(longitude);
        }
        if let Some(hours) = data.hours {
            restaurant.hours = Some(hours);
        }
        if let Some(price_range) = data.price_range {
            restaurant.price_range = Some(price_range);
        }
        if let Some(features) = data.features {
            restaurant.features = features;
        }
        if let Some(is_open) = data.is_open {
            restaurant.is_open = is_open;
        }
        Ok(Some(restaurant.clone()))
    }

    async fn delete_restaurant(&self, id: i64) -> StorageResult<bool> {
        let mut state = self.state.write();
        let before = state.restaurants.len();
        // Reviews, bookmarks and menu items are left behind on purpose;
        // read paths tolerate the orphans.
        state.restaurants.retain(|r| r.id != id);
        Ok(state.restaurants.len() < before)
    }

    async fn reviews_by_restaurant(&self, restaurant_id: i64) -> StorageResult<Vec<Review>> {
        let state = self.state.read();
        Ok(state
            .reviews
            .iter()
            .filter(|r| r.restaurant_id == restaurant_id)
            .cloned()
            .collect())
    }

    async fn reviews_by_owner(&self, owner_token: &str) -> StorageResult<Vec<Review>> {
        let state = self.state.read();
        Ok(state
            .reviews
            .iter()
            .filter(|r| r.owner_token == owner_token)
            .cloned()
            .collect())
    }

    async fn create_review(
        &self,
        owner_token: &str,
        data: ReviewCreate,
    ) -> StorageResult<Review> {
        check_rating(data.rating)?;
        let mut state = self.state.write();
        if state
            .reviews
            .iter()
            .any(|r| r.restaurant_id == data.restaurant_id && r.owner_token == owner_token)
        {
            return Err(StorageError::Duplicate(
                "You have already reviewed this restaurant".to_string(),
            ));
        }
        let review = Review {
            id: state.next_review_id,
            restaurant_id: data.restaurant_id,
            owner_token: owner_token.to_string(),
            nickname: data.nickname,
            rating: data.rating,
            comment: data.comment,
            created_at: now_millis(),
        };
        state.next_review_id += 1;
        state.reviews.push(review.clone());
        Ok(review)
    }

    async fn update_review(
        &self,
        id: i64,
        owner_token: &str,
        data: ReviewUpdate,
    ) -> StorageResult<Option<Review>> {
        if let Some(rating) = data.rating {
            check_rating(rating)?;
        }
        let mut state = self.state.write();
        let Some(review) = state
            .reviews
            .iter_mut()
            .find(|r| r.id == id && r.owner_token == owner_token)
        else {
            return Ok(None);
        };
        if let Some(nickname) = data.nickname {
            review.nickname = nickname;
        }
        if let Some(rating) = data.rating {
            review.rating = rating;
        }
        if let Some(comment) = data.comment {
            review.comment = Some(comment);
        }
        Ok(Some(review.clone()))
    }

    async fn delete_review(&self, id: i64, owner_token: &str) -> StorageResult<bool> {
        let mut state = self.state.write();
        let before = state.reviews.len();
        state
            .reviews
            .retain(|r| !(r.id == id && r.owner_token == owner_token));
        Ok(state.reviews.len() < before)
    }

    async fn bookmarked_restaurants(
        &self,
        owner_token: &str,
    ) -> StorageResult<Vec<RestaurantWithStats>> {
        let state = self.state.read();
        let mut seen = HashSet::new();
        let mut result = Vec::new();
        for bookmark in state.bookmarks.iter().filter(|b| b.owner_token == owner_token) {
            if !seen.insert(bookmark.restaurant_id) {
                continue;
            }
            // Skip bookmarks whose restaurant was deleted
            let Some(restaurant) = state
                .restaurants
                .iter()
                .find(|r| r.id == bookmark.restaurant_id)
            else {
                continue;
            };
            let mut entry =
                stats::with_stats(restaurant.clone(), &state.ratings_for(restaurant.id));
            entry.is_bookmarked = Some(true);
            result.push(entry);
        }
        Ok(result)
    }

    async fn create_bookmark(
        &self,
        owner_token: &str,
        restaurant_id: i64,
    ) -> StorageResult<Bookmark> {
        let mut state = self.state.write();
        let bookmark = Bookmark {
            id: state.next_bookmark_id,
            restaurant_id,
            owner_token: owner_token.to_string(),
            created_at: now_millis(),
        };
        state.next_bookmark_id += 1;
        state.bookmarks.push(bookmark.clone());
        Ok(bookmark)
    }

    async fn delete_bookmark(&self, restaurant_id: i64, owner_token: &str) -> StorageResult<bool> {
        let mut state = self.state.write();
        let before = state.bookmarks.len();
        state
            .bookmarks
            .retain(|b| !(b.restaurant_id == restaurant_id && b.owner_token == owner_token));
        Ok(state.bookmarks.len() < before)
    }

    async fn is_bookmarked(&self, restaurant_id: i64, owner_token: &str) -> StorageResult<bool> {
        let state = self.state.read();
        Ok(state
            .bookmarks
            .iter()
            .any(|b| b.restaurant_id == restaurant_id && b.owner_token == owner_token))
    }

    async fn menu_items_by_restaurant(&self, restaurant_id: i64) -> StorageResult<Vec<MenuItem>> {
        let state = self.state.read();
        Ok(state
            .menu_items
            .iter()
            .filter(|m| m.restaurant_id == restaurant_id)
            .cloned()
            .collect())
    }

    async fn popular_menu_items(&self) -> StorageResult<Vec<PopularMenuItem>> {
        let state = self.state.read();
        Ok(state
            .menu_items
            .iter()
            .filter(|m| m.is_popular)
            .map(|item| PopularMenuItem {
                restaurant_name: state
                    .restaurants
                    .iter()
                    .find(|r| r.id == item.restaurant_id)
                    .map(|r| r.name.clone())
                    .unwrap_or_else(|| UNKNOWN_RESTAURANT.to_string()),
                item: item.clone(),
            })
            .collect())
    }

    async fn create_menu_item(
        &self,
        restaurant_id: i64,
        data: MenuItemCreate,
    ) -> StorageResult<MenuItem> {
        let mut state = self.state.write();
        if state.has_menu_item(restaurant_id, &data.name) {
            return Err(StorageError::Duplicate(format!(
                "Menu item '{}' already exists for this restaurant",
                data.name
            )));
        }
        Ok(state.insert_menu_item(restaurant_id, data))
    }

    async fn update_menu_item(
        &self,
        id: i64,
        data: MenuItemUpdate,
    ) -> StorageResult<Option<MenuItem>> {
        let mut state = self.state.write();
        let Some(index) = state.menu_items.iter().position(|m| m.id == id) else {
            return Ok(None);
        };
        if let Some(ref new_name) = data.name
            && new_name != &state.menu_items[index].name
            && state.has_menu_item(state.menu_items[index].restaurant_id, new_name)
        {
            return Err(StorageError::Duplicate(format!(
                "Menu item '{new_name}' already exists for this restaurant"
            )));
        }
        let item = &mut state.menu_items[index];
        if let Some(name) = data.name {
            item.name = name;
        }
        if let Some(price) = data.price {
            item.price = price;
        }
        if let Some(description) = data.description {
            item.description = Some(description);
        }
        if let Some(image_url) = data.image_url {
            item.image_url = Some(image_url);
        }
        if let Some(is_popular) = data.is_popular {
            item.is_popular = is_popular;
        }
        Ok(Some(item.clone()))
    }

    async fn delete_menu_item(&self, id: i64) -> StorageResult<bool> {
        let mut state = self.state.write();
        let before = state.menu_items.len();
        state.menu_items.retain(|m| m.id != id);
        Ok(state.menu_items.len() < before)
    }
}
