//! SQLite storage backend
//!
//! Durable backend for the long-lived deployment (WAL mode, sqlx
//! migrations). Rows are fetched raw and run through [`stats`] so the
//! observable numbers are byte-identical with the in-memory backend.
//! The compound restaurant+menu create runs in a transaction.

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::{SqliteConnection, SqlitePool};
use std::collections::{HashMap, HashSet};
use std::str::FromStr;

use shared::models::{
    Bookmark, MenuItem, MenuItemCreate, MenuItemUpdate, PopularMenuItem, Restaurant,
    RestaurantCreate, RestaurantFilter, RestaurantUpdate, RestaurantWithDetails,
    RestaurantWithStats, Review, ReviewCreate, ReviewUpdate,
};
use shared::util::now_millis;

use super::{Storage, StorageError, StorageResult, UNKNOWN_RESTAURANT, check_rating, stats};

const RESTAURANT_COLS: &str = "id, name, genre, address, phone, description, image_url, \
     latitude, longitude, hours, price_range, features, is_open, created_at";
const REVIEW_COLS: &str = "id, restaurant_id, owner_token, nickname, rating, comment, created_at";
const MENU_ITEM_COLS: &str = "id, restaurant_id, name, price, description, image_url, is_popular";

/// SQLite-backed [`Storage`] — owns a connection pool.
#[derive(Clone)]
pub struct SqliteStorage {
    pool: SqlitePool,
}

impl SqliteStorage {
    /// Open (or create) the database at `db_path` and apply migrations.
    ///
    /// Accepts a plain file path, a `sqlite:` URL, or `sqlite::memory:`.
    /// In-memory databases get a single-connection pool — every pooled
    /// connection would otherwise see its own empty database.
    pub async fn connect(db_path: &str) -> StorageResult<Self> {
        let url = if db_path.starts_with("sqlite:") {
            db_path.to_string()
        } else {
            format!("sqlite:{db_path}")
        };
        let in_memory = url.contains(":memory:");

        let mut options = SqliteConnectOptions::from_str(&url)
            .map_err(|e| StorageError::Database(format!("Invalid database path: {e}")))?
            .create_if_missing(true);
        if !in_memory {
            options = options
                .journal_mode(SqliteJournalMode::Wal)
                .synchronous(SqliteSynchronous::Normal);
        }

        let pool = SqlitePoolOptions::new()
            .max_connections(if in_memory { 1 } else { 5 })
            .connect_with(options)
            .await
            .map_err(|e| StorageError::Database(format!("Failed to open database: {e}")))?;

        // busy_timeout: wait 5s on write contention instead of failing
        sqlx::query("PRAGMA busy_timeout = 5000;")
            .execute(&pool)
            .await?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| StorageError::Database(format!("Failed to apply migrations: {e}")))?;

        tracing::info!("SQLite storage ready at {url}");
        Ok(Self { pool })
    }

    async fn find_restaurant(&self, id: i64) -> StorageResult<Option<Restaurant>> {
        let restaurant = sqlx::query_as::<_, Restaurant>(&format!(
            "SELECT {RESTAURANT_COLS} FROM restaurant WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(restaurant)
    }

    async fn find_review(&self, id: i64) -> StorageResult<Option<Review>> {
        let review =
            sqlx::query_as::<_, Review>(&format!("SELECT {REVIEW_COLS} FROM review WHERE id = ?"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(review)
    }

    async fn find_menu_item(&self, id: i64) -> StorageResult<Option<MenuItem>> {
        let item = sqlx::query_as::<_, MenuItem>(&format!(
            "SELECT {MENU_ITEM_COLS} FROM menu_item WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(item)
    }

    /// All review ratings grouped by restaurant, in one query.
    async fn ratings_by_restaurant(&self) -> StorageResult<HashMap<i64, Vec<i64>>> {
        let rows: Vec<(i64, i64)> =
            sqlx::query_as("SELECT restaurant_id, rating FROM review ORDER BY id")
                .fetch_all(&self.pool)
                .await?;
        let mut map: HashMap<i64, Vec<i64>> = HashMap::new();
        for (restaurant_id, rating) in rows {
            map.entry(restaurant_id).or_default().push(rating);
        }
        Ok(map)
    }
}

async fn restaurant_exists(
    conn: &mut SqliteConnection,
    name: &str,
    address: &str,
) -> StorageResult<bool> {
    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM restaurant WHERE name = ? AND address = ?")
            .bind(name)
            .bind(address)
            .fetch_one(conn)
            .await?;
    Ok(count > 0)
}

async fn insert_restaurant(
    conn: &mut SqliteConnection,
    data: &RestaurantCreate,
) -> StorageResult<i64> {
    let features = serde_json::to_string(&data.features)
        .map_err(|e| StorageError::Database(format!("Failed to encode features: {e}")))?;
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO restaurant (name, genre, address, phone, description, image_url, \
         latitude, longitude, hours, price_range, features, is_open, created_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?) RETURNING id",
    )
    .bind(&data.name)
    .bind(&data.genre)
    .bind(&data.address)
    .bind(&data.phone)
    .bind(&data.description)
    .bind(&data.image_url)
    .bind(data.latitude)
    .bind(data.longitude)
    .bind(&data.hours)
    .bind(&data.price_range)
    .bind(features)
    .bind(data.is_open)
    .bind(now_millis())
    .fetch_one(conn)
    .await?;
    Ok(id)
}

async fn insert_menu_item(
    conn: &mut SqliteConnection,
    restaurant_id: i64,
    data: &MenuItemCreate,
) -> StorageResult<i64> {
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO menu_item (restaurant_id, name, price, description, image_url, is_popular) \
         VALUES (?, ?, ?, ?, ?, ?) RETURNING id",
    )
    .bind(restaurant_id)
    .bind(&data.name)
    .bind(data.price)
    .bind(&data.description)
    .bind(&data.image_url)
    .bind(data.is_popular)
    .fetch_one(conn)
    .await?;
    Ok(id)
}

#[async_trait]
impl Storage for SqliteStorage {
    async fn list_restaurants(
        &self,
        filter: &RestaurantFilter,
    ) -> StorageResult<Vec<RestaurantWithStats>> {
        let restaurants = sqlx::query_as::<_, Restaurant>(&format!(
            "SELECT {RESTAURANT_COLS} FROM restaurant ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await?;
        let ratings = self.ratings_by_restaurant().await?;
        Ok(restaurants
            .into_iter()
            .filter(|r| stats::matches_filter(r, filter))
            .map(|r| {
                let rs = ratings.get(&r.id).map(Vec::as_slice).unwrap_or(&[]);
                stats::with_stats(r, rs)
            })
            .collect())
    }

    async fn get_restaurant(&self, id: i64) -> StorageResult<Option<RestaurantWithDetails>> {
        let Some(restaurant) = self.find_restaurant(id).await? else {
            return Ok(None);
        };
        let reviews = self.reviews_by_restaurant(id).await?;
        let menu_items = self.menu_items_by_restaurant(id).await?;
        let ratings: Vec<i64> = reviews.iter().map(|r| r.rating).collect();
        Ok(Some(RestaurantWithDetails {
            stats: stats::with_stats(restaurant, &ratings),
            reviews,
            menu_items,
        }))
    }

    async fn create_restaurant(&self, data: RestaurantCreate) -> StorageResult<Restaurant> {
        let mut conn = self.pool.acquire().await?;
        if restaurant_exists(&mut conn, &data.name, &data.address).await? {
            return Err(StorageError::Duplicate(format!(
                "Restaurant '{}' already exists at this address",
                data.name
            )));
        }
        let id = insert_restaurant(&mut conn, &data).await?;
        drop(conn);
        self.find_restaurant(id)
            .await?
            .ok_or_else(|| StorageError::Database("Failed to create restaurant".into()))
    }

    async fn create_restaurant_with_menu(
        &self,
        data: RestaurantCreate,
        items: Vec<MenuItemCreate>,
    ) -> StorageResult<(Restaurant, Vec<MenuItem>)> {
        // Reject duplicate item names up front; the transaction below makes
        // the whole create all-or-nothing either way.
        let mut names = HashSet::new();
        for item in &items {
            if !names.insert(item.name.as_str()) {
                return Err(StorageError::Duplicate(format!(
                    "Menu item '{}' already exists for this restaurant",
                    item.name
                )));
            }
        }

        let mut tx = self.pool.begin().await?;
        if restaurant_exists(&mut tx, &data.name, &data.address).await? {
            return Err(StorageError::Duplicate(format!(
                "Restaurant '{}' already exists at this address",
                data.name
            )));
        }
        let restaurant_id = insert_restaurant(&mut tx, &data).await?;
        for item in &items {
            insert_menu_item(&mut tx, restaurant_id, item).await?;
        }
        tx.commit().await?;

        let restaurant = self
            .find_restaurant(restaurant_id)
            .await?
            .ok_or_else(|| StorageError::Database("Failed to create restaurant".into()))?;
        let menu_items = self.menu_items_by_restaurant(restaurant_id).await?;
        Ok((restaurant, menu_items))
    }

    async fn update_restaurant(
        &self,
        id: i64,
        data: RestaurantUpdate,
    ) -> StorageResult<Option<Restaurant>> {
        let features = match &data.features {
            Some(f) => Some(
                serde_json::to_string(f)
                    .map_err(|e| StorageError::Database(format!("Failed to encode features: {e}")))?,
            ),
            None => None,
        };
        let rows = sqlx::query(
            "UPDATE restaurant SET \
             name = COALESCE(?1, name), genre = COALESCE(?2, genre), \
             address = COALESCE(?3, address), phone = COALESCE(?4, phone), \
             description = COALESCE(?5, description), image_url = COALESCE(?6, image_url), \
             latitude = COALESCE(?7, latitude), longitude = COALESCE(?8, longitude), \
             hours = COALESCE(?9, hours), price_range = COALESCE(?10, price_range), \
             features = COALESCE(?11, features), is_open = COALESCE(?12, is_open) \
             WHERE id = ?13",
        )
        .bind(&data.name)
        .bind(&data.genre)
        .bind(&data.address)
        .bind(&data.phone)
        .bind(&data.description)
        .bind(&data.image_url)
        .bind(data.latitude)
        .bind(data.longitude)
        .bind(&data.hours)
        .bind(&data.price_range)
        .bind(features)
        .bind(data.is_open)
        .bind(id)
        .execute(&self.pool)
        .await?;
        if rows.rows_affected() == 0 {
            return Ok(None);
        }
        self.find_restaurant(id).await
    }

    async fn delete_restaurant(&self, id: i64) -> StorageResult<bool> {
        // No cascade: reviews / bookmarks / menu items stay behind and the
        // read paths tolerate them.
        let rows = sqlx::query("DELETE FROM restaurant WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(rows.rows_affected() > 0)
    }

    async fn reviews_by_restaurant(&self, restaurant_id: i64) -> StorageResult<Vec<Review>> {
        let reviews = sqlx::query_as::<_, Review>(&format!(
            "SELECT {REVIEW_COLS} FROM review WHERE restaurant_id = ? ORDER BY id"
        ))
        .bind(restaurant_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(reviews)
    }

    async fn reviews_by_owner(&self, owner_token: &str) -> StorageResult<Vec<Review>> {
        let reviews = sqlx::query_as::<_, Review>(&format!(
            "SELECT {REVIEW_COLS} FROM review WHERE owner_token = ? ORDER BY id"
        ))
        .bind(owner_token)
        .fetch_all(&self.pool)
        .await?;
        Ok(reviews)
    }

    async fn create_review(
        &self,
        owner_token: &str,
        data: ReviewCreate,
    ) -> StorageResult<Review> {
        check_rating(data.rating)?;
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM review WHERE restaurant_id = ? AND owner_token = ?",
        )
        .bind(data.restaurant_id)
        .bind(owner_token)
        .fetch_one(&self.pool)
        .await?;
        if count > 0 {
            return Err(StorageError::Duplicate(
                "You have already reviewed this restaurant".to_string(),
            ));
        }
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO review (restaurant_id, owner_token, nickname, rating, comment, created_at) \
             VALUES (?, ?, ?, ?, ?, ?) RETURNING id",
        )
        .bind(data.restaurant_id)
        .bind(owner_token)
        .bind(&data.nickname)
        .bind(data.rating)
        .bind(&data.comment)
        .bind(now_millis())
        .fetch_one(&self.pool)
        .await?;
        self.find_review(id)
            .await?
            .ok_or_else(|| StorageError::Database("Failed to create review".into()))
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
        // Ownership check and update in one statement: a miss (absent or
        // not yours) is indistinguishable from the outside.
        let rows = sqlx::query(
            "UPDATE review SET nickname = COALESCE(?1, nickname), \
             rating = COALESCE(?2, rating), comment = COALESCE(?3, comment) \
             WHERE id = ?4 AND owner_token = ?5",
        )
        .bind(&data.nickname)
        .bind(data.rating)
        .bind(&data.comment)
        .bind(id)
        .bind(owner_token)
        .execute(&self.pool)
        .await?;
        if rows.rows_affected() == 0 {
            return Ok(None);
        }
        self.find_review(id).await
    }

    async fn delete_review(&self, id: i64, owner_token: &str) -> StorageResult<bool> {
        let rows = sqlx::query("DELETE FROM review WHERE id = ? AND owner_token = ?")
            .bind(id)
            .bind(owner_token)
            .execute(&self.pool)
            .await?;
        Ok(rows.rows_affected() > 0)
    }

    async fn bookmarked_restaurants(
        &self,
        owner_token: &str,
    ) -> StorageResult<Vec<RestaurantWithStats>> {
        let restaurant_ids: Vec<i64> =
            sqlx::query_scalar("SELECT restaurant_id FROM bookmark WHERE owner_token = ? ORDER BY id")
                .bind(owner_token)
                .fetch_all(&self.pool)
                .await?;
        if restaurant_ids.is_empty() {
            return Ok(Vec::new());
        }
        let ratings = self.ratings_by_restaurant().await?;
        let mut seen = HashSet::new();
        let mut result = Vec::new();
        for restaurant_id in restaurant_ids {
            if !seen.insert(restaurant_id) {
                continue;
            }
            // Skip bookmarks whose restaurant was deleted
            let Some(restaurant) = self.find_restaurant(restaurant_id).await? else {
                continue;
            };
            let rs = ratings.get(&restaurant.id).map(Vec::as_slice).unwrap_or(&[]);
            let mut entry = stats::with_stats(restaurant, rs);
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
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO bookmark (restaurant_id, owner_token, created_at) \
             VALUES (?, ?, ?) RETURNING id",
        )
        .bind(restaurant_id)
        .bind(owner_token)
        .bind(now_millis())
        .fetch_one(&self.pool)
        .await?;
        let bookmark = sqlx::query_as::<_, Bookmark>(
            "SELECT id, restaurant_id, owner_token, created_at FROM bookmark WHERE id = ?",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;
        Ok(bookmark)
    }

    async fn delete_bookmark(&self, restaurant_id: i64, owner_token: &str) -> StorageResult<bool> {
        let rows = sqlx::query("DELETE FROM bookmark WHERE restaurant_id = ? AND owner_token = ?")
            .bind(restaurant_id)
            .bind(owner_token)
            .execute(&self.pool)
            .await?;
        Ok(rows.rows_affected() > 0)
    }

    async fn is_bookmarked(&self, restaurant_id: i64, owner_token: &str) -> StorageResult<bool> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM bookmark WHERE restaurant_id = ? AND owner_token = ?",
        )
        .bind(restaurant_id)
        .bind(owner_token)
        .fetch_one(&self.pool)
        .await?;
        Ok(count > 0)
    }

    async fn menu_items_by_restaurant(&self, restaurant_id: i64) -> StorageResult<Vec<MenuItem>> {
        let items = sqlx::query_as::<_, MenuItem>(&format!(
            "SELECT {MENU_ITEM_COLS} FROM menu_item WHERE restaurant_id = ? ORDER BY id"
        ))
        .bind(restaurant_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(items)
    }

    async fn popular_menu_items(&self) -> StorageResult<Vec<PopularMenuItem>> {
        let items = sqlx::query_as::<_, MenuItem>(&format!(
            "SELECT {MENU_ITEM_COLS} FROM menu_item WHERE is_popular = 1 ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await?;
        let names: Vec<(i64, String)> = sqlx::query_as("SELECT id, name FROM restaurant")
            .fetch_all(&self.pool)
            .await?;
        let names: HashMap<i64, String> = names.into_iter().collect();
        Ok(items
            .into_iter()
            .map(|item| PopularMenuItem {
                restaurant_name: names
                    .get(&item.restaurant_id)
                    .cloned()
                    .unwrap_or_else(|| UNKNOWN_RESTAURANT.to_string()),
                item,
            })
            .collect())
    }

    async fn create_menu_item(
        &self,
        restaurant_id: i64,
        data: MenuItemCreate,
    ) -> StorageResult<MenuItem> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM menu_item WHERE restaurant_id = ? AND name = ?",
        )
        .bind(restaurant_id)
        .bind(&data.name)
        .fetch_one(&self.pool)
        .await?;
        if count > 0 {
            return Err(StorageError::Duplicate(format!(
                "Menu item '{}' already exists for this restaurant",
                data.name
            )));
        }
        let mut conn = self.pool.acquire().await?;
        let id = insert_menu_item(&mut conn, restaurant_id, &data).await?;
        drop(conn);
        self.find_menu_item(id)
            .await?
            .ok_or_else(|| StorageError::Database("Failed to create menu item".into()))
    }

    async fn update_menu_item(
        &self,
        id: i64,
        data: MenuItemUpdate,
    ) -> StorageResult<Option<MenuItem>> {
        let Some(existing) = self.find_menu_item(id).await? else {
            return Ok(None);
        };
        if let Some(ref new_name) = data.name
            && new_name != &existing.name
        {
            let count: i64 = sqlx::query_scalar(
                "SELECT COUNT(*) FROM menu_item WHERE restaurant_id = ? AND name = ?",
            )
            .bind(existing.restaurant_id)
            .bind(new_name)
            .fetch_one(&self.pool)
            .await?;
            if count > 0 {
                return Err(StorageError::Duplicate(format!(
                    "Menu item '{new_name}' already exists for this restaurant"
                )));
            }
        }
        sqlx::query(
            "UPDATE menu_item SET name = COALESCE(?1, name), price = COALESCE(?2, price), \
             description = COALESCE(?3, description), image_url = COALESCE(?4, image_url), \
             is_popular = COALESCE(?5, is_popular) WHERE id = ?6",
        )
        .bind(&data.name)
        .bind(data.price)
        .bind(&data.description)
        .bind(&data.image_url)
        .bind(data.is_popular)
        .bind(id)
        .execute(&self.pool)
        .await?;
        self.find_menu_item(id).await
    }

    async fn delete_menu_item(&self, id: i64) -> StorageResult<bool> {
        let rows = sqlx::query("DELETE FROM menu_item WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(rows.rows_affected() > 0)
    }
}
