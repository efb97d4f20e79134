//! Data models
//!
//! Shared between gourmet-server and the frontend (via API).
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY), timestamps are Unix millis.

pub mod bookmark;
pub mod menu_item;
pub mod restaurant;
pub mod review;

// Re-exports
pub use bookmark::*;
pub use menu_item::*;
pub use restaurant::*;
pub use review::*;
