//! Shared data models for the Local Gourmet backend
//!
//! Wire types consumed by both the server and the web client.
//! All JSON is camelCase; DB row types opt into `sqlx::FromRow`
//! behind the `db` feature.

pub mod models;
pub mod util;
