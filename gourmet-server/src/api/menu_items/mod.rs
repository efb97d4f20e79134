//! 人气菜单路由
//!
//! | 路径 | 方法 | 说明 | 认证 |
//! |------|------|------|------|
//! | /api/menu-items/popular | GET | 人气菜单一览（附店铺名） | 无 |
//!
//! 店铺下的菜单增删见 `restaurants` 路由。

use axum::{Json, Router, extract::State, routing::get};

use shared::models::PopularMenuItem;

use crate::core::AppState;
use crate::utils::AppResult;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/menu-items/popular", get(popular))
}

/// GET /api/menu-items/popular
///
/// 店铺已删除的菜单项仍会返回，店铺名回退为 "Unknown Restaurant"。
async fn popular(State(state): State<AppState>) -> AppResult<Json<Vec<PopularMenuItem>>> {
    let items = state.storage.popular_menu_items().await?;
    Ok(Json(items))
}
