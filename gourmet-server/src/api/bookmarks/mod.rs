//! 收藏路由
//!
//! | 路径 | 方法 | 说明 | 认证 |
//! |------|------|------|------|
//! | /api/bookmarks | GET | 收藏的店铺一览（含统计） | owner token |
//! | /api/bookmarks | POST | 添加收藏 | owner token |
//! | /api/bookmarks/{restaurantId} | DELETE | 取消收藏 | owner token |
//! | /api/bookmarks/{restaurantId}/check | GET | 收藏状态查询 | owner token |

pub mod handler;

use axum::Router;
use axum::routing::{delete, get};

use crate::core::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/bookmarks",
            get(handler::list).post(handler::create),
        )
        .route("/api/bookmarks/{restaurant_id}", delete(handler::delete))
        .route(
            "/api/bookmarks/{restaurant_id}/check",
            get(handler::check),
        )
}
