//! 店铺路由
//!
//! | 路径 | 方法 | 说明 | 认证 |
//! |------|------|------|------|
//! | /api/restaurants | GET | 列表（genre / search 过滤，含统计） | 无 |
//! | /api/restaurants | POST | 创建（可附带初始菜单，原子操作） | token 存在 |
//! | /api/restaurants/{id} | GET | 详情（统计 + 口コミ + 菜单） | 无 |
//! | /api/restaurants/{id}/menu-items | GET | 菜单列表 | 无 |
//! | /api/restaurants/{id}/menu-items | POST | 添加菜单项 | token 存在 |

pub mod handler;

use axum::Router;
use axum::routing::get;

use crate::core::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/restaurants",
            get(handler::list).post(handler::create),
        )
        .route("/api/restaurants/{id}", get(handler::get_by_id))
        .route(
            "/api/restaurants/{id}/menu-items",
            get(handler::list_menu_items).post(handler::create_menu_item),
        )
}
