//! 口コミ路由
//!
//! | 路径 | 方法 | 说明 | 认证 |
//! |------|------|------|------|
//! | /api/reviews | POST | 发表口コミ | owner token |
//! | /api/reviews/user | GET | 本人发表的口コミ一览 | owner token |
//! | /api/reviews/{id} | PUT | 修改（仅限本人） | owner token |
//! | /api/reviews/{id} | DELETE | 删除（仅限本人） | owner token |

pub mod handler;

use axum::Router;
use axum::routing::{get, post, put};

use crate::core::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/reviews", post(handler::create))
        .route("/api/reviews/user", get(handler::list_mine))
        .route(
            "/api/reviews/{id}",
            put(handler::update).delete(handler::delete),
        )
}
