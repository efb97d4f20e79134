//! Gourmet Server - 本地美食发现服务后端
//!
//! # 架构概述
//!
//! 提供以下核心功能：
//!
//! - **聚合引擎** (`db::stats`): 从口コミ原始记录实时计算平均评分 / 件数
//! - **匿名所有权** (`auth`): 基于浏览器持有的 opaque token，无账号体系
//! - **双后端存储** (`db`): 内存 / SQLite 两种后端实现同一契约
//! - **HTTP API** (`api`): RESTful API 接口
//!
//! # 模块结构
//!
//! ```text
//! gourmet-server/src/
//! ├── core/          # 配置、状态、服务器
//! ├── auth/          # owner token 提取器
//! ├── api/           # HTTP 路由和处理器
//! ├── db/            # 存储契约 + 内存 / SQLite 后端 + 统计
//! └── utils/         # 错误、日志、校验
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod utils;

// Re-export 公共类型
pub use auth::{ListingToken, OwnerToken};
pub use core::{AppState, Config, Server, StorageKind};
pub use db::{MemStorage, SqliteStorage, Storage, StorageError};
pub use utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// 设置运行环境: dotenv + 日志
pub fn setup_environment() {
    dotenv::dotenv().ok();

    let log_level = std::env::var("LOG_LEVEL").ok();
    let log_dir = std::env::var("LOG_DIR").ok();
    init_logger_with_file(log_level.as_deref(), log_dir.as_deref());
}
