//! 服务器配置
//!
//! # 环境变量
//!
//! 所有配置项都可以通过环境变量覆盖：
//!
//! | 环境变量 | 默认值 | 说明 |
//! |----------|--------|------|
//! | HTTP_PORT | 3000 | HTTP 服务端口 |
//! | ENVIRONMENT | development | 运行环境 |
//! | STORAGE_BACKEND | memory / sqlite | 存储后端（生产默认 sqlite） |
//! | DATABASE_PATH | gourmet.db | SQLite 数据库文件 |
//! | LOG_LEVEL | info | 日志级别 |
//! | LOG_DIR | (无) | 日志文件目录（按日轮转） |
//!
//! # 示例
//!
//! ```ignore
//! STORAGE_BACKEND=sqlite DATABASE_PATH=/data/gourmet.db cargo run
//! ```

/// Which storage backend to run on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageKind {
    /// In-memory state container; data lives for one process
    Memory,
    /// Durable SQLite database
    Sqlite,
}

impl StorageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageKind::Memory => "memory",
            StorageKind::Sqlite => "sqlite",
        }
    }
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP API port
    pub http_port: u16,
    /// Runtime environment: development | staging | production
    pub environment: String,
    /// Storage backend
    pub storage: StorageKind,
    /// SQLite database path (ignored by the memory backend)
    pub database_path: String,
}

impl Config {
    /// Load configuration from environment variables, falling back to
    /// defaults. The storage backend defaults to SQLite in production and
    /// to the in-memory store everywhere else.
    pub fn from_env() -> Self {
        let environment =
            std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());
        let storage = match std::env::var("STORAGE_BACKEND").ok().as_deref() {
            Some("sqlite") => StorageKind::Sqlite,
            Some("memory") => StorageKind::Memory,
            _ if environment == "production" => StorageKind::Sqlite,
            _ => StorageKind::Memory,
        };
        Self {
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            environment,
            storage,
            database_path: std::env::var("DATABASE_PATH")
                .unwrap_or_else(|_| "gourmet.db".into()),
        }
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// 是否开发环境
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
