//! 应用状态 - 持有配置和存储后端的共享引用
//!
//! `AppState` 是每个请求可见的核心数据结构。存储以 `Arc<dyn Storage>`
//! 持有：聚合与所有权逻辑对后端完全无感知，两个后端可以互换。

use std::sync::Arc;

use crate::core::{Config, StorageKind};
use crate::db::{MemStorage, SqliteStorage, Storage};

/// Shared application state (cheap to clone — Arc all the way down).
#[derive(Clone)]
pub struct AppState {
    /// Server configuration
    pub config: Config,
    /// Storage backend behind the one contract
    pub storage: Arc<dyn Storage>,
}

impl AppState {
    /// Initialize state from config, opening the configured backend.
    pub async fn initialize(config: &Config) -> anyhow::Result<Self> {
        let storage: Arc<dyn Storage> = match config.storage {
            StorageKind::Memory => {
                tracing::info!("Using in-memory storage (data lives for this process only)");
                Arc::new(MemStorage::new())
            }
            StorageKind::Sqlite => {
                let storage = SqliteStorage::connect(&config.database_path)
                    .await
                    .map_err(|e| anyhow::anyhow!("failed to open sqlite storage: {e}"))?;
                Arc::new(storage)
            }
        };
        Ok(Self {
            config: config.clone(),
            storage,
        })
    }

    /// Build state around an existing backend (tests).
    pub fn with_storage(config: Config, storage: Arc<dyn Storage>) -> Self {
        Self { config, storage }
    }
}
