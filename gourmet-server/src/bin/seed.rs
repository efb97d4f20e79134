//! 开发用种子数据写入: `cargo run --bin seed`

use gourmet_server::core::{AppState, Config, StorageKind};
use gourmet_server::db::seed::seed_restaurants;
use gourmet_server::setup_environment;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    setup_environment();

    let config = Config::from_env();
    if config.storage == StorageKind::Memory {
        tracing::warn!("Seeding the in-memory backend: data is gone when this process exits");
    }

    let state = AppState::initialize(&config).await?;
    let count = seed_restaurants(state.storage.as_ref()).await?;

    tracing::info!(
        "Seeded {count} restaurants ({} backend)",
        config.storage.as_str()
    );
    Ok(())
}
