//! Core module: configuration, shared state, server

pub mod config;
pub mod server;
pub mod state;

pub use config::{Config, StorageKind};
pub use server::Server;
pub use state::AppState;
