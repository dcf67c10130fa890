//! Tote Inventory Backend
//!
//! Layered architecture:
//! - domain: Totes, items, and shelf positions
//! - repository: Remote store access, the local cache, and sync arbitration
//! - commands: UI-facing operations over the shared state
//!
//! Records live in the remote store when it is reachable and in a local
//! snapshot cache when it is not; the sync store degrades silently between
//! the two, so every command always answers with best-available data.

use std::sync::Arc;
use std::time::Duration;
use tracing::info;

pub mod commands;
pub mod config;
pub mod domain;
pub mod repository;

use config::StoreConfig;
use repository::{LocalCache, RemoteError, SupabaseClient, SyncStore};

/// Application state shared across commands
pub struct AppState {
    pub store: SyncStore,
}

impl AppState {
    /// Build the remote client, cache slot, and sync store from configuration
    ///
    /// Called once at process start; the client handle lives for the
    /// process lifetime and needs no teardown.
    pub fn init(config: &StoreConfig) -> Result<AppState, RemoteError> {
        let client = Arc::new(SupabaseClient::new(config)?);
        let store = SyncStore::new(
            client.clone(),
            client,
            LocalCache::new(&config.cache_path),
            Duration::from_secs(config.watch_interval_secs),
        );
        info!(collection = %config.collection, "sync store initialized");
        Ok(AppState { store })
    }

    /// Wrap an existing store; embedders and tests assemble their own
    pub fn with_store(store: SyncStore) -> AppState {
        AppState { store }
    }
}
