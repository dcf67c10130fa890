//! Sync Commands
//!
//! Connectivity surface and the startup flow: probe the remote store, take
//! a first best-available list, then start watching for remote changes.

use tracing::{info, warn};

use crate::domain::Tote;
use crate::repository::Subscription;
use crate::AppState;

/// Everything the UI needs to come up
pub struct Startup {
    /// Whether the remote store answered the probe
    pub online: bool,
    /// First best-available list, in creation order
    pub totes: Vec<Tote>,
    /// Live change watch; release it to stop
    pub subscription: Subscription,
}

/// Probe, first load, and change watch in one call
pub async fn initialize(
    state: &AppState,
    on_change: impl Fn() + Send + Sync + 'static,
) -> Startup {
    let online = state.store.test_connection().await;
    if online {
        info!("remote store reachable");
    } else {
        warn!("remote store unreachable, starting from local cache");
    }

    let totes = state.store.list_totes().await;
    info!(count = totes.len(), "initial load complete");

    let subscription = state.store.subscribe_changes(on_change);
    Startup {
        online,
        totes,
        subscription,
    }
}

/// Re-probe the remote store
pub async fn connection_status(state: &AppState) -> bool {
    state.store.test_connection().await
}

/// User-triggered reload; a fresh remote attempt like any other list
pub async fn refresh_totes(state: &AppState) -> Vec<Tote> {
    state.store.list_totes().await
}

/// Start a standalone change watch with the UI's callback
pub fn watch_changes(
    state: &AppState,
    on_change: impl Fn() + Send + Sync + 'static,
) -> Subscription {
    state.store.subscribe_changes(on_change)
}
