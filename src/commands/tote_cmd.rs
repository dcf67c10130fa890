//! Tote Commands
//!
//! The UI boundary for the tote collection. All input validation happens
//! here; the sync store below accepts whatever it is handed and never
//! rejects.

use chrono::Utc;
use std::collections::BTreeMap;

use crate::domain::{DomainError, DomainResult, Item, Position, Tote, ToteId};
use crate::AppState;

/// Create a tote on an empty slot
///
/// The slot label is parsed against the fixed valid set before the store
/// is ever involved, so an out-of-grid label never reaches it.
pub async fn create_tote(
    state: &AppState,
    name: String,
    position: String,
    items: Vec<Item>,
) -> DomainResult<Tote> {
    let name = name.trim();
    if name.is_empty() {
        return Err(DomainError::InvalidInput(
            "tote name must not be empty".to_string(),
        ));
    }
    let position: Position = position.parse()?;

    let occupied = state
        .store
        .list_totes()
        .await
        .into_iter()
        .any(|tote| tote.position == position);
    if occupied {
        return Err(DomainError::Conflict(format!(
            "slot {} is already occupied",
            position
        )));
    }

    let mut tote = Tote::new(name.to_string(), position);
    tote.items = items;
    Ok(state.store.save_tote(tote.normalized()).await)
}

/// Replace a tote wholesale, refreshing its update stamp
pub async fn update_tote(state: &AppState, mut tote: Tote) -> DomainResult<Tote> {
    if tote.name.trim().is_empty() {
        return Err(DomainError::InvalidInput(
            "tote name must not be empty".to_string(),
        ));
    }
    if tote.has_duplicate_item_ids() {
        return Err(DomainError::InvalidInput(
            "item ids must be unique within a tote".to_string(),
        ));
    }

    tote.name = tote.name.trim().to_string();
    tote.updated_at = Utc::now();
    Ok(state.store.save_tote(tote).await)
}

/// Fetch one tote by id from the best available source
pub async fn get_tote(state: &AppState, id: &ToteId) -> DomainResult<Tote> {
    state
        .store
        .list_totes()
        .await
        .into_iter()
        .find(|tote| &tote.id == id)
        .ok_or_else(|| DomainError::NotFound(format!("tote {}", id)))
}

/// Remove a tote; never fails, with or without the remote
pub async fn delete_tote(state: &AppState, id: &ToteId) {
    state.store.delete_tote(id).await;
}

/// Best-available list in creation order
pub async fn list_totes(state: &AppState) -> Vec<Tote> {
    state.store.list_totes().await
}

/// Totes matching the search box against name, slot label, and item names
pub async fn search_totes(state: &AppState, query: &str) -> Vec<Tote> {
    state
        .store
        .list_totes()
        .await
        .into_iter()
        .filter(|tote| tote.matches(query))
        .collect()
}

/// Matching totes grouped by slot, in grid display order
pub async fn grid_totes(state: &AppState, query: &str) -> BTreeMap<Position, Vec<Tote>> {
    let mut grid: BTreeMap<Position, Vec<Tote>> = BTreeMap::new();
    for tote in search_totes(state, query).await {
        grid.entry(tote.position).or_default().push(tote);
    }
    grid
}
