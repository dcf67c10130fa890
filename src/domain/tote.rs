//! Tote Record
//!
//! A storage tote assigned to a shelf slot, with an ordered item list.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashSet;
use std::sync::atomic::{AtomicI64, Ordering};

use super::item::{ImageRef, Item};
use super::position::Position;

/// Tote identifier
///
/// `Pending` ids are minted locally (epoch milliseconds) and only exist
/// until the remote store assigns a durable one on first insert. On the
/// wire a pending id is a JSON number and a persisted id a JSON string,
/// so the untagged representation keeps the two distinguishable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ToteId {
    Pending(i64),
    Persisted(String),
}

impl ToteId {
    pub fn is_pending(&self) -> bool {
        matches!(self, ToteId::Pending(_))
    }

    pub fn is_persisted(&self) -> bool {
        matches!(self, ToteId::Persisted(_))
    }
}

impl std::fmt::Display for ToteId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ToteId::Pending(n) => write!(f, "{}", n),
            ToteId::Persisted(s) => f.write_str(s),
        }
    }
}

static LAST_MINTED: AtomicI64 = AtomicI64::new(0);

/// Mint a timestamp-derived local id, strictly increasing within the process
pub fn mint_local_id() -> i64 {
    let now = Utc::now().timestamp_millis();
    match LAST_MINTED.fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
        Some(now.max(last + 1))
    }) {
        Ok(prev) | Err(prev) => now.max(prev + 1),
    }
}

/// A storage tote and its contents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tote {
    /// Pending until the remote store assigns a durable id
    pub id: ToteId,
    /// Display label
    pub name: String,
    /// Shelf slot the tote lives in
    pub position: Position,
    /// Contents, in display order
    #[serde(default, deserialize_with = "items_or_empty")]
    pub items: Vec<Item>,
    /// Set once at creation, immutable after first persist
    pub created_at: DateTime<Utc>,
    /// Refreshed on every save
    pub updated_at: DateTime<Utc>,
}

/// Absent, null, or malformed item lists all read back as empty
fn items_or_empty<'de, D>(deserializer: D) -> Result<Vec<Item>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

impl Tote {
    /// New in-memory tote with a pending id and fresh timestamps
    pub fn new(name: String, position: Position) -> Self {
        let now = Utc::now();
        Self {
            id: ToteId::Pending(mint_local_id()),
            name,
            position,
            items: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Mint an item id unique within this tote, even for same-millisecond adds
    pub fn mint_item_id(&self) -> i64 {
        let now = Utc::now().timestamp_millis();
        let max = self.items.iter().map(|item| item.id).max().unwrap_or(0);
        now.max(max + 1)
    }

    /// Append an item with a freshly minted id
    pub fn add_item(&mut self, name: String, image: Option<ImageRef>) -> i64 {
        let id = self.mint_item_id();
        self.items.push(match image {
            Some(image) => Item::with_image(id, name, image),
            None => Item::new(id, name),
        });
        id
    }

    /// Drop items repeating an earlier item's id, keeping first occurrences
    pub fn normalized(mut self) -> Self {
        let mut seen = HashSet::new();
        self.items.retain(|item| seen.insert(item.id));
        self
    }

    /// True when some item id occurs more than once
    pub fn has_duplicate_item_ids(&self) -> bool {
        let mut seen = HashSet::new();
        self.items.iter().any(|item| !seen.insert(item.id))
    }

    /// Case-insensitive match against the tote name, slot label, and item names
    pub fn matches(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return true;
        }
        self.name.to_lowercase().contains(&query)
            || self.position.to_string().to_lowercase().contains(&query)
            || self
                .items
                .iter()
                .any(|item| item.name.to_lowercase().contains(&query))
    }
}
