//! Remote store abstractions
//!
//! Trait seams between the sync store and whatever backs it. Production
//! uses the Supabase client; tests swap in a controllable fake.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::error::RemoteError;
use crate::domain::{Tote, ToteId};

/// Collection watermark used to detect remote changes cheaply
///
/// Two equal tokens mean no observable change between the two reads.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChangeToken {
    /// Number of records in the collection
    pub count: u64,
    /// Most recent update stamp, if any record exists
    pub latest: Option<DateTime<Utc>>,
}

/// Structured store holding the tote collection
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Record count without payloads; doubles as the connectivity probe
    async fn count(&self) -> Result<u64, RemoteError>;

    /// Full collection ordered by creation time ascending
    async fn fetch_all(&self) -> Result<Vec<Tote>, RemoteError>;

    /// Insert with a store-assigned id; any local id is stripped first
    async fn insert(&self, tote: &Tote) -> Result<Tote, RemoteError>;

    /// Full-record replace keyed by the id the tote already carries
    async fn upsert(&self, tote: &Tote) -> Result<Tote, RemoteError>;

    /// Delete by id; deleting an absent id is not an error
    async fn delete(&self, id: &ToteId) -> Result<(), RemoteError>;

    /// Current change watermark for the collection
    async fn change_token(&self) -> Result<ChangeToken, RemoteError>;
}

/// Named-blob store holding item photos
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Upload under `name` and resolve the publicly fetchable address
    async fn upload(
        &self,
        name: &str,
        bytes: &[u8],
        content_type: &str,
    ) -> Result<String, RemoteError>;
}
