//! Sync store
//!
//! Remote-primary data access with a silent local fallback. Every public
//! operation attempts the remote store first and substitutes a best-effort
//! local result on failure; none of them return errors. Callers that need
//! to know whether data is authoritative check `test_connection` or re-list
//! separately.

use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use super::changes::{self, Subscription};
use super::local_cache::LocalCache;
use super::traits::{ObjectStore, RemoteStore};
use crate::domain::{ImageRef, Tote, ToteId};

/// Single entry point for the record collection
///
/// Cheap to clone; all clones share the same remote client and cache slot.
/// Operations are not serialized against each other, so read-your-write
/// callers must await the write before issuing the read.
#[derive(Clone)]
pub struct SyncStore {
    remote: Arc<dyn RemoteStore>,
    objects: Arc<dyn ObjectStore>,
    cache: LocalCache,
    watch_interval: Duration,
}

impl SyncStore {
    pub fn new(
        remote: Arc<dyn RemoteStore>,
        objects: Arc<dyn ObjectStore>,
        cache: LocalCache,
        watch_interval: Duration,
    ) -> SyncStore {
        SyncStore {
            remote,
            objects,
            cache,
            watch_interval,
        }
    }

    /// Lightweight reachability probe; false on any failure
    pub async fn test_connection(&self) -> bool {
        match self.remote.count().await {
            Ok(count) => {
                debug!(count, "remote store reachable");
                true
            }
            Err(e) => {
                debug!(error = %e, "connection test failed");
                false
            }
        }
    }

    /// Remote list in creation order, or the cache snapshot when that fails
    ///
    /// The return value carries no flag for which source answered; it is
    /// best-available data by contract.
    pub async fn list_totes(&self) -> Vec<Tote> {
        match self.remote.fetch_all().await {
            Ok(totes) => totes,
            Err(e) => {
                warn!(error = %e, "remote list failed, serving local cache");
                self.cache.read_all()
            }
        }
    }

    /// Insert or replace depending on id kind
    ///
    /// A pending id means the record has never held durable identity, so
    /// the remote inserts and assigns one; a persisted id means a
    /// full-record upsert. On remote failure the input is written to the
    /// cache as-is, under whichever id it currently holds, and returned
    /// unchanged.
    pub async fn save_tote(&self, tote: Tote) -> Tote {
        let result = if tote.id.is_pending() {
            let insert = tote.clone().normalized();
            self.remote.insert(&insert).await
        } else {
            self.remote.upsert(&tote).await
        };

        match result {
            Ok(saved) => saved,
            Err(e) => {
                warn!(id = %tote.id, error = %e, "remote save failed, writing local cache");
                self.cache.upsert(&tote);
                tote
            }
        }
    }

    /// Best-effort delete against the remote store and the cache
    ///
    /// The two removals are independent; a failure in one never blocks the
    /// other, and neither is surfaced.
    pub async fn delete_tote(&self, id: &ToteId) {
        if let Err(e) = self.remote.delete(id).await {
            warn!(%id, error = %e, "remote delete failed");
        }
        self.cache.remove(id);
    }

    /// Store a photo and return whichever reference shape succeeded
    ///
    /// The object name is prefixed with the current time in milliseconds so
    /// repeated uploads of the same file never collide. On failure the
    /// payload is inlined as a `data:` URI; both shapes render the same.
    pub async fn upload_asset(&self, bytes: &[u8], name: &str) -> ImageRef {
        let object_name = format!("{}-{}", Utc::now().timestamp_millis(), name);
        let content_type = mime_guess::from_path(name).first_or_octet_stream();

        match self
            .objects
            .upload(&object_name, bytes, content_type.as_ref())
            .await
        {
            Ok(url) => ImageRef::remote(url),
            Err(e) => {
                warn!(name = %object_name, error = %e, "upload failed, inlining image");
                ImageRef::inline(content_type.as_ref(), bytes)
            }
        }
    }

    /// Watch the collection, invoking `on_change` whenever anything changes
    ///
    /// Must be called from within the runtime; the watch task is spawned
    /// onto it and runs until the returned handle is released. When
    /// watching is disabled by configuration this returns an inert handle
    /// instead of failing.
    pub fn subscribe_changes(&self, on_change: impl Fn() + Send + Sync + 'static) -> Subscription {
        changes::watch(self.remote.clone(), self.watch_interval, on_change)
    }
}
