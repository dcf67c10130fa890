//! Repository Integration Tests
//!
//! Exercises the sync store against a controllable in-memory remote and a
//! tempdir cache slot, covering both the remote path and the fallback path
//! of every operation.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::error::RemoteError;
use super::traits::{ChangeToken, ObjectStore, RemoteStore};
use super::{LocalCache, SyncStore};
use crate::domain::{Tote, ToteId};

/// In-memory remote with a failure switch
///
/// Flipping `set_offline(true)` makes every call fail the way an
/// unreachable backend would, forcing the store onto its fallback branch.
pub(crate) struct FakeRemote {
    rows: Mutex<Vec<Tote>>,
    uploads: Mutex<Vec<String>>,
    offline: AtomicBool,
    next_id: AtomicU64,
}

impl FakeRemote {
    pub(crate) fn new() -> Arc<FakeRemote> {
        Arc::new(FakeRemote {
            rows: Mutex::new(Vec::new()),
            uploads: Mutex::new(Vec::new()),
            offline: AtomicBool::new(false),
            next_id: AtomicU64::new(1),
        })
    }

    pub(crate) fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub(crate) fn row_count(&self) -> usize {
        self.rows.lock().expect("rows lock").len()
    }

    pub(crate) fn push_row(&self, tote: Tote) {
        self.rows.lock().expect("rows lock").push(tote);
    }

    pub(crate) fn uploads(&self) -> Vec<String> {
        self.uploads.lock().expect("uploads lock").clone()
    }

    fn guard(&self) -> Result<(), RemoteError> {
        if self.offline.load(Ordering::SeqCst) {
            Err(RemoteError::Status {
                status: reqwest::StatusCode::SERVICE_UNAVAILABLE,
                body: "simulated outage".to_string(),
            })
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl RemoteStore for FakeRemote {
    async fn count(&self) -> Result<u64, RemoteError> {
        self.guard()?;
        Ok(self.rows.lock().expect("rows lock").len() as u64)
    }

    async fn fetch_all(&self) -> Result<Vec<Tote>, RemoteError> {
        self.guard()?;
        let mut rows = self.rows.lock().expect("rows lock").clone();
        rows.sort_by_key(|tote| tote.created_at);
        Ok(rows)
    }

    async fn insert(&self, tote: &Tote) -> Result<Tote, RemoteError> {
        self.guard()?;
        let assigned = self.next_id.fetch_add(1, Ordering::SeqCst);
        let mut saved = tote.clone();
        saved.id = ToteId::Persisted(format!("tote-{:04}", assigned));
        self.rows.lock().expect("rows lock").push(saved.clone());
        Ok(saved)
    }

    async fn upsert(&self, tote: &Tote) -> Result<Tote, RemoteError> {
        self.guard()?;
        let mut rows = self.rows.lock().expect("rows lock");
        match rows.iter_mut().find(|row| row.id == tote.id) {
            Some(row) => *row = tote.clone(),
            None => rows.push(tote.clone()),
        }
        Ok(tote.clone())
    }

    async fn delete(&self, id: &ToteId) -> Result<(), RemoteError> {
        self.guard()?;
        self.rows.lock().expect("rows lock").retain(|row| &row.id != id);
        Ok(())
    }

    async fn change_token(&self) -> Result<ChangeToken, RemoteError> {
        self.guard()?;
        let rows = self.rows.lock().expect("rows lock");
        Ok(ChangeToken {
            count: rows.len() as u64,
            latest: rows.iter().map(|row| row.updated_at).max(),
        })
    }
}

#[async_trait]
impl ObjectStore for FakeRemote {
    async fn upload(
        &self,
        name: &str,
        _bytes: &[u8],
        _content_type: &str,
    ) -> Result<String, RemoteError> {
        self.guard()?;
        self.uploads.lock().expect("uploads lock").push(name.to_string());
        Ok(format!("https://remote.test/storage/{}", name))
    }
}

/// Make absorbed failures visible in test output
pub(crate) fn init_test_logging() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

/// Store wired to a fake remote and a tempdir cache, watching disabled
pub(crate) fn setup_store() -> (Arc<FakeRemote>, SyncStore, tempfile::TempDir) {
    init_test_logging();
    let dir = tempfile::tempdir().expect("tempdir");
    let remote = FakeRemote::new();
    let cache = LocalCache::new(dir.path().join("totes-inventory.json"));
    let store = SyncStore::new(remote.clone(), remote.clone(), cache, Duration::ZERO);
    (remote, store, dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Item, Position};
    use std::sync::atomic::AtomicUsize;

    fn slot(label: &str) -> Position {
        label.parse().expect("valid slot label")
    }

    #[tokio::test]
    async fn test_save_pending_assigns_remote_id() {
        let (_remote, store, _dir) = setup_store();

        let tote = Tote::new("Holiday Decorations".to_string(), slot("C4"));
        let saved = store.save_tote(tote.clone()).await;

        assert!(saved.id.is_persisted());
        assert_eq!(saved.name, tote.name);
        assert_eq!(saved.position, tote.position);
        assert!(saved.items.is_empty());
        assert_eq!(saved.created_at, tote.created_at);
    }

    #[tokio::test]
    async fn test_list_orders_by_creation_time() {
        let (_remote, store, _dir) = setup_store();

        let mut older = Tote::new("First".to_string(), slot("A1"));
        older.created_at = older.created_at - chrono::Duration::seconds(60);
        let newer = Tote::new("Second".to_string(), slot("A2"));

        // saved newest-first; the list must come back oldest-first
        store.save_tote(newer).await;
        store.save_tote(older).await;

        let totes = store.list_totes().await;
        assert_eq!(totes.len(), 2);
        assert_eq!(totes[0].name, "First");
        assert_eq!(totes[1].name, "Second");
    }

    #[tokio::test]
    async fn test_tote_lifecycle_end_to_end() {
        let (_remote, store, _dir) = setup_store();

        // create on an empty slot
        let saved = store
            .save_tote(Tote::new("Holiday Decorations".to_string(), slot("C4")))
            .await;
        assert!(saved.id.is_persisted());
        assert!(saved.items.is_empty());

        // add an item and replace the whole record
        let mut edited = saved.clone();
        edited.add_item("Lights".to_string(), None);
        store.save_tote(edited).await;

        let totes = store.list_totes().await;
        assert_eq!(totes.len(), 1);
        assert_eq!(totes[0].items.len(), 1);
        assert_eq!(totes[0].items[0].name, "Lights");

        // delete, then verify it is gone
        store.delete_tote(&saved.id).await;
        assert!(store.list_totes().await.is_empty());
    }

    #[tokio::test]
    async fn test_insert_normalizes_duplicate_item_ids() {
        let (remote, store, _dir) = setup_store();

        let mut tote = Tote::new("Tools".to_string(), slot("F1"));
        tote.items = vec![
            Item::new(7, "Hammer".to_string()),
            Item::new(7, "Tape".to_string()),
            Item::new(8, "Glue".to_string()),
        ];

        let saved = store.save_tote(tote).await;
        assert_eq!(saved.items.len(), 2);
        assert_eq!(remote.row_count(), 1);
    }

    #[tokio::test]
    async fn test_offline_save_returns_input_unchanged() {
        let (remote, store, _dir) = setup_store();
        remote.set_offline(true);

        let tote = Tote::new("X".to_string(), slot("A1"));
        let returned = store.save_tote(tote.clone()).await;

        assert_eq!(returned.id, tote.id);
        assert!(returned.id.is_pending());
        assert_eq!(remote.row_count(), 0);
    }

    #[tokio::test]
    async fn test_offline_list_serves_cache() {
        let (remote, store, _dir) = setup_store();
        remote.set_offline(true);

        let tote = Tote::new("X".to_string(), slot("A1"));
        store.save_tote(tote.clone()).await;

        let totes = store.list_totes().await;
        assert_eq!(totes.len(), 1);
        assert_eq!(totes[0].id, tote.id);
        assert_eq!(totes[0].name, "X");
    }

    #[tokio::test]
    async fn test_offline_delete_removes_from_cache() {
        let (remote, store, _dir) = setup_store();
        remote.set_offline(true);

        let tote = Tote::new("X".to_string(), slot("A1"));
        store.save_tote(tote.clone()).await;
        store.delete_tote(&tote.id).await;

        assert!(store.list_totes().await.is_empty());
    }

    #[tokio::test]
    async fn test_delete_reaches_cache_even_when_remote_up() {
        let (remote, store, _dir) = setup_store();

        // fallback write leaves a pending-id copy in the cache
        remote.set_offline(true);
        let tote = Tote::new("X".to_string(), slot("A1"));
        store.save_tote(tote.clone()).await;

        // deleting while online must still clear that copy
        remote.set_offline(false);
        store.delete_tote(&tote.id).await;

        remote.set_offline(true);
        assert!(store.list_totes().await.is_empty());
    }

    #[tokio::test]
    async fn test_connection_reflects_outage() {
        let (remote, store, _dir) = setup_store();

        assert!(store.test_connection().await);
        remote.set_offline(true);
        assert!(!store.test_connection().await);
        remote.set_offline(false);
        assert!(store.test_connection().await);
    }

    #[tokio::test]
    async fn test_upload_resolves_public_url() {
        let (remote, store, _dir) = setup_store();

        let image = store.upload_asset(&[1, 2, 3], "lights.png").await;
        assert!(!image.as_str().is_empty());
        assert!(!image.is_inline());
        assert!(image.as_str().starts_with("https://remote.test/storage/"));

        // object name is timestamp-prefixed to dodge collisions
        let uploads = remote.uploads();
        assert_eq!(uploads.len(), 1);
        assert!(uploads[0].ends_with("-lights.png"));
    }

    #[tokio::test]
    async fn test_upload_falls_back_to_inline_reference() {
        let (remote, store, _dir) = setup_store();
        remote.set_offline(true);

        let image = store.upload_asset(&[1, 2, 3], "lights.png").await;
        assert!(!image.as_str().is_empty());
        assert!(image.is_inline());
        assert!(image.as_str().starts_with("data:image/png;base64,"));
    }

    #[tokio::test]
    async fn test_watcher_notifies_on_change_until_unsubscribed() {
        init_test_logging();
        let dir = tempfile::tempdir().expect("tempdir");
        let remote = FakeRemote::new();
        let cache = LocalCache::new(dir.path().join("totes-inventory.json"));
        let store = SyncStore::new(
            remote.clone(),
            remote.clone(),
            cache,
            Duration::from_millis(20),
        );

        let fired = Arc::new(AtomicUsize::new(0));
        let counter = fired.clone();
        let subscription = store.subscribe_changes(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        assert!(subscription.is_active());

        // let the watcher record its baseline before anything changes
        tokio::time::sleep(Duration::from_millis(60)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);

        remote.push_row(Tote::new("New".to_string(), slot("B1")));
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(fired.load(Ordering::SeqCst) >= 1);

        let seen = fired.load(Ordering::SeqCst);
        subscription.unsubscribe();
        remote.push_row(Tote::new("Later".to_string(), slot("B2")));
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(fired.load(Ordering::SeqCst), seen);
    }

    #[tokio::test]
    async fn test_disabled_watching_yields_inert_handle() {
        let (remote, store, _dir) = setup_store();

        let fired = Arc::new(AtomicUsize::new(0));
        let counter = fired.clone();
        let subscription = store.subscribe_changes(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        assert!(!subscription.is_active());
        remote.push_row(Tote::new("New".to_string(), slot("B1")));
        tokio::time::sleep(Duration::from_millis(60)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
        subscription.unsubscribe();
    }
}
