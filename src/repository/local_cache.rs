//! Local snapshot cache
//!
//! One JSON file holding the whole collection. Always read-all, mutate in
//! memory, write-all-back; two racing writers lose one write and that is
//! an accepted property of the fallback path, not something to lock over.

use std::path::PathBuf;
use tracing::warn;

use super::error::CacheError;
use crate::domain::{Tote, ToteId};

/// Whole-snapshot fallback store
#[derive(Debug, Clone)]
pub struct LocalCache {
    path: PathBuf,
}

impl LocalCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        LocalCache { path: path.into() }
    }

    /// Read the snapshot; a missing or unreadable file reads as empty
    pub fn read_all(&self) -> Vec<Tote> {
        match self.try_read() {
            Ok(totes) => totes,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "cache read failed, treating as empty");
                Vec::new()
            }
        }
    }

    /// Replace the record carrying this tote's id, or append it
    pub fn upsert(&self, tote: &Tote) {
        let mut totes = self.read_all();
        match totes.iter_mut().find(|existing| existing.id == tote.id) {
            Some(existing) => *existing = tote.clone(),
            None => totes.push(tote.clone()),
        }
        if let Err(e) = self.try_write(&totes) {
            warn!(path = %self.path.display(), error = %e, "cache write failed, save not retained");
        }
    }

    /// Drop the record with this id, if present
    pub fn remove(&self, id: &ToteId) {
        let mut totes = self.read_all();
        totes.retain(|existing| &existing.id != id);
        if let Err(e) = self.try_write(&totes) {
            warn!(path = %self.path.display(), error = %e, "cache write failed, removal not retained");
        }
    }

    fn try_read(&self) -> Result<Vec<Tote>, CacheError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let raw = std::fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    fn try_write(&self, totes: &[Tote]) -> Result<(), CacheError> {
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() {
                std::fs::create_dir_all(dir)?;
            }
        }
        let raw = serde_json::to_string(totes)?;
        std::fs::write(&self.path, raw)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Position;

    fn tote(name: &str, slot: &str) -> Tote {
        Tote::new(name.to_string(), slot.parse::<Position>().expect("valid slot"))
    }

    fn cache_in(dir: &tempfile::TempDir) -> LocalCache {
        LocalCache::new(dir.path().join("totes-inventory.json"))
    }

    #[test]
    fn test_missing_file_reads_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert!(cache_in(&dir).read_all().is_empty());
    }

    #[test]
    fn test_upsert_appends_then_replaces() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cache = cache_in(&dir);

        let mut first = tote("Garage", "A1");
        cache.upsert(&first);
        cache.upsert(&tote("Kitchen", "B2"));
        assert_eq!(cache.read_all().len(), 2);

        first.name = "Garage Tools".to_string();
        cache.upsert(&first);

        let totes = cache.read_all();
        assert_eq!(totes.len(), 2);
        assert_eq!(totes[0].name, "Garage Tools");
    }

    #[test]
    fn test_remove_drops_only_matching_id() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cache = cache_in(&dir);

        let keep = tote("Garage", "A1");
        let gone = tote("Kitchen", "B2");
        cache.upsert(&keep);
        cache.upsert(&gone);

        cache.remove(&gone.id);
        let totes = cache.read_all();
        assert_eq!(totes.len(), 1);
        assert_eq!(totes[0].id, keep.id);
    }

    #[test]
    fn test_corrupt_file_reads_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("totes-inventory.json");
        std::fs::write(&path, "not json at all").expect("write");
        assert!(LocalCache::new(path).read_all().is_empty());
    }
}
