//! Repository Layer
//!
//! Remote store access, the local fallback cache, and the sync store that
//! arbitrates between them.

mod changes;
mod error;
mod local_cache;
mod supabase;
mod sync_store;
mod traits;

#[cfg(test)]
pub(crate) mod tests;

pub use changes::Subscription;
pub use error::{CacheError, RemoteError};
pub use local_cache::LocalCache;
pub use supabase::SupabaseClient;
pub use sync_store::SyncStore;
pub use traits::{ChangeToken, ObjectStore, RemoteStore};
