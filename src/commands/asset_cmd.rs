//! Asset Commands
//!
//! Photo uploads from the item form.

use crate::domain::ImageRef;
use crate::AppState;

/// Store a photo and hand back whichever reference shape succeeded
///
/// The result drops straight into `Item.image`; remote URL and inline
/// fallback render identically downstream.
pub async fn upload_photo(state: &AppState, bytes: &[u8], file_name: &str) -> ImageRef {
    state.store.upload_asset(bytes, file_name).await
}
