//! Tote Item
//!
//! A single thing stored inside a tote, optionally with a photo.

use serde::{Deserialize, Serialize};

/// Reference to an item photo
///
/// Holds either a public URL on the remote object store or an inline
/// `data:` URI produced by the upload fallback. Consumers render both
/// shapes the same way, so the distinction is only observable through
/// [`ImageRef::is_inline`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageRef(String);

impl ImageRef {
    /// Reference a publicly fetchable URL
    pub fn remote(url: impl Into<String>) -> Self {
        ImageRef(url.into())
    }

    /// Encode a payload inline, the same shape a browser FileReader produces
    pub fn inline(content_type: &str, bytes: &[u8]) -> Self {
        let payload = base64::Engine::encode(
            &base64::engine::general_purpose::STANDARD,
            bytes,
        );
        ImageRef(format!("data:{};base64,{}", content_type, payload))
    }

    pub fn is_inline(&self) -> bool {
        self.0.starts_with("data:")
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ImageRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A thing stored inside a tote
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Identifier minted locally, unique within the parent tote only
    pub id: i64,
    /// Display label
    pub name: String,
    /// Optional photo
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageRef>,
}

impl Item {
    pub fn new(id: i64, name: String) -> Self {
        Self {
            id,
            name,
            image: None,
        }
    }

    pub fn with_image(id: i64, name: String, image: ImageRef) -> Self {
        Self {
            id,
            name,
            image: Some(image),
        }
    }
}
