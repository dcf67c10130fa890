//! Repository error types
//!
//! Remote and cache failures are plain values here. The sync store absorbs
//! every one of them; nothing below this layer reaches a caller.

use thiserror::Error;

/// Failure talking to the remote store (network, auth, schema)
#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("remote returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("could not encode record: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("remote returned no row for {0}")]
    MissingRow(String),
}

/// Failure reading or writing the local snapshot file
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("snapshot io failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("snapshot serialization failed: {0}")]
    Serde(#[from] serde_json::Error),
}
