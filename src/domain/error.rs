//! Domain error types shared across the command boundary.

use serde::{Deserialize, Serialize};

/// Result type for boundary operations
pub type DomainResult<T> = Result<T, DomainError>;

/// Errors produced by boundary validation
///
/// The sync layer itself never raises these; bad input is rejected before
/// a tote ever reaches it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DomainError {
    /// Input failed validation (empty name, unknown slot label)
    InvalidInput(String),
    /// Operation conflicts with current state (slot already occupied)
    Conflict(String),
    /// Referenced tote does not exist
    NotFound(String),
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DomainError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            DomainError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            DomainError::NotFound(msg) => write!(f, "Not found: {}", msg),
        }
    }
}

impl std::error::Error for DomainError {}
