//! Domain layer - totes, items, and shelf positions

mod error;
mod item;
mod position;
mod tote;

pub use error::{DomainError, DomainResult};
pub use item::{ImageRef, Item};
pub use position::{Column, Position};
pub use tote::{mint_local_id, Tote, ToteId};
