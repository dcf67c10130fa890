//! Commands Layer
//!
//! UI-facing operations over the shared application state.

mod asset_cmd;
mod sync_cmd;
mod tote_cmd;

pub use asset_cmd::*;
pub use sync_cmd::*;
pub use tote_cmd::*;
