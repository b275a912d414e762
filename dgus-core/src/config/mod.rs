//! Configuration types
//!
//! Board-agnostic panel settings. Values the user can change from the panel
//! are persisted through [`crate::settings`]; the rest is fixed by the host
//! firmware when it builds the [`crate::Panel`].

pub mod types;

pub use types::*;
