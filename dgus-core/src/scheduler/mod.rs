//! Cooperative background scheduling
//!
//! Everything runs from the host's idle loop. A single task slot runs the
//! current background operation (filament load, heating wait) periodically,
//! a second timer paces the status frames and [`Dimming`] watches for
//! inactivity.

pub mod dimming;
pub mod task;

pub use dimming::Dimming;
pub use task::{reached, Periodic, TaskSlot};
