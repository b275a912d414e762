//! Screen handler dispatch
//!
//! Every inbound key is routed by its action to one [`Screen`]. Screens
//! reach the navigation, the task slot, the dimming and the outbox through
//! a [`Context`], and ask the printer for work through [`HostRequest`]s.

pub mod context;
pub mod request;
pub mod screen;

pub use context::{BackgroundTask, Context, PanelState, WaitCallback, WaitKey};
pub use request::{Axis, HostRequest, MAX_REQUESTS};
pub use screen::{dispatch_common, Screen};
