//! Board-agnostic panel logic for DGUS/DWIN printer touch screens
//!
//! This crate contains everything between the printer main loop and the
//! frame codec:
//!
//! - Page navigation with a bounded history
//! - Screen handlers and their dispatch by action
//! - Background task slot, status cadence and backlight dimming
//! - Persisted panel settings
//! - Configuration type definitions
//!
//! The printer itself is reached only through [`HostRequest`]s, which the
//! host firmware drains after each [`Panel::idle`].

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
#[macro_use]
extern crate std;

#[macro_use]
mod fmt;

pub mod config;
pub mod handler;
pub mod navigation;
pub mod panel;
pub mod scheduler;
pub mod screens;
pub mod settings;
pub mod status;

pub use config::{Features, PanelConfig, TemperatureKind};
pub use handler::{Axis, Context, HostRequest, Screen};
pub use navigation::{NavigationError, Pages, ShowOptions};
pub use panel::Panel;
pub use screens::{ScreenSet, VersionInfo};
pub use settings::{Pid, Preset, SensorPosition, SETTINGS_VERSION};
pub use status::PrinterStatus;
