//! DGUS link hardware abstraction layer
//!
//! This crate defines the traits the panel core needs from the board it runs
//! on. The core never touches a peripheral directly; the host firmware
//! provides implementations for its own UARTs and EEPROM.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Host firmware (printer main loop)      │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  dgus-core (navigation, screens, tasks) │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │ dgus-protocol │──────▶│   dgus-hal    │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`uart::UartTx`], [`uart::UartRx`] - Serial link to the panel
//! - [`uart::SetBaudrate`] - Serial reconfiguration
//! - [`eeprom::SettingsSink`], [`eeprom::SettingsSource`] - Settings storage

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
#[macro_use]
extern crate std;

pub mod eeprom;
pub mod uart;

pub use eeprom::{ArrayEeprom, Crc16, SettingsSink, SettingsSource, StorageError};
pub use uart::{SetBaudrate, UartConfig, UartRx, UartTx};
