//! DGUS Panel Communication Protocol
//!
//! This crate implements the UART protocol spoken by DGUS/DWIN touch panels.
//! The printer controller writes registers (page switch, brightness, buzzer)
//! and variables (temperatures, messages) and the panel reports touches by
//! answering variable reads with an action address and a key value.
//!
//! # Protocol Overview
//!
//! All messages use the same binary frame format:
//! ```text
//! ┌───────┬────────┬─────────┬─────────────┐
//! │ 5A A5 │ LENGTH │ COMMAND │ PAYLOAD     │
//! │ 2B    │ 1B     │ 1B      │ 0–249B      │
//! └───────┴────────┴─────────┴─────────────┘
//! ```
//!
//! `LENGTH` counts the command byte and the payload. Numeric fields are big
//! endian. There is no checksum; the panel's CRC mode is left disabled.

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
#[macro_use]
extern crate std;

#[macro_use]
mod fmt;

pub mod events;
pub mod frame;
pub mod messages;
pub mod page;
pub mod receiver;
pub mod text;
pub mod writer;

pub use events::{Inbound, KeyValue};
pub use frame::{Command, Frame, FrameError, FRAME_HEADER, MAX_LENGTH, MAX_PAYLOAD_SIZE};
pub use messages::{Action, Register, Variable, TOUCH_FLAG_SET};
pub use page::Page;
pub use receiver::{FrameReceiver, FRAME_TIMEOUT_MS};
pub use text::{Alignment, FixedText};
pub use writer::{Field, FrameSink, FrameWriter, Frames, Outbox, Uint16, Uint8, OUTBOX_CAPACITY};
