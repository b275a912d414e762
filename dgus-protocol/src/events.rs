//! Inbound panel events
//!
//! The panel answers two kinds of frames: register read responses and
//! variable read responses. A touch key is reported as a variable read
//! response whose address is an [`Action`] and whose first word is the key
//! value configured on the key.

use heapless::Vec;

use crate::frame::{Command, Frame, FrameError};
use crate::messages::Action;

/// Maximum bytes kept from a register read response
pub const MAX_REGISTER_DATA: usize = 16;

/// Handler-scoped key code carried by a touch event
///
/// Each screen gives its own meaning to the values; only [`KeyValue::SHOW`],
/// [`KeyValue::SAVE`] and [`KeyValue::BACK`] are shared by all screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyValue(pub u16);

impl KeyValue {
    /// Display the screen
    pub const SHOW: Self = Self(0x0000);
    /// Persist the screen values and continue
    pub const SAVE: Self = Self(0xFFFE);
    /// Leave the screen
    pub const BACK: Self = Self(0xFFFF);

    pub const fn new(value: u16) -> Self {
        Self(value)
    }

    pub const fn value(self) -> u16 {
        self.0
    }
}

impl From<u16> for KeyValue {
    fn from(value: u16) -> Self {
        Self(value)
    }
}

/// A decoded inbound frame
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Inbound {
    /// Register read response
    Register {
        register: u8,
        data: Vec<u8, MAX_REGISTER_DATA>,
    },
    /// Variable read response, usually a touch key
    Variable {
        /// Variable address, an action address for touch keys
        action: u16,
        /// Number of words the panel reported
        words: u8,
        /// First word of the value
        key: KeyValue,
    },
}

impl Inbound {
    /// Decode a frame received from the panel
    pub fn from_frame(frame: &Frame) -> Result<Self, FrameError> {
        let payload = &frame.payload[..];
        match frame.command {
            Command::ReadRegister => {
                // register | count | bytes
                if payload.len() < 2 {
                    return Err(FrameError::InvalidFrame);
                }
                let count = payload[1] as usize;
                let bytes = &payload[2..];
                if bytes.len() < count {
                    return Err(FrameError::InvalidFrame);
                }
                let mut data = Vec::new();
                data.extend_from_slice(&bytes[..count.min(MAX_REGISTER_DATA)])
                    .map_err(|_| FrameError::PayloadTooLarge)?;
                Ok(Self::Register {
                    register: payload[0],
                    data,
                })
            }
            Command::ReadVariable => {
                // action(2) | words(1) | key(2)
                if payload.len() < 5 {
                    return Err(FrameError::InvalidFrame);
                }
                Ok(Self::Variable {
                    action: u16::from_be_bytes([payload[0], payload[1]]),
                    words: payload[2],
                    key: KeyValue(u16::from_be_bytes([payload[3], payload[4]])),
                })
            }
            // The panel acknowledges writes with "OK" frames in some modes
            Command::WriteRegister | Command::WriteVariable => Err(FrameError::InvalidFrame),
        }
    }

    /// The action addressed by a variable response, if known
    pub fn action(&self) -> Option<Action> {
        match self {
            Self::Variable { action, .. } => Action::from_u16(*action),
            Self::Register { .. } => None,
        }
    }
}
