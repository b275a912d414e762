//! Persistent settings
//!
//! The panel settings are one versioned block inside the printer EEPROM. The
//! block is written and read field by field through the host's storage
//! callbacks, which fold every byte into a running CRC. A block whose CRC or
//! version does not match is discarded as a whole and the defaults apply.
//!
//! Layout, all little endian:
//!
//! ```text
//! version u16 | presets 5 x 8 | sensor positions 3 x 4 | pids 9 x 14 | features u16 | usb baudrate u32
//! ```

pub mod eeprom;
pub mod records;
pub mod store;

pub use eeprom::{EepromReader, EepromWriter};
pub use records::{Pid, Preset, Record, SensorPosition};
pub use store::{load, store, stored_size, SettingsBlock};

/// Version tag of the settings layout
///
/// Bump on any change of the layout so older blocks are rejected.
pub const SETTINGS_VERSION: u16 = 0x0401;
