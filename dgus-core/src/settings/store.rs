//! Checksummed settings envelope
//!
//! When the host leaves the integrity check to the panel code, the block is
//! stored behind its own CRC:
//!
//! ```text
//! crc u16 (LE) | block
//! ```

use dgus_hal::{Crc16, SettingsSink, SettingsSource, StorageError};

use super::eeprom::{EepromReader, EepromWriter};

const CRC_SIZE: usize = 2;

/// A versioned group of persisted values
pub trait SettingsBlock {
    /// Write every field in layout order
    fn write(&self, eeprom: &mut EepromWriter<'_>) -> Result<(), StorageError>;

    /// Read every field in layout order
    ///
    /// Returns `false` when the version tag does not match, in which case the
    /// block has been reset to its defaults.
    fn read(&mut self, eeprom: &mut EepromReader<'_>) -> Result<bool, StorageError>;

    /// Restore the defaults
    fn reset(&mut self);

    /// Bytes written by [`SettingsBlock::write`]
    fn size_of(&self) -> usize;
}

/// Bytes used by [`store`]
pub fn stored_size<B: SettingsBlock + ?Sized>(block: &B) -> usize {
    CRC_SIZE + block.size_of()
}

/// Write `block` and its CRC at `base`
pub fn store<B, M>(block: &B, medium: &mut M, base: usize) -> Result<(), StorageError>
where
    B: SettingsBlock + ?Sized,
    M: SettingsSink,
{
    let mut pos = base + CRC_SIZE;
    let mut crc = Crc16::new();
    block.write(&mut EepromWriter::new(medium, &mut pos, &mut crc))?;

    let mut pos = base;
    let mut unused = Crc16::new();
    medium.write(&mut pos, &crc.value().to_le_bytes(), &mut unused)?;

    debug!("Settings stored, crc {:#x}", crc.value());
    Ok(())
}

/// Read `block` from `base` and validate it
///
/// Returns `Ok(false)` when the CRC or the version does not match; the block
/// then holds its defaults. A storage error also leaves the defaults in place.
pub fn load<B, M>(block: &mut B, medium: &mut M, base: usize) -> Result<bool, StorageError>
where
    B: SettingsBlock + ?Sized,
    M: SettingsSource,
{
    let mut pos = base;
    let mut unused = Crc16::new();
    let mut stored = [0u8; CRC_SIZE];
    if let Err(e) = medium.read(&mut pos, &mut stored, &mut unused) {
        block.reset();
        return Err(e);
    }

    let mut crc = Crc16::new();
    let version_ok = match block.read(&mut EepromReader::new(medium, &mut pos, &mut crc)) {
        Ok(ok) => ok,
        Err(e) => {
            block.reset();
            return Err(e);
        }
    };

    let stored = u16::from_le_bytes(stored);
    if !version_ok || crc.value() != stored {
        warn!(
            "Settings rejected (version ok: {}, crc {:#x} != {:#x}), using defaults",
            version_ok,
            crc.value(),
            stored
        );
        block.reset();
        return Ok(false);
    }
    Ok(true)
}
