//! Settings storage abstractions
//!
//! The host firmware owns the physical EEPROM and the cursor into it. The panel
//! core only asks it to copy bytes in and out; every copy is folded into a
//! running [`Crc16`] so a block can be validated after it has been read back.

/// Errors from settings storage operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StorageError {
    /// Access past the end of the storage medium
    OutOfBounds,
    /// The medium reported a write failure
    Write,
    /// The medium reported a read failure
    Read,
}

/// Running CRC-16 (polynomial 0x1021, MSB first, initial value 0)
///
/// This is the checksum the printer firmware uses for its EEPROM image, so a
/// block written by the panel core validates with the host's own check.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Crc16(u16);

impl Crc16 {
    const POLY: u16 = 0x1021;

    /// Start a new checksum
    pub const fn new() -> Self {
        Self(0)
    }

    /// Fold bytes into the checksum
    pub fn update(&mut self, data: &[u8]) {
        for &byte in data {
            self.0 ^= (byte as u16) << 8;
            for _ in 0..8 {
                self.0 = if self.0 & 0x8000 != 0 {
                    (self.0 << 1) ^ Self::POLY
                } else {
                    self.0 << 1
                };
            }
        }
    }

    /// Current checksum value
    pub const fn value(&self) -> u16 {
        self.0
    }
}

/// Destination for serialized settings
///
/// Copies `data` to the medium at `*pos`, advances `*pos` by `data.len()` and
/// folds the bytes into `crc`.
pub trait SettingsSink {
    fn write(&mut self, pos: &mut usize, data: &[u8], crc: &mut Crc16)
        -> Result<(), StorageError>;
}

/// Origin of serialized settings
///
/// Copies `data.len()` bytes from the medium at `*pos` into `data`, advances
/// `*pos` and folds the bytes into `crc`.
pub trait SettingsSource {
    fn read(&mut self, pos: &mut usize, data: &mut [u8], crc: &mut Crc16)
        -> Result<(), StorageError>;
}

/// RAM-backed storage medium
///
/// Used by simulators and tests; starts erased (all `0xFF`).
#[derive(Debug, Clone)]
pub struct ArrayEeprom<const N: usize> {
    bytes: [u8; N],
}

impl<const N: usize> Default for ArrayEeprom<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> ArrayEeprom<N> {
    /// Create an erased medium
    pub const fn new() -> Self {
        Self { bytes: [0xFF; N] }
    }

    /// Raw content
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Raw content, for corrupting data on purpose
    pub fn as_mut_bytes(&mut self) -> &mut [u8] {
        &mut self.bytes
    }

    fn range(pos: usize, len: usize) -> Result<core::ops::Range<usize>, StorageError> {
        let end = pos.checked_add(len).ok_or(StorageError::OutOfBounds)?;
        if end > N {
            return Err(StorageError::OutOfBounds);
        }
        Ok(pos..end)
    }
}

impl<const N: usize> SettingsSink for ArrayEeprom<N> {
    fn write(
        &mut self,
        pos: &mut usize,
        data: &[u8],
        crc: &mut Crc16,
    ) -> Result<(), StorageError> {
        let range = Self::range(*pos, data.len())?;
        self.bytes[range].copy_from_slice(data);
        crc.update(data);
        *pos += data.len();
        Ok(())
    }
}

impl<const N: usize> SettingsSource for ArrayEeprom<N> {
    fn read(
        &mut self,
        pos: &mut usize,
        data: &mut [u8],
        crc: &mut Crc16,
    ) -> Result<(), StorageError> {
        let range = Self::range(*pos, data.len())?;
        data.copy_from_slice(&self.bytes[range]);
        crc.update(data);
        *pos += data.len();
        Ok(())
    }
}
