//! Fixed-size records stored in the settings block

use dgus_hal::StorageError;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::eeprom::{EepromReader, EepromWriter};

/// A value with a fixed stored size
pub trait Record: Sized {
    /// Bytes written by [`Record::write_to`]
    const SIZE: usize;

    fn write_to(&self, eeprom: &mut EepromWriter<'_>) -> Result<(), StorageError>;
    fn read_from(eeprom: &mut EepromReader<'_>) -> Result<Self, StorageError>;
}

/// Preheat preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Preset {
    /// Hotend 1 target (°C)
    pub hotend1: u16,
    /// Hotend 2 target (°C)
    pub hotend2: u16,
    /// Bed target (°C)
    pub bed: u8,
    /// Enclosure target (°C)
    pub enclosure: u8,
    /// Fan 1 speed (%)
    pub fan1: u8,
    /// Fan 2 speed (%)
    pub fan2: u8,
}

impl Preset {
    pub const fn new(hotend1: u16, hotend2: u16, bed: u8, fan1: u8) -> Self {
        Self {
            hotend1,
            hotend2,
            bed,
            enclosure: 0,
            fan1,
            fan2: 0,
        }
    }
}

impl Record for Preset {
    const SIZE: usize = 8;

    fn write_to(&self, eeprom: &mut EepromWriter<'_>) -> Result<(), StorageError> {
        eeprom.write_u16(self.hotend1)?;
        eeprom.write_u16(self.hotend2)?;
        eeprom.write_u8(self.bed)?;
        eeprom.write_u8(self.enclosure)?;
        eeprom.write_u8(self.fan1)?;
        eeprom.write_u8(self.fan2)
    }

    fn read_from(eeprom: &mut EepromReader<'_>) -> Result<Self, StorageError> {
        Ok(Self {
            hotend1: eeprom.read_u16()?,
            hotend2: eeprom.read_u16()?,
            bed: eeprom.read_u8()?,
            enclosure: eeprom.read_u8()?,
            fan1: eeprom.read_u8()?,
            fan2: eeprom.read_u8()?,
        })
    }
}

/// Probe offset from the nozzle, in hundredths of mm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SensorPosition {
    pub x: i16,
    pub y: i16,
}

impl Record for SensorPosition {
    const SIZE: usize = 4;

    fn write_to(&self, eeprom: &mut EepromWriter<'_>) -> Result<(), StorageError> {
        eeprom.write_i16(self.x)?;
        eeprom.write_i16(self.y)
    }

    fn read_from(eeprom: &mut EepromReader<'_>) -> Result<Self, StorageError> {
        Ok(Self {
            x: eeprom.read_i16()?,
            y: eeprom.read_i16()?,
        })
    }
}

/// PID coefficients tuned at a given temperature
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Pid {
    pub kp: f32,
    pub ki: f32,
    pub kd: f32,
    /// Temperature the coefficients were tuned for (°C)
    pub temperature: u16,
}

impl Pid {
    pub const fn new(kp: f32, ki: f32, kd: f32, temperature: u16) -> Self {
        Self {
            kp,
            ki,
            kd,
            temperature,
        }
    }
}

impl Record for Pid {
    const SIZE: usize = 14;

    fn write_to(&self, eeprom: &mut EepromWriter<'_>) -> Result<(), StorageError> {
        eeprom.write_f32(self.kp)?;
        eeprom.write_f32(self.ki)?;
        eeprom.write_f32(self.kd)?;
        eeprom.write_u16(self.temperature)
    }

    fn read_from(eeprom: &mut EepromReader<'_>) -> Result<Self, StorageError> {
        Ok(Self {
            kp: eeprom.read_f32()?,
            ki: eeprom.read_f32()?,
            kd: eeprom.read_f32()?,
            temperature: eeprom.read_u16()?,
        })
    }
}

/// Write a slice of records in order
pub fn write_all<R: Record>(records: &[R], eeprom: &mut EepromWriter<'_>) -> Result<(), StorageError> {
    records.iter().try_for_each(|record| record.write_to(eeprom))
}

/// Read records into every slot of `records`
pub fn read_all<R: Record>(records: &mut [R], eeprom: &mut EepromReader<'_>) -> Result<(), StorageError> {
    for record in records.iter_mut() {
        *record = R::read_from(eeprom)?;
    }
    Ok(())
}
