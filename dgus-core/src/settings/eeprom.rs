//! Typed access to the host EEPROM callbacks

use dgus_hal::{Crc16, SettingsSink, SettingsSource, StorageError};

/// Writes settings fields at the host's cursor
pub struct EepromWriter<'a> {
    sink: &'a mut dyn SettingsSink,
    pos: &'a mut usize,
    crc: &'a mut Crc16,
}

impl<'a> EepromWriter<'a> {
    pub fn new(sink: &'a mut dyn SettingsSink, pos: &'a mut usize, crc: &'a mut Crc16) -> Self {
        Self { sink, pos, crc }
    }

    /// Current cursor position
    pub fn position(&self) -> usize {
        *self.pos
    }

    pub fn write_bytes(&mut self, data: &[u8]) -> Result<(), StorageError> {
        self.sink.write(self.pos, data, self.crc)
    }

    pub fn write_u8(&mut self, value: u8) -> Result<(), StorageError> {
        self.write_bytes(&[value])
    }

    pub fn write_u16(&mut self, value: u16) -> Result<(), StorageError> {
        self.write_bytes(&value.to_le_bytes())
    }

    pub fn write_i16(&mut self, value: i16) -> Result<(), StorageError> {
        self.write_bytes(&value.to_le_bytes())
    }

    pub fn write_u32(&mut self, value: u32) -> Result<(), StorageError> {
        self.write_bytes(&value.to_le_bytes())
    }

    pub fn write_f32(&mut self, value: f32) -> Result<(), StorageError> {
        self.write_bytes(&value.to_le_bytes())
    }
}

/// Reads settings fields at the host's cursor
pub struct EepromReader<'a> {
    source: &'a mut dyn SettingsSource,
    pos: &'a mut usize,
    crc: &'a mut Crc16,
}

impl<'a> EepromReader<'a> {
    pub fn new(source: &'a mut dyn SettingsSource, pos: &'a mut usize, crc: &'a mut Crc16) -> Self {
        Self { source, pos, crc }
    }

    /// Current cursor position
    pub fn position(&self) -> usize {
        *self.pos
    }

    pub fn read_bytes(&mut self, data: &mut [u8]) -> Result<(), StorageError> {
        self.source.read(self.pos, data, self.crc)
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N], StorageError> {
        let mut bytes = [0u8; N];
        self.read_bytes(&mut bytes)?;
        Ok(bytes)
    }

    pub fn read_u8(&mut self) -> Result<u8, StorageError> {
        Ok(self.read_array::<1>()?[0])
    }

    pub fn read_u16(&mut self) -> Result<u16, StorageError> {
        Ok(u16::from_le_bytes(self.read_array()?))
    }

    pub fn read_i16(&mut self) -> Result<i16, StorageError> {
        Ok(i16::from_le_bytes(self.read_array()?))
    }

    pub fn read_u32(&mut self) -> Result<u32, StorageError> {
        Ok(u32::from_le_bytes(self.read_array()?))
    }

    pub fn read_f32(&mut self) -> Result<f32, StorageError> {
        Ok(f32::from_le_bytes(self.read_array()?))
    }
}
