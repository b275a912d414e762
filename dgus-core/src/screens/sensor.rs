//! Probe position settings

use dgus_hal::StorageError;
use dgus_protocol::messages::LONG_TEXT_LENGTH;
use dgus_protocol::{FixedText, KeyValue, Page, Uint16, Variable};

use crate::handler::{dispatch_common, Context, HostRequest, Screen};
use crate::settings::records::{read_all, write_all};
use crate::settings::{EepromReader, EepromWriter, Record, SensorPosition};

pub const SENSOR_POSITIONS: usize = 3;

pub const PREVIOUS: u16 = 0x0001;
pub const NEXT: u16 = 0x0002;

const NAMES: [&str; SENSOR_POSITIONS] = ["Mark II", "Left side", "Custom"];

const DEFAULT_POSITIONS: [SensorPosition; SENSOR_POSITIONS] = [
    SensorPosition { x: -2800, y: -2500 },
    SensorPosition { x: -2400, y: -3900 },
    SensorPosition { x: 0, y: 0 },
];

#[derive(Debug, Clone)]
pub struct SensorSettings {
    positions: [SensorPosition; SENSOR_POSITIONS],
    index: usize,
}

impl Default for SensorSettings {
    fn default() -> Self {
        Self::new()
    }
}

impl SensorSettings {
    pub const fn new() -> Self {
        Self {
            positions: DEFAULT_POSITIONS,
            index: 0,
        }
    }

    /// Position currently selected on the page
    pub fn current(&self) -> SensorPosition {
        self.positions[self.index]
    }

    pub fn positions(&self) -> &[SensorPosition; SENSOR_POSITIONS] {
        &self.positions
    }

    fn send_data(&self, ctx: &mut Context) {
        let position = self.current();
        let name = FixedText::<LONG_TEXT_LENGTH>::from_text(NAMES[self.index]);
        ctx.write_text(Variable::LongText0, &name);
        ctx.write_values(
            Variable::Value0,
            &[Uint16::from_i16(position.x), Uint16::from_i16(position.y)],
        );
    }

    fn previous_command(&mut self, ctx: &mut Context) {
        if self.index == 0 {
            return;
        }
        self.index -= 1;
        self.send_data(ctx);
    }

    fn next_command(&mut self, ctx: &mut Context) {
        if self.index + 1 >= SENSOR_POSITIONS {
            return;
        }
        self.index += 1;
        self.send_data(ctx);
    }
}

impl Screen for SensorSettings {
    fn prepare_page(&mut self, ctx: &mut Context) -> Option<Page> {
        self.send_data(ctx);
        Some(Page::SensorSettings)
    }

    fn dispatch(&mut self, ctx: &mut Context, key: KeyValue) -> bool {
        match key.value() {
            PREVIOUS => self.previous_command(ctx),
            NEXT => self.next_command(ctx),
            _ => return dispatch_common(self, ctx, key),
        }
        true
    }

    /// Use the selected position and persist it
    fn save_command(&mut self, ctx: &mut Context) {
        ctx.request(HostRequest::SensorOffset(self.current()));
        ctx.save_settings();
        if !ctx.show_forward() {
            ctx.show_back();
        }
    }

    fn write(&self, eeprom: &mut EepromWriter<'_>) -> Result<(), StorageError> {
        write_all(&self.positions, eeprom)
    }

    fn read(&mut self, eeprom: &mut EepromReader<'_>) -> Result<(), StorageError> {
        read_all(&mut self.positions, eeprom)
    }

    fn reset(&mut self) {
        self.positions = DEFAULT_POSITIONS;
        self.index = 0;
    }

    fn size_of(&self) -> usize {
        SENSOR_POSITIONS * SensorPosition::SIZE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PanelConfig;

    #[test]
    fn test_save_sends_offset_then_saves() {
        let mut ctx = Context::new(PanelConfig::default());
        let mut sensor = SensorSettings::new();
        sensor.handle(&mut ctx, KeyValue::SHOW);
        sensor.handle(&mut ctx, KeyValue::new(NEXT));
        sensor.handle(&mut ctx, KeyValue::SAVE);

        assert_eq!(
            ctx.pop_request(),
            Some(HostRequest::SensorOffset(SensorPosition { x: -2400, y: -3900 }))
        );
        assert_eq!(ctx.pop_request(), Some(HostRequest::SaveSettings));
        assert_eq!(ctx.pages.current(), Page::Main);
    }

    #[test]
    fn test_reset_selects_first() {
        let mut ctx = Context::new(PanelConfig::default());
        let mut sensor = SensorSettings::new();
        sensor.handle(&mut ctx, KeyValue::new(NEXT));
        sensor.handle(&mut ctx, KeyValue::new(NEXT));
        sensor.handle(&mut ctx, KeyValue::new(NEXT));
        assert_eq!(sensor.current(), DEFAULT_POSITIONS[2]);
        sensor.reset();
        assert_eq!(sensor.current(), DEFAULT_POSITIONS[0]);
    }
}
