//! Preheat presets

use core::fmt::Write;

use dgus_hal::StorageError;
use dgus_protocol::messages::SHORT_TEXT_LENGTH;
use dgus_protocol::{FixedText, KeyValue, Page, Uint16, Variable};

use crate::config::TemperatureKind;
use crate::handler::{dispatch_common, Context, HostRequest, Screen};
use crate::settings::records::{read_all, write_all};
use crate::settings::{EepromReader, EepromWriter, Preset, Record};

pub const PRESET_COUNT: usize = 5;

pub const PREVIOUS: u16 = 0x0001;
pub const NEXT: u16 = 0x0002;
pub const COOLDOWN: u16 = 0x0003;

const DEFAULT_PRESETS: [Preset; PRESET_COUNT] = [
    Preset::new(180, 0, 50, 100),
    Preset::new(200, 0, 60, 100),
    Preset::new(220, 0, 70, 100),
    Preset::new(240, 0, 80, 50),
    Preset::new(250, 0, 100, 0),
];

#[derive(Debug, Clone)]
pub struct Preheat {
    presets: [Preset; PRESET_COUNT],
    index: usize,
}

impl Default for Preheat {
    fn default() -> Self {
        Self::new()
    }
}

impl Preheat {
    pub const fn new() -> Self {
        Self {
            presets: DEFAULT_PRESETS,
            index: 0,
        }
    }

    pub fn presets(&self) -> &[Preset; PRESET_COUNT] {
        &self.presets
    }

    pub fn index(&self) -> usize {
        self.index
    }

    fn send_presets(&self, ctx: &mut Context) {
        let preset = &self.presets[self.index];
        ctx.write_values(
            Variable::Value0,
            &[
                Uint16::new(preset.hotend1),
                Uint16::new(preset.hotend2),
                Uint16::new(preset.bed as u16),
                Uint16::new(preset.fan1 as u16),
            ],
        );

        let mut title = FixedText::<SHORT_TEXT_LENGTH>::new();
        let _ = write!(title, "Preset {}", self.index + 1);
        ctx.write_text(Variable::ShortText0, &title);
    }

    fn previous_command(&mut self, ctx: &mut Context) {
        if self.index == 0 {
            return;
        }
        self.index -= 1;
        self.send_presets(ctx);
    }

    fn next_command(&mut self, ctx: &mut Context) {
        if self.index + 1 >= PRESET_COUNT {
            return;
        }
        self.index += 1;
        self.send_presets(ctx);
    }

    fn cooldown_command(&mut self, ctx: &mut Context) {
        ctx.request(HostRequest::Cooldown);
        ctx.set_status("Cooldown...");
    }
}

impl Screen for Preheat {
    fn prepare_page(&mut self, ctx: &mut Context) -> Option<Page> {
        self.send_presets(ctx);
        Some(Page::Preheat)
    }

    fn dispatch(&mut self, ctx: &mut Context, key: KeyValue) -> bool {
        match key.value() {
            PREVIOUS => self.previous_command(ctx),
            NEXT => self.next_command(ctx),
            COOLDOWN => self.cooldown_command(ctx),
            _ => return dispatch_common(self, ctx, key),
        }
        true
    }

    /// Heat with the selected preset
    fn save_command(&mut self, ctx: &mut Context) {
        let preset = self.presets[self.index];
        let targets = [
            (TemperatureKind::Hotend1, preset.hotend1),
            (TemperatureKind::Hotend2, preset.hotend2),
            (TemperatureKind::Bed, preset.bed as u16),
            (TemperatureKind::Enclosure, preset.enclosure as u16),
        ];
        for (kind, value) in targets {
            if value != 0 || kind == TemperatureKind::Hotend1 || kind == TemperatureKind::Bed {
                ctx.request(HostRequest::SetTemperature { kind, value });
            }
        }
        ctx.request(HostRequest::SetFan {
            percent: preset.fan1,
        });
        ctx.set_status("Preheat...");
        ctx.show_back();
    }

    fn write(&self, eeprom: &mut EepromWriter<'_>) -> Result<(), StorageError> {
        write_all(&self.presets, eeprom)
    }

    fn read(&mut self, eeprom: &mut EepromReader<'_>) -> Result<(), StorageError> {
        read_all(&mut self.presets, eeprom)
    }

    fn reset(&mut self) {
        self.presets = DEFAULT_PRESETS;
        self.index = 0;
    }

    fn size_of(&self) -> usize {
        PRESET_COUNT * Preset::SIZE
    }
}
