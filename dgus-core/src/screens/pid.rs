//! PID coefficients per heater
//!
//! Each heater keeps a few PID sets tuned at different temperatures. When a
//! target temperature is set, the set tuned closest to it is applied.

use core::fmt::Write;

use dgus_hal::StorageError;
use dgus_protocol::messages::SHORT_TEXT_LENGTH;
use dgus_protocol::{FixedText, KeyValue, Page, Uint16, Variable};

use crate::config::TemperatureKind;
use crate::handler::{dispatch_common, Context, HostRequest, Screen};
use crate::settings::records::{read_all, write_all};
use crate::settings::{EepromReader, EepromWriter, Pid, Record};

/// PID sets kept per heater
pub const PID_ENTRIES: usize = 3;

pub const HOTEND1: u16 = 0x0001;
pub const HOTEND2: u16 = 0x0002;
pub const BED: u16 = 0x0003;
pub const PREVIOUS: u16 = 0x0004;
pub const NEXT: u16 = 0x0005;

const DEFAULT_HOTEND_PID: Pid = Pid::new(22.2, 1.08, 114.0, 200);
const DEFAULT_BED_PID: Pid = Pid::new(234.88, 42.79, 322.28, 60);

#[derive(Debug, Clone)]
pub struct PidSettings {
    hotend1: [Pid; PID_ENTRIES],
    hotend2: [Pid; PID_ENTRIES],
    bed: [Pid; PID_ENTRIES],
    kind: TemperatureKind,
    index: usize,
}

impl Default for PidSettings {
    fn default() -> Self {
        Self::new()
    }
}

impl PidSettings {
    pub const fn new() -> Self {
        Self {
            hotend1: [DEFAULT_HOTEND_PID; PID_ENTRIES],
            hotend2: [DEFAULT_HOTEND_PID; PID_ENTRIES],
            bed: [DEFAULT_BED_PID; PID_ENTRIES],
            kind: TemperatureKind::Hotend1,
            index: 0,
        }
    }

    /// PID sets of a heater, `None` for heaters without PID
    pub fn entries(&self, kind: TemperatureKind) -> Option<&[Pid; PID_ENTRIES]> {
        match kind {
            TemperatureKind::Hotend1 => Some(&self.hotend1),
            TemperatureKind::Hotend2 => Some(&self.hotend2),
            TemperatureKind::Bed => Some(&self.bed),
            TemperatureKind::Enclosure => None,
        }
    }

    fn entries_mut(&mut self, kind: TemperatureKind) -> Option<&mut [Pid; PID_ENTRIES]> {
        match kind {
            TemperatureKind::Hotend1 => Some(&mut self.hotend1),
            TemperatureKind::Hotend2 => Some(&mut self.hotend2),
            TemperatureKind::Bed => Some(&mut self.bed),
            TemperatureKind::Enclosure => None,
        }
    }

    /// Apply the set tuned closest to `temperature`
    pub fn set_best_pid(&self, ctx: &mut Context, kind: TemperatureKind, temperature: u16) {
        let Some(entries) = self.entries(kind) else {
            return;
        };
        let Some(best) = entries
            .iter()
            .min_by_key(|pid| pid.temperature.abs_diff(temperature))
        else {
            return;
        };
        debug!("Best PID for {} is tuned at {}", temperature, best.temperature);
        ctx.request(HostRequest::ApplyPid { kind, pid: *best });
    }

    /// Record the result of a PID tuning
    ///
    /// A set tuned at the same temperature is replaced. Otherwise the new set
    /// goes first and the last one is dropped.
    pub fn add_pid(&mut self, kind: TemperatureKind, pid: Pid) {
        let Some(entries) = self.entries_mut(kind) else {
            warn!("No PID for {:?}", kind);
            return;
        };
        if let Some(same) = entries.iter_mut().find(|e| e.temperature == pid.temperature) {
            *same = pid;
            return;
        }
        entries.rotate_right(1);
        entries[0] = pid;
    }

    fn selected(&self) -> Option<Pid> {
        self.entries(self.kind).map(|entries| entries[self.index])
    }

    fn send_data(&self, ctx: &mut Context) {
        let Some(pid) = self.selected() else {
            return;
        };

        let mut title = FixedText::<SHORT_TEXT_LENGTH>::new();
        let heater = match self.kind {
            TemperatureKind::Hotend2 => "Hotend 2",
            TemperatureKind::Bed => "Bed",
            _ => "Hotend 1",
        };
        let _ = write!(title, "{} #{}", heater, self.index + 1);
        ctx.write_text(Variable::ShortText0, &title);

        ctx.write_values(
            Variable::Value0,
            &[
                Uint16::new(pid.temperature),
                Uint16::new(display_coefficient(pid.kp)),
                Uint16::new(display_coefficient(pid.ki)),
                Uint16::new(display_coefficient(pid.kd)),
            ],
        );
    }

    fn select(&mut self, ctx: &mut Context, kind: TemperatureKind) {
        self.kind = kind;
        self.index = 0;
        self.send_data(ctx);
    }

    fn previous_command(&mut self, ctx: &mut Context) {
        if self.index == 0 {
            return;
        }
        self.index -= 1;
        self.send_data(ctx);
    }

    fn next_command(&mut self, ctx: &mut Context) {
        if self.index + 1 >= PID_ENTRIES {
            return;
        }
        self.index += 1;
        self.send_data(ctx);
    }
}

impl Screen for PidSettings {
    fn prepare_page(&mut self, ctx: &mut Context) -> Option<Page> {
        self.index = 0;
        self.send_data(ctx);
        Some(Page::PidSettings)
    }

    fn dispatch(&mut self, ctx: &mut Context, key: KeyValue) -> bool {
        match key.value() {
            HOTEND1 => self.select(ctx, TemperatureKind::Hotend1),
            HOTEND2 => self.select(ctx, TemperatureKind::Hotend2),
            BED => self.select(ctx, TemperatureKind::Bed),
            PREVIOUS => self.previous_command(ctx),
            NEXT => self.next_command(ctx),
            _ => return dispatch_common(self, ctx, key),
        }
        true
    }

    /// Apply the selected set and persist
    fn save_command(&mut self, ctx: &mut Context) {
        if let Some(pid) = self.selected() {
            ctx.request(HostRequest::ApplyPid {
                kind: self.kind,
                pid,
            });
        }
        ctx.save_settings();
        if !ctx.show_forward() {
            ctx.show_back();
        }
    }

    fn write(&self, eeprom: &mut EepromWriter<'_>) -> Result<(), StorageError> {
        write_all(&self.hotend1, eeprom)?;
        write_all(&self.hotend2, eeprom)?;
        write_all(&self.bed, eeprom)
    }

    fn read(&mut self, eeprom: &mut EepromReader<'_>) -> Result<(), StorageError> {
        read_all(&mut self.hotend1, eeprom)?;
        read_all(&mut self.hotend2, eeprom)?;
        read_all(&mut self.bed, eeprom)
    }

    fn reset(&mut self) {
        *self = Self::new();
    }

    fn size_of(&self) -> usize {
        3 * PID_ENTRIES * Pid::SIZE
    }
}

/// Coefficient in hundredths, clamped to what the panel shows (0.00..=655.35)
fn display_coefficient(value: f32) -> u16 {
    let scaled = value * 100.0 + 0.5;
    if scaled.is_nan() || scaled <= 0.0 {
        0
    } else if scaled >= f32::from(u16::MAX) {
        u16::MAX
    } else {
        scaled as u16
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PanelConfig;

    fn applied(ctx: &mut Context) -> Option<(TemperatureKind, Pid)> {
        match ctx.pop_request()? {
            HostRequest::ApplyPid { kind, pid } => Some((kind, pid)),
            _ => None,
        }
    }

    #[test]
    fn test_best_pid_is_closest() {
        let mut ctx = Context::new(PanelConfig::default());
        let mut pids = PidSettings::new();
        pids.add_pid(TemperatureKind::Hotend1, Pid::new(20.0, 1.0, 100.0, 240));
        pids.add_pid(TemperatureKind::Hotend1, Pid::new(25.0, 1.5, 110.0, 180));

        pids.set_best_pid(&mut ctx, TemperatureKind::Hotend1, 235);
        assert_eq!(applied(&mut ctx).map(|(_, p)| p.temperature), Some(240));

        pids.set_best_pid(&mut ctx, TemperatureKind::Hotend1, 185);
        assert_eq!(applied(&mut ctx).map(|(_, p)| p.temperature), Some(180));

        pids.set_best_pid(&mut ctx, TemperatureKind::Bed, 70);
        assert_eq!(
            applied(&mut ctx),
            Some((TemperatureKind::Bed, DEFAULT_BED_PID))
        );
    }

    #[test]
    fn test_no_pid_for_enclosure() {
        let mut ctx = Context::new(PanelConfig::default());
        PidSettings::new().set_best_pid(&mut ctx, TemperatureKind::Enclosure, 40);
        assert_eq!(ctx.pop_request(), None);
    }

    #[test]
    fn test_add_pid_replaces_same_temperature() {
        let mut pids = PidSettings::new();
        pids.add_pid(TemperatureKind::Bed, Pid::new(1.0, 2.0, 3.0, 60));
        let bed = pids.entries(TemperatureKind::Bed).unwrap();
        assert_eq!(bed[0], Pid::new(1.0, 2.0, 3.0, 60));
        assert_eq!(bed[1], DEFAULT_BED_PID);
    }

    #[test]
    fn test_add_pid_drops_oldest() {
        let mut pids = PidSettings::new();
        pids.add_pid(TemperatureKind::Hotend2, Pid::new(1.0, 1.0, 1.0, 210));
        pids.add_pid(TemperatureKind::Hotend2, Pid::new(2.0, 2.0, 2.0, 220));
        let hotend2 = pids.entries(TemperatureKind::Hotend2).unwrap();
        assert_eq!(hotend2[0].temperature, 220);
        assert_eq!(hotend2[1].temperature, 210);
        assert_eq!(hotend2[2], DEFAULT_HOTEND_PID);
    }

    #[test]
    fn test_save_applies_selected() {
        let mut ctx = Context::new(PanelConfig::default());
        let mut pids = PidSettings::new();
        pids.handle(&mut ctx, KeyValue::SHOW);
        pids.handle(&mut ctx, KeyValue::new(BED));
        pids.handle(&mut ctx, KeyValue::SAVE);

        assert_eq!(
            applied(&mut ctx),
            Some((TemperatureKind::Bed, DEFAULT_BED_PID))
        );
        assert_eq!(ctx.pop_request(), Some(HostRequest::SaveSettings));
        assert_eq!(ctx.pages.current(), Page::Main);
    }

    #[test]
    fn test_display_coefficient_is_clamped() {
        assert_eq!(display_coefficient(22.2), 2220);
        assert_eq!(display_coefficient(-1.5), 0);
        assert_eq!(display_coefficient(f32::NAN), 0);
        assert_eq!(display_coefficient(1000.0), u16::MAX);
    }
}
