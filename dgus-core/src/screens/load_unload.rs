//! Filament load and unload
//!
//! The hotend first heats to its last used temperature. Once it is close
//! enough, a background task keeps extruding (or retracting) in small steps
//! until the user presses Back on the wait page.

use dgus_protocol::{KeyValue, Page, Uint16, Variable};

use crate::config::TemperatureKind;
use crate::handler::{dispatch_common, Context, HostRequest, Screen};
use crate::navigation::ShowOptions;
use crate::screens::ScreenSet;

pub const LOAD: u16 = 0x0001;
pub const UNLOAD: u16 = 0x0002;
pub const HOTEND1: u16 = 0x0003;
pub const HOTEND2: u16 = 0x0004;

/// Extrusion per task run (tenths of mm)
pub const STEP: i16 = 10;

/// Extrusion starts when the hotend is this close to its target (°C)
const TOLERANCE: i32 = 10;

const HEATING_MESSAGE: &str = "Wait until the target temp is reached...";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
enum Direction {
    Load,
    Unload,
}

#[derive(Debug, Clone, Copy)]
pub struct LoadUnload {
    hotend: TemperatureKind,
    target: u16,
    direction: Direction,
}

impl Default for LoadUnload {
    fn default() -> Self {
        Self::new()
    }
}

impl LoadUnload {
    pub const fn new() -> Self {
        Self {
            hotend: TemperatureKind::Hotend1,
            target: 0,
            direction: Direction::Load,
        }
    }

    /// Hotend the next load or unload uses
    pub fn hotend(&self) -> TemperatureKind {
        self.hotend
    }

    fn send_data(&self, ctx: &mut Context) {
        let temperature = ctx.state.last_used_temperature(self.hotend);
        ctx.write_values(Variable::Value0, &[Uint16::new(temperature)]);
    }

    fn select(&mut self, ctx: &mut Context, hotend: TemperatureKind) {
        self.hotend = hotend;
        self.send_data(ctx);
    }

    fn start(&mut self, ctx: &mut Context, direction: Direction) {
        self.direction = direction;
        self.target = ctx.state.last_used_temperature(self.hotend);
        debug!("{:?} with {:?} at {}", direction, self.hotend, self.target);

        ctx.request(HostRequest::SetTemperature {
            kind: self.hotend,
            value: self.target,
        });
        ctx.set_status(HEATING_MESSAGE);
        ctx.show_wait(HEATING_MESSAGE, Some(stop), None, ShowOptions::SaveBack);
        ctx.schedule(heating_task);
    }

    fn current_temperature(&self, ctx: &Context) -> i16 {
        match self.hotend {
            TemperatureKind::Hotend2 => ctx.state.status.hotend2,
            _ => ctx.state.status.hotend1,
        }
    }

    fn heating(&mut self, ctx: &mut Context) {
        if i32::from(self.current_temperature(ctx)) < i32::from(self.target) - TOLERANCE {
            return;
        }

        ctx.buzz(100);
        match self.direction {
            Direction::Load => ctx.set_status("Load filament..."),
            Direction::Unload => ctx.set_status("Unload filament..."),
        }
        ctx.schedule(extrusion_task);
    }

    fn extrusion(&mut self, ctx: &mut Context) {
        let distance = match self.direction {
            Direction::Load => STEP,
            Direction::Unload => -STEP,
        };
        ctx.request(HostRequest::Extrude {
            hotend: self.hotend,
            distance,
        });
    }
}

impl Screen for LoadUnload {
    fn prepare_page(&mut self, ctx: &mut Context) -> Option<Page> {
        self.send_data(ctx);
        Some(Page::LoadUnload)
    }

    fn dispatch(&mut self, ctx: &mut Context, key: KeyValue) -> bool {
        match key.value() {
            LOAD => self.start(ctx, Direction::Load),
            UNLOAD => self.start(ctx, Direction::Unload),
            HOTEND1 => self.select(ctx, TemperatureKind::Hotend1),
            HOTEND2 => self.select(ctx, TemperatureKind::Hotend2),
            _ => return dispatch_common(self, ctx, key),
        }
        true
    }
}

fn heating_task(screens: &mut ScreenSet, ctx: &mut Context) {
    screens.load_unload.heating(ctx);
}

fn extrusion_task(screens: &mut ScreenSet, ctx: &mut Context) {
    screens.load_unload.extrusion(ctx);
}

/// Back key of the wait page
fn stop(screens: &mut ScreenSet, ctx: &mut Context) -> bool {
    debug!("Stop {:?}", screens.load_unload.direction);
    ctx.clear_task();
    ctx.request(HostRequest::StopExtrusion);
    ctx.state.texts.reset_status();
    true
}
