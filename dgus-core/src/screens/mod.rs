//! Screen handlers
//!
//! Every touch key carries an [`Action`] that selects the screen handling it.
//! The [`ScreenSet`] owns one instance of each screen, routes the keys, and
//! runs the wait page callbacks once a key has been handled.
//!
//! The screens with persisted values are serialized here, in layout order:
//!
//! ```text
//! version | preheat | sensor | pid | features | usb baudrate
//! ```

pub mod factory_reset;
pub mod lcd;
pub mod load_unload;
pub mod menu;
pub mod mismatch;
pub mod motion;
pub mod pid;
pub mod preheat;
pub mod print;
pub mod sensor;
pub mod simple;
pub mod versions;
pub mod wait;

pub use factory_reset::FactoryReset;
pub use lcd::LcdSettings;
pub use load_unload::LoadUnload;
pub use menu::MenuEntry;
pub use mismatch::EepromMismatch;
pub use motion::Motion;
pub use pid::PidSettings;
pub use preheat::Preheat;
pub use print::Print;
pub use sensor::SensorSettings;
pub use simple::{SimplePage, SIMPLE_PAGES};
pub use versions::{VersionInfo, Versions};
pub use wait::{show_continue, Wait};

use dgus_hal::StorageError;
use dgus_protocol::{Action, KeyValue};

use crate::config::Features;
use crate::handler::{Context, HostRequest, PanelState, Screen, WaitKey};
use crate::navigation::ShowOptions;
use crate::settings::{EepromReader, EepromWriter, SettingsBlock, SETTINGS_VERSION};

/// All the screens of the panel
pub struct ScreenSet {
    pub wait: Wait,
    pub load_unload: LoadUnload,
    pub preheat: Preheat,
    pub motion: Motion,
    pub factory_reset: FactoryReset,
    pub sensor: SensorSettings,
    pub lcd: LcdSettings,
    pub versions: Versions,
    pub print: Print,
    pub pid: PidSettings,
    pub mismatch: EepromMismatch,
    simple: [SimplePage; SIMPLE_PAGES.len()],
}

impl ScreenSet {
    pub fn new(versions: VersionInfo) -> Self {
        Self {
            wait: Wait,
            load_unload: LoadUnload::new(),
            preheat: Preheat::new(),
            motion: Motion::new(),
            factory_reset: FactoryReset,
            sensor: SensorSettings::new(),
            lcd: LcdSettings,
            versions: Versions::new(versions),
            print: Print::new(),
            pid: PidSettings::new(),
            mismatch: EepromMismatch,
            simple: SIMPLE_PAGES,
        }
    }

    /// Screen handling `action`
    pub fn screen_mut(&mut self, action: Action) -> Option<&mut dyn Screen> {
        let screen: &mut dyn Screen = match action {
            Action::PrintCommand => &mut self.print,
            Action::Wait => &mut self.wait,
            Action::LoadUnload => &mut self.load_unload,
            Action::Preheat => &mut self.preheat,
            Action::Move => &mut self.motion,
            Action::FactoryReset => &mut self.factory_reset,
            Action::SensorSettings => &mut self.sensor,
            Action::Lcd => &mut self.lcd,
            Action::Versions => &mut self.versions,
            Action::PidSettings => &mut self.pid,
            Action::EepromMismatch => &mut self.mismatch,
            _ => self.simple.iter_mut().find(|page| page.action() == action)?,
        };
        Some(screen)
    }

    /// Route a key to its handler
    pub fn dispatch(&mut self, ctx: &mut Context, action: Action, key: KeyValue) {
        trace!("Key {:?} {:#x}", action, key.value());
        match action {
            Action::Screens => self.menu(ctx, key),
            Action::LcdBrightness => self.lcd.change_brightness(ctx, key),
            _ if action.is_increment() => match Motion::jog_of(action) {
                Some((axis, distance)) => self.motion.jog(ctx, axis, distance),
                None => ctx.request(HostRequest::Adjust { action, key }),
            },
            _ => match self.screen_mut(action) {
                Some(screen) => screen.handle(ctx, key),
                None => error!("No screen for action {:?}", action),
            },
        }
        self.run_wait_callback(ctx);
    }

    fn menu(&mut self, ctx: &mut Context, key: KeyValue) {
        if key == KeyValue::BACK {
            ctx.show_back();
            return;
        }
        match MenuEntry::from_key(key, ctx.state.status.printing) {
            Some(MenuEntry::Screen(action)) => {
                if let Some(screen) = self.screen_mut(action) {
                    screen.show(ctx, ShowOptions::SaveBack);
                }
            }
            Some(MenuEntry::Page(page)) => ctx.show(page, ShowOptions::SaveBack),
            None => error!("Invalid menu key {:#x}", key.value()),
        }
    }

    /// Run the callback of a wait key pressed during this dispatch
    fn run_wait_callback(&mut self, ctx: &mut Context) {
        let Some((key, callback)) = ctx.take_wait_callback() else {
            return;
        };
        if !callback(self, ctx) {
            return;
        }
        match key {
            WaitKey::Back => {
                ctx.show_back();
            }
            WaitKey::Continue => {
                if !ctx.show_forward() {
                    ctx.show_back();
                }
            }
        }
    }

    /// Run the background task if it is due
    pub fn run_task(&mut self, ctx: &mut Context) {
        if let Some(task) = ctx.tasks.tick(ctx.now_ms) {
            task(self, ctx);
        }
    }

    /// Write the persisted values
    pub fn write(&self, state: &PanelState, eeprom: &mut EepromWriter<'_>) -> Result<(), StorageError> {
        eeprom.write_u16(SETTINGS_VERSION)?;
        self.preheat.write(eeprom)?;
        self.sensor.write(eeprom)?;
        self.pid.write(eeprom)?;
        eeprom.write_u16(state.features.bits())?;
        eeprom.write_u32(state.usb_baudrate)
    }

    /// Read the persisted values and apply them
    ///
    /// The whole block is always consumed so the cursor and the CRC cover it.
    /// Returns `false` on a version mismatch; everything is then reset.
    pub fn read(&mut self, ctx: &mut Context, eeprom: &mut EepromReader<'_>) -> Result<bool, StorageError> {
        let version = eeprom.read_u16()?;
        self.preheat.read(eeprom)?;
        self.sensor.read(eeprom)?;
        self.pid.read(eeprom)?;
        ctx.state.features = Features::from_bits(eeprom.read_u16()?);
        ctx.state.usb_baudrate = eeprom.read_u32()?;

        if version != SETTINGS_VERSION {
            warn!("Settings version {:#x}, expected {:#x}", version, SETTINGS_VERSION);
            self.reset(ctx);
            return Ok(false);
        }

        let dimming = ctx.state.features.contains(Features::DIMMING);
        ctx.enable_dimming(dimming, false);
        Ok(true)
    }

    /// Restore and apply the defaults
    pub fn reset(&mut self, ctx: &mut Context) {
        self.preheat.reset();
        self.sensor.reset();
        self.pid.reset();
        ctx.state.features = ctx.config.default_features;
        ctx.state.usb_baudrate = ctx.config.default_usb_baudrate;

        let dimming = ctx.state.features.contains(Features::DIMMING);
        ctx.enable_dimming(dimming, true);
    }

    /// Bytes written by [`ScreenSet::write`]
    pub fn size_of(&self) -> usize {
        2 + self.preheat.size_of() + self.sensor.size_of() + self.pid.size_of() + 2 + 4
    }
}

/// The persisted values as one [`SettingsBlock`]
pub struct Settings<'a> {
    pub screens: &'a mut ScreenSet,
    pub ctx: &'a mut Context,
}

impl SettingsBlock for Settings<'_> {
    fn write(&self, eeprom: &mut EepromWriter<'_>) -> Result<(), StorageError> {
        self.screens.write(&self.ctx.state, eeprom)
    }

    fn read(&mut self, eeprom: &mut EepromReader<'_>) -> Result<bool, StorageError> {
        self.screens.read(self.ctx, eeprom)
    }

    fn reset(&mut self) {
        self.screens.reset(self.ctx);
    }

    fn size_of(&self) -> usize {
        self.screens.size_of()
    }
}
