//! Panel application
//!
//! [`Panel`] owns the serial link, the screens and the shared context. The
//! host firmware calls [`Panel::idle`] from its main loop and the other
//! methods when something happens on the printer side.

use dgus_hal::{Crc16, SetBaudrate, SettingsSink, SettingsSource, StorageError, UartRx, UartTx};
use dgus_protocol::{Action, Frame, FrameReceiver, Inbound, Page, Register};

use crate::config::{Features, PanelConfig, TemperatureKind};
use crate::handler::{Context, HostRequest};
use crate::navigation::ShowOptions;
use crate::screens::{show_continue, ScreenSet, Settings, VersionInfo};
use crate::settings::{self, EepromReader, EepromWriter, Pid};
use crate::status::PrinterStatus;

/// Written to the USB link once its speed changed, so the host sees a restart
const USB_RESTART: &[u8] = b"        \nstart\n";

/// Asks a connected host to close the USB link
const USB_DISCONNECT: &[u8] = b"//action:disconnect\n";

/// Host command codes of [`Panel::report_command`]
pub const COMMAND_PAUSE_RESUME: u8 = 0;
pub const COMMAND_STOP: u8 = 1;

pub struct Panel<Tx, Rx> {
    tx: Tx,
    rx: Rx,
    receiver: FrameReceiver,
    screens: ScreenSet,
    ctx: Context,
    initialized: bool,
}

impl<Tx: UartTx, Rx: UartRx> Panel<Tx, Rx> {
    pub fn new(tx: Tx, rx: Rx, config: PanelConfig, versions: VersionInfo) -> Self {
        Self {
            tx,
            rx,
            receiver: FrameReceiver::new(config.frame_timeout_ms),
            screens: ScreenSet::new(versions),
            ctx: Context::new(config),
            initialized: false,
        }
    }

    /// Start from a clean link; the boot page is shown by the first idle
    pub fn setup(&mut self, now_ms: u32) {
        info!("Panel setup, link at {} bauds", self.ctx.config.lcd_baudrate);
        self.ctx.now_ms = now_ms;
        self.receiver.reset();
        self.ctx.outbox.clear();
        self.initialized = false;
    }

    /// One iteration of the panel loop
    pub fn idle(&mut self, now_ms: u32, status: &PrinterStatus) {
        self.ctx.now_ms = now_ms;
        self.ctx.state.status = *status;

        if !self.initialized {
            self.init();
        }

        self.receive();

        if let Err(e) = self.ctx.dimming.check(now_ms, &mut self.ctx.outbox) {
            warn!("Dimming check failed: {:?}", e);
        }
        self.screens.run_task(&mut self.ctx);
        self.ctx.send_status(false);
        self.flush();
    }

    fn init(&mut self) {
        self.initialized = true;
        if let Err(e) = self.ctx.dimming.reset(self.ctx.now_ms, true, &mut self.ctx.outbox) {
            warn!("Brightness not sent: {:?}", e);
        }
        self.ctx.state.texts.reset_status();

        if self.screens.mismatch.check(&mut self.ctx) {
            self.screens.versions.send_versions(&mut self.ctx);
            self.ctx.show(Page::Boot, ShowOptions::None);
        }
        self.ctx.set_status("Ready");
    }

    fn receive(&mut self) {
        match self.receiver.try_receive(&mut self.rx, self.ctx.now_ms) {
            Ok(Some(frame)) => self.process(&frame),
            Ok(None) => {}
            Err(e) => warn!("Frame dropped: {:?}", e),
        }
    }

    fn process(&mut self, frame: &Frame) {
        match Inbound::from_frame(frame) {
            Ok(Inbound::Variable { action, key, .. }) => {
                self.ctx.buzz_on_press();
                self.ctx.reset_dimming();
                match Action::from_u16(action) {
                    Some(action) => self.screens.dispatch(&mut self.ctx, action, key),
                    None => error!("Unknown action {:#x}", action),
                }
            }
            Ok(Inbound::Register { register, data }) => self.on_register(register, &data),
            Err(e) => warn!("Unexpected frame: {:?}", e),
        }
    }

    fn on_register(&mut self, register: u8, data: &[u8]) {
        let Some(&value) = data.first() else {
            warn!("Empty answer for register {:#x}", register);
            return;
        };
        match Register::from_u8(register) {
            Some(Register::TouchPanelFlag) => {
                let now_ms = self.ctx.now_ms;
                if let Err(e) = self.ctx.dimming.on_touch_flag(value, now_ms, &mut self.ctx.outbox) {
                    warn!("Touch flag not cleared: {:?}", e);
                }
            }
            Some(Register::Version) => self.screens.versions.on_panel_version(&mut self.ctx, value),
            _ => debug!("Register {:#x} ignored", register),
        }
    }

    fn flush(&mut self) {
        if self.ctx.outbox.flush(&mut self.tx).is_err() {
            warn!("Panel link write failed");
        }
    }

    /// Write the settings at the host's cursor
    pub fn write_settings(
        &self,
        sink: &mut dyn SettingsSink,
        pos: &mut usize,
        crc: &mut Crc16,
    ) -> Result<(), StorageError> {
        self.screens
            .write(&self.ctx.state, &mut EepromWriter::new(sink, pos, crc))
    }

    /// Read the settings at the host's cursor
    ///
    /// Returns `false` when the layout version differs; the defaults then apply
    /// and the mismatch page is shown at boot.
    pub fn read_settings(
        &mut self,
        source: &mut dyn SettingsSource,
        pos: &mut usize,
        crc: &mut Crc16,
    ) -> Result<bool, StorageError> {
        let ok = self
            .screens
            .read(&mut self.ctx, &mut EepromReader::new(source, pos, crc))?;
        if !ok {
            self.ctx.state.settings_mismatch = true;
        }
        Ok(ok)
    }

    /// Write the settings behind their own CRC at `base`
    pub fn store_settings<M: SettingsSink>(&mut self, medium: &mut M, base: usize) -> Result<(), StorageError> {
        let block = Settings {
            screens: &mut self.screens,
            ctx: &mut self.ctx,
        };
        settings::store(&block, medium, base)
    }

    /// Read and validate the settings stored by [`Panel::store_settings`]
    pub fn load_settings<M: SettingsSource>(&mut self, medium: &mut M, base: usize) -> Result<bool, StorageError> {
        let mut block = Settings {
            screens: &mut self.screens,
            ctx: &mut self.ctx,
        };
        let ok = settings::load(&mut block, medium, base)?;
        if !ok {
            self.ctx.state.settings_mismatch = true;
        }
        Ok(ok)
    }

    pub fn reset_settings(&mut self) {
        self.screens.reset(&mut self.ctx);
    }

    /// Bytes used by [`Panel::write_settings`]
    pub fn settings_size(&self) -> usize {
        self.screens.size_of()
    }

    /// The host rejected the stored settings
    pub fn report_settings_mismatch(&mut self) {
        self.ctx.state.settings_mismatch = true;
    }

    /// Thermal runaway or heating failure
    pub fn report_temperature_error(&mut self, message: &str) {
        error!("Temperature error: {}", message);
        self.ctx.set_status(message);
        self.ctx.send_status(true);
        self.ctx.show(Page::ThermalRunawayError, ShowOptions::None);
        self.flush();
    }

    pub fn set_status(&mut self, message: &str) {
        self.ctx.set_status(message);
    }

    pub fn clear_status(&mut self) {
        self.ctx.state.texts.reset_status();
    }

    pub fn has_status(&self) -> bool {
        self.ctx.state.texts.has_status()
    }

    /// Name of the file being printed
    pub fn set_progress_name(&mut self, name: &str) {
        let status = self.ctx.state.status;
        self.ctx
            .state
            .texts
            .set_progress_name(name, status.progress, status.elapsed_s);
    }

    /// The printer is parked for an advanced pause
    pub fn report_pause_finished(&mut self) {
        self.screens.print.pause_finished(&mut self.ctx);
    }

    /// Command issued by the host (remote control, action commands)
    pub fn report_command(&mut self, code: u8) {
        match code {
            COMMAND_PAUSE_RESUME => self.screens.print.pause_resume(&mut self.ctx),
            COMMAND_STOP => self.screens.print.stop_now(&mut self.ctx),
            _ => warn!("Unknown host command {}", code),
        }
    }

    /// A heater target was set, by the panel or not
    pub fn notify_target_temperature(&mut self, kind: TemperatureKind, temperature: u16) {
        if temperature == 0 {
            return;
        }
        self.ctx.state.set_last_used_temperature(kind, temperature);
        self.screens.pid.set_best_pid(&mut self.ctx, kind, temperature);
    }

    /// Show `message` until the user presses Continue
    pub fn wait_for_user(&mut self, message: &str) {
        show_continue(&mut self.ctx, message);
    }

    pub fn set_brightness(&mut self, brightness: u16) {
        if let Err(e) = self
            .ctx
            .dimming
            .change_brightness(brightness, self.ctx.now_ms, &mut self.ctx.outbox)
        {
            warn!("Brightness not sent: {:?}", e);
        }
    }

    /// Restart the USB link at `baudrate`
    ///
    /// With `disconnect` a connected host is asked to close the link first.
    pub fn change_usb_baudrate<U>(&mut self, usb: &mut U, baudrate: u32, disconnect: bool)
    where
        U: UartTx + SetBaudrate,
    {
        info!("USB link at {} bauds", baudrate);
        self.ctx.state.usb_baudrate = baudrate;

        if disconnect && usb.write_blocking(USB_DISCONNECT).is_err() {
            warn!("Disconnect request not sent");
        }
        if UartTx::flush(usb).is_err() {
            warn!("USB link not flushed");
        }
        if usb.set_baudrate(baudrate).is_err() {
            error!("USB baudrate {} rejected", baudrate);
            return;
        }
        if usb.write_blocking(USB_RESTART).is_err() {
            warn!("USB restart banner not sent");
        }
    }

    /// Next request for the printer, oldest first
    pub fn pop_request(&mut self) -> Option<HostRequest> {
        self.ctx.pop_request()
    }

    /// Result of a PID tuning
    pub fn add_pid(&mut self, kind: TemperatureKind, pid: Pid) {
        self.screens.pid.add_pid(kind, pid);
    }

    pub fn current_page(&self) -> Page {
        self.ctx.pages.current()
    }

    pub fn features(&self) -> Features {
        self.ctx.state.features
    }

    pub fn usb_baudrate(&self) -> u32 {
        self.ctx.state.usb_baudrate
    }

    pub fn context(&self) -> &Context {
        &self.ctx
    }

    pub fn screens(&self) -> &ScreenSet {
        &self.screens
    }

    pub fn tx(&self) -> &Tx {
        &self.tx
    }

    pub fn tx_mut(&mut self) -> &mut Tx {
        &mut self.tx
    }

    pub fn rx_mut(&mut self) -> &mut Rx {
        &mut self.rx
    }
}
