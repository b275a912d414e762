//! Services shared by every screen handler

use dgus_protocol::messages::LONG_TEXT_LENGTH;
use dgus_protocol::{
    Alignment, FixedText, FrameWriter, Outbox, Page, Register, Uint16, Uint8, Variable,
};
use heapless::Deque;

use super::request::{HostRequest, MAX_REQUESTS};
use crate::config::{Features, PanelConfig, TemperatureKind};
use crate::navigation::{Pages, ShowOptions};
use crate::scheduler::{Dimming, Periodic, TaskSlot};
use crate::screens::ScreenSet;
use crate::status::{PrinterStatus, StatusTexts};

/// Deferred operation run by the idle loop
pub type BackgroundTask = fn(&mut ScreenSet, &mut Context);

/// Action of a wait page key; `true` leaves the wait page
pub type WaitCallback = fn(&mut ScreenSet, &mut Context) -> bool;

/// Keys of the wait pages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WaitKey {
    Back,
    Continue,
}

/// Panel values that outlive a single screen
#[derive(Debug, Clone)]
pub struct PanelState {
    pub features: Features,
    pub usb_baudrate: u32,
    /// Stored settings were rejected and the user has not acknowledged it
    pub settings_mismatch: bool,
    pub texts: StatusTexts,
    /// Last snapshot given to the idle loop
    pub status: PrinterStatus,
    last_used_temperature: [u16; TemperatureKind::COUNT],
}

impl PanelState {
    pub fn new(config: &PanelConfig) -> Self {
        Self {
            features: config.default_features,
            usb_baudrate: config.default_usb_baudrate,
            settings_mismatch: false,
            texts: StatusTexts::new(),
            status: PrinterStatus::default(),
            last_used_temperature: [60, 200, 200, 0],
        }
    }

    /// Last non-zero target set for a heater
    pub fn last_used_temperature(&self, kind: TemperatureKind) -> u16 {
        self.last_used_temperature[kind.index()]
    }

    pub fn set_last_used_temperature(&mut self, kind: TemperatureKind, temperature: u16) {
        self.last_used_temperature[kind.index()] = temperature;
    }
}

/// Everything a screen handler may touch besides the screens themselves
pub struct Context {
    /// Time of the current idle iteration (ms)
    pub now_ms: u32,
    pub config: PanelConfig,
    pub pages: Pages,
    pub tasks: TaskSlot<BackgroundTask>,
    /// Status frame cadence
    pub update: Periodic,
    pub dimming: Dimming,
    /// Frames waiting for the end of the iteration
    pub outbox: Outbox,
    pub state: PanelState,
    requests: Deque<HostRequest, MAX_REQUESTS>,
    wait_back: Option<WaitCallback>,
    wait_continue: Option<WaitCallback>,
    pending_wait: Option<WaitKey>,
}

impl Context {
    pub fn new(config: PanelConfig) -> Self {
        Self {
            now_ms: 0,
            config,
            pages: Pages::new(),
            tasks: TaskSlot::new(),
            update: Periodic::new(config.status_period_ms),
            dimming: Dimming::new(config.dimming),
            outbox: Outbox::new(),
            state: PanelState::new(&config),
            requests: Deque::new(),
            wait_back: None,
            wait_continue: None,
            pending_wait: None,
        }
    }

    pub fn show(&mut self, page: Page, options: ShowOptions) {
        if let Err(e) = self.pages.show(page, options, &mut self.outbox) {
            error!("Cannot show page {:?}: {:?}", page, e);
        }
    }

    /// Returns `false` when there was no page to go back to
    pub fn show_back(&mut self) -> bool {
        match self.pages.show_back(&mut self.outbox) {
            Ok(shown) => shown,
            Err(e) => {
                error!("Cannot show back page: {:?}", e);
                true
            }
        }
    }

    /// Returns `false` when no forward page was recorded
    pub fn show_forward(&mut self) -> bool {
        match self.pages.show_forward(&mut self.outbox) {
            Ok(shown) => shown,
            Err(e) => {
                error!("Cannot show forward page: {:?}", e);
                true
            }
        }
    }

    pub fn save_forward(&mut self) {
        self.pages.save_forward();
    }

    /// Queue a request for the host
    pub fn request(&mut self, request: HostRequest) {
        debug!("Host request {:?}", request);
        if self.requests.push_back(request).is_err() {
            warn!("Host request queue full, {:?} dropped", request);
        }
    }

    pub fn pop_request(&mut self) -> Option<HostRequest> {
        self.requests.pop_front()
    }

    /// Ask the host to persist the settings
    pub fn save_settings(&mut self) {
        self.state.settings_mismatch = false;
        self.request(HostRequest::SaveSettings);
    }

    pub fn set_status(&mut self, message: &str) {
        self.state.texts.set_status(message);
    }

    /// Send the status frames if the update timer is due or `force` is set
    pub fn send_status(&mut self, force: bool) {
        if !force && !self.update.is_due(self.now_ms) {
            return;
        }
        if force {
            self.update.rearm(self.now_ms);
        }
        if let Err(e) = self.state.texts.send(&self.state.status, &mut self.outbox) {
            warn!("Status not sent: {:?}", e);
        }
    }

    /// Run `task` every task period
    pub fn schedule(&mut self, task: BackgroundTask) {
        self.schedule_every(task, self.config.task_period_ms);
    }

    pub fn schedule_every(&mut self, task: BackgroundTask, delay_ms: u32) {
        self.tasks.schedule(task, delay_ms, self.now_ms);
    }

    pub fn clear_task(&mut self) {
        self.tasks.clear();
    }

    /// User activity: rearm dimming and restore the brightness
    pub fn reset_dimming(&mut self) {
        if let Err(e) = self.dimming.reset(self.now_ms, false, &mut self.outbox) {
            warn!("Brightness not sent: {:?}", e);
        }
    }

    pub fn enable_dimming(&mut self, enabled: bool, apply: bool) {
        if let Err(e) = self.dimming.enable(enabled, apply, self.now_ms, &mut self.outbox) {
            warn!("Brightness not sent: {:?}", e);
        }
    }

    /// Sound the buzzer if the buzzer feature is on
    pub fn buzz(&mut self, duration_ms: u16) {
        self.reset_dimming();
        if !self.state.features.contains(Features::BUZZER) {
            debug!("Silent buzz");
            return;
        }
        self.send_buzz(duration_ms);
    }

    /// Short buzz acknowledging a key, if enabled
    pub fn buzz_on_press(&mut self) {
        if !self.state.features.contains(Features::BUZZ_ON_PRESS) {
            return;
        }
        self.send_buzz(self.config.buzz_on_press_ms);
    }

    /// Sound the buzzer regardless of the features
    pub fn send_buzz(&mut self, duration_ms: u16) {
        // The register counts tens of ms
        let units = (duration_ms / 10).min(u8::MAX as u16) as u8;
        let result = FrameWriter::register_write(Register::BuzzerBeepingTime)
            .write(Uint8::new(units))
            .and_then(|w| w.send(&mut self.outbox));
        if let Err(e) = result {
            warn!("Buzz not sent: {:?}", e);
        }
    }

    /// Write consecutive 16-bit values starting at `variable`
    pub fn write_values(&mut self, variable: Variable, values: &[Uint16]) {
        let mut writer = FrameWriter::variable_write(variable);
        let result = values
            .iter()
            .try_for_each(|value| writer.write(*value).map(|_| ()))
            .and_then(|_| writer.send(&mut self.outbox));
        if let Err(e) = result {
            warn!("Values at {:#x} not sent: {:?}", variable.address(), e);
        }
    }

    /// Write a text variable
    pub fn write_text<const N: usize>(&mut self, variable: Variable, text: &FixedText<N>) {
        let result = FrameWriter::variable_write(variable)
            .write(text)
            .and_then(|w| w.send(&mut self.outbox));
        if let Err(e) = result {
            warn!("Text at {:#x} not sent: {:?}", variable.address(), e);
        }
    }

    /// Show a wait page with `message`
    ///
    /// The page variant depends on which keys have a callback.
    pub fn show_wait(
        &mut self,
        message: &str,
        back: Option<WaitCallback>,
        cont: Option<WaitCallback>,
        options: ShowOptions,
    ) {
        let mut text = FixedText::<LONG_TEXT_LENGTH>::new();
        text.set_aligned(message, Alignment::Center);
        self.write_text(Variable::LongTextCentered0, &text);

        self.wait_back = back;
        self.wait_continue = cont;
        self.pending_wait = None;

        let page = match (back.is_some(), cont.is_some()) {
            (false, false) => Page::Wait,
            (true, false) => Page::WaitBack,
            (false, true) => Page::WaitContinue,
            (true, true) => Page::WaitBackContinue,
        };
        self.show(page, options);
    }

    /// Record a wait page key; its callback runs once the key is dispatched
    pub fn press_wait_key(&mut self, key: WaitKey) -> bool {
        let callback = match key {
            WaitKey::Back => self.wait_back,
            WaitKey::Continue => self.wait_continue,
        };
        if callback.is_none() {
            error!("No action for wait key {:?}", key);
            return false;
        }
        self.pending_wait = Some(key);
        true
    }

    /// Take the callback of the last wait key pressed
    pub fn take_wait_callback(&mut self) -> Option<(WaitKey, WaitCallback)> {
        let key = self.pending_wait.take()?;
        let callback = match key {
            WaitKey::Back => self.wait_back,
            WaitKey::Continue => self.wait_continue,
        }?;
        Some((key, callback))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dgus_protocol::{Command, Frame};

    fn register_writes(outbox: &Outbox, register: Register) -> std::vec::Vec<std::vec::Vec<u8>> {
        outbox
            .frames()
            .filter_map(|bytes| Frame::decode(bytes).ok())
            .filter(|f| f.command == Command::WriteRegister && f.payload[0] == register.address())
            .map(|f| f.payload[1..].to_vec())
            .collect()
    }

    #[test]
    fn test_request_queue_is_bounded() {
        let mut ctx = Context::new(PanelConfig::default());
        for _ in 0..MAX_REQUESTS + 2 {
            ctx.request(HostRequest::Cooldown);
        }
        let mut drained = 0;
        while ctx.pop_request().is_some() {
            drained += 1;
        }
        assert_eq!(drained, MAX_REQUESTS);
    }

    #[test]
    fn test_buzz_follows_feature() {
        let mut ctx = Context::new(PanelConfig::default());
        ctx.buzz(500);
        assert_eq!(register_writes(&ctx.outbox, Register::BuzzerBeepingTime), vec![vec![50]]);

        ctx.outbox.clear();
        ctx.state.features.set(Features::BUZZER, false);
        ctx.buzz(500);
        assert!(register_writes(&ctx.outbox, Register::BuzzerBeepingTime).is_empty());
    }

    #[test]
    fn test_buzz_duration_is_clamped() {
        let mut ctx = Context::new(PanelConfig::default());
        ctx.send_buzz(10_000);
        assert_eq!(register_writes(&ctx.outbox, Register::BuzzerBeepingTime), vec![vec![255]]);
    }

    #[test]
    fn test_buzz_on_press_is_off_by_default() {
        let mut ctx = Context::new(PanelConfig::default());
        ctx.buzz_on_press();
        assert!(ctx.outbox.is_empty());

        ctx.state.features.set(Features::BUZZ_ON_PRESS, true);
        ctx.buzz_on_press();
        assert_eq!(register_writes(&ctx.outbox, Register::BuzzerBeepingTime), vec![vec![1]]);
    }

    #[test]
    fn test_wait_page_variant() {
        fn leave(_: &mut ScreenSet, _: &mut Context) -> bool {
            true
        }

        let mut ctx = Context::new(PanelConfig::default());
        ctx.show_wait("Heating", None, None, ShowOptions::SaveBack);
        assert_eq!(ctx.pages.current(), Page::Wait);
        assert!(!ctx.press_wait_key(WaitKey::Back));

        ctx.show_wait("Heating", Some(leave), None, ShowOptions::None);
        assert_eq!(ctx.pages.current(), Page::WaitBack);
        assert!(ctx.press_wait_key(WaitKey::Back));
        assert!(matches!(ctx.take_wait_callback(), Some((WaitKey::Back, _))));
        assert!(ctx.take_wait_callback().is_none());

        ctx.show_wait("Done", Some(leave), Some(leave), ShowOptions::None);
        assert_eq!(ctx.pages.current(), Page::WaitBackContinue);
        assert_eq!(ctx.pages.back_pages(), &[Page::Main]);
    }

    #[test]
    fn test_forced_status_rearms_timer() {
        let mut ctx = Context::new(PanelConfig::default());
        ctx.now_ms = 1000;
        ctx.send_status(true);
        assert!(!ctx.outbox.is_empty());

        ctx.outbox.clear();
        ctx.now_ms = 1200;
        ctx.send_status(false);
        assert!(ctx.outbox.is_empty());

        ctx.now_ms = 1500;
        ctx.send_status(false);
        assert!(!ctx.outbox.is_empty());
    }
}
