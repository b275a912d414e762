//! Backlight dimming
//!
//! After a period without touch the backlight drops to a fraction of its
//! configured level. Activity is detected two ways: key frames from the panel
//! (the caller invokes [`Dimming::reset`]) and the touch flag register, which
//! the panel sets on any touch, keys or not. The flag is polled on every
//! check and the answer arrives later through [`Dimming::on_touch_flag`].

use dgus_protocol::{FrameError, FrameSink, FrameWriter, Register, Uint8, TOUCH_FLAG_SET};

use super::task::reached;
use crate::config::DimmingConfig;

/// Dimming state
#[derive(Debug, Clone)]
pub struct Dimming {
    config: DimmingConfig,
    brightness: u8,
    enabled: bool,
    dimmed: bool,
    next_check_ms: Option<u32>,
    next_dim_ms: Option<u32>,
}

impl Dimming {
    /// Enabled, not dimmed, full brightness, nothing armed yet
    pub fn new(config: DimmingConfig) -> Self {
        Self {
            config,
            brightness: config.brightness_max,
            enabled: true,
            dimmed: false,
            next_check_ms: None,
            next_dim_ms: None,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_dimmed(&self) -> bool {
        self.dimmed
    }

    /// Configured (undimmed) brightness
    pub fn brightness(&self) -> u8 {
        self.brightness
    }

    /// Brightness the panel should currently show
    pub fn adjusted_brightness(&self) -> u8 {
        let mut brightness = self.brightness as u32;
        if self.dimmed {
            brightness = brightness * self.config.ratio_percent as u32 / 100;
        }
        brightness.clamp(
            self.config.brightness_min as u32,
            self.config.brightness_max as u32,
        ) as u8
    }

    /// Turn dimming on or off
    ///
    /// Turning it off restores the full brightness at once. With `apply` the
    /// inactivity deadline is rearmed and the brightness sent again.
    pub fn enable<S: FrameSink + ?Sized>(
        &mut self,
        enabled: bool,
        apply: bool,
        now_ms: u32,
        sink: &mut S,
    ) -> Result<(), FrameError> {
        debug!("Dimming enabled: {}", enabled);
        self.enabled = enabled;
        if !enabled && self.dimmed {
            self.dimmed = false;
            self.send_brightness(sink)?;
        }
        if apply {
            self.reset(now_ms, true, sink)?;
        }
        Ok(())
    }

    /// Record user activity
    ///
    /// Rearms the inactivity deadline and, when dimmed or `force` is set,
    /// restores the full brightness.
    pub fn reset<S: FrameSink + ?Sized>(
        &mut self,
        now_ms: u32,
        force: bool,
        sink: &mut S,
    ) -> Result<(), FrameError> {
        self.next_dim_ms = Some(now_ms.wrapping_add(self.config.delay_ms));
        if !force && !self.dimmed {
            return Ok(());
        }
        self.dimmed = false;
        self.send_brightness(sink)
    }

    /// Periodic check, called from the idle loop
    ///
    /// Polls the touch flag and dims once the inactivity deadline passed.
    pub fn check<S: FrameSink + ?Sized>(&mut self, now_ms: u32, sink: &mut S) -> Result<(), FrameError> {
        if !self.enabled {
            return Ok(());
        }
        if let Some(next) = self.next_check_ms {
            if !reached(now_ms, next) {
                return Ok(());
            }
        }
        self.next_check_ms = Some(now_ms.wrapping_add(self.config.check_period_ms));

        FrameWriter::register_read(Register::TouchPanelFlag, 1).send(sink)?;

        let due = self.next_dim_ms.is_some_and(|deadline| reached(now_ms, deadline));
        if due && !self.dimmed {
            debug!("Dimming the panel");
            self.dimmed = true;
            self.send_brightness(sink)?;
        }
        Ok(())
    }

    /// Handle the answer to a touch flag poll
    ///
    /// Returns `true` when the panel was touched. The flag is cleared on the
    /// panel so the next poll sees only new touches.
    pub fn on_touch_flag<S: FrameSink + ?Sized>(
        &mut self,
        value: u8,
        now_ms: u32,
        sink: &mut S,
    ) -> Result<bool, FrameError> {
        if value != TOUCH_FLAG_SET {
            return Ok(false);
        }
        FrameWriter::register_write(Register::TouchPanelFlag)
            .write(Uint8::new(0))?
            .send(sink)?;
        self.reset(now_ms, false, sink)?;
        Ok(true)
    }

    /// Set the configured brightness and show it
    pub fn change_brightness<S: FrameSink + ?Sized>(
        &mut self,
        brightness: u16,
        now_ms: u32,
        sink: &mut S,
    ) -> Result<(), FrameError> {
        let clamped = brightness.clamp(
            self.config.brightness_min as u16,
            self.config.brightness_max as u16,
        );
        self.brightness = clamped as u8;
        self.reset(now_ms, true, sink)
    }

    fn send_brightness<S: FrameSink + ?Sized>(&self, sink: &mut S) -> Result<(), FrameError> {
        let brightness = self.adjusted_brightness();
        debug!("Brightness {:#x}", brightness);
        FrameWriter::register_write(Register::Brightness)
            .write(Uint8::new(brightness))?
            .send(sink)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dgus_protocol::{Command, Frame, Outbox};

    const DELAY: u32 = 300_000;

    fn brightness_frames(outbox: &Outbox) -> std::vec::Vec<u8> {
        outbox
            .frames()
            .filter_map(|bytes| Frame::decode(bytes).ok())
            .filter(|f| f.command == Command::WriteRegister && f.payload[0] == 0x01)
            .map(|f| f.payload[1])
            .collect()
    }

    fn armed(now: u32) -> (Dimming, Outbox) {
        let mut dimming = Dimming::new(DimmingConfig::default());
        let mut outbox = Outbox::new();
        dimming.reset(now, true, &mut outbox).unwrap();
        outbox.clear();
        (dimming, outbox)
    }

    #[test]
    fn test_forced_reset_sends_full_brightness() {
        let mut dimming = Dimming::new(DimmingConfig::default());
        let mut outbox = Outbox::new();
        dimming.reset(0, true, &mut outbox).unwrap();
        assert_eq!(brightness_frames(&outbox), vec![0x40]);
    }

    #[test]
    fn test_dims_after_delay() {
        let (mut dimming, mut outbox) = armed(0);

        dimming.check(DELAY - 1, &mut outbox).unwrap();
        assert!(!dimming.is_dimmed());

        // Next check is one period later
        dimming.check(DELAY + 199, &mut outbox).unwrap();
        assert!(dimming.is_dimmed());
        // 5 % of 0x40 is 3
        assert_eq!(brightness_frames(&outbox), vec![3]);
    }

    #[test]
    fn test_check_polls_touch_flag_at_cadence() {
        let (mut dimming, mut outbox) = armed(0);
        dimming.check(0, &mut outbox).unwrap();
        dimming.check(100, &mut outbox).unwrap();
        dimming.check(200, &mut outbox).unwrap();

        let polls = outbox
            .frames()
            .filter(|f| f == &[0x5A, 0xA5, 0x03, 0x81, 0x05, 0x01])
            .count();
        assert_eq!(polls, 2);
    }

    #[test]
    fn test_activity_restores_brightness() {
        let (mut dimming, mut outbox) = armed(0);
        dimming.check(DELAY, &mut outbox).unwrap();
        outbox.clear();

        dimming.reset(DELAY + 10, false, &mut outbox).unwrap();
        assert!(!dimming.is_dimmed());
        assert_eq!(brightness_frames(&outbox), vec![0x40]);

        // Deadline moved
        dimming.check(DELAY + 500, &mut outbox).unwrap();
        assert!(!dimming.is_dimmed());
    }

    #[test]
    fn test_reset_when_bright_sends_nothing() {
        let (mut dimming, mut outbox) = armed(0);
        dimming.reset(1000, false, &mut outbox).unwrap();
        assert!(outbox.is_empty());
    }

    #[test]
    fn test_touch_flag_counts_as_activity() {
        let (mut dimming, mut outbox) = armed(0);
        dimming.check(DELAY, &mut outbox).unwrap();
        outbox.clear();

        assert_eq!(dimming.on_touch_flag(0x00, DELAY + 5, &mut outbox), Ok(false));
        assert!(dimming.is_dimmed());

        assert_eq!(dimming.on_touch_flag(0x5A, DELAY + 5, &mut outbox), Ok(true));
        assert!(!dimming.is_dimmed());
        let frames: std::vec::Vec<&[u8]> = outbox.frames().collect();
        assert_eq!(frames[0], &[0x5A, 0xA5, 0x03, 0x80, 0x05, 0x00]);
    }

    #[test]
    fn test_disable_undims() {
        let (mut dimming, mut outbox) = armed(0);
        dimming.check(DELAY, &mut outbox).unwrap();
        outbox.clear();

        dimming.enable(false, false, DELAY, &mut outbox).unwrap();
        assert!(!dimming.is_dimmed());
        assert_eq!(brightness_frames(&outbox), vec![0x40]);

        outbox.clear();
        dimming.check(DELAY * 3, &mut outbox).unwrap();
        assert!(outbox.is_empty());
    }

    #[test]
    fn test_change_brightness_is_clamped() {
        let (mut dimming, mut outbox) = armed(0);
        dimming.change_brightness(0x100, 0, &mut outbox).unwrap();
        assert_eq!(dimming.brightness(), 0x40);
        dimming.change_brightness(0, 0, &mut outbox).unwrap();
        assert_eq!(dimming.brightness(), 0x01);
        assert_eq!(brightness_frames(&outbox), vec![0x40, 0x01]);
    }

    #[test]
    fn test_dimmed_brightness_has_a_floor() {
        let (mut dimming, mut outbox) = armed(0);
        dimming.change_brightness(0x10, 0, &mut outbox).unwrap();
        dimming.check(DELAY, &mut outbox).unwrap();
        assert_eq!(dimming.adjusted_brightness(), 0x01);
    }
}
