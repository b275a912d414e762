//! Configuration type definitions

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Baud rate between the mainboard and the panel
pub const LCD_BAUDRATE: u32 = 115_200;

/// Baud rate of the USB link to the host computer
pub const DEFAULT_USB_BAUDRATE: u32 = 250_000;

/// Optional behaviors the user can switch from the LCD settings page
///
/// Stored as a bitmask; the bit values are part of the settings layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Features(u16);

impl Features {
    pub const NONE: Self = Self(0);
    /// Dim the backlight after a period without touch
    pub const DIMMING: Self = Self(0b0000_0000_0000_0100);
    /// Buzz on events (end of heating, errors)
    pub const BUZZER: Self = Self(0b0000_0000_0000_1000);
    /// Buzz on every key press
    pub const BUZZ_ON_PRESS: Self = Self(0b0000_0000_0001_0000);

    pub const fn from_bits(bits: u16) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u16 {
        self.0
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    pub fn set(&mut self, other: Self, enabled: bool) {
        if enabled {
            self.0 |= other.0;
        } else {
            self.0 &= !other.0;
        }
    }

    /// Flip `other` and return whether it is now enabled
    pub fn toggle(&mut self, other: Self) -> bool {
        self.0 ^= other.0;
        self.contains(other)
    }
}

impl Default for Features {
    fn default() -> Self {
        Self::DIMMING.union(Self::BUZZER)
    }
}

/// Heaters with a target temperature
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum TemperatureKind {
    Bed = 0,
    Hotend1 = 1,
    Hotend2 = 2,
    Enclosure = 3,
}

impl TemperatureKind {
    pub const COUNT: usize = 4;

    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Backlight dimming parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DimmingConfig {
    /// Interval between touch checks (ms)
    pub check_period_ms: u32,
    /// Inactivity before dimming (ms)
    pub delay_ms: u32,
    /// Dimmed brightness in percent of the normal brightness
    pub ratio_percent: u8,
    /// Lowest brightness sent to the panel
    pub brightness_min: u8,
    /// Highest brightness sent to the panel
    pub brightness_max: u8,
}

impl Default for DimmingConfig {
    fn default() -> Self {
        Self {
            check_period_ms: 200,
            delay_ms: 5 * 60 * 1000,
            ratio_percent: 5,
            brightness_min: 0x01,
            brightness_max: 0x40,
        }
    }
}

/// Panel link configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PanelConfig {
    /// Baud rate of the panel UART
    pub lcd_baudrate: u32,
    /// USB baud rate used when the settings hold none
    pub default_usb_baudrate: u32,
    /// Interval between status frames (ms)
    pub status_period_ms: u32,
    /// Default interval of background tasks (ms)
    pub task_period_ms: u32,
    /// Time allowed for a frame body to arrive (ms)
    pub frame_timeout_ms: u32,
    /// Buzzer duration on key press (ms)
    pub buzz_on_press_ms: u16,
    /// Minimum interval between two jog moves (ms)
    pub move_interval_ms: u32,
    /// Features enabled after a settings reset
    pub default_features: Features,
    pub dimming: DimmingConfig,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            lcd_baudrate: LCD_BAUDRATE,
            default_usb_baudrate: DEFAULT_USB_BAUDRATE,
            status_period_ms: 500,
            task_period_ms: 500,
            frame_timeout_ms: dgus_protocol::FRAME_TIMEOUT_MS,
            buzz_on_press_ms: 10,
            move_interval_ms: 50,
            default_features: Features::default(),
            dimming: DimmingConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_features() {
        let features = Features::default();
        assert!(features.contains(Features::DIMMING));
        assert!(features.contains(Features::BUZZER));
        assert!(!features.contains(Features::BUZZ_ON_PRESS));
        assert_eq!(features.bits(), 0b1100);
    }

    #[test]
    fn test_toggle() {
        let mut features = Features::NONE;
        assert!(features.toggle(Features::BUZZ_ON_PRESS));
        assert_eq!(features.bits(), 0b1_0000);
        assert!(!features.toggle(Features::BUZZ_ON_PRESS));
        assert_eq!(features, Features::NONE);
    }

    #[test]
    fn test_set() {
        let mut features = Features::default();
        features.set(Features::DIMMING, false);
        assert_eq!(features, Features::BUZZER);
        features.set(Features::DIMMING, true);
        assert_eq!(features, Features::default());
    }

    #[test]
    fn test_default_config() {
        let config = PanelConfig::default();
        assert_eq!(config.lcd_baudrate, 115_200);
        assert_eq!(config.dimming.delay_ms, 300_000);
        assert_eq!(config.dimming.brightness_max, 0x40);
        assert_eq!(config.frame_timeout_ms, 100);
    }
}
