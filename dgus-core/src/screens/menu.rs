//! Main menu entries
//!
//! The menu keys open other screens, so they are resolved by the
//! [`ScreenSet`](super::ScreenSet) rather than by a screen of their own.

use dgus_protocol::{Action, KeyValue, Page};

/// Target of a menu key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MenuEntry {
    /// Show the screen handling this action
    Screen(Action),
    /// Show a page that has no logic behind it
    Page(Page),
}

pub const TEMPS: u16 = 0x0000;
pub const PRINT: u16 = 0x0001;
pub const CONTROLS: u16 = 0x0002;
pub const TUNING: u16 = 0x0003;
pub const SETTINGS: u16 = 0x0004;
pub const INFOS: u16 = 0x0005;
pub const MOTORS: u16 = 0x0006;
pub const LEVELING: u16 = 0x0007;
pub const PRINT_SETTINGS: u16 = 0x0008;

impl MenuEntry {
    /// Entry of a menu key; the print key opens the SD card unless printing
    pub fn from_key(key: KeyValue, printing: bool) -> Option<Self> {
        let entry = match key.value() {
            TEMPS => Self::Screen(Action::Temperatures),
            PRINT if printing => Self::Screen(Action::PrintCommand),
            PRINT => Self::Screen(Action::SdCard),
            CONTROLS => Self::Page(Page::Controls),
            TUNING => Self::Page(Page::Tuning),
            SETTINGS => Self::Page(Page::Settings),
            INFOS => Self::Page(Page::Infos),
            MOTORS => Self::Page(Page::Motors),
            LEVELING => Self::Page(Page::Leveling),
            PRINT_SETTINGS => Self::Screen(Action::PrintSettings),
            _ => return None,
        };
        Some(entry)
    }
}
