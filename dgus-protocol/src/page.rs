//! Page identifiers
//!
//! A page is a picture stored in the panel flash. Switching page is a write
//! of its number to [`crate::Register::PictureId`]. The numbering follows the
//! panel resources, so it must match the DGUS project flashed on the panel.

/// Panel pages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Page {
    Boot = 0,
    Main = 1,
    Temperature = 2,
    Print = 3,
    SdCard = 4,
    Controls = 5,
    Tuning = 6,
    Settings = 7,
    Infos = 8,
    Motors = 9,
    Leveling = 10,
    PrintSettings = 11,
    Wait = 12,
    WaitBack = 13,
    WaitContinue = 14,
    WaitBackContinue = 15,
    LoadUnload = 16,
    Preheat = 17,
    Move = 18,
    FactoryReset = 19,
    PidSettings = 20,
    SensorSettings = 21,
    Lcd = 22,
    Statistics = 23,
    Versions = 24,
    Copyrights = 25,
    EepromMismatch = 26,
    ThermalRunawayError = 27,
    ManualLeveling = 28,
    ExtruderTuning = 29,
    AutomaticLeveling = 30,
    PidTuning = 31,
    Babysteps = 32,
    StepsSettings = 33,
    FeedrateSettings = 34,
    AccelerationSettings = 35,
    JerkSettings = 36,
    SensorTuning = 37,
    SensorGrid = 38,
    SensorZHeight = 39,
    ChangeFilament = 40,
    LinearAdvanceTuning = 41,
    LinearAdvanceSettings = 42,
}

impl Page {
    /// Picture number on the panel
    pub const fn id(self) -> u8 {
        self as u8
    }
}
