//! Register, variable and action identifiers
//!
//! Registers control the panel itself (page, brightness, buzzer). Variables
//! live in the panel RAM and back the widgets of the pages. Actions are the
//! variable addresses the panel reports when a touch key is pressed; each one
//! selects the screen handler that receives the key value.

/// Panel control registers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Register {
    /// Firmware version of the panel (read only)
    Version = 0x00,
    /// Backlight level, 0x00..=0x40
    Brightness = 0x01,
    /// Buzzer duration in units of 10 ms
    BuzzerBeepingTime = 0x02,
    /// Current picture (2 bytes, big endian)
    PictureId = 0x03,
    /// Set to 0x5A by the panel when it is touched
    TouchPanelFlag = 0x05,
}

impl Register {
    /// Wire address
    pub const fn address(self) -> u8 {
        self as u8
    }

    /// Decode a register address
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0x00 => Some(Self::Version),
            0x01 => Some(Self::Brightness),
            0x02 => Some(Self::BuzzerBeepingTime),
            0x03 => Some(Self::PictureId),
            0x05 => Some(Self::TouchPanelFlag),
            _ => None,
        }
    }
}

/// Value written to [`Register::TouchPanelFlag`] by the panel on touch
pub const TOUCH_FLAG_SET: u8 = 0x5A;

/// Variables in the panel RAM
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u16)]
pub enum Variable {
    // Statuses
    TargetBed = 0x0000,
    Bed = 0x0001,
    TargetChamber = 0x0002,
    Chamber = 0x0003,
    TargetHotend1 = 0x0004,
    Hotend1 = 0x0005,
    TargetHotend2 = 0x0006,
    Hotend2 = 0x0007,
    FanSpeed = 0x0008,
    ZHeight = 0x0009,
    ZLayer = 0x000A,
    ProgressLow = 0x000B,
    ProgressHigh = 0x000C,
    SensorActive = 0x000D,
    Feedrate = 0x000E,
    Fan2Speed = 0x000F,
    Message = 0x0010,
    CenteredMessage = 0x0028,
    Progress = 0x0040,
    ElapsedTime = 0x0058,
    TimeToCompletion = 0x005C,

    // Texts
    ShortText0 = 0x0100,
    ShortText1 = 0x0108,
    ShortText2 = 0x0110,
    ShortText3 = 0x0118,
    LongText0 = 0x0120,
    LongText1 = 0x0138,
    LongText2 = 0x0150,
    LongText3 = 0x0168,
    LongText4 = 0x0180,
    LongTextCentered0 = 0x0198,

    // Versions
    FirmwareVersion = 0x0200,
    Build = 0x0208,
    PanelVersion = 0x0210,
    MarlinVersion = 0x0218,

    // Values
    Value0 = 0x0300,
    Value1 = 0x0301,
    Value2 = 0x0302,
    Value3 = 0x0303,
    Value4 = 0x0304,
    Value5 = 0x0305,
    Value6 = 0x0306,
    Value7 = 0x0307,
    Value8 = 0x0308,
    Value9 = 0x0309,
    Value10 = 0x0310,
    Value11 = 0x0311,
}

impl Variable {
    /// Wire address
    pub const fn address(self) -> u16 {
        self as u16
    }
}

/// Length in bytes of the message text variables
pub const MESSAGE_LENGTH: usize = 48;
/// Length in bytes of the short text variables
pub const SHORT_TEXT_LENGTH: usize = 16;
/// Length in bytes of the long text variables
pub const LONG_TEXT_LENGTH: usize = 48;
/// Length in bytes of the version text variables
pub const VERSION_LENGTH: usize = 16;
/// Length in bytes of the progress text variable
pub const PROGRESS_LENGTH: usize = 48;
/// Length in bytes of the elapsed and remaining time variables
pub const TIME_LENGTH: usize = 8;

macro_rules! actions {
    ($($(#[$meta:meta])* $name:ident = $value:literal,)*) => {
        /// Action addresses reported by the panel
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        #[cfg_attr(feature = "defmt", derive(defmt::Format))]
        #[repr(u16)]
        pub enum Action {
            $($(#[$meta])* $name = $value,)*
        }

        impl Action {
            /// Decode an action address, `None` for unknown addresses
            pub fn from_u16(value: u16) -> Option<Self> {
                match value {
                    $($value => Some(Self::$name),)*
                    _ => None,
                }
            }
        }
    };
}

actions! {
    // Screens
    Screens = 0x0400,
    PrintCommand = 0x0401,
    Wait = 0x0402,
    LoadUnload = 0x0403,
    Preheat = 0x0404,
    Move = 0x0405,
    SdCard = 0x0406,
    FactoryReset = 0x0407,
    ManualLeveling = 0x0408,
    ExtruderTuning = 0x0409,
    AutomaticLeveling = 0x040A,
    PidTuning = 0x040B,
    SensorSettings = 0x040C,
    Babysteps = 0x040D,
    Lcd = 0x040F,
    Statistics = 0x0410,
    Versions = 0x0411,
    PrintSettings = 0x0412,
    PidSettings = 0x0413,
    StepsSettings = 0x0414,
    FeedrateSettings = 0x0415,
    AccelerationSettings = 0x0416,
    JerkSettings = 0x0417,
    Copyrights = 0x0418,
    SensorTuning = 0x0419,
    SensorGrid = 0x041A,
    SensorZHeight = 0x041B,
    ChangeFilament = 0x041C,
    EepromMismatch = 0x041D,
    LinearAdvanceTuning = 0x041F,
    LinearAdvanceSettings = 0x0420,
    Temperatures = 0x0422,

    // Increments
    MoveXMinus = 0x0500,
    MoveXPlus = 0x0501,
    MoveYMinus = 0x0502,
    MoveYPlus = 0x0503,
    MoveZMinus = 0x0504,
    MoveZPlus = 0x0505,
    MoveEMinus = 0x0506,
    MoveEPlus = 0x0507,
    BabyMinus = 0x0508,
    BabyPlus = 0x0509,
    ZHeightMinus = 0x050A,
    ZHeightPlus = 0x050B,
    FeedrateMinus = 0x050C,
    FeedratePlus = 0x050D,
    FanMinus = 0x050E,
    FanPlus = 0x050F,
    Hotend1Minus = 0x0510,
    Hotend1Plus = 0x0511,
    Hotend2Minus = 0x0512,
    Hotend2Plus = 0x0513,
    BedMinus = 0x0514,
    BedPlus = 0x0515,
    EnclosureMinus = 0x0516,
    EnclosurePlus = 0x0517,
    LcdBrightness = 0x0518,
    Fan2Minus = 0x0519,
    Fan2Plus = 0x051A,
}

impl Action {
    /// Wire address
    pub const fn address(self) -> u16 {
        self as u16
    }

    /// Actions in the `0x05xx` range are shortcuts that nudge a value
    pub const fn is_increment(self) -> bool {
        self.address() & 0xFF00 == 0x0500
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_from_u16() {
        assert_eq!(Action::from_u16(0x0400), Some(Action::Screens));
        assert_eq!(Action::from_u16(0x040F), Some(Action::Lcd));
        assert_eq!(Action::from_u16(0x051A), Some(Action::Fan2Plus));
    }

    #[test]
    fn test_action_gaps_are_unknown() {
        // 0x040E and 0x041E are not assigned
        assert_eq!(Action::from_u16(0x040E), None);
        assert_eq!(Action::from_u16(0x041E), None);
        assert_eq!(Action::from_u16(0xFFFF), None);
    }

    #[test]
    fn test_action_address_round_trips() {
        for value in 0x0400..=0x051A {
            if let Some(action) = Action::from_u16(value) {
                assert_eq!(action.address(), value);
            }
        }
    }

    #[test]
    fn test_increment_range() {
        assert!(Action::BedPlus.is_increment());
        assert!(!Action::Preheat.is_increment());
    }

    #[test]
    fn test_register_addresses() {
        assert_eq!(Register::PictureId.address(), 0x03);
        assert_eq!(Register::from_u8(0x05), Some(Register::TouchPanelFlag));
        assert_eq!(Register::from_u8(0x04), None);
    }
}
