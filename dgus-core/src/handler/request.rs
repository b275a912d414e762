//! Requests to the printer firmware
//!
//! Screens never drive the printer. Whatever needs motion, heaters or the
//! EEPROM is queued here and drained by the host with
//! [`crate::Panel::pop_request`].

use dgus_protocol::{Action, KeyValue};

use crate::config::TemperatureKind;
use crate::settings::{Pid, SensorPosition};

/// Maximum queued requests
pub const MAX_REQUESTS: usize = 8;

/// Printer axes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Axis {
    X,
    Y,
    Z,
    E,
}

/// Something the host firmware should do
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HostRequest {
    /// Write the settings to EEPROM
    SaveSettings,
    /// Load the firmware defaults, then save them
    FactoryReset,
    /// Home one axis, or all of them with `None`
    Home(Option<Axis>),
    DisableMotors,
    /// Relative move, in tenths of mm
    Jog { axis: Axis, distance: i16 },
    /// Extrude (or retract when negative) on a hotend, in tenths of mm
    Extrude { hotend: TemperatureKind, distance: i16 },
    /// Abort the moves queued by [`HostRequest::Extrude`]
    StopExtrusion,
    /// Set a heater target, 0 to turn it off
    SetTemperature { kind: TemperatureKind, value: u16 },
    /// Set the part cooling fan speed (%)
    SetFan { percent: u8 },
    /// Turn every heater off
    Cooldown,
    /// Pause or resume the running print
    PauseResume,
    /// Pause with filament change
    AdvancedPause,
    /// Abort the running print
    Stop,
    /// Release a firmware wait for user
    Continue,
    /// Use these coefficients for a heater
    ApplyPid { kind: TemperatureKind, pid: Pid },
    /// Probe offset selected on the sensor page
    SensorOffset(SensorPosition),
    /// Increment shortcut the panel core does not handle itself
    Adjust { action: Action, key: KeyValue },
    /// Key on a page whose logic lives in the host
    Key { action: Action, key: KeyValue },
}
