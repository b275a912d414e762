//! Printer status shown on every page
//!
//! The host hands a [`PrinterStatus`] snapshot to each idle call. When the
//! update timer is due, the numeric values go out in one frame starting at
//! [`Variable::TargetBed`] and the texts follow, but only when they changed.

use core::fmt::Write;

use dgus_protocol::messages::{MESSAGE_LENGTH, PROGRESS_LENGTH, TIME_LENGTH};
use dgus_protocol::{Alignment, FixedText, FrameError, FrameSink, FrameWriter, Uint16, Variable};
use heapless::String;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Snapshot of the printer state
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PrinterStatus {
    /// Temperatures (°C)
    pub target_bed: i16,
    pub bed: i16,
    pub target_chamber: i16,
    pub chamber: i16,
    pub target_hotend1: i16,
    pub hotend1: i16,
    pub target_hotend2: i16,
    pub hotend2: i16,
    /// Fan speeds, 0..=255
    pub fan1: u8,
    pub fan2: u8,
    /// Logical Z (mm)
    pub z_height: f32,
    /// Physical Z (mm)
    pub z_layer: f32,
    /// Print progress (%)
    pub progress: u8,
    /// Print duration (s)
    pub elapsed_s: u32,
    /// Feedrate multiplier (%)
    pub feedrate: u16,
    /// Bed leveling compensation is active
    pub leveling_active: bool,
    /// A print is running
    pub printing: bool,
}

/// Transform `value` from the range `0..=from` to `0..=to`, rounded
pub fn scale(value: u16, from: u16, to: u16) -> u16 {
    if from == 0 {
        return to;
    }
    let scaled = (2 * value as u32 * to as u32 + from as u32) / (2 * from as u32);
    scaled.min(to as u32) as u16
}

/// Split the progress into the two bars of the print page
///
/// The panel draws the bar as two images of 5 steps each. The bar shows
/// full from 98 %.
pub fn progress_bar(percent: u8) -> (u16, u16) {
    let adjusted = if percent >= 98 { 100 } else { percent as u16 + 2 };
    let low = if adjusted >= 50 { 5 } else { adjusted / 10 };
    let high = if adjusted < 50 { 0 } else { adjusted / 10 - 5 };
    (low, high)
}

/// Millimeters to hundredths, rounded and saturated
fn hundredths(mm: f32) -> i16 {
    let scaled = mm * 100.0;
    let rounded = if scaled >= 0.0 { scaled + 0.5 } else { scaled - 0.5 };
    rounded as i16
}

/// Status texts and their change tracking
#[derive(Debug, Clone)]
pub struct StatusTexts {
    message: FixedText<MESSAGE_LENGTH>,
    centered: FixedText<MESSAGE_LENGTH>,
    progress: FixedText<PROGRESS_LENGTH>,
    elapsed: FixedText<TIME_LENGTH>,
    remaining: FixedText<TIME_LENGTH>,
    progress_name: String<PROGRESS_LENGTH>,
    percent: Option<u8>,
    elapsed_min: Option<u32>,
    has_status: bool,
}

impl Default for StatusTexts {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusTexts {
    pub const fn new() -> Self {
        Self {
            message: FixedText::new(),
            centered: FixedText::new(),
            progress: FixedText::new(),
            elapsed: FixedText::new(),
            remaining: FixedText::new(),
            progress_name: String::new(),
            percent: None,
            elapsed_min: None,
            has_status: false,
        }
    }

    /// Show `message` in the status line
    pub fn set_status(&mut self, message: &str) {
        debug!("Status: {}", message);
        self.message.set_aligned(message, Alignment::Left);
        self.centered.set_aligned(message, Alignment::Center);
        self.has_status = true;
    }

    /// Empty the status line
    pub fn reset_status(&mut self) {
        self.message.reset().align(Alignment::Left);
        self.centered.reset().align(Alignment::Left);
        self.has_status = false;
    }

    pub fn has_status(&self) -> bool {
        self.has_status
    }

    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    pub fn progress(&self) -> &str {
        self.progress.as_str()
    }

    pub fn elapsed(&self) -> &str {
        self.elapsed.as_str()
    }

    pub fn remaining(&self) -> &str {
        self.remaining.as_str()
    }

    /// Name shown in front of the progress percentage, usually the file
    pub fn set_progress_name(&mut self, name: &str, percent: u8, elapsed_s: u32) {
        self.progress_name.clear();
        for c in name.chars() {
            if self.progress_name.push(c).is_err() {
                break;
            }
        }
        self.progress.reset().align(Alignment::Left);
        self.percent = None;
        self.compute_progress(percent, elapsed_s);
    }

    /// Refresh the progress, elapsed and remaining texts
    pub fn compute_progress(&mut self, percent: u8, elapsed_s: u32) {
        let mut changed = false;

        if self.percent != Some(percent) {
            self.percent = Some(percent);
            changed = true;

            self.progress.set(&self.progress_name);
            if !self.progress_name.is_empty() {
                let _ = write!(self.progress, " {}%", percent);
            }
            self.progress.align(Alignment::Left);
        }

        let elapsed_min = elapsed_s / 60;
        if self.elapsed_min != Some(elapsed_min) {
            self.elapsed_min = Some(elapsed_min);
            changed = true;
            set_duration(&mut self.elapsed, elapsed_s);
        }

        if changed {
            if elapsed_min < 5 && percent < 5 {
                self.remaining.set_aligned("...", Alignment::Left);
            } else {
                let remaining_s = match percent {
                    0 => 0,
                    p => (elapsed_s as u64 * (100 - p.min(100)) as u64 / p as u64) as u32,
                };
                set_duration(&mut self.remaining, remaining_s);
            }
        }
    }

    /// Send the status frame and whatever text changed
    pub fn send<S: FrameSink + ?Sized>(
        &mut self,
        status: &PrinterStatus,
        sink: &mut S,
    ) -> Result<(), FrameError> {
        let (low, high) = progress_bar(status.progress);
        let probe_state = if status.leveling_active { 2 } else { 1 };

        FrameWriter::variable_write(Variable::TargetBed)
            .write(Uint16::from_i16(status.target_bed))?
            .write(Uint16::from_i16(status.bed))?
            .write(Uint16::from_i16(status.target_chamber))?
            .write(Uint16::from_i16(status.chamber))?
            .write(Uint16::from_i16(status.target_hotend1))?
            .write(Uint16::from_i16(status.hotend1))?
            .write(Uint16::from_i16(status.target_hotend2))?
            .write(Uint16::from_i16(status.hotend2))?
            .write(Uint16::new(scale(status.fan1 as u16, 255, 100)))?
            .write(Uint16::from_i16(hundredths(status.z_height)))?
            .write(Uint16::from_i16(hundredths(status.z_layer)))?
            .write(Uint16::new(low))?
            .write(Uint16::new(high))?
            .write(Uint16::new(probe_state))?
            .write(Uint16::new(status.feedrate))?
            .write(Uint16::new(scale(status.fan2 as u16, 255, 100)))?
            .send(sink)?;

        self.compute_progress(status.progress, status.elapsed_s);

        // Both flags are cleared, no short circuit
        if self.message.has_changed(true) | self.centered.has_changed(true) {
            FrameWriter::variable_write(Variable::Message)
                .write(&self.message)?
                .write(&self.centered)?
                .send(sink)?;
        }

        let times_changed = self.elapsed.has_changed(true) | self.remaining.has_changed(true);
        if self.progress.has_changed(true) {
            FrameWriter::variable_write(Variable::Progress)
                .write(&self.progress)?
                .write(&self.elapsed)?
                .write(&self.remaining)?
                .send(sink)?;
        } else if times_changed {
            FrameWriter::variable_write(Variable::ElapsedTime)
                .write(&self.elapsed)?
                .write(&self.remaining)?
                .send(sink)?;
        }
        Ok(())
    }
}

/// `hh:mm`, hours capped at 99
fn set_duration(text: &mut FixedText<TIME_LENGTH>, seconds: u32) {
    let minutes = seconds / 60;
    let hours = (minutes / 60).min(99);
    text.reset();
    let _ = write!(text, "{:02}:{:02}", hours, minutes % 60);
    text.align(Alignment::Left);
}
