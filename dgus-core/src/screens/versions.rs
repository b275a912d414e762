//! Version information
//!
//! The firmware versions are known at build time. The panel version is
//! asked with a register read and shown when the answer arrives.

use core::fmt::Write;

use dgus_protocol::messages::VERSION_LENGTH;
use dgus_protocol::{FixedText, FrameWriter, Page, Register, Variable};

use crate::handler::{Context, Screen};

/// Versions of the host firmware
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct VersionInfo {
    /// Panel firmware (this crate and its host)
    pub firmware: &'static str,
    /// Build identifier
    pub build: &'static str,
    /// Printer firmware the host is based on
    pub marlin: &'static str,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Versions {
    info: VersionInfo,
    /// Raw panel version, BCD major/minor
    panel: Option<u8>,
}

impl Versions {
    pub const fn new(info: VersionInfo) -> Self {
        Self { info, panel: None }
    }

    pub fn info(&self) -> &VersionInfo {
        &self.info
    }

    /// Panel version as `major.minor`, once known
    pub fn panel_version(&self) -> Option<FixedText<VERSION_LENGTH>> {
        let raw = self.panel?;
        let mut text = FixedText::new();
        let _ = write!(text, "{}.{}", raw >> 4, raw & 0x0F);
        Some(text)
    }

    /// Send the version texts and ask the panel for its own
    pub fn send_versions(&self, ctx: &mut Context) {
        ctx.write_text(
            Variable::FirmwareVersion,
            &FixedText::<VERSION_LENGTH>::from_text(self.info.firmware),
        );
        ctx.write_text(
            Variable::Build,
            &FixedText::<VERSION_LENGTH>::from_text(self.info.build),
        );
        ctx.write_text(
            Variable::MarlinVersion,
            &FixedText::<VERSION_LENGTH>::from_text(self.info.marlin),
        );

        if let Err(e) = FrameWriter::register_read(Register::Version, 1).send(&mut ctx.outbox) {
            warn!("Panel version not requested: {:?}", e);
        }
    }

    /// Answer to the version register read
    pub fn on_panel_version(&mut self, ctx: &mut Context, raw: u8) {
        info!("Panel version {:#x}", raw);
        self.panel = Some(raw);
        if let Some(text) = self.panel_version() {
            ctx.write_text(Variable::PanelVersion, &text);
        }
    }
}

impl Screen for Versions {
    fn prepare_page(&mut self, ctx: &mut Context) -> Option<Page> {
        self.send_versions(ctx);
        Some(Page::Versions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PanelConfig;
    use dgus_protocol::{Command, Frame};

    const INFO: VersionInfo = VersionInfo {
        firmware: "1.2.0",
        build: "20261019",
        marlin: "1.1.9",
    };

    #[test]
    fn test_send_versions() {
        let mut ctx = Context::new(PanelConfig::default());
        Versions::new(INFO).send_versions(&mut ctx);

        let frames: std::vec::Vec<Frame> = ctx
            .outbox
            .frames()
            .map(|bytes| Frame::decode(bytes).unwrap())
            .collect();
        assert_eq!(frames.len(), 4);
        assert_eq!(&frames[0].payload[..2], &[0x02, 0x00]);
        assert_eq!(&frames[0].payload[3..8], b"1.2.0");
        assert_eq!(frames[0].payload.len(), 3 + VERSION_LENGTH);
        assert_eq!(frames[3].command, Command::ReadRegister);
        assert_eq!(&frames[3].payload[..], &[0x00, 0x01]);
    }

    #[test]
    fn test_panel_version_is_bcd() {
        let mut ctx = Context::new(PanelConfig::default());
        let mut versions = Versions::new(INFO);
        assert!(versions.panel_version().is_none());

        versions.on_panel_version(&mut ctx, 0x45);
        assert_eq!(versions.panel_version().unwrap().as_str(), "4.5");
        assert!(!ctx.outbox.is_empty());
    }
}
