//! Settings mismatch notice
//!
//! When the stored settings were rejected the panel boots on this page
//! instead of the boot animation. Continuing saves the defaults so the
//! notice is not shown again.

use dgus_protocol::{KeyValue, Page};

use crate::handler::{dispatch_common, Context, Screen};
use crate::navigation::ShowOptions;

pub const FORWARD: u16 = 0x0001;

#[derive(Debug, Clone, Copy, Default)]
pub struct EepromMismatch;

impl EepromMismatch {
    /// `true` when there is nothing to report; otherwise shows the notice
    pub fn check(&mut self, ctx: &mut Context) -> bool {
        if !ctx.state.settings_mismatch {
            return true;
        }
        warn!("Stored settings rejected");
        ctx.show(Page::EepromMismatch, ShowOptions::None);
        false
    }

    fn forward_command(&mut self, ctx: &mut Context) {
        ctx.save_settings();
        ctx.show(Page::Main, ShowOptions::None);
    }
}

impl Screen for EepromMismatch {
    fn dispatch(&mut self, ctx: &mut Context, key: KeyValue) -> bool {
        if key.value() != FORWARD {
            return dispatch_common(self, ctx, key);
        }
        self.forward_command(ctx);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PanelConfig;
    use crate::handler::HostRequest;

    #[test]
    fn test_check() {
        let mut ctx = Context::new(PanelConfig::default());
        assert!(EepromMismatch.check(&mut ctx));
        assert!(ctx.outbox.is_empty());

        ctx.state.settings_mismatch = true;
        assert!(!EepromMismatch.check(&mut ctx));
        assert_eq!(ctx.pages.current(), Page::EepromMismatch);
    }

    #[test]
    fn test_forward_saves_and_clears() {
        let mut ctx = Context::new(PanelConfig::default());
        ctx.state.settings_mismatch = true;
        EepromMismatch.check(&mut ctx);
        EepromMismatch.handle(&mut ctx, KeyValue::new(FORWARD));
        assert!(!ctx.state.settings_mismatch);
        assert_eq!(ctx.pop_request(), Some(HostRequest::SaveSettings));
        assert_eq!(ctx.pages.current(), Page::Main);
    }
}
