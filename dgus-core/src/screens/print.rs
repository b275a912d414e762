//! Print control: stop, pause, advanced pause

use dgus_protocol::{KeyValue, Page};

use crate::handler::{dispatch_common, Context, HostRequest, Screen};
use crate::navigation::ShowOptions;
use crate::screens::ScreenSet;

pub const STOP: u16 = 0x0001;
pub const PAUSE: u16 = 0x0002;
pub const ADVANCED_PAUSE: u16 = 0x0003;

#[derive(Debug, Clone, Copy, Default)]
pub struct Print {
    /// An advanced pause is in progress and its wait page is shown
    pausing: bool,
}

impl Print {
    pub const fn new() -> Self {
        Self { pausing: false }
    }

    fn stop_command(&mut self, ctx: &mut Context) {
        ctx.show_wait(
            "Stop the print?",
            Some(keep_printing),
            Some(confirm_stop),
            ShowOptions::SaveBack,
        );
    }

    /// Pause or resume, from the page or from the host
    pub fn pause_resume(&mut self, ctx: &mut Context) {
        ctx.request(HostRequest::PauseResume);
    }

    fn advanced_pause_command(&mut self, ctx: &mut Context) {
        self.pausing = true;
        ctx.request(HostRequest::AdvancedPause);
        ctx.show_wait("Pausing...", None, None, ShowOptions::SaveBack);
    }

    /// The host finished parking for an advanced pause
    pub fn pause_finished(&mut self, ctx: &mut Context) {
        if !self.pausing {
            return;
        }
        self.pausing = false;
        ctx.show_back();
    }

    /// Stop requested by the host, no confirmation
    pub fn stop_now(&mut self, ctx: &mut Context) {
        self.pausing = false;
        ctx.request(HostRequest::Stop);
        ctx.set_status("Print stopped");
        ctx.show(Page::Main, ShowOptions::None);
    }
}

impl Screen for Print {
    fn prepare_page(&mut self, _ctx: &mut Context) -> Option<Page> {
        Some(Page::Print)
    }

    fn dispatch(&mut self, ctx: &mut Context, key: KeyValue) -> bool {
        match key.value() {
            STOP => self.stop_command(ctx),
            PAUSE => self.pause_resume(ctx),
            ADVANCED_PAUSE => self.advanced_pause_command(ctx),
            _ => return dispatch_common(self, ctx, key),
        }
        true
    }
}

fn keep_printing(_: &mut ScreenSet, _: &mut Context) -> bool {
    true
}

fn confirm_stop(_: &mut ScreenSet, ctx: &mut Context) -> bool {
    ctx.request(HostRequest::Stop);
    ctx.set_status("Print stopped");
    true
}
