//! Factory reset confirmation

use dgus_protocol::{KeyValue, Page};

use crate::handler::{dispatch_common, Context, HostRequest, Screen};

pub const RESET: u16 = 0x0001;

#[derive(Debug, Clone, Copy, Default)]
pub struct FactoryReset;

impl Screen for FactoryReset {
    fn prepare_page(&mut self, _ctx: &mut Context) -> Option<Page> {
        Some(Page::FactoryReset)
    }

    fn dispatch(&mut self, ctx: &mut Context, key: KeyValue) -> bool {
        if key.value() != RESET {
            return dispatch_common(self, ctx, key);
        }
        ctx.request(HostRequest::FactoryReset);
        ctx.show_back();
        true
    }
}
