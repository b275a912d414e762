//! Wait pages
//!
//! The message and the key callbacks are set by whoever shows the page
//! through [`Context::show_wait`]; this screen only forwards the keys.

use dgus_protocol::KeyValue;

use crate::handler::{Context, HostRequest, Screen, WaitKey};
use crate::navigation::ShowOptions;
use crate::screens::ScreenSet;

/// Continue key of the wait pages; Back is the shared [`KeyValue::BACK`]
pub const CONTINUE: KeyValue = KeyValue::new(0x0001);

#[derive(Debug, Clone, Copy, Default)]
pub struct Wait;

impl Screen for Wait {
    fn dispatch(&mut self, ctx: &mut Context, key: KeyValue) -> bool {
        match key {
            KeyValue::BACK => ctx.press_wait_key(WaitKey::Back),
            CONTINUE => ctx.press_wait_key(WaitKey::Continue),
            _ => false,
        }
    }
}

/// Wait for the user to press Continue, then release the host
pub fn show_continue(ctx: &mut Context, message: &str) {
    ctx.show_wait(message, None, Some(release_host), ShowOptions::SaveBack);
}

fn release_host(_: &mut ScreenSet, ctx: &mut Context) -> bool {
    ctx.request(HostRequest::Continue);
    true
}
