//! LCD settings: dimming, buzzer and brightness

use dgus_protocol::{KeyValue, Page, Uint16, Variable};

use crate::config::Features;
use crate::handler::{dispatch_common, Context, Screen};

pub const DIMMING: u16 = 0x0001;
pub const BUZZER_ON_ACTION: u16 = 0x0002;
pub const BUZZ_ON_PRESS: u16 = 0x0003;

/// Buzz played when buzz on press is switched on (ms)
const CONFIRM_BUZZ_MS: u16 = 50;

#[derive(Debug, Clone, Copy, Default)]
pub struct LcdSettings;

impl LcdSettings {
    fn send_data(&self, ctx: &mut Context) {
        let features = ctx.state.features;
        let flag = |feature| Uint16::new(features.contains(feature) as u16);
        ctx.write_values(
            Variable::Value0,
            &[
                flag(Features::DIMMING),
                flag(Features::BUZZER),
                flag(Features::BUZZ_ON_PRESS),
                Uint16::new(ctx.dimming.brightness() as u16),
            ],
        );
    }

    fn dimming_command(&mut self, ctx: &mut Context) {
        let enabled = ctx.state.features.toggle(Features::DIMMING);
        ctx.enable_dimming(enabled, true);
        self.send_data(ctx);
    }

    fn buzzer_command(&mut self, ctx: &mut Context) {
        ctx.state.features.toggle(Features::BUZZER);
        self.send_data(ctx);
    }

    fn buzz_on_press_command(&mut self, ctx: &mut Context) {
        if ctx.state.features.toggle(Features::BUZZ_ON_PRESS) {
            ctx.send_buzz(CONFIRM_BUZZ_MS);
        }
        self.send_data(ctx);
    }

    /// Brightness slider; the panel sends the level as the key value
    pub fn change_brightness(&mut self, ctx: &mut Context, key: KeyValue) {
        let brightness = (key.value() as i16).max(0) as u16;
        if let Err(e) = ctx
            .dimming
            .change_brightness(brightness, ctx.now_ms, &mut ctx.outbox)
        {
            warn!("Brightness not sent: {:?}", e);
        }
    }
}

impl Screen for LcdSettings {
    fn prepare_page(&mut self, ctx: &mut Context) -> Option<Page> {
        self.send_data(ctx);
        Some(Page::Lcd)
    }

    fn dispatch(&mut self, ctx: &mut Context, key: KeyValue) -> bool {
        match key.value() {
            DIMMING => self.dimming_command(ctx),
            BUZZER_ON_ACTION => self.buzzer_command(ctx),
            BUZZ_ON_PRESS => self.buzz_on_press_command(ctx),
            _ => return dispatch_common(self, ctx, key),
        }
        true
    }
}
