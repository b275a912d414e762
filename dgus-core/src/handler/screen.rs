//! Screen handler contract

use dgus_hal::StorageError;
use dgus_protocol::{KeyValue, Page};

use super::context::Context;
use crate::navigation::ShowOptions;
use crate::settings::{EepromReader, EepromWriter};

/// A page of the panel and the logic behind its keys
///
/// Every method has a default so a screen only overrides what it needs.
pub trait Screen {
    /// Send the page data and return the page to show, if any
    fn prepare_page(&mut self, _ctx: &mut Context) -> Option<Page> {
        None
    }

    /// React to `key`, returning `false` when the key is not handled
    fn dispatch(&mut self, ctx: &mut Context, key: KeyValue) -> bool {
        dispatch_common(self, ctx, key)
    }

    /// Entry point for keys addressed to this screen
    fn handle(&mut self, ctx: &mut Context, key: KeyValue) {
        if !self.dispatch(ctx, key) {
            error!("Invalid key value {:#x}", key.value());
        }
    }

    /// Prepare and show the page; `false` when the screen has no page
    fn show(&mut self, ctx: &mut Context, options: ShowOptions) -> bool {
        match self.prepare_page(ctx) {
            Some(page) => {
                ctx.show(page, options);
                true
            }
            None => false,
        }
    }

    fn show_command(&mut self, ctx: &mut Context) {
        self.show(ctx, ShowOptions::SaveBack);
    }

    /// Persist and continue the flow, or leave the page when there is no flow
    fn save_command(&mut self, ctx: &mut Context) {
        ctx.save_settings();
        if !ctx.show_forward() {
            ctx.show_back();
        }
    }

    fn back_command(&mut self, ctx: &mut Context) {
        ctx.show_back();
    }

    /// Write the persisted values of the screen
    fn write(&self, _eeprom: &mut EepromWriter<'_>) -> Result<(), StorageError> {
        Ok(())
    }

    /// Read the persisted values of the screen
    fn read(&mut self, _eeprom: &mut EepromReader<'_>) -> Result<(), StorageError> {
        Ok(())
    }

    /// Restore the persisted values to their defaults
    fn reset(&mut self) {}

    /// Bytes written by [`Screen::write`]
    fn size_of(&self) -> usize {
        0
    }
}

/// Handle the keys every screen shares
pub fn dispatch_common<S: Screen + ?Sized>(screen: &mut S, ctx: &mut Context, key: KeyValue) -> bool {
    match key {
        KeyValue::SHOW => screen.show_command(ctx),
        KeyValue::SAVE => screen.save_command(ctx),
        KeyValue::BACK => screen.back_command(ctx),
        _ => return false,
    }
    true
}
