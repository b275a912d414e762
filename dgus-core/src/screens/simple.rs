//! Pages whose logic lives in the host firmware
//!
//! Showing and leaving the page is handled here. Any other key is passed to
//! the host as a [`HostRequest::Key`].

use dgus_protocol::{Action, KeyValue, Page};

use crate::handler::{dispatch_common, Context, HostRequest, Screen};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimplePage {
    action: Action,
    page: Page,
}

impl SimplePage {
    pub const fn new(action: Action, page: Page) -> Self {
        Self { action, page }
    }

    pub fn action(&self) -> Action {
        self.action
    }

    pub fn page(&self) -> Page {
        self.page
    }
}

impl Screen for SimplePage {
    fn prepare_page(&mut self, _ctx: &mut Context) -> Option<Page> {
        Some(self.page)
    }

    fn dispatch(&mut self, ctx: &mut Context, key: KeyValue) -> bool {
        if dispatch_common(self, ctx, key) {
            return true;
        }
        ctx.request(HostRequest::Key {
            action: self.action,
            key,
        });
        true
    }
}

/// Screens without logic in the panel core
pub const SIMPLE_PAGES: [SimplePage; 20] = [
    SimplePage::new(Action::Temperatures, Page::Temperature),
    SimplePage::new(Action::SdCard, Page::SdCard),
    SimplePage::new(Action::ManualLeveling, Page::ManualLeveling),
    SimplePage::new(Action::ExtruderTuning, Page::ExtruderTuning),
    SimplePage::new(Action::AutomaticLeveling, Page::AutomaticLeveling),
    SimplePage::new(Action::PidTuning, Page::PidTuning),
    SimplePage::new(Action::Babysteps, Page::Babysteps),
    SimplePage::new(Action::Statistics, Page::Statistics),
    SimplePage::new(Action::PrintSettings, Page::PrintSettings),
    SimplePage::new(Action::StepsSettings, Page::StepsSettings),
    SimplePage::new(Action::FeedrateSettings, Page::FeedrateSettings),
    SimplePage::new(Action::AccelerationSettings, Page::AccelerationSettings),
    SimplePage::new(Action::JerkSettings, Page::JerkSettings),
    SimplePage::new(Action::Copyrights, Page::Copyrights),
    SimplePage::new(Action::SensorTuning, Page::SensorTuning),
    SimplePage::new(Action::SensorGrid, Page::SensorGrid),
    SimplePage::new(Action::SensorZHeight, Page::SensorZHeight),
    SimplePage::new(Action::ChangeFilament, Page::ChangeFilament),
    SimplePage::new(Action::LinearAdvanceTuning, Page::LinearAdvanceTuning),
    SimplePage::new(Action::LinearAdvanceSettings, Page::LinearAdvanceSettings),
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PanelConfig;

    #[test]
    fn test_other_keys_go_to_host() {
        let mut ctx = Context::new(PanelConfig::default());
        let mut page = SimplePage::new(Action::Babysteps, Page::Babysteps);
        page.handle(&mut ctx, KeyValue::SHOW);
        page.handle(&mut ctx, KeyValue::new(3));
        assert_eq!(
            ctx.pop_request(),
            Some(HostRequest::Key {
                action: Action::Babysteps,
                key: KeyValue::new(3)
            })
        );
        assert_eq!(ctx.pages.current(), Page::Babysteps);
    }

    #[test]
    fn test_pages_are_distinct() {
        for (i, a) in SIMPLE_PAGES.iter().enumerate() {
            for b in &SIMPLE_PAGES[i + 1..] {
                assert_ne!(a.action(), b.action());
                assert_ne!(a.page(), b.page());
            }
        }
    }
}
